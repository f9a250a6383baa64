use axum::{Form, extract::State, response::Html};
use minijinja::Environment;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::{info, warn};

use crate::error::CourierError;
use crate::router::CourierState;
use crate::service::SqlAssistant;
use crate::types::QueryRecord;

const CONNECT_FAILED: &str = "Could not connect to the database. Please check your credentials.";

static TEMPLATES: LazyLock<Environment<'static>> = LazyLock::new(|| {
    let mut env = Environment::new();
    env.add_template("index.html", include_str!("../../templates/index.html"))
        .expect("FATAL: bundled index.html template is invalid");
    env
});

#[derive(Debug, Deserialize)]
pub struct AskForm {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Default, Serialize)]
struct PageView<'a> {
    schema: String,
    schema_error: bool,
    query: &'a str,
    record: Option<&'a QueryRecord>,
    warning: Option<&'static str>,
    error: Option<String>,
}

/// GET / -> the form with the current schema in the sidebar.
pub async fn index_page(State(state): State<CourierState>) -> Result<Html<String>, CourierError> {
    let mut view = PageView::default();
    load_sidebar(&state.assistant, &mut view).await;
    render(&view)
}

/// POST /ask -> run the pipeline for the submitted query and show all three panels.
pub async fn ask_page(
    State(state): State<CourierState>,
    Form(form): Form<AskForm>,
) -> Result<Html<String>, CourierError> {
    let query = form.query.trim();
    let mut view = PageView {
        query,
        ..PageView::default()
    };

    if query.is_empty() {
        view.warning = Some("Please enter a query.");
        load_sidebar(&state.assistant, &mut view).await;
        return render(&view);
    }

    let record = match state.assistant.run(query).await {
        Ok(record) => record,
        Err(e) => {
            warn!(error = %e, "query failed");
            view.error = Some(match e {
                CourierError::DatabaseConnect(_) => CONNECT_FAILED.to_string(),
                other => format!("An error occurred: {other}"),
            });
            load_sidebar(&state.assistant, &mut view).await;
            return render(&view);
        }
    };

    info!(intent = %record.intent, "query processed");
    view.schema = record.schema.clone();
    view.record = Some(&record);
    render(&view)
}

async fn load_sidebar(assistant: &SqlAssistant, view: &mut PageView<'_>) {
    match assistant.schema().await {
        Ok(schema) => view.schema = schema,
        Err(CourierError::DatabaseConnect(e)) => {
            warn!(error = %e, "schema fetch: database unreachable");
            view.schema = CONNECT_FAILED.to_string();
            view.schema_error = true;
        }
        Err(e) => {
            warn!(error = %e, "schema fetch failed");
            view.schema = format!("Error fetching schema: {e}");
            view.schema_error = true;
        }
    }
}

fn render(view: &PageView<'_>) -> Result<Html<String>, CourierError> {
    let page = TEMPLATES.get_template("index.html")?.render(view)?;
    Ok(Html(page))
}
