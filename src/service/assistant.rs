use std::sync::Arc;
use tracing::info;

use crate::api::LanguageModel;
use crate::db::DbConnection;
use crate::error::CourierError;
use crate::service::agents::{generation_prompt, statement_from_reply};
use crate::service::intent::{Intent, router_prompt};
use crate::types::QueryRecord;

/// Schema → classify → generate → execute, one pass per call.
#[derive(Clone)]
pub struct SqlAssistant {
    model: Arc<dyn LanguageModel>,
    database_url: Arc<str>,
}

impl SqlAssistant {
    pub fn new(model: Arc<dyn LanguageModel>, database_url: impl Into<Arc<str>>) -> Self {
        Self {
            model,
            database_url: database_url.into(),
        }
    }

    /// Current schema text, on its own connection.
    pub async fn schema(&self) -> Result<String, CourierError> {
        let mut conn = DbConnection::connect(&self.database_url).await?;
        let schema = conn.read_schema().await;
        conn.close().await;
        schema
    }

    pub async fn classify(&self, query: &str) -> Result<Intent, CourierError> {
        info!("classifying query intent");
        let reply = self.model.complete(&router_prompt(query)).await?;
        let intent = Intent::from_reply(&reply);
        info!(%intent, model = self.model.name(), "router decision");
        Ok(intent)
    }

    pub async fn generate(
        &self,
        intent: Intent,
        schema: &str,
        query: &str,
    ) -> Result<String, CourierError> {
        info!(agent = intent.agent_name(), "invoking agent");
        let reply = self
            .model
            .complete(&generation_prompt(intent, schema, query))
            .await?;
        let sql = statement_from_reply(&reply);
        if sql.is_empty() {
            return Err(CourierError::EmptyCompletion);
        }
        Ok(sql)
    }

    /// Full interaction for `query` over a single database connection.
    pub async fn run(&self, query: &str) -> Result<QueryRecord, CourierError> {
        let mut conn = DbConnection::connect(&self.database_url).await?;
        let record = self.run_on(&mut conn, query).await;
        conn.close().await;
        record
    }

    async fn run_on(
        &self,
        conn: &mut DbConnection,
        query: &str,
    ) -> Result<QueryRecord, CourierError> {
        let schema = conn.read_schema().await?;
        let intent = self.classify(query).await?;
        let sql = self.generate(intent, &schema, query).await?;

        info!(%sql, "executing statement");
        let result = conn.execute(&sql).await;

        Ok(QueryRecord {
            query: query.to_string(),
            schema,
            intent,
            agent_name: intent.agent_name().to_string(),
            sql,
            result,
        })
    }
}
