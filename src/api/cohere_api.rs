use backon::{ExponentialBuilder, Retryable};
use tracing::error;
use url::Url;

use crate::types::cohere::ChatRequest;

pub struct CohereApi;

impl CohereApi {
    /// POST a chat request, retrying while the upstream answers 5xx.
    pub async fn try_post_chat(
        client: reqwest::Client,
        url: &Url,
        api_key: impl AsRef<str>,
        retry_policy: ExponentialBuilder,
        body: &ChatRequest<'_>,
    ) -> Result<reqwest::Response, reqwest::Error> {
        (|| async {
            let resp = client
                .post(url.clone())
                .bearer_auth(api_key.as_ref())
                .json(body)
                .send()
                .await?;
            if resp.status().is_server_error() {
                let status = resp.status();
                let err = resp.error_for_status().unwrap_err();
                error!("Cohere server error (will retry): {}", status);
                return Err(err);
            }
            Ok(resp)
        })
        .retry(retry_policy)
        .await
    }
}
