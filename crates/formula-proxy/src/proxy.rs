//! The formula proxy: one query in, one completion call, one normalized answer out.

use crate::{
    config::ProxyConfig,
    error::ProxyError,
    outcome::FormulaOutcome,
    prompt,
    types::FormulaResponse,
    upstream::CompletionClient,
};
use tracing::{debug, warn};

pub struct FormulaProxy {
    config: ProxyConfig,
    client: CompletionClient,
}

impl FormulaProxy {
    pub fn new(config: ProxyConfig) -> Result<Self, ProxyError> {
        let client = CompletionClient::new(&config.upstream, &config.api_key)?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Turn a plain-language query into a formula answer.
    pub async fn generate(&self, query: &str) -> Result<FormulaResponse, ProxyError> {
        if query.trim().is_empty() {
            return Err(ProxyError::InvalidRequest(
                "'query' must be a non-empty string".into(),
            ));
        }

        let prompt = prompt::build_prompt(query);
        let content = self.client.complete(&prompt).await?;

        let outcome = FormulaOutcome::from_completion(&content);
        if outcome.is_fallback() {
            warn!(content = %content, "completion was not the requested JSON, using fallback");
        } else {
            debug!("completion parsed");
        }

        Ok(outcome.into_response())
    }
}
