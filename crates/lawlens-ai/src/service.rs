//! The single seam between the pipeline and a hosted language model.
//!
//! Every stage that talks to a model goes through [`TranslationService`],
//! so tests substitute a scripted fake and never touch the network.

use async_trait::async_trait;

use crate::error::AiError;

/// One hosted model endpoint, prompt in, text out.
#[async_trait]
pub trait TranslationService: Send + Sync {
    /// Short provider name for logs and error sentinels.
    fn name(&self) -> &str;

    /// Run one generation with a system prompt and a user prompt.
    async fn generate(&self, system: &str, user: &str) -> Result<String, AiError>;
}

/// Reject non-2xx replies with the body attached.
pub(crate) async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, AiError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(AiError::Server {
            status: status.as_u16(),
            body,
        });
    }
    Ok(resp)
}
