use thiserror::Error;

/// Failures while calling the settlement provider. The worker treats every
/// variant the same way as a declined purchase: refund and mark failed.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Provider request timed out")]
    Timeout,

    #[error("Provider returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Unparseable provider response: {0}")]
    Unparseable(String),
}
