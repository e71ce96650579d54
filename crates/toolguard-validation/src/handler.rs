//! Tool handler seam.
//!
//! Handlers report failure through `Result`; the orchestrator converts any
//! `Err` (or a panic) into an error-flagged `ToolResult` and never lets it
//! reach the caller.

use std::future::Future;

use async_trait::async_trait;
use thiserror::Error;
use toolguard_core::ToolResult;

/// Failure reported by a tool handler.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("{0}")]
    Failed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl HandlerError {
    pub fn failed(message: impl Into<String>) -> Self {
        HandlerError::Failed(message.into())
    }
}

/// The operation a guarded tool wraps. Receives already-sanitized arguments.
#[async_trait]
pub trait ToolHandler<A: Send + 'static>: Send + Sync {
    async fn call(&self, args: A) -> Result<ToolResult, HandlerError>;
}

/// Adapter turning an async closure into a [`ToolHandler`].
pub struct FnHandler<F>(F);

/// Wrap `f` so it can be passed wherever a [`ToolHandler`] is expected.
///
/// ```rust
/// use toolguard_core::ToolResult;
/// use toolguard_validation::handler::{handler_fn, HandlerError};
///
/// let echo = handler_fn(|args: serde_json::Value| async move {
///     Ok::<_, HandlerError>(ToolResult::success(args.to_string()))
/// });
/// # let _ = echo;
/// ```
pub fn handler_fn<F>(f: F) -> FnHandler<F> {
    FnHandler(f)
}

#[async_trait]
impl<A, F, Fut> ToolHandler<A> for FnHandler<F>
where
    A: Send + 'static,
    F: Fn(A) -> Fut + Send + Sync,
    Fut: Future<Output = Result<ToolResult, HandlerError>> + Send + 'static,
{
    async fn call(&self, args: A) -> Result<ToolResult, HandlerError> {
        (self.0)(args).await
    }
}
