//! Interface to the generative model.
//!
//! The core treats the model as an unreliable collaborator: prompt in, text
//! out. [`GenerativeClient`] is the only seam, so any provider (or a script in
//! tests) can stand behind it.
//!
//! # Mocking
//!
//! The trait is annotated with `#[cfg_attr(test, mockall::automock)]`, which
//! generates `MockGenerativeClient` for unit tests.

mod types;

pub use types::{CompletionConfig, CompletionResponse, Message, Usage};

use async_trait::async_trait;

use crate::error::CollaboratorError;

/// Generative model client.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    /// Send a completion request.
    ///
    /// # Arguments
    ///
    /// * `messages` - The conversation messages
    /// * `config` - Completion configuration options
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError`] if the model cannot be reached or does
    /// not answer in time.
    async fn complete(
        &self,
        messages: Vec<Message>,
        config: CompletionConfig,
    ) -> Result<CompletionResponse, CollaboratorError>;
}
