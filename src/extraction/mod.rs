//! Job requirement extraction module
//! AI collaborator, validation, reliability gate, and deterministic fallback

pub mod provider;
pub mod prompts;
pub mod validator;
pub mod faillog;
pub mod reliability;
pub mod fallback;
pub mod coordinator;

pub use coordinator::RequirementCoordinator;
pub use provider::{AiProvider, AiRequest, NullAiProvider};
