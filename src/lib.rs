//! Resume scorer library

pub mod cli;
pub mod config;
pub mod error;
pub mod extraction;
pub mod input;
pub mod matching;
pub mod model;
pub mod output;
pub mod pipeline;

pub use config::Config;
pub use error::{Result, ResumeScorerError};
