//! Resume input module
//! Builds candidate profiles from already-decoded plain text

pub mod profile;

pub use profile::ProfileBuilder;
