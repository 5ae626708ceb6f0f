//! Report assembly and rendering module

pub mod report;

pub use report::{AlignmentReport, ConsoleFormatter};
