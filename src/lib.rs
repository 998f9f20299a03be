//! php-representer: normalizes PHP solutions into a stable canonical
//! representation for automated grouping of similar submissions.
//!
//! Pipeline per file: scan → parse → normalize (rename + canonicalize
//! against a submission-wide [`mapping::Mapping`]) → print. The
//! [`submission::DirectoryRepresenter`] drives the pipeline over every
//! declared solution file and packages the three output artifacts.

// Scanner — token definitions and the PHP lexer
pub mod scanner;
#[cfg(test)]
#[path = "tests/scanner_tests.rs"]
mod scanner_tests;

// Parser — owned AST and recursive descent
pub mod parser;
#[cfg(test)]
#[path = "tests/parser_tests.rs"]
mod parser_tests;

// Stable-name allocation and the mapping export
pub mod mapping;

// Static PHP builtin-function tables
pub mod builtins;

// The normalization pass (enter/leave walk)
pub mod normalizer;

// Canonical printer
pub mod printer;
#[cfg(test)]
#[path = "tests/printer_tests.rs"]
mod printer_tests;

// Per-file representation (parse → normalize → print with fallback)
pub mod representer;

// Submission orchestration and artifacts
pub mod submission;

// Fatal error taxonomy
pub mod error;

// Tracing subscriber setup for the CLI
pub mod tracing_config;

// CLI argument parsing and the run driver
pub mod cli;

pub use mapping::{Category, Mapping};
pub use representer::represent_source;
pub use submission::{DirectoryRepresenter, Representation};
