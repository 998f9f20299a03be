//! Command-line arguments.

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "php-representer",
    version,
    about = "Produces a normalized representation of a PHP solution"
)]
pub struct CliArgs {
    /// Slug of the exercise
    pub exercise_slug: String,

    /// Directory of the solution
    pub solution_dir: PathBuf,

    /// Writable directory for the representation
    pub output_dir: PathBuf,
}
