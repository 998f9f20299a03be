//! Drives one representer run: config → representation → artifacts on disk.

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::args::CliArgs;
use crate::submission::{write_artifacts, DirectoryRepresenter};

pub fn run(args: &CliArgs) -> Result<()> {
    info!("Exercise slug: {}", args.exercise_slug);
    info!("Solution directory: {}", args.solution_dir.display());
    info!("Output directory: {}", args.output_dir.display());

    let representer = DirectoryRepresenter::new(&args.solution_dir);
    let representation = representer.represent()?;

    std::fs::create_dir_all(&args.output_dir).with_context(|| {
        format!(
            "failed to create output directory `{}`",
            args.output_dir.display()
        )
    })?;
    write_artifacts(&args.output_dir, &representation)?;

    Ok(())
}
