//! Submission orchestration: config → per-file representation → artifacts.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::RepresenterError;
use crate::mapping::Mapping;
use crate::representer::represent_source;

/// Version tag of the representation format, written to
/// `representation.json`.
const REPRESENTATION_VERSION: u32 = 2;

/// The three artifacts produced for one submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Representation {
    pub representation_txt: String,
    pub representation_json: String,
    pub mapping_json: String,
}

#[derive(Serialize)]
struct RepresentationMetadata {
    version: u32,
}

/// `.meta/config.json`, as far as this tool cares about it. Unknown keys are
/// ignored; a malformed `files.solution` is a fatal configuration error.
#[derive(Debug, Deserialize)]
struct SubmissionConfig {
    files: Option<FilesSection>,
}

#[derive(Debug, Deserialize)]
struct FilesSection {
    solution: Option<Vec<String>>,
}

/// Represents every declared solution file of one submission directory
/// against a single shared mapping.
pub struct DirectoryRepresenter<'a> {
    solution_dir: &'a Path,
}

impl<'a> DirectoryRepresenter<'a> {
    pub fn new(solution_dir: &'a Path) -> DirectoryRepresenter<'a> {
        DirectoryRepresenter { solution_dir }
    }

    pub fn represent(&self) -> Result<Representation, RepresenterError> {
        let config_path = self.solution_dir.join(".meta/config.json");
        let config_json = read_file(&config_path)?;
        let solutions = parse_solution_list(&config_json)?;

        if solutions.is_empty() {
            warn!(".meta/config.json: `files.solution` key is empty");
        }

        // One mapping for the whole submission: identifiers reused across
        // files share a stable token. Files are processed strictly in the
        // declared order — numbering depends on it.
        let mut mapping = Mapping::new();
        let mut representation_txt = String::new();
        for solution in &solutions {
            info!("Representing solution file: {solution}");
            let code = read_file(&self.solution_dir.join(solution))?;
            representation_txt.push_str("// file: ");
            representation_txt.push_str(solution);
            representation_txt.push('\n');
            representation_txt.push_str(&represent_source(&code, &mut mapping));
            representation_txt.push('\n');
        }

        let metadata = RepresentationMetadata {
            version: REPRESENTATION_VERSION,
        };
        Ok(Representation {
            representation_txt,
            representation_json: serde_json::to_string(&metadata)
                .expect("metadata serializes"),
            mapping_json: mapping.to_export_string(),
        })
    }
}

fn read_file(path: &Path) -> Result<String, RepresenterError> {
    fs::read_to_string(path).map_err(|source| RepresenterError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_solution_list(config_json: &str) -> Result<Vec<String>, RepresenterError> {
    let config: SubmissionConfig = serde_json::from_str(config_json).map_err(|err| {
        // A present-but-wrongly-typed `files.solution` is the "invalid key"
        // case, not a syntax error.
        if err.is_data() {
            RepresenterError::InvalidSolutionList
        } else {
            RepresenterError::ConfigSyntax(err)
        }
    })?;
    let solutions = config
        .files
        .and_then(|files| files.solution)
        .ok_or(RepresenterError::InvalidSolutionList)?;
    info!(
        ".meta/config.json: Solutions files: {}",
        solutions.join(", ")
    );
    Ok(solutions)
}

/// Write the three artifacts into `output_dir`.
pub fn write_artifacts(
    output_dir: &Path,
    representation: &Representation,
) -> Result<(), RepresenterError> {
    let write = |name: &str, contents: &str| -> Result<(), RepresenterError> {
        let path: PathBuf = output_dir.join(name);
        fs::write(&path, contents).map_err(|source| RepresenterError::Write { path, source })
    };
    write("representation.txt", &representation.representation_txt)?;
    write("representation.json", &representation.representation_json)?;
    write("mapping.json", &representation.mapping_json)?;
    Ok(())
}
