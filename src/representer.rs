//! Per-file representation: parse → normalize → print.

use tracing::{debug, error};

use crate::mapping::Mapping;
use crate::normalizer::NormalizeVisitor;
use crate::parser::Parser;
use crate::printer::Printer;

/// Produce the canonical representation of one file against the
/// submission-wide mapping.
///
/// A parse failure is not an error for the run: the offending file is logged
/// and contributed verbatim so one bad file never blocks its siblings.
pub fn represent_source(code: &str, mapping: &mut Mapping) -> String {
    let mut program = match Parser::parse(code) {
        Ok(program) => program,
        Err(err) => {
            error!(code, %err, "unable to parse code");
            return code.to_string();
        }
    };

    debug!(ast = ?program, "ast before normalization");
    NormalizeVisitor::new(mapping).walk_program(&mut program);
    debug!(ast = ?program, "ast after normalization");

    Printer::new().print_program(&program)
}
