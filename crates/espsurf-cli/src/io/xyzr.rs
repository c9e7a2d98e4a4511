use crate::error::{CliError, Result};
use espsurf::core::models::atom::{Atom, AtomSet};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq)]
pub enum XyzrError {
    #[error("line {line}: expected 4 columns (x y z radius), found {found}")]
    MissingColumns { line: usize, found: usize },

    #[error("line {line}: invalid number '{token}'")]
    InvalidNumber { line: usize, token: String },
}

/// Parses XYZR text.
///
/// Each record holds whitespace-separated `x y z radius` values. Blank lines and everything
/// after a `#` are ignored, as are tokens past the fourth column.
pub fn parse_xyzr(content: &str) -> std::result::Result<AtomSet, XyzrError> {
    let mut atoms = Vec::new();

    for (line_index, raw_line) in content.lines().enumerate() {
        let line = line_index + 1;
        let data = raw_line.split('#').next().unwrap_or_default();
        let tokens: Vec<&str> = data.split_whitespace().take(4).collect();
        if tokens.is_empty() {
            continue;
        }
        if tokens.len() < 4 {
            return Err(XyzrError::MissingColumns {
                line,
                found: tokens.len(),
            });
        }

        let mut values = [0.0; 4];
        for (value, token) in values.iter_mut().zip(&tokens) {
            *value = token.parse().map_err(|_| XyzrError::InvalidNumber {
                line,
                token: token.to_string(),
            })?;
        }
        atoms.push(Atom::from(values));
    }

    Ok(AtomSet::new(atoms))
}

pub fn read_xyzr(path: &Path) -> Result<AtomSet> {
    let content = std::fs::read_to_string(path)?;
    let atoms = parse_xyzr(&content).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    debug!("Read {} atom(s) from {:?}", atoms.len(), path);
    Ok(atoms)
}
