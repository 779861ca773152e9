//! Bakefile parsing: text → registry
//!
//! The format is line-oriented:
//!
//! ```text
//! # build and publish
//! default:
//!     echo hi
//!
//! build:
//!     cargo build --release
//! ```
//!
//! A `name:` header at column zero opens a recipe; indented lines under
//! it are that recipe's command lines in order. Blank lines and
//! `#`-comment lines are skipped. Command lines are kept raw — `#`
//! inside them is not a comment, and no substitution happens at parse
//! time (a missing credential file must fail the run, not the load).

use crate::registry::{Registry, RegistryError};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("line {line}: duplicate recipe: {name}")]
    DuplicateRecipe { name: String, line: usize },
    #[error("line {line}: command line outside any recipe")]
    StrayIndent { line: usize },
    #[error("line {line}: expected `name:` header, got: {text}")]
    BadHeader { line: usize, text: String },
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

/// Parse recipe definitions into a [`Registry`].
///
/// Line numbers in errors are 1-based. Duplicate names fail the whole
/// load before anything can execute.
pub fn parse(input: &str) -> Result<Registry, ParseError> {
    let mut registry = Registry::new();
    // (name, command lines, header line number) of the recipe being read
    let mut current: Option<(String, Vec<String>, usize)> = None;

    for (i, line) in input.lines().enumerate() {
        let line_num = i + 1;
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if line.starts_with(char::is_whitespace) {
            match current.as_mut() {
                Some((_, lines, _)) => lines.push(trimmed.to_string()),
                None => return Err(ParseError::StrayIndent { line: line_num }),
            }
            continue;
        }

        // Column-zero line: must be a recipe header
        let name = match trimmed.strip_suffix(':') {
            Some(name) if is_valid_name(name) => name.to_string(),
            _ => {
                return Err(ParseError::BadHeader {
                    line: line_num,
                    text: trimmed.to_string(),
                })
            }
        };

        flush(&mut registry, current.take())?;
        current = Some((name, Vec::new(), line_num));
    }

    flush(&mut registry, current.take())?;
    Ok(registry)
}

fn flush(
    registry: &mut Registry,
    recipe: Option<(String, Vec<String>, usize)>,
) -> Result<(), ParseError> {
    if let Some((name, lines, header_line)) = recipe {
        registry.define(name, lines).map_err(|e| match e {
            RegistryError::DuplicateRecipe { name } => ParseError::DuplicateRecipe {
                name,
                line: header_line,
            },
            // define only fails on duplicates
            _ => unreachable!(),
        })?;
    }
    Ok(())
}
