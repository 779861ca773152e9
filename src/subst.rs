//! Substitution engine: expands one command line against a context
//!
//! Variable references resolve through the [`Context`]; an undefined
//! variable is an error, never silently dropped or left in place.
//! Command substitutions run synchronously as their own child process
//! before the enclosing line is dispatched; their captured stdout is
//! spliced in verbatim with only trailing line terminators stripped.

use crate::context::Context;
use crate::lexer::{lex, LexError, Token};
use std::io;
use std::process::{Command, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubstError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("undefined variable: {name}")]
    UndefinedVariable { name: String },
    #[error("command substitution `{command}` exited with status {status}")]
    CommandFailed { command: String, status: i32 },
    #[error("failed to run command substitution `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
}

/// Expand a raw command line into the string handed to the dispatcher.
///
/// Single pass: expanded text is not re-scanned for further
/// substitution.
pub fn expand(line: &str, ctx: &Context) -> Result<String, SubstError> {
    let mut out = String::with_capacity(line.len());
    for token in lex(line)? {
        match token {
            Token::Literal(s) => out.push_str(&s),
            Token::VariableRef(name) => match ctx.get(&name) {
                Some(value) => out.push_str(value),
                None => return Err(SubstError::UndefinedVariable { name }),
            },
            Token::CommandSub(cmd) => out.push_str(&capture(&cmd)?),
        }
    }
    Ok(out)
}

/// Run an embedded command and capture its stdout, stripping trailing
/// line terminators only (interior whitespace is kept verbatim).
fn capture(cmd: &str) -> Result<String, SubstError> {
    let output = Command::new("sh")
        .arg("-c")
        .arg(cmd)
        .stdin(Stdio::inherit())
        .stderr(Stdio::inherit())
        .output()
        .map_err(|e| SubstError::Spawn {
            command: cmd.to_string(),
            source: e,
        })?;

    if !output.status.success() {
        return Err(SubstError::CommandFailed {
            command: cmd.to_string(),
            status: output.status.code().unwrap_or(-1),
        });
    }

    let mut text = String::from_utf8_lossy(&output.stdout).to_string();
    while text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    Ok(text)
}
