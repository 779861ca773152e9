//! Executor: runs a resolved recipe's command lines in order
//!
//! Each line is substituted immediately before dispatch (not all up
//! front), so later lines can depend on files written by earlier ones.
//! Dispatch is `sh -c <expanded line>` with inherited stdio. The first
//! non-zero exit is fatal to the recipe: remaining lines are skipped
//! and the status propagates unchanged. No retries, no rollback.

use crate::context::Context;
use crate::registry::Recipe;
use crate::signals;
use crate::subst::{expand, SubstError};
use std::io;
use std::process::{Command, ExitStatus};
use thiserror::Error;

/// Exit code for bad invocations (unknown recipe, bad file, bad flags)
pub const EXIT_USAGE: i32 = 2;

/// Exit code when a run is interrupted (128 + SIGINT)
pub const EXIT_INTERRUPTED: i32 = 130;

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("recipe `{recipe}` command {index}: substitution failed: {source}")]
    Substitution {
        recipe: String,
        index: usize,
        #[source]
        source: SubstError,
    },
    #[error("recipe `{recipe}` command {index} exited with status {status}")]
    CommandFailed {
        recipe: String,
        index: usize,
        status: i32,
    },
    #[error("recipe `{recipe}` command {index}: failed to spawn: {source}")]
    Spawn {
        recipe: String,
        index: usize,
        #[source]
        source: io::Error,
    },
    #[error("recipe `{recipe}` interrupted")]
    Interrupted { recipe: String },
}

impl ExecError {
    /// Process exit code for this failure. A failed command line
    /// propagates its own status so downstream automation can tell
    /// failure causes apart; so does a failed command substitution.
    pub fn exit_code(&self) -> i32 {
        match self {
            ExecError::CommandFailed { status, .. } => *status,
            ExecError::Substitution {
                source: SubstError::CommandFailed { status, .. },
                ..
            } => *status,
            ExecError::Substitution { .. } => EXIT_USAGE,
            ExecError::Spawn { .. } => EXIT_USAGE,
            ExecError::Interrupted { .. } => EXIT_INTERRUPTED,
        }
    }
}

/// Per-recipe execution state
#[derive(Debug, Clone, PartialEq)]
pub enum RecipeStatus {
    Pending,
    /// Running the command line at this index
    Running(usize),
    Succeeded,
    Failed { index: usize, status: i32 },
}

impl Default for RecipeStatus {
    fn default() -> Self {
        RecipeStatus::Pending
    }
}

/// Runs one recipe at a time, one linear pass, one child at a time
#[derive(Debug, Default)]
pub struct Executor {
    status: RecipeStatus,
}

impl Executor {
    pub fn new() -> Self {
        Executor::default()
    }

    /// Last observed recipe state (for inspection after `execute`)
    pub fn status(&self) -> &RecipeStatus {
        &self.status
    }

    /// Run every command line of `recipe` in order, failing fast
    pub fn execute(&mut self, recipe: &Recipe, ctx: &Context) -> Result<(), ExecError> {
        self.status = RecipeStatus::Pending;

        for (index, raw) in recipe.lines().iter().enumerate() {
            if signals::interrupted() {
                return self.fail_interrupted(recipe, index);
            }
            self.status = RecipeStatus::Running(index);

            let line = expand(raw, ctx).map_err(|source| {
                let status = match &source {
                    SubstError::CommandFailed { status, .. } => *status,
                    _ => EXIT_USAGE,
                };
                self.status = RecipeStatus::Failed { index, status };
                ExecError::Substitution {
                    recipe: recipe.name().to_string(),
                    index,
                    source,
                }
            })?;

            let status = self.dispatch(recipe, index, &line)?;

            if signals::interrupted() {
                return self.fail_interrupted(recipe, index);
            }

            if !status.success() {
                let code = exit_code_of(status);
                self.status = RecipeStatus::Failed {
                    index,
                    status: code,
                };
                return Err(ExecError::CommandFailed {
                    recipe: recipe.name().to_string(),
                    index,
                    status: code,
                });
            }
        }

        self.status = RecipeStatus::Succeeded;
        Ok(())
    }

    /// Spawn one expanded line via the shell with inherited stdio and
    /// block until it exits
    fn dispatch(
        &mut self,
        recipe: &Recipe,
        index: usize,
        line: &str,
    ) -> Result<ExitStatus, ExecError> {
        let mut child = Command::new("sh").arg("-c").arg(line).spawn().map_err(|source| {
            self.status = RecipeStatus::Failed {
                index,
                status: EXIT_USAGE,
            };
            ExecError::Spawn {
                recipe: recipe.name().to_string(),
                index,
                source,
            }
        })?;

        signals::set_foreground_pid(child.id() as i32);
        let waited = child.wait();
        signals::clear_foreground_pid();

        waited.map_err(|source| {
            self.status = RecipeStatus::Failed {
                index,
                status: EXIT_USAGE,
            };
            ExecError::Spawn {
                recipe: recipe.name().to_string(),
                index,
                source,
            }
        })
    }

    fn fail_interrupted(&mut self, recipe: &Recipe, index: usize) -> Result<(), ExecError> {
        self.status = RecipeStatus::Failed {
            index,
            status: EXIT_INTERRUPTED,
        };
        Err(ExecError::Interrupted {
            recipe: recipe.name().to_string(),
        })
    }
}

/// Exit code of a finished child. A signal-killed child has no code;
/// report 128 + signal number, matching shell convention.
fn exit_code_of(status: ExitStatus) -> i32 {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(sig) = status.signal() {
            return 128 + sig;
        }
    }
    status.code().unwrap_or(-1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use std::io::Write;

    fn recipe_of(lines: &[&str]) -> Registry {
        let mut reg = Registry::new();
        reg.define("test", lines.iter().map(|s| s.to_string()).collect())
            .unwrap();
        reg
    }

    #[test]
    fn empty_recipe_succeeds() {
        let reg = recipe_of(&[]);
        let mut exec = Executor::new();
        exec.execute(reg.first().unwrap(), &Context::new()).unwrap();
        assert_eq!(*exec.status(), RecipeStatus::Succeeded);
    }

    #[test]
    fn all_lines_run_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("log");
        let reg = recipe_of(&[
            &format!("echo one >> {}", log.display()),
            &format!("echo two >> {}", log.display()),
        ]);
        let mut exec = Executor::new();
        exec.execute(reg.first().unwrap(), &Context::new()).unwrap();
        assert_eq!(std::fs::read_to_string(&log).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn first_failure_skips_remaining_lines() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("marker");
        let reg = recipe_of(&["exit 3", &format!("touch {}", marker.display())]);
        let mut exec = Executor::new();
        let err = exec
            .execute(reg.first().unwrap(), &Context::new())
            .unwrap_err();
        assert!(matches!(
            err,
            ExecError::CommandFailed {
                index: 0,
                status: 3,
                ..
            }
        ));
        assert_eq!(err.exit_code(), 3);
        assert_eq!(
            *exec.status(),
            RecipeStatus::Failed {
                index: 0,
                status: 3,
            }
        );
        assert!(!marker.exists());
    }

    #[test]
    fn failure_index_points_at_failing_line() {
        let reg = recipe_of(&["true", "true", "exit 7"]);
        let mut exec = Executor::new();
        let err = exec
            .execute(reg.first().unwrap(), &Context::new())
            .unwrap_err();
        assert!(matches!(
            err,
            ExecError::CommandFailed {
                index: 2,
                status: 7,
                ..
            }
        ));
    }

    #[test]
    fn lines_are_substituted_before_dispatch() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let reg = recipe_of(&[&format!("echo $GREETING > {}", out.display())]);
        let ctx = Context::new().with_var("GREETING", "hello");
        Executor::new().execute(reg.first().unwrap(), &ctx).unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "hello\n");
    }

    #[test]
    fn later_lines_see_earlier_side_effects() {
        // Line 2's command substitution reads the file line 1 wrote,
        // which only works because substitution happens per line at
        // dispatch time.
        let dir = tempfile::tempdir().unwrap();
        let token = dir.path().join("token");
        let out = dir.path().join("out");
        let reg = recipe_of(&[
            &format!("printf 'secret\\n' > {}", token.display()),
            &format!("echo got:$(cat {}) > {}", token.display(), out.display()),
        ]);
        Executor::new()
            .execute(reg.first().unwrap(), &Context::new())
            .unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "got:secret\n");
    }

    #[test]
    fn substitution_failure_is_distinct_and_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("marker");
        let reg = recipe_of(&[
            "echo $(exit 4)",
            &format!("touch {}", marker.display()),
        ]);
        let mut exec = Executor::new();
        let err = exec
            .execute(reg.first().unwrap(), &Context::new())
            .unwrap_err();
        assert!(matches!(err, ExecError::Substitution { index: 0, .. }));
        assert_eq!(err.exit_code(), 4);
        assert!(!marker.exists());
    }

    #[test]
    fn undefined_variable_fails_the_recipe() {
        let reg = recipe_of(&["echo $NO_SUCH_VARIABLE_HERE"]);
        let mut exec = Executor::new();
        let err = exec
            .execute(reg.first().unwrap(), &Context::new())
            .unwrap_err();
        assert!(matches!(
            err,
            ExecError::Substitution {
                source: SubstError::UndefinedVariable { .. },
                ..
            }
        ));
        assert_eq!(err.exit_code(), EXIT_USAGE);
    }

    #[test]
    fn command_sub_token_expands_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "secret\n").unwrap();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let reg = recipe_of(&[&format!(
            "echo token=$(cat {}) > {}",
            file.path().display(),
            out.display()
        )]);
        Executor::new()
            .execute(reg.first().unwrap(), &Context::new())
            .unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "token=secret\n");
    }
}
