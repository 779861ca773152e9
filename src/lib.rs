//! bake - a declarative command-recipe runner
//!
//! # Overview
//!
//! A `Bakefile` names recipes; each recipe is an ordered list of shell
//! command lines:
//!
//! ```text
//! default:
//!     echo hi
//!
//! publish:
//!     toolY publish --token $(cat .pypi-token)
//! ```
//!
//! Invoking with no argument runs the *first-declared* recipe (the
//! implicit default — declaration order, not the name `default`,
//! decides). Invoking with a name runs that recipe. Before each command
//! line is dispatched, `$VAR`/`${VAR}` references are resolved against
//! the substitution context and `$(cmd)`/backtick substitutions are run
//! as their own child processes, their trimmed output spliced in. Lines
//! run one at a time; the first non-zero exit stops the recipe and its
//! status propagates to the caller unchanged.
//!
//! # Example
//!
//! ```rust
//! use bake::{parse, Context, Executor, Resolver};
//!
//! let registry = parse("greet:\n    echo hello\n").unwrap();
//! let recipe = Resolver::new(&registry).resolve(None).unwrap();
//! let mut executor = Executor::new();
//! executor.execute(recipe, &Context::from_env()).unwrap();
//! ```

pub mod context;
pub mod executor;
pub mod lexer;
pub mod parser;
pub mod registry;
pub mod resolver;
pub mod signals;
pub mod subst;

// Re-export commonly used items
pub use context::Context;
pub use executor::{ExecError, Executor, RecipeStatus, EXIT_INTERRUPTED, EXIT_USAGE};
pub use lexer::{lex, LexError, Token};
pub use parser::{parse, ParseError};
pub use registry::{Recipe, Registry, RegistryError};
pub use resolver::Resolver;
pub use subst::{expand, SubstError};

/// Convenience function: parse recipe text, resolve the (optionally
/// named) recipe, and run it against a context
pub fn run(text: &str, recipe: Option<&str>, ctx: &Context) -> Result<(), String> {
    let registry = parse(text).map_err(|e| e.to_string())?;
    let recipe = Resolver::new(&registry)
        .resolve(recipe)
        .map_err(|e| e.to_string())?;
    let mut executor = Executor::new();
    executor.execute(recipe, ctx).map_err(|e| e.to_string())
}
