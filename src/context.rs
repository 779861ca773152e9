//! Substitution context: the variables visible to a recipe run
//!
//! The engine never reads the process environment directly; it takes a
//! `Context` built from it. Tests build contexts from scratch instead,
//! so expansion is deterministic.

use std::collections::HashMap;
use std::env;

/// Read-only variable view for one recipe execution
#[derive(Debug, Clone, Default)]
pub struct Context {
    vars: HashMap<String, String>,
}

impl Context {
    /// Empty context (nothing resolves)
    pub fn new() -> Self {
        Context::default()
    }

    /// Snapshot the process environment
    pub fn from_env() -> Self {
        Context {
            vars: env::vars().collect(),
        }
    }

    /// Add a binding, shadowing any inherited value of the same name
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    /// Look up a variable
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_context_resolves_nothing() {
        let ctx = Context::new();
        assert_eq!(ctx.get("HOME"), None);
    }

    #[test]
    fn with_var_shadows() {
        let ctx = Context::new().with_var("NAME", "a").with_var("NAME", "b");
        assert_eq!(ctx.get("NAME"), Some("b"));
    }

    #[test]
    fn from_env_sees_process_environment() {
        env::set_var("BAKE_CONTEXT_PROBE", "yes");
        let ctx = Context::from_env();
        assert_eq!(ctx.get("BAKE_CONTEXT_PROBE"), Some("yes"));
        env::remove_var("BAKE_CONTEXT_PROBE");
    }
}
