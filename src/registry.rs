//! Recipe registry: named command sequences in declaration order

use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum RegistryError {
    #[error("duplicate recipe: {name}")]
    DuplicateRecipe { name: String },
    #[error("unknown recipe: {name}")]
    UnknownRecipe { name: String },
    #[error("no recipes defined")]
    EmptyRegistry,
}

/// A named, ordered sequence of raw command lines.
///
/// Immutable once defined; the declaration index makes the implicit
/// default (index 0) explicit instead of relying on a recipe literally
/// named "default".
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    name: String,
    lines: Vec<String>,
    index: usize,
}

impl Recipe {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Declaration index (0 = first declared = implicit default)
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Name → recipe map that preserves and exposes declaration order
#[derive(Debug, Default)]
pub struct Registry {
    recipes: Vec<Recipe>,
    by_name: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    /// Register a recipe; names are unique and case-sensitive
    pub fn define(
        &mut self,
        name: impl Into<String>,
        lines: Vec<String>,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(RegistryError::DuplicateRecipe { name });
        }
        let index = self.recipes.len();
        self.by_name.insert(name.clone(), index);
        self.recipes.push(Recipe { name, lines, index });
        Ok(())
    }

    /// Exact-match lookup
    pub fn get(&self, name: &str) -> Result<&Recipe, RegistryError> {
        self.by_name
            .get(name)
            .map(|&i| &self.recipes[i])
            .ok_or_else(|| RegistryError::UnknownRecipe {
                name: name.to_string(),
            })
    }

    /// First-declared recipe, if any
    pub fn first(&self) -> Option<&Recipe> {
        self.recipes.first()
    }

    /// Recipes in declaration order. Restartable: each call yields the
    /// same sequence.
    pub fn list(&self) -> impl Iterator<Item = &Recipe> + '_ {
        self.recipes.iter()
    }

    /// Recipe names in declaration order
    pub fn names(&self) -> Vec<&str> {
        self.recipes.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}
