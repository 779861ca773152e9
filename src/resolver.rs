//! Recipe resolution: which recipe does an invocation mean?
//!
//! No name means the first-declared recipe. A present name is matched
//! exactly; there is no fuzzy or partial matching, so selection stays
//! deterministic and auditable.

use crate::registry::{Recipe, Registry, RegistryError};

pub struct Resolver<'a> {
    registry: &'a Registry,
}

impl<'a> Resolver<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Resolver { registry }
    }

    /// Resolve an optionally-named recipe.
    ///
    /// `None` selects the recipe at declaration index 0 and fails with
    /// [`RegistryError::EmptyRegistry`] when nothing is defined.
    /// `Some(name)` delegates to the registry; an unknown name
    /// propagates unchanged so the caller can surface it with the
    /// valid-name list.
    pub fn resolve(&self, requested: Option<&str>) -> Result<&'a Recipe, RegistryError> {
        match requested {
            Some(name) => self.registry.get(name),
            None => self.registry.first().ok_or(RegistryError::EmptyRegistry),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        let mut reg = Registry::new();
        reg.define("first", vec!["echo one".to_string()]).unwrap();
        reg.define("second", vec!["echo two".to_string()]).unwrap();
        reg
    }

    #[test]
    fn no_name_selects_first_declared() {
        let reg = registry();
        let resolver = Resolver::new(&reg);
        assert_eq!(resolver.resolve(None).unwrap().name(), "first");
    }

    #[test]
    fn no_name_equals_first_declared_name() {
        let reg = registry();
        let resolver = Resolver::new(&reg);
        assert_eq!(
            resolver.resolve(None).unwrap(),
            resolver.resolve(Some("first")).unwrap()
        );
    }

    #[test]
    fn named_lookup_is_exact() {
        let reg = registry();
        let resolver = Resolver::new(&reg);
        assert_eq!(resolver.resolve(Some("second")).unwrap().name(), "second");
        assert!(matches!(
            resolver.resolve(Some("sec")),
            Err(RegistryError::UnknownRecipe { .. })
        ));
    }

    #[test]
    fn empty_registry_fails_default_resolution() {
        let reg = Registry::new();
        let resolver = Resolver::new(&reg);
        assert_eq!(
            resolver.resolve(None).unwrap_err(),
            RegistryError::EmptyRegistry
        );
    }
}
