//! Name to algorithm lookup.

use std::collections::BTreeMap;
use std::fmt;

use crate::algorithm::{Algorithm, Pbkdf2};
use crate::error::RegistryError;

/// Immutable-after-construction set of algorithms, keyed by name.
///
/// A registry always has a default algorithm, used when a caller hashes
/// without naming one.
pub struct Registry {
    algorithms: BTreeMap<String, Box<dyn Algorithm>>,
    default: String,
}

impl Registry {
    /// Creates a registry whose only (and default) algorithm is `default`.
    pub fn new(default: impl Algorithm + 'static) -> Self {
        let name = default.name().to_string();
        let mut algorithms: BTreeMap<String, Box<dyn Algorithm>> = BTreeMap::new();
        algorithms.insert(name.clone(), Box::new(default));

        Self {
            algorithms,
            default: name,
        }
    }

    /// Adds another algorithm.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateAlgorithm`] if the name is taken.
    pub fn register(mut self, algorithm: impl Algorithm + 'static) -> Result<Self, RegistryError> {
        let name = algorithm.name().to_string();
        if self.algorithms.contains_key(&name) {
            return Err(RegistryError::DuplicateAlgorithm(name));
        }
        self.algorithms.insert(name, Box::new(algorithm));
        Ok(self)
    }

    pub fn resolve(&self, name: &str) -> Option<&dyn Algorithm> {
        self.algorithms.get(name).map(|a| &**a)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.algorithms.contains_key(name)
    }

    pub fn default_algorithm(&self) -> &str {
        &self.default
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.algorithms.keys().map(String::as_str)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Registry::new(Pbkdf2)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("algorithms", &self.algorithms.keys().collect::<Vec<_>>())
            .field("default", &self.default)
            .finish()
    }
}
