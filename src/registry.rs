//! The registry of fault variants known to a [`Codec`](crate::Codec).
//!
//! A registry maps a wire discriminator to a factory producing the zero value
//! of the matching variant. It is populated during initialization and then
//! moved into a codec, which never mutates it again.

use std::collections::HashMap;

use thiserror::Error;

use crate::fault::{AnyFault, FaultCapability, Kind};

/// A constructor for the zero value of one fault variant.
pub type Factory = fn() -> AnyFault;

/// An error returned when no factory is registered for a discriminator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no variant registered for discriminator `{0}`")]
pub struct UnknownVariant(pub String);

/// An error that may occur while registering a variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterError {
    #[error("discriminator `{0}` is already registered")]
    Duplicate(&'static str),

    #[error("factory for `{discriminator}` produces `{produced}` values")]
    MismatchedFactory {
        discriminator: &'static str,
        produced: Kind,
    },
}

/// Maps discriminators to variant factories.
#[derive(Debug, Clone)]
pub struct Registry {
    factories: HashMap<&'static str, Factory>,
}

impl Registry {
    /// A registry that knows no variant at all.
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// A registry holding every variant of the builtin hierarchy.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();

        for kind in Kind::ALL {
            registry
                .register_kind(kind)
                .expect("builtin kinds are distinct");
        }

        registry
    }

    /// Register `factory` under `discriminator`.
    ///
    /// The factory must produce values reporting that same discriminator,
    /// so decoding and re-encoding a record never changes its tag.
    pub fn register(
        &mut self,
        discriminator: &'static str,
        factory: Factory,
    ) -> Result<(), RegisterError> {
        let produced = factory().kind();
        if produced.discriminator() != discriminator {
            return Err(RegisterError::MismatchedFactory {
                discriminator,
                produced,
            });
        }

        if self.factories.contains_key(discriminator) {
            return Err(RegisterError::Duplicate(discriminator));
        }

        tracing::debug!("registering fault variant `{discriminator}`");

        self.factories.insert(discriminator, factory);
        Ok(())
    }

    /// Register the builtin factory for `kind`.
    pub fn register_kind(&mut self, kind: Kind) -> Result<(), RegisterError> {
        let factory: Factory = match kind {
            Kind::Fault => || AnyFault::zeroed(Kind::Fault),
            Kind::RuntimeFault => || AnyFault::zeroed(Kind::RuntimeFault),
            Kind::NotFound => || AnyFault::zeroed(Kind::NotFound),
        };

        self.register(kind.discriminator(), factory)
    }

    /// Look up the factory registered under `discriminator`.
    pub fn lookup(&self, discriminator: &str) -> Result<Factory, UnknownVariant> {
        self.factories
            .get(discriminator)
            .copied()
            .ok_or_else(|| UnknownVariant(discriminator.to_string()))
    }

    /// Whether a factory is registered under `discriminator`.
    pub fn contains(&self, discriminator: &str) -> bool {
        self.factories.contains_key(discriminator)
    }

    /// Iterate over the registered discriminators, in no particular order.
    pub fn discriminators(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_knows_every_kind() {
        let registry = Registry::builtin();

        for kind in Kind::ALL {
            let factory = registry.lookup(kind.discriminator()).unwrap();
            assert_eq!(factory().kind(), kind);
        }
    }

    #[test]
    fn it_rejects_unknown_discriminators() {
        let registry = Registry::builtin();

        assert_eq!(
            registry.lookup("Bogus").unwrap_err(),
            UnknownVariant("Bogus".into())
        );

        // Discriminators are case-sensitive
        assert!(registry.lookup("notfound").is_err());
    }

    #[test]
    fn it_rejects_duplicates() {
        let mut registry = Registry::builtin();

        assert_eq!(
            registry.register_kind(Kind::NotFound),
            Err(RegisterError::Duplicate("NotFound"))
        );
    }

    #[test]
    fn it_rejects_mismatched_factories() {
        let mut registry = Registry::empty();

        assert_eq!(
            registry.register("NotFound", || AnyFault::zeroed(Kind::Fault)),
            Err(RegisterError::MismatchedFactory {
                discriminator: "NotFound",
                produced: Kind::Fault,
            })
        );
        assert!(!registry.contains("NotFound"));
    }

    #[test]
    fn empty_can_be_populated_partially() {
        let mut registry = Registry::empty();
        registry.register_kind(Kind::Fault).unwrap();
        registry.register_kind(Kind::RuntimeFault).unwrap();

        let mut discriminators: Vec<_> = registry.discriminators().collect();
        discriminators.sort_unstable();

        assert_eq!(discriminators, ["Fault", "RuntimeFault"]);
        assert!(registry.lookup("NotFound").is_err());
    }
}
