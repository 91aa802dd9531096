//! Owner of the force generators, keyed by contact type.

use std::collections::BTreeMap;

use tracing::debug;

use crate::{ContactError, ContactForceGenerator, ContactTypeId, Result};

/// Force generators indexed by the contact type they handle, plus an
/// optional fallback for every type without one.
///
/// The registry owns its generators. Adopting a generator for a type that
/// already has one drops the old generator immediately.
#[derive(Debug, Default)]
pub struct GeneratorRegistry {
    generators: BTreeMap<ContactTypeId, Box<dyn ContactForceGenerator>>,
    default: Option<Box<dyn ContactForceGenerator>>,
}

impl GeneratorRegistry {
    /// An empty registry with no default generator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a generator for its [`ContactForceGenerator::contact_type`].
    ///
    /// Returns `true` if a previously registered generator was replaced
    /// (and dropped).
    pub fn adopt(&mut self, generator: Box<dyn ContactForceGenerator>) -> bool {
        let type_id = generator.contact_type();
        let name = generator.name().to_owned();
        match self.generators.insert(type_id, generator) {
            Some(old) => {
                debug!(%type_id, old = old.name(), new = %name, "replaced force generator");
                true
            }
            None => {
                debug!(%type_id, generator = %name, "adopted force generator");
                false
            }
        }
    }

    /// Replace the fallback generator; `None` removes it.
    ///
    /// Returns `true` if a previous default was dropped.
    pub fn adopt_default(&mut self, generator: Option<Box<dyn ContactForceGenerator>>) -> bool {
        if let Some(g) = &generator {
            debug!(generator = g.name(), "adopted default force generator");
        }
        std::mem::replace(&mut self.default, generator).is_some()
    }

    /// Builder form of [`GeneratorRegistry::adopt`].
    #[must_use]
    pub fn with(mut self, generator: Box<dyn ContactForceGenerator>) -> Self {
        self.adopt(generator);
        self
    }

    /// Builder form of [`GeneratorRegistry::adopt_default`].
    #[must_use]
    pub fn with_default(mut self, generator: Box<dyn ContactForceGenerator>) -> Self {
        self.adopt_default(Some(generator));
        self
    }

    /// Generator to use for a contact type: the specific one if registered,
    /// otherwise the default.
    pub fn resolve(&self, type_id: ContactTypeId) -> Result<&dyn ContactForceGenerator> {
        self.get(type_id)
            .or_else(|| self.default_generator())
            .ok_or(ContactError::NoGenerator(type_id))
    }

    /// Whether a generator is registered specifically for `type_id`.
    #[must_use]
    pub fn has_specific(&self, type_id: ContactTypeId) -> bool {
        self.generators.contains_key(&type_id)
    }

    /// Whether a fallback generator is installed.
    #[must_use]
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// The generator registered specifically for `type_id`.
    #[must_use]
    pub fn get(&self, type_id: ContactTypeId) -> Option<&dyn ContactForceGenerator> {
        self.generators.get(&type_id).map(Box::as_ref)
    }

    /// The fallback generator.
    #[must_use]
    pub fn default_generator(&self) -> Option<&dyn ContactForceGenerator> {
        self.default.as_deref()
    }

    /// Number of type-specific generators (the default is not counted).
    #[must_use]
    pub fn len(&self) -> usize {
        self.generators.len()
    }

    /// Whether no type-specific generators are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// Contact types with a specific generator, in ascending order.
    pub fn type_ids(&self) -> impl Iterator<Item = ContactTypeId> + '_ {
        self.generators.keys().copied()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::{
        Contact, ContactForce, DoNothing, GeneratorContext, HertzCircular, Reject,
        SurfaceVelocity,
    };
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Sets a flag when dropped.
    #[derive(Debug)]
    struct Tracked {
        dropped: Arc<AtomicBool>,
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.dropped.store(true, Ordering::SeqCst);
        }
    }

    impl ContactForceGenerator for Tracked {
        fn name(&self) -> &str {
            "Tracked"
        }

        fn contact_type(&self) -> ContactTypeId {
            ContactTypeId::CIRCULAR_POINT
        }

        fn calc_contact_force(
            &self,
            _ctx: &GeneratorContext<'_>,
            _contact: &Contact,
            _v1: &SurfaceVelocity,
            _v2: &SurfaceVelocity,
        ) -> Result<Option<ContactForce>> {
            Ok(None)
        }
    }

    #[test]
    fn test_resolve_prefers_specific() {
        let registry = GeneratorRegistry::new()
            .with(Box::new(HertzCircular))
            .with_default(Box::new(DoNothing::new()));

        assert_eq!(
            registry.resolve(ContactTypeId::CIRCULAR_POINT).unwrap().name(),
            "HertzCircular"
        );
        assert_eq!(
            registry.resolve(ContactTypeId::TRIANGLE_MESH).unwrap().name(),
            "DoNothing"
        );
    }

    #[test]
    fn test_resolve_without_default_fails() {
        let registry = GeneratorRegistry::new().with(Box::new(HertzCircular));
        assert_eq!(
            registry.resolve(ContactTypeId::ELLIPTICAL_POINT).unwrap_err(),
            ContactError::NoGenerator(ContactTypeId::ELLIPTICAL_POINT)
        );
    }

    #[test]
    fn test_replacement_drops_previous() {
        let dropped = Arc::new(AtomicBool::new(false));
        let mut registry = GeneratorRegistry::new();
        assert!(!registry.adopt(Box::new(Tracked {
            dropped: Arc::clone(&dropped),
        })));
        assert!(!dropped.load(Ordering::SeqCst));

        assert!(registry.adopt(Box::new(HertzCircular)));
        assert!(dropped.load(Ordering::SeqCst));
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get(ContactTypeId::CIRCULAR_POINT).unwrap().name(),
            "HertzCircular"
        );
    }

    #[test]
    fn test_default_replacement_and_removal() {
        let mut registry = GeneratorRegistry::new();
        assert!(!registry.has_default());
        assert!(!registry.adopt_default(Some(Box::new(DoNothing::new()))));
        assert!(registry.adopt_default(Some(Box::new(Reject::new()))));
        assert_eq!(registry.default_generator().unwrap().name(), "Reject");

        assert!(registry.adopt_default(None));
        assert!(!registry.has_default());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_type_ids_sorted() {
        let registry = GeneratorRegistry::new()
            .with(Box::new(DoNothing::for_type(ContactTypeId::TRIANGLE_MESH)))
            .with(Box::new(HertzCircular));
        let ids: Vec<_> = registry.type_ids().collect();
        assert_eq!(
            ids,
            vec![ContactTypeId::CIRCULAR_POINT, ContactTypeId::TRIANGLE_MESH]
        );
        assert!(registry.has_specific(ContactTypeId::TRIANGLE_MESH));
        assert!(!registry.has_specific(ContactTypeId::ELLIPTICAL_POINT));
    }
}
