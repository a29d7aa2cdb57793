use alloc::sync::Arc;
use core::any::{Any, type_name};
use core::fmt;

use pact_utils::TypeIdMap;

use crate::CodecError;

/// Ancillary services handed to creators and readers during deserialization.
///
/// The engine never looks inside; it only threads the container through
/// [`DeserializationContext::components`](crate::DeserializationContext::components).
///
/// # Examples
///
/// ```
/// use pact_codec::Components;
///
/// struct Clock(u64);
///
/// let components = Components::new().with(Clock(42));
/// assert_eq!(components.resolve::<Clock>().unwrap().0, 42);
/// assert!(components.get::<String>().is_none());
/// ```
#[derive(Default, Clone)]
pub struct Components {
    services: TypeIdMap<Arc<dyn Any + Send + Sync>>,
}

impl Components {
    #[inline]
    pub const fn new() -> Self {
        Self {
            services: TypeIdMap::new(),
        }
    }

    /// Installs `service`, replacing a previous one of the same type.
    pub fn insert<T: Any + Send + Sync>(&mut self, service: T) {
        self.services.insert_type::<T>(Arc::new(service));
    }

    #[inline]
    pub fn with<T: Any + Send + Sync>(mut self, service: T) -> Self {
        self.insert(service);
        self
    }

    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.services
            .get_type::<T>()
            .and_then(|service| service.downcast_ref::<T>())
    }

    /// Like [`get`](Self::get), failing with [`CodecError::MissingComponent`].
    pub fn resolve<T: Any + Send + Sync>(&self) -> Result<&T, CodecError> {
        self.get::<T>().ok_or(CodecError::MissingComponent {
            type_name: type_name::<T>(),
        })
    }

    #[inline]
    pub fn contains<T: Any + Send + Sync>(&self) -> bool {
        self.services.contains_type::<T>()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.services.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl fmt::Debug for Components {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Components")
            .field("len", &self.services.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_component() {
        let components = Components::new();
        assert!(matches!(
            components.resolve::<u32>(),
            Err(CodecError::MissingComponent { .. })
        ));
    }

    #[test]
    fn insert_replaces() {
        let mut components = Components::new();
        components.insert(1_u32);
        components.insert(2_u32);
        assert_eq!(components.len(), 1);
        assert_eq!(components.get::<u32>(), Some(&2));
    }
}
