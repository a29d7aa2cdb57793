use alloc::vec::Vec;

use pact_utils::TypeIdMap;

use crate::io::TypeKey;
use crate::info::TypeInfo;
use crate::{CodecError, Compact};

/// The per-session mapping between types and [`TypeKey`]s.
///
/// Keys are assigned in first-seen order starting at [`TypeKey::FIRST`] and
/// never change for the lifetime of the dictionary. A stream can only be read
/// with a dictionary holding the same keys as the one it was written with:
/// either the same instance, or one seeded with the same type list.
///
/// # Examples
///
/// ```
/// use pact_codec::{CompactDictionary, io::TypeKey, info::Typed};
///
/// let mut dictionary = CompactDictionary::with_types([String::type_info()]).unwrap();
///
/// assert_eq!(dictionary.key_of(String::type_info()), Some(TypeKey::FIRST));
/// assert_eq!(dictionary.len(), 1);
/// ```
#[derive(Default, Clone)]
pub struct CompactDictionary {
    keys: TypeIdMap<TypeKey>,
    types: Vec<&'static TypeInfo>,
}

impl CompactDictionary {
    #[inline]
    pub const fn new() -> Self {
        Self {
            keys: TypeIdMap::new(),
            types: Vec::new(),
        }
    }

    /// A dictionary with keys pre-assigned to `types`, in order.
    pub fn with_types(
        types: impl IntoIterator<Item = &'static TypeInfo>,
    ) -> Result<Self, CodecError> {
        let mut dictionary = Self::new();
        for info in types {
            dictionary.register(info)?;
        }
        Ok(dictionary)
    }

    /// Returns the key of `info`, assigning the next free key on first sight.
    pub fn register(&mut self, info: &'static TypeInfo) -> Result<TypeKey, CodecError> {
        if let Some(key) = self.keys.get(&info.type_id()) {
            return Ok(*key);
        }
        let key = i16::try_from(self.types.len())
            .ok()
            .and_then(|index| index.checked_add(TypeKey::FIRST.get()))
            .map(TypeKey::new)
            .ok_or_else(|| CodecError::DictionaryOverflow {
                type_path: info.type_path().into(),
            })?;
        self.keys.insert(info.type_id(), key);
        self.types.push(info);
        log::trace!("assigned type key {key} to `{}`", info.type_path());
        Ok(key)
    }

    /// Decides whether a type key has to precede `instance`.
    ///
    /// The serialized type is `resolved` when a resolver substituted it,
    /// otherwise the instance's runtime type. No key is needed when that type
    /// is the declared type itself. Otherwise the type must be assignable to
    /// `declared`, and its key is returned, assigned on first use.
    pub fn should_write_type_key(
        &mut self,
        instance: &dyn Compact,
        declared: &'static TypeInfo,
        resolved: &'static TypeInfo,
    ) -> Result<Option<TypeKey>, CodecError> {
        let serialized = if resolved == declared {
            instance.type_info()
        } else {
            resolved
        };
        if serialized == declared {
            return Ok(None);
        }
        if !serialized.is_assignable_to(declared) {
            return Err(CodecError::TypeMismatch {
                key: None,
                expected: declared.type_path().into(),
                actual: serialized.type_path().into(),
            });
        }
        self.register(serialized).map(Some)
    }

    /// Resolves a key read from the stream, checking it against `ancestor`.
    pub fn lookup_type(
        &self,
        key: TypeKey,
        ancestor: &'static TypeInfo,
    ) -> Result<&'static TypeInfo, CodecError> {
        let info = self
            .type_of(key)
            .ok_or(CodecError::CorruptDictionary { key })?;
        if !info.is_assignable_to(ancestor) {
            return Err(CodecError::TypeMismatch {
                key: Some(key),
                expected: ancestor.type_path().into(),
                actual: info.type_path().into(),
            });
        }
        Ok(info)
    }

    #[inline]
    pub fn key_of(&self, info: &TypeInfo) -> Option<TypeKey> {
        self.keys.get(&info.type_id()).copied()
    }

    pub fn type_of(&self, key: TypeKey) -> Option<&'static TypeInfo> {
        let index = key.get().checked_sub(TypeKey::FIRST.get())?;
        self.types.get(usize::try_from(index).ok()?).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterates over the assigned keys in key order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (TypeKey, &'static TypeInfo)> + '_ {
        self.types
            .iter()
            .enumerate()
            .map(|(index, info)| (TypeKey::new(index as i16 + TypeKey::FIRST.get()), *info))
    }
}

impl core::fmt::Debug for CompactDictionary {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(key, info)| (key.get(), info.type_path())))
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::{Compact, compact_trait};
    use crate::info::Typed;

    #[compact_trait]
    trait Shape: Compact {}

    #[derive(Compact, Default)]
    #[compact(implements(dyn Shape))]
    struct Circle {
        radius: i32,
    }
    impl Shape for Circle {}

    #[derive(Compact, Default)]
    #[compact(implements(dyn Shape))]
    struct Square {
        side: i32,
    }
    impl Shape for Square {}

    #[derive(Compact, Default)]
    struct Unrelated;

    fn shape() -> &'static TypeInfo {
        <dyn Shape>::type_info()
    }

    #[test]
    fn no_key_for_declared_type() {
        let mut dictionary = CompactDictionary::new();
        let circle = Circle { radius: 1 };
        let key = dictionary
            .should_write_type_key(&circle, Circle::type_info(), Circle::type_info())
            .unwrap();
        assert_eq!(key, None);
        assert!(dictionary.is_empty());
    }

    #[test]
    fn keys_in_first_seen_order() {
        let mut dictionary = CompactDictionary::new();
        let square = dictionary
            .should_write_type_key(&Square::default(), shape(), shape())
            .unwrap();
        let circle = dictionary
            .should_write_type_key(&Circle::default(), shape(), shape())
            .unwrap();
        let again = dictionary
            .should_write_type_key(&Square::default(), shape(), shape())
            .unwrap();
        assert_eq!(square, Some(TypeKey::new(1)));
        assert_eq!(circle, Some(TypeKey::new(2)));
        assert_eq!(again, square);
    }

    #[test]
    fn resolved_type_wins_over_runtime_type() {
        let mut dictionary = CompactDictionary::new();
        let key = dictionary
            .should_write_type_key(&Circle::default(), shape(), Square::type_info())
            .unwrap();
        assert_eq!(dictionary.type_of(key.unwrap()), Some(Square::type_info()));
    }

    #[test]
    fn unassignable_instance_is_rejected() {
        let mut dictionary = CompactDictionary::new();
        let result = dictionary.should_write_type_key(&Unrelated, shape(), shape());
        assert!(matches!(result, Err(CodecError::TypeMismatch { key: None, .. })));
    }

    #[test]
    fn lookup_checks_key_and_ancestry() {
        let dictionary =
            CompactDictionary::with_types([Circle::type_info(), Unrelated::type_info()]).unwrap();

        assert_eq!(
            dictionary.lookup_type(TypeKey::new(1), shape()).unwrap(),
            Circle::type_info()
        );
        assert!(matches!(
            dictionary.lookup_type(TypeKey::new(2), shape()),
            Err(CodecError::TypeMismatch { key: Some(_), .. })
        ));
        assert!(matches!(
            dictionary.lookup_type(TypeKey::new(3), shape()),
            Err(CodecError::CorruptDictionary { .. })
        ));
        assert!(matches!(
            dictionary.lookup_type(TypeKey::new(-4), shape()),
            Err(CodecError::CorruptDictionary { .. })
        ));
    }

    #[test]
    fn seeded_dictionaries_agree() {
        let a = CompactDictionary::with_types([Square::type_info(), Circle::type_info()]).unwrap();
        let b = CompactDictionary::with_types([Square::type_info(), Circle::type_info()]).unwrap();
        for (key, info) in a.iter() {
            assert_eq!(b.key_of(info), Some(key));
        }
    }
}
