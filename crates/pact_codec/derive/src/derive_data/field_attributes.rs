use syn::Attribute;
use syn::meta::ParseNestedMeta;

use crate::COMPACT_ATTRIBUTE_NAME;

/// Attributes of a single field.
///
/// ```rust, ignore
/// #[compact(skip)]
/// cache: Vec<u8>,
/// ```
#[derive(Default)]
pub(crate) struct FieldAttributes {
    /// The field is neither written nor read; it keeps the value the
    /// creator gave it.
    pub skip: bool,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in attrs {
            if attr.path().is_ident(COMPACT_ATTRIBUTE_NAME) {
                attr.parse_nested_meta(|meta| this.parse_meta(meta))?;
            }
        }
        Ok(this)
    }

    fn parse_meta(&mut self, meta: ParseNestedMeta) -> syn::Result<()> {
        if meta.path.is_ident("skip") {
            if self.skip {
                return Err(meta.error("duplicate `skip`"));
            }
            self.skip = true;
            Ok(())
        } else {
            Err(meta.error("unsupported field attribute, expected `skip`"))
        }
    }
}
