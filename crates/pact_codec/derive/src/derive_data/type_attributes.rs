use proc_macro2::Span;
use syn::meta::ParseNestedMeta;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Attribute, LitStr, Path, Token, Type};

use crate::COMPACT_ATTRIBUTE_NAME;

/// Container attributes of `#[derive(Compact)]`.
///
/// ```rust, ignore
/// #[derive(Compact)]
/// #[compact(type_path = "shapes::Circle")]
/// #[compact(base = Shape2D, implements(dyn Shape, dyn Named))]
/// #[compact(create = Circle::with_defaults, auto_register)]
/// struct Circle { /* ... */ }
/// ```
#[derive(Default)]
pub(crate) struct TypeAttributes {
    pub type_path: Option<LitStr>,
    /// Set by `value`; holds the attribute span for diagnostics.
    pub value: Option<Span>,
    pub base: Option<Type>,
    pub implements: Vec<Type>,
    pub create: Option<Path>,
    pub auto_register: Option<Span>,
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in attrs {
            if attr.path().is_ident(COMPACT_ATTRIBUTE_NAME) {
                attr.parse_nested_meta(|meta| this.parse_meta(meta))?;
            }
        }
        this.validate()?;
        Ok(this)
    }

    fn parse_meta(&mut self, meta: ParseNestedMeta) -> syn::Result<()> {
        if meta.path.is_ident("type_path") {
            if self.type_path.is_some() {
                return Err(meta.error("duplicate `type_path`"));
            }
            let lit: LitStr = meta.value()?.parse()?;
            let path = lit.value();
            if path.is_empty() || path.starts_with("::") || path.ends_with("::") {
                return Err(syn::Error::new(
                    lit.span(),
                    "`type_path` must be a non-empty path without leading or trailing `::`",
                ));
            }
            self.type_path = Some(lit);
        } else if meta.path.is_ident("value") {
            if self.value.is_some() {
                return Err(meta.error("duplicate `value`"));
            }
            self.value = Some(meta.path.span());
        } else if meta.path.is_ident("base") {
            if self.base.is_some() {
                return Err(meta.error("duplicate `base`"));
            }
            self.base = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("implements") {
            let content;
            syn::parenthesized!(content in meta.input);
            let list = Punctuated::<Type, Token![,]>::parse_terminated(&content)?;
            self.implements.extend(list);
        } else if meta.path.is_ident("create") {
            if self.create.is_some() {
                return Err(meta.error("duplicate `create`"));
            }
            self.create = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("auto_register") {
            if self.auto_register.is_some() {
                return Err(meta.error("duplicate `auto_register`"));
            }
            self.auto_register = Some(meta.path.span());
        } else {
            return Err(meta.error(
                "unsupported compact attribute, expected one of \
                 `type_path`, `value`, `base`, `implements`, `create`, `auto_register`",
            ));
        }
        Ok(())
    }

    fn validate(&self) -> syn::Result<()> {
        let Some(span) = self.value else {
            return Ok(());
        };
        if self.base.is_some() || !self.implements.is_empty() {
            return Err(syn::Error::new(
                span,
                "value types cannot declare `base` or `implements`",
            ));
        }
        if self.auto_register.is_some() {
            return Err(syn::Error::new(
                span,
                "value types are written inline and have no registered codec",
            ));
        }
        Ok(())
    }

    /// The type name: the last segment of a custom path, otherwise `ident`.
    pub fn type_name(&self, ident: &syn::Ident) -> String {
        match &self.type_path {
            Some(lit) => {
                let path = lit.value();
                match path.rsplit_once("::") {
                    Some((_, name)) => name.to_owned(),
                    None => path,
                }
            }
            None => ident.to_string(),
        }
    }
}
