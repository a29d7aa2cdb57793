//! Parsed form of a `#[derive(Compact)]` input.

use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, Ident, Member};

// -----------------------------------------------------------------------------
// Modules

mod field_attributes;
mod type_attributes;

// -----------------------------------------------------------------------------
// Exports

pub(crate) use field_attributes::FieldAttributes;
pub(crate) use type_attributes::TypeAttributes;

// -----------------------------------------------------------------------------
// FieldData

/// A struct field and its attributes.
pub(crate) struct FieldData {
    pub member: Member,
    pub attrs: FieldAttributes,
}

impl FieldData {
    /// The name recorded in the type's field table.
    pub fn name(&self) -> String {
        match &self.member {
            Member::Named(ident) => ident.to_string(),
            Member::Unnamed(index) => index.index.to_string(),
        }
    }
}

// -----------------------------------------------------------------------------
// CompactDerive

pub(crate) struct CompactDerive {
    pub ident: Ident,
    /// Path of `pact_codec` in the expanding crate.
    pub codec: syn::Path,
    pub attrs: TypeAttributes,
    pub fields: Vec<FieldData>,
}

impl CompactDerive {
    pub fn from_input(input: &DeriveInput) -> syn::Result<Self> {
        if !input.generics.params.is_empty() {
            return Err(syn::Error::new(
                input.generics.span(),
                "#[derive(Compact)] does not support generic types",
            ));
        }

        let fields = match &input.data {
            Data::Struct(data) => &data.fields,
            Data::Enum(data) => {
                return Err(syn::Error::new(
                    data.enum_token.span,
                    "#[derive(Compact)] only supports structs",
                ));
            }
            Data::Union(data) => {
                return Err(syn::Error::new(
                    data.union_token.span,
                    "#[derive(Compact)] only supports structs",
                ));
            }
        };

        let attrs = TypeAttributes::parse_attrs(&input.attrs)?;
        let fields = parse_fields(fields)?;

        Ok(Self {
            ident: input.ident.clone(),
            codec: crate::path::pact_codec(),
            attrs,
            fields,
        })
    }

    /// Fields that take part in the wire format, in declaration order.
    pub fn active_fields(&self) -> impl Iterator<Item = &FieldData> {
        self.fields.iter().filter(|field| !field.attrs.skip)
    }
}

fn parse_fields(fields: &Fields) -> syn::Result<Vec<FieldData>> {
    fields
        .iter()
        .enumerate()
        .map(|(index, field)| {
            let member = match &field.ident {
                Some(ident) => Member::Named(ident.clone()),
                None => Member::Unnamed(syn::Index {
                    index: index as u32,
                    span: field.span(),
                }),
            };
            Ok(FieldData {
                member,
                attrs: FieldAttributes::parse_attrs(&field.attrs)?,
            })
        })
        .collect()
}
