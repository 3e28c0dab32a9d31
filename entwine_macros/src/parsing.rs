//! Attribute parsing for `#[inject]` fields.
//!
//! This module hides how field attributes are read and how the injected
//! type is recovered from a field's declared type.

use syn::{Attribute, GenericArgument, PathArguments, Type};

/// Arguments of one `#[inject]` attribute
#[derive(Default)]
pub(crate) struct InjectArgs {
    /// Field alias to use instead of the Rust field name
    pub rename: Option<String>,
}

impl InjectArgs {
    /// Parse a single attribute using ParseNestedMeta
    pub fn parse_meta(&mut self, meta: syn::meta::ParseNestedMeta) -> syn::Result<()> {
        if meta.path.is_ident("rename") {
            self.rename = Some(meta.value()?.parse::<syn::LitStr>()?.value());
            Ok(())
        } else {
            Err(meta.error("expected `rename`"))
        }
    }

    /// Collects the arguments of every `#[inject]` attribute on a field.
    ///
    /// Returns `None` if the field carries no `#[inject]` attribute.
    pub fn from_attributes(attrs: &[Attribute]) -> syn::Result<Option<Self>> {
        let mut found = None;

        for attr in attrs.iter().filter(|a| a.path().is_ident("inject")) {
            let args = found.get_or_insert_with(InjectArgs::default);
            // Bare `#[inject]` has no argument list
            if matches!(attr.meta, syn::Meta::List(_)) {
                attr.parse_nested_meta(|meta| args.parse_meta(meta))?;
            }
        }

        Ok(found)
    }
}

/// Returns `T` for a field declared as `Option<T>`.
pub(crate) fn option_inner(ty: &Type) -> Option<&Type> {
    match ty {
        Type::Path(type_path) if type_path.qself.is_none() => {
            let segment = type_path.path.segments.last()?;
            if segment.ident != "Option" {
                return None;
            }
            match &segment.arguments {
                PathArguments::AngleBracketed(args) if args.args.len() == 1 => {
                    match args.args.first()? {
                        GenericArgument::Type(inner) => Some(inner),
                        _ => None,
                    }
                }
                _ => None,
            }
        }
        // Handle grouped types produced by macro_rules expansions
        Type::Group(group) => option_inner(&group.elem),
        Type::Paren(paren) => option_inner(&paren.elem),
        _ => None,
    }
}
