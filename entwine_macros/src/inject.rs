use crate::parsing::{option_inner, InjectArgs};
use proc_macro2::TokenStream;
use quote::{quote, ToTokens};
use std::collections::HashSet;
use syn::{Data, DeriveInput, Index, Member};

/// One `#[inject]` field of the deriving struct
struct Slot {
    member: Member,
    alias: String,
    inner: syn::Type,
}

pub fn derive_inject_impl(input: DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let slots = collect_slots(&input)?;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let inject_arms = slots.iter().map(|slot| {
        let Slot {
            member,
            alias,
            inner,
        } = slot;
        quote! {
            #alias => {
                let typed = <#inner as ::entwine::FromComponent>::from_component(value)
                    .ok_or_else(|| {
                        ::entwine::ComponentError::wrong_type(
                            field,
                            ::std::any::type_name::<#inner>(),
                        )
                    })?;
                self.#member = ::std::option::Option::Some(typed);
                ::std::result::Result::Ok(())
            }
        }
    });

    let eject_arms = slots.iter().map(|slot| {
        let Slot { member, alias, .. } = slot;
        quote! {
            #alias => self.#member = ::std::option::Option::None,
        }
    });

    Ok(quote! {
        #[automatically_derived]
        impl #impl_generics ::entwine::Inject for #name #ty_generics #where_clause {
            #[allow(unused_variables)]
            fn inject(
                &mut self,
                field: &str,
                value: ::entwine::ComponentRef,
            ) -> ::entwine::ComponentResult<()> {
                match field {
                    #(#inject_arms)*
                    _ => ::std::result::Result::Err(
                        ::entwine::ComponentError::unknown_field(field),
                    ),
                }
            }

            fn eject(&mut self, field: &str) {
                match field {
                    #(#eject_arms)*
                    _ => {}
                }
            }
        }
    })
}

fn collect_slots(input: &DeriveInput) -> syn::Result<Vec<Slot>> {
    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        Data::Enum(data) => {
            return Err(syn::Error::new(
                data.enum_token.span,
                "#[derive(Inject)] only supports structs",
            ))
        }
        Data::Union(data) => {
            return Err(syn::Error::new(
                data.union_token.span,
                "#[derive(Inject)] only supports structs",
            ))
        }
    };

    let mut slots = Vec::new();
    let mut aliases = HashSet::new();

    for (position, field) in fields.iter().enumerate() {
        let Some(args) = InjectArgs::from_attributes(&field.attrs)? else {
            continue;
        };

        let member = match &field.ident {
            Some(ident) => Member::Named(ident.clone()),
            None => Member::Unnamed(Index::from(position)),
        };

        let alias = match (args.rename, &field.ident) {
            (Some(rename), _) => rename,
            (None, Some(ident)) => ident.to_string(),
            (None, None) => {
                return Err(syn::Error::new_spanned(
                    field,
                    "tuple struct fields need #[inject(rename = \"...\")]",
                ))
            }
        };

        let inner = option_inner(&field.ty).ok_or_else(|| {
            syn::Error::new_spanned(
                &field.ty,
                "#[inject] fields must be declared as Option<T>",
            )
        })?;

        if !aliases.insert(alias.clone()) {
            return Err(syn::Error::new_spanned(
                field.to_token_stream(),
                format!("duplicate injected field `{alias}`"),
            ));
        }

        slots.push(Slot {
            member,
            alias,
            inner: inner.clone(),
        });
    }

    Ok(slots)
}
