use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod inject;
mod parsing;

/// Derives `entwine::Inject` for a struct.
///
/// Fields marked `#[inject]` receive dependencies. A marked field must be an
/// `Option<T>` where `T: FromComponent` (usually `Arc<SomeComponent>`); it
/// is set on injection and reset to `None` on ejection. The field name is
/// the injection alias unless `#[inject(rename = "alias")]` overrides it.
///
/// Injecting an unmarked field fails with `ComponentError::UnknownField`,
/// and injecting a value of the wrong concrete type fails with
/// `ComponentError::WrongType`.
///
/// # Example
///
/// ```ignore
/// #[derive(Clone, Debug, Default, Inject)]
/// struct Api {
///     #[inject]
///     database: Option<Arc<Database>>,
///     #[inject(rename = "cc")]
///     cache: Option<Arc<Cache>>,
///     port: u16,
/// }
/// ```
#[proc_macro_derive(Inject, attributes(inject))]
pub fn derive_inject(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    inject::derive_inject_impl(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
