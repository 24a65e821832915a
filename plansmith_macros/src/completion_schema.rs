use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{parse_macro_input, ItemStruct, LitStr};

use crate::schema_extraction::{check_supported, field_docs, SchemaArgs};

/// Expands a named struct into itself plus a `CompletionSchema` impl whose
/// handle is built once per process.
pub fn completion_schema(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = match SchemaArgs::parse(attr) {
        Ok(args) => args,
        Err(err) => return err.to_compile_error().into(),
    };

    let item_struct = parse_macro_input!(item as ItemStruct);
    if let Err(err) = check_supported(&item_struct) {
        return err.to_compile_error().into();
    }

    let schema_name = args.schema_name(&item_struct);
    let description = match args.description(&item_struct) {
        Some(lit) => quote! { Some(#lit) },
        None => quote! { None },
    };

    let field_docs = field_docs(&item_struct).into_iter().map(|(field, doc)| {
        let field = LitStr::new(&field, Span::call_site());
        let doc = LitStr::new(&doc, Span::call_site());
        quote! { (#field, #doc) }
    });

    let ident = &item_struct.ident;
    let type_name = LitStr::new(&ident.to_string(), Span::call_site());

    quote! {
        #item_struct

        impl plansmith::schemas::CompletionSchema for #ident {
            fn schema() -> &'static plansmith::schemas::SchemaHandle {
                static HANDLE: std::sync::OnceLock<plansmith::schemas::SchemaHandle> =
                    std::sync::OnceLock::new();
                HANDLE.get_or_init(|| {
                    let mut root = schemars::schema_for!(Self);
                    plansmith::schemas::apply_doc_comments(
                        &mut root,
                        #schema_name,
                        #description,
                        &[#(#field_docs),*],
                    );
                    plansmith::schemas::SchemaHandle::from_root_schema::<Self>(
                        #schema_name,
                        #type_name,
                        root,
                    )
                })
            }
        }
    }
    .into()
}
