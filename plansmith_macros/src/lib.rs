//! Procedural macros for `plansmith`.
//!
//! `#[completion_schema]` turns a payload struct into a `CompletionSchema`
//! implementor with a lazily built, cached JSON schema. The schema is used to
//! validate what the text-completion service returns before it is decoded.

mod completion_schema;
mod schema_extraction;

use proc_macro::TokenStream;

#[proc_macro_attribute]
pub fn completion_schema(attr: TokenStream, item: TokenStream) -> TokenStream {
    completion_schema::completion_schema(attr, item)
}
