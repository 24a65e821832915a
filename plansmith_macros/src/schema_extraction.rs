use proc_macro2::Span;
use syn::{
    parse::Parser, punctuated::Punctuated, spanned::Spanned, Attribute, Expr, ExprLit, Fields,
    ItemStruct, Lit, LitStr, MetaNameValue, Token,
};

/// Arguments accepted by `#[completion_schema(name = "...", description = "...")]`.
#[derive(Default)]
pub struct SchemaArgs {
    pub name: Option<LitStr>,
    pub description: Option<LitStr>,
}

impl SchemaArgs {
    pub fn parse(attr: proc_macro::TokenStream) -> syn::Result<Self> {
        let mut args = Self::default();
        if attr.is_empty() {
            return Ok(args);
        }

        let pairs = Punctuated::<MetaNameValue, Token![,]>::parse_terminated.parse(attr)?;
        for pair in pairs {
            let key = pair
                .path
                .get_ident()
                .map(|ident| ident.to_string())
                .ok_or_else(|| syn::Error::new_spanned(&pair.path, "expected `name` or `description`"))?;

            let Expr::Lit(ExprLit {
                lit: Lit::Str(value),
                ..
            }) = &pair.value
            else {
                return Err(syn::Error::new_spanned(&pair.value, "expected a string literal"));
            };

            let slot = match key.as_str() {
                "name" => &mut args.name,
                "description" => &mut args.description,
                other => {
                    return Err(syn::Error::new(
                        pair.path.span(),
                        format!("unknown completion_schema argument `{other}`"),
                    ))
                }
            };

            if slot.replace(value.clone()).is_some() {
                return Err(syn::Error::new(
                    pair.path.span(),
                    format!("`{key}` given more than once"),
                ));
            }
        }

        Ok(args)
    }

    /// Explicit `name`, or the struct identifier.
    pub fn schema_name(&self, item: &ItemStruct) -> LitStr {
        self.name
            .clone()
            .unwrap_or_else(|| LitStr::new(&item.ident.to_string(), Span::call_site()))
    }

    /// Explicit `description`, or the struct's doc comment.
    pub fn description(&self, item: &ItemStruct) -> Option<LitStr> {
        self.description.clone().or_else(|| {
            doc_text(&item.attrs).map(|text| LitStr::new(&text, Span::call_site()))
        })
    }
}

/// Rejects tuple/unit structs and generic structs.
pub fn check_supported(item: &ItemStruct) -> syn::Result<()> {
    if !matches!(item.fields, Fields::Named(_)) {
        return Err(syn::Error::new(
            item.struct_token.span(),
            "`#[completion_schema]` needs a struct with named fields",
        ));
    }
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new(
            item.generics.span(),
            "`#[completion_schema]` cannot be applied to generic structs",
        ));
    }
    Ok(())
}

pub fn doc_text(attrs: &[Attribute]) -> Option<String> {
    let lines: Vec<String> = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            syn::Meta::NameValue(MetaNameValue {
                value:
                    Expr::Lit(ExprLit {
                        lit: Lit::Str(lit), ..
                    }),
                ..
            }) => Some(lit.value().trim().to_string()),
            _ => None,
        })
        .collect();

    (!lines.is_empty()).then(|| lines.join("\n"))
}

/// `(field name, doc text)` for every documented named field.
pub fn field_docs(item: &ItemStruct) -> Vec<(String, String)> {
    let Fields::Named(fields) = &item.fields else {
        return Vec::new();
    };

    fields
        .named
        .iter()
        .filter_map(|field| {
            let ident = field.ident.as_ref()?;
            let serialized = serde_rename(&field.attrs).unwrap_or_else(|| ident.to_string());
            Some((serialized, doc_text(&field.attrs)?))
        })
        .collect()
}

/// Picks up `#[serde(rename = "...")]` so docs land on the serialized key.
fn serde_rename(attrs: &[Attribute]) -> Option<String> {
    let mut renamed = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let lit: LitStr = meta.value()?.parse()?;
                renamed = Some(lit.value());
            } else if meta.input.peek(Token![=]) {
                let _: Expr = meta.value()?.parse()?;
            }
            Ok(())
        });
    }
    renamed
}
