use proc_macro::TokenStream;
use quote::quote;
use std::collections::HashMap;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, Meta, Token};

/// Helper enum for parsed attribute values
enum MetaValue {
    Str(String),
    Expr(syn::Expr),
}

/// Check if the struct has #[allow(missing_docs)] attribute
fn check_allow_missing_docs(attrs: &[Attribute]) -> bool {
    attrs.iter().any(is_allow_missing_docs)
}

fn is_allow_missing_docs(attr: &Attribute) -> bool {
    attr.path().is_ident("allow")
        && attr
            .parse_args::<syn::Ident>()
            .map(|ident| ident == "missing_docs")
            .unwrap_or(false)
}

/// Define a struct of flag handles that can be registered on a `FlagSet`
///
/// ```rust,ignore
/// define_flags! {
///     pub struct ServerFlags {
///         #[flag(name = "listen-addr", usage = "Address to bind", default = String::from("0.0.0.0:8080"))]
///         pub listen_addr: String,
///
///         #[flag(usage = "Log every request", default = false)]
///         pub verbose: bool,
///     }
/// }
/// ```
#[proc_macro]
pub fn define_flags(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match generate_flags(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn generate_flags(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let struct_name = &input.ident;
    let vis = &input.vis;
    let struct_attrs = &input.attrs;

    let allow_missing_docs = check_allow_missing_docs(struct_attrs);

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "define_flags! only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "define_flags! only supports structs",
            ));
        }
    };

    let mut field_defs = Vec::new();
    let mut register_fields = Vec::new();
    let mut field_inits = Vec::new();

    for field in fields {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
        let field_vis = &field.vis;
        let field_type = &field.ty;

        let config = parse_flag_config(field, &field_name.to_string(), allow_missing_docs)?;

        // cfg gates the field everywhere it appears, doc comments only on the struct
        let cfg_attrs: Vec<&Attribute> = field
            .attrs
            .iter()
            .filter(|attr| attr.path().is_ident("cfg"))
            .collect();
        let doc_attrs: Vec<&Attribute> = field
            .attrs
            .iter()
            .filter(|attr| attr.path().is_ident("doc"))
            .collect();

        field_defs.push(quote! {
            #(#doc_attrs)*
            #(#cfg_attrs)*
            #field_vis #field_name: ::envflag::Flag<#field_type>
        });

        let flag_name = &config.name;
        let usage = &config.usage;
        let default = &config.default;
        register_fields.push(quote! {
            #(#cfg_attrs)*
            let #field_name = flags.define::<#field_type>(#flag_name, #default, #usage);
        });

        field_inits.push(quote! {
            #(#cfg_attrs)*
            #field_name
        });
    }

    let filtered_attrs: Vec<&Attribute> = struct_attrs
        .iter()
        .filter(|attr| !is_allow_missing_docs(attr))
        .collect();

    let struct_def = quote! {
        #(#filtered_attrs)*
        #vis struct #struct_name {
            #(#field_defs),*
        }
    };

    let flags_impl = quote! {
        impl #struct_name {
            /// Register every flag of this struct on `flags`
            #vis fn register(flags: &mut ::envflag::FlagSet) -> Self {
                #(#register_fields)*

                Self {
                    #(#field_inits),*
                }
            }

            /// Register on the default flag set, then overlay the environment and parse argv
            #vis fn parse() -> Self {
                let flags = ::envflag::macros::register_on_command_line(Self::register);
                ::envflag::parse();
                flags
            }
        }
    };

    Ok(quote! {
        #struct_def
        #flags_impl
    })
}

#[derive(Debug)]
struct FlagConfig {
    name: String,
    usage: String,
    default: syn::Expr,
}

/// Parse #[flag(name = "x", usage = "y", default = val)] syntax
fn parse_flag_list(meta_list: &syn::MetaList) -> syn::Result<HashMap<String, MetaValue>> {
    let mut values = HashMap::new();

    meta_list.parse_nested_meta(|meta| {
        let key = meta
            .path
            .get_ident()
            .ok_or_else(|| meta.error("expected identifier"))?
            .to_string();

        if !meta.input.peek(Token![=]) {
            return Err(meta.error(format!("expected `{} = ...`", key)));
        }
        meta.input.parse::<Token![=]>()?;

        match key.as_str() {
            "name" | "usage" => {
                let value: syn::LitStr = meta.input.parse()?;
                values.insert(key, MetaValue::Str(value.value()));
            }
            "default" => {
                let expr: syn::Expr = meta.input.parse()?;
                values.insert(key, MetaValue::Expr(expr));
            }
            _ => return Err(meta.error(format!("unknown flag attribute `{}`", key))),
        }

        Ok(())
    })?;

    Ok(values)
}

fn parse_flag_config(
    field: &syn::Field,
    field_name: &str,
    allow_missing_docs: bool,
) -> syn::Result<FlagConfig> {
    let flag_attr = field
        .attrs
        .iter()
        .find(|attr| attr.path().is_ident("flag"))
        .ok_or_else(|| {
            syn::Error::new_spanned(
                field,
                "field must have #[flag(...)] attribute with usage and default",
            )
        })?;

    let mut parsed = match &flag_attr.meta {
        Meta::List(list) => parse_flag_list(list)?,
        _ => {
            return Err(syn::Error::new_spanned(
                flag_attr,
                "flag attribute must be a list: #[flag(usage = \"...\", default = ...)]",
            ));
        }
    };

    // Field `listen_addr` becomes flag `listen-addr` unless named explicitly
    let name = match parsed.remove("name") {
        Some(MetaValue::Str(s)) => s,
        _ => field_name.trim_start_matches("r#").replace('_', "-"),
    };

    let usage = match parsed.remove("usage") {
        Some(MetaValue::Str(s)) => s.trim().to_string(),
        None if allow_missing_docs => String::new(),
        _ => {
            return Err(syn::Error::new_spanned(
                flag_attr,
                "flag must have usage = \"description\" (or use #[allow(missing_docs)] on struct)",
            ));
        }
    };

    let default = match parsed.remove("default") {
        Some(MetaValue::Expr(e)) => e,
        _ => {
            return Err(syn::Error::new_spanned(
                flag_attr,
                "flag must have default = value",
            ));
        }
    };

    Ok(FlagConfig {
        name,
        usage,
        default,
    })
}
