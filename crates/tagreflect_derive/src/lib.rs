//! Derive macro for `tagreflect`.
//!
//! `#[derive(Reflect)]` generates the `tagreflect::Reflect` implementation for a type:
//! - a static table of tagged fields (external name, Rust ident, stringified type), in declaration order
//! - a read accessor resolving a table index to the field's value
//! - a write accessor yielding disjoint mutable borrows of every tagged field
//!
//! Only fields carrying a `#[tag("name")]` (or `#[tag = "name"]`) attribute are part of the table.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{ToTokens, quote};
use syn::{Attribute, Data, DeriveInput, Expr, ExprLit, Fields, GenericParam, Index, Lit, LitStr, Member, Meta,
    parse_macro_input, spanned::Spanned};

/// Generates the `tagreflect::Reflect` implementation.
///
/// # Example
/// ```ignore
/// #[derive(Reflect)]
/// struct User {
///     #[tag("id")]
///     id: i64,
///     #[tag("name")]
///     name: String,
///     #[tag("-")]
///     secret: String,
///     cache: Vec<u8>,
/// }
///
/// // Generates (abridged):
/// impl tagreflect::Reflect for User {
///     fn kind(&self) -> Kind { Kind::Struct }
///     fn tagged_fields(&self) -> &'static [TaggedField] { /* id, name, - */ }
///     fn field(&self, index: usize) -> Option<&dyn Any> { /* 0 => id, 1 => name, 2 => secret */ }
///     fn fields_mut(&mut self) -> Vec<&mut dyn Any> { vec![&mut self.id, &mut self.name, &mut self.secret] }
/// }
/// ```
#[proc_macro_derive(Reflect, attributes(tag))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_reflect(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// A field that carries a `#[tag]` attribute.
struct TaggedMember {
    member: Member,
    tag: LitStr,
    ident: String,
    type_name: String,
}

fn expand_reflect(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;

    if let Some(lifetime) = input.generics.lifetimes().next() {
        return Err(syn::Error::new(
            lifetime.span(),
            "`Reflect` cannot be derived for types with lifetime parameters",
        ));
    }

    // `Reflect: Any`, so every type parameter must be 'static.
    let mut generics = input.generics.clone();
    let type_params: Vec<_> = generics
        .params
        .iter()
        .filter_map(|param| match param {
            GenericParam::Type(ty) => Some(ty.ident.clone()),
            _ => None,
        })
        .collect();
    if !type_params.is_empty() {
        let where_clause = generics.make_where_clause();
        for ident in type_params {
            where_clause.predicates.push(syn::parse_quote!(#ident: 'static));
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let body = match &input.data {
        Data::Struct(data) => {
            let members = collect_tagged(&data.fields)?;
            expand_struct_body(&members)
        }
        Data::Enum(_) => quote! {
            fn kind(&self) -> ::tagreflect::Kind {
                ::tagreflect::Kind::Enum
            }
        },
        Data::Union(data) => {
            return Err(syn::Error::new(
                data.union_token.span(),
                "`Reflect` cannot be derived for unions",
            ));
        }
    };

    Ok(quote! {
        impl #impl_generics ::tagreflect::Reflect for #name #ty_generics #where_clause {
            #body
        }
    })
}

fn expand_struct_body(members: &[TaggedMember]) -> TokenStream2 {
    let descriptors = members.iter().map(|m| {
        let tag = &m.tag;
        let ident = &m.ident;
        let type_name = &m.type_name;
        quote!(::tagreflect::TaggedField::new(#tag, #ident, #type_name))
    });
    let read_arms = members.iter().enumerate().map(|(index, m)| {
        let member = &m.member;
        quote!(#index => ::core::option::Option::Some(&self.#member as &dyn ::core::any::Any))
    });
    let write_refs = members.iter().map(|m| {
        let member = &m.member;
        quote!(&mut self.#member as &mut dyn ::core::any::Any)
    });

    quote! {
        fn kind(&self) -> ::tagreflect::Kind {
            ::tagreflect::Kind::Struct
        }

        fn tagged_fields(&self) -> &'static [::tagreflect::TaggedField] {
            const FIELDS: &[::tagreflect::TaggedField] = &[#(#descriptors),*];
            FIELDS
        }

        #[allow(clippy::match_single_binding)]
        fn field(&self, index: usize) -> ::core::option::Option<&dyn ::core::any::Any> {
            match index {
                #(#read_arms,)*
                _ => ::core::option::Option::None,
            }
        }

        fn fields_mut(&mut self) -> ::std::vec::Vec<&mut dyn ::core::any::Any> {
            ::std::vec![#(#write_refs),*]
        }
    }
}

fn collect_tagged(fields: &Fields) -> syn::Result<Vec<TaggedMember>> {
    let mut members = Vec::new();
    for (position, field) in fields.iter().enumerate() {
        let Some(tag) = field_tag(&field.attrs)? else {
            continue;
        };
        // Named fields (e.g. `struct User { id: i64 }`) or unnamed ones (e.g. `struct Pair(#[tag("a")] i64)`)
        let (member, ident) = match &field.ident {
            Some(ident) => (Member::Named(ident.clone()), ident.to_string()),
            None => (Member::Unnamed(Index::from(position)), position.to_string()),
        };
        let ty = &field.ty;
        members.push(TaggedMember {
            member,
            tag,
            ident,
            type_name: ty.to_token_stream().to_string(),
        });
    }
    Ok(members)
}

/// Reads the external name from a field's `#[tag(...)]` attribute, if any.
fn field_tag(attrs: &[Attribute]) -> syn::Result<Option<LitStr>> {
    let mut found: Option<LitStr> = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("tag")) {
        if found.is_some() {
            return Err(syn::Error::new(attr.span(), "duplicate `#[tag]` attribute"));
        }
        let tag = match &attr.meta {
            Meta::List(_) => attr.parse_args::<LitStr>()?,
            Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(ExprLit { lit: Lit::Str(s), .. }) => s.clone(),
                other => return Err(syn::Error::new(other.span(), "expected a string literal tag")),
            },
            Meta::Path(path) => {
                return Err(syn::Error::new(
                    path.span(),
                    "expected `#[tag(\"name\")]` or `#[tag = \"name\"]`",
                ));
            }
        };
        found = Some(tag);
    }
    Ok(found)
}
