//! 组件派生宏实现

use crate::utils::{extract_generic_type, field_has_attribute, is_autowired_type};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{
    punctuated::Punctuated, Attribute, Data, DeriveInput, Error, Fields, Ident, Result, Token, Type,
};

/// 结构体上的 `#[component(...)]` 参数
#[derive(Default)]
pub struct ComponentArgs {
    /// 对外提供的接口
    pub provides: Vec<Type>,
    /// 只消费不提供的接口
    pub opaque: Vec<Type>,
    /// 是否调用 `Initializing::post_construct`
    pub post_construct: bool,
    /// 是否调用 `Closable::close`
    pub closable: bool,
}

impl ComponentArgs {
    /// 解析所有 `#[component(...)]` 属性
    pub fn from_attrs(attrs: &[Attribute]) -> Result<Self> {
        let mut args = Self::default();

        for attr in attrs.iter().filter(|attr| attr.path().is_ident("component")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("provides") {
                    args.provides.extend(parse_type_list(&meta)?);
                } else if meta.path.is_ident("opaque") {
                    args.opaque.extend(parse_type_list(&meta)?);
                } else if meta.path.is_ident("post_construct") {
                    args.post_construct = true;
                } else if meta.path.is_ident("closable") {
                    args.closable = true;
                } else {
                    return Err(meta.error(
                        "未知的 component 参数，可用参数: provides(..), opaque(..), post_construct, closable",
                    ));
                }
                Ok(())
            })?;
        }

        Ok(args)
    }
}

fn parse_type_list(meta: &syn::meta::ParseNestedMeta<'_>) -> Result<Vec<Type>> {
    let content;
    syn::parenthesized!(content in meta.input);
    let types = Punctuated::<Type, Token![,]>::parse_terminated(&content)?;
    Ok(types.into_iter().collect())
}

/// 标记了 `#[inject]` 的字段
pub struct InjectField {
    /// 字段名
    pub ident: Ident,
    /// `Autowired<T>` 中的 `T`
    pub required: Type,
    /// 是否为 `#[inject(embedded)]`
    pub embedded: bool,
}

impl InjectField {
    fn parse(field: &syn::Field) -> Result<Self> {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| Error::new_spanned(field, "#[inject] 只支持具名字段"))?;

        let required = if is_autowired_type(&field.ty) {
            extract_generic_type(&field.ty).cloned()
        } else {
            None
        }
        .ok_or_else(|| Error::new_spanned(&field.ty, "#[inject] 字段的类型必须是 Autowired<T>"))?;

        let mut embedded = false;
        for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("inject")) {
            if let syn::Meta::List(_) = attr.meta {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("embedded") {
                        embedded = true;
                        Ok(())
                    } else {
                        Err(meta.error("未知的 inject 参数，可用参数: embedded"))
                    }
                })?;
            }
        }

        Ok(Self {
            ident,
            required,
            embedded,
        })
    }

    fn declaration(&self) -> TokenStream {
        let ident = &self.ident;
        let name = ident.to_string();
        let required = &self.required;
        let method = if self.embedded {
            quote!(embedded)
        } else {
            quote!(autowired)
        };

        quote! {
            definition.#method::<#required>(#name, |bean| &bean.#ident);
        }
    }
}

/// 实现 #[derive(Component)] 宏
pub fn derive_component_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => fields.named.iter().collect(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(fields) => {
                if let Some(field) = fields.unnamed.iter().find(|f| field_has_attribute(f, "inject")) {
                    return Err(Error::new_spanned(field, "#[inject] 只支持具名字段"));
                }
                Vec::new()
            }
        },
        _ => {
            return Err(Error::new_spanned(
                struct_name,
                "#[derive(Component)] 只能用于结构体",
            ))
        }
    };

    let inject_fields = fields
        .into_iter()
        .filter(|field| field_has_attribute(field, "inject"))
        .map(InjectField::parse)
        .collect::<Result<Vec<_>>>()?;
    let args = ComponentArgs::from_attrs(&input.attrs)?;

    let field_declarations = inject_fields.iter().map(InjectField::declaration);
    let provides = args.provides.iter().map(|interface| {
        quote! {
            definition.provides::<#interface>(|bean| bean as ::std::sync::Arc<#interface>);
        }
    });
    let opaque = args.opaque.iter().map(|interface| {
        quote! {
            definition.opaque::<#interface>();
        }
    });
    let post_construct = args.post_construct.then(|| quote!(definition.post_construct();));
    let closable = args.closable.then(|| quote!(definition.closable();));

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::di_abstractions::Component for #struct_name #ty_generics #where_clause {
            fn describe(definition: &mut ::di_abstractions::DefinitionBuilder<Self>) {
                #(#field_declarations)*
                #(#provides)*
                #(#opaque)*
                #post_construct
                #closable
            }
        }
    })
}
