//! # Component Macros
//!
//! 这个 crate 提供 `#[derive(Component)]`，根据属性生成组件的依赖声明。
//!
//! ## 属性
//!
//! - 字段上的 `#[inject]` - 可注入字段，类型必须是 `Autowired<T>`
//! - 字段上的 `#[inject(embedded)]` - 内嵌字段，注入的同时把该接口加入 opaque 集合
//! - 结构体上的 `#[component(provides(dyn A, ..))]` - 对外提供的接口
//! - 结构体上的 `#[component(opaque(dyn A, ..))]` - 只消费不提供的接口
//! - 结构体上的 `#[component(post_construct, closable)]` - 生命周期钩子
//!
//! ## 使用示例
//!
//! ```ignore
//! use component_macros::Component;
//! use di_abstractions::Autowired;
//!
//! #[derive(Default, Component)]
//! #[component(provides(dyn UserService))]
//! pub struct UserServiceImpl {
//!     #[inject(embedded)]
//!     storage: Autowired<dyn Storage>,
//!     #[inject]
//!     logger: Autowired<Logger>,
//! }
//! ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod component;
mod utils;

/// 组件派生宏
///
/// 为结构体实现 `di_abstractions::Component`，在 `describe` 中按字段顺序声明
/// `#[inject]` 字段，再声明对外接口、opaque 接口和生命周期钩子。
///
/// # 示例
///
/// ```ignore
/// #[derive(Component)]
/// #[component(provides(dyn Storage), closable)]
/// pub struct StorageImpl {
///     #[inject]
///     logger: Autowired<Logger>,
/// }
/// ```
#[proc_macro_derive(Component, attributes(component, inject))]
pub fn derive_component(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    component::derive_component_impl(input)
        .unwrap_or_else(|error| error.to_compile_error())
        .into()
}
