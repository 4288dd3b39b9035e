//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义组件声明、组件实例和容器的核心接口。
//!
//! ## 核心类型
//!
//! - [`Component`] - 组件 trait，通过 [`DefinitionBuilder`] 显式声明依赖
//! - [`Autowired`] - 可注入字段
//! - [`BeanDefinition`] - 组件定义（字段、接口、opaque 集合、生命周期钩子）
//! - [`Bean`] - 扫描得到的组件实例
//! - [`FactoryBean`] - 工厂组件
//! - [`BeanRegistry`] - 组件注册表接口
//! - [`BeanContext`] - 依赖注入容器接口

pub mod autowired;
pub mod bean;
pub mod component;
pub mod context;
pub mod definition;
pub mod factory;
pub mod registry;

pub use autowired::*;
pub use bean::*;
pub use component::*;
pub use context::*;
pub use definition::*;
pub use factory::*;
pub use registry::*;
