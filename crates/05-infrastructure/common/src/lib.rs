//! # Infrastructure Common
//!
//! 这个 crate 提供了 Lorn ADSP 依赖注入容器（bean context）共用的基础类型。
//!
//! ## 核心内容
//!
//! - [`TypeInfo`] - 依赖类型的元数据（类型ID、完整名称、种类）
//! - [`ContextError`] - 容器构建、解析与关闭过程中的错误类型
//! - [`ContextConfig`] - 容器的构建期配置
//! - [`Initializing`] / [`Closable`] - 组件生命周期能力
//!
//! ## 设计原则
//!
//! - 基于 Rust 类型系统的显式声明，不依赖运行时反射
//! - 构建过程要么全部成功，要么不产生任何可用容器

pub mod configuration;
pub mod errors;
pub mod lifecycle;
pub mod metadata;

pub use configuration::*;
pub use errors::*;
pub use lifecycle::*;
pub use metadata::*;
