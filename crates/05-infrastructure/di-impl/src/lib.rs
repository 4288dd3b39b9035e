//! # 依赖注入具体实现
//!
//! 提供组件定义缓存、匹配引擎、线程安全的注册表和依赖注入容器实现。
//!
//! ```ignore
//! let context = ContextBuilder::new()
//!     .with_config(ContextConfig::load()?)
//!     .bean(Arc::new(StorageImpl::default()))
//!     .bean(Arc::new(UserServiceImpl::default()))
//!     .build()?;
//!
//! let users = context.must_bean::<dyn UserService>();
//! ```

/// 按 `verbose` 选择 `info!` 或 `debug!` 输出单条事件
macro_rules! verbose_event {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            ::tracing::info!($($arg)+)
        } else {
            ::tracing::debug!($($arg)+)
        }
    };
}

pub mod context;
pub mod engine;
pub mod inspector;
pub mod registry;

pub use context::*;
pub use engine::Core;
pub use inspector::*;
pub use registry::*;
