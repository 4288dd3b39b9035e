//! 组件生命周期能力
//!
//! 组件通过实现这些 trait 并在定义中显式声明（`post_construct()` / `closable()`），
//! 由容器在构建完成后和关闭时调用。

/// 生命周期钩子返回的错误类型
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 构建完成后需要执行初始化的组件
pub trait Initializing: Send + Sync {
    /// 所有字段注入完成后按扫描顺序调用，返回错误会使整个容器构建失败
    fn post_construct(&self) -> Result<(), BoxError>;
}

/// 容器关闭时需要释放资源的组件
pub trait Closable: Send + Sync {
    /// 容器关闭时按扫描顺序调用
    fn close(&self) -> Result<(), BoxError>;
}
