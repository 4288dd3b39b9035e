//! 工厂组件

use crate::component::Component;
use std::sync::Arc;

/// 工厂组件
///
/// 扫描时容器不会注册工厂本身，而是在工厂所在的位置注册它产出的对象。
/// 产出 `None` 视为该位置的参数无效。组件类型固定为 [`FactoryBean::Object`]。
pub trait FactoryBean: Send + 'static {
    /// 产出的组件类型
    type Object: Component;

    /// 产出组件实例
    fn object(&self) -> Option<Arc<Self::Object>>;
}

/// 由闭包实现的工厂
pub struct FnFactory<C, F>
where
    C: Component,
    F: Fn() -> Option<Arc<C>> + Send + 'static,
{
    factory_fn: F,
    _marker: std::marker::PhantomData<fn() -> C>,
}

impl<C, F> FnFactory<C, F>
where
    C: Component,
    F: Fn() -> Option<Arc<C>> + Send + 'static,
{
    /// 包装闭包
    pub fn new(factory_fn: F) -> Self {
        Self {
            factory_fn,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<C, F> FactoryBean for FnFactory<C, F>
where
    C: Component,
    F: Fn() -> Option<Arc<C>> + Send + 'static,
{
    type Object = C;

    fn object(&self) -> Option<Arc<C>> {
        (self.factory_fn)()
    }
}
