//! 依赖注入容器抽象接口

use crate::bean::Bean;
use crate::component::Component;
use infrastructure_common::{ContextConfig, ContextError, ContextResult, TypeInfo};
use std::any::type_name;
use std::sync::Arc;

/// 依赖注入容器 trait
///
/// 容器构建完成后核心组件集合不再变化，查询时按需把具体类型和接口实现缓存到注册表。
pub trait BeanContext: Send + Sync {
    /// 容器配置
    fn config(&self) -> &ContextConfig;

    /// 按扫描顺序排列的核心组件类型
    fn core(&self) -> Vec<TypeInfo>;

    /// 核心组件数量
    fn len(&self) -> usize;

    /// 是否没有核心组件
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 按类型解析组件，失败时返回具体原因
    fn resolve_by_type(&self, type_info: &TypeInfo) -> ContextResult<Arc<Bean>>;

    /// 按类型查找组件
    fn bean_by_type(&self, type_info: &TypeInfo) -> Option<Arc<Bean>> {
        self.resolve_by_type(type_info).ok()
    }

    /// 解析组件，`T` 为具体组件类型或 `dyn Trait`
    fn resolve<T: ?Sized + 'static>(&self) -> ContextResult<Arc<T>> {
        let type_info = TypeInfo::of::<T>();
        let bean = self.resolve_by_type(&type_info)?;
        bean.view::<T>()
            .ok_or_else(|| ContextError::unsatisfied(type_info.name(), Vec::new()))
    }

    /// 查找组件
    fn bean<T: ?Sized + 'static>(&self) -> Option<Arc<T>> {
        self.resolve::<T>().ok()
    }

    /// 查找组件，找不到时 panic
    fn must_bean<T: ?Sized + 'static>(&self) -> Arc<T> {
        match self.bean::<T>() {
            Some(bean) => bean,
            None => panic!("找不到组件: {}", type_name::<T>()),
        }
    }

    /// 按限定类型名查找所有注册过的组件
    fn lookup(&self, name: &str) -> Vec<Arc<Bean>>;

    /// 为不属于容器的对象注入依赖
    ///
    /// 对象不会加入核心组件集合；任一字段解析失败时不写入任何字段。
    fn inject<C: Component>(&self, target: &C) -> ContextResult<()>;

    /// 按扫描顺序关闭所有可关闭的核心组件
    fn close(&self) -> ContextResult<()>;
}
