//! 组件实例模型

use crate::definition::{BeanDefinition, Instance};
use infrastructure_common::{CloseFailure, ContextError, ContextResult, TypeInfo};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// 扫描得到的组件实例及其定义
///
/// 创建时按定义预先生成具体类型视图和所有对外接口视图，
/// 之后按类型取出 `Arc<C>` 或 `Arc<dyn I>`。
pub struct Bean {
    /// 在扫描列表中的位置
    position: usize,
    /// 实例
    instance: Instance,
    /// 类型ID -> `Box<Arc<T>>`
    views: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    /// 组件定义
    definition: Arc<BeanDefinition>,
}

impl Bean {
    /// 创建组件实例
    pub fn new(position: usize, instance: Instance, definition: Arc<BeanDefinition>) -> ContextResult<Self> {
        let concrete = definition
            .cast_concrete(&instance)
            .ok_or_else(|| ContextError::InvalidArgument {
                position,
                message: format!("实例类型与定义 '{}' 不一致", definition.type_info().name()),
            })?;

        let mut views = HashMap::new();
        views.insert(definition.type_info().id(), concrete);
        for exposure in definition.exposures() {
            if let Some(view) = exposure.cast(&instance) {
                views.insert(exposure.interface().id(), view);
            }
        }

        Ok(Self {
            position,
            instance,
            views,
            definition,
        })
    }

    /// 在扫描列表中的位置
    pub fn position(&self) -> usize {
        self.position
    }

    /// 具体类型
    pub fn type_info(&self) -> &TypeInfo {
        self.definition.type_info()
    }

    /// 组件定义
    pub fn definition(&self) -> &Arc<BeanDefinition> {
        &self.definition
    }

    /// 类型擦除后的实例
    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    /// 以指定类型取出实例，`T` 为具体类型或组件提供的接口
    pub fn view<T: ?Sized + 'static>(&self) -> Option<Arc<T>> {
        let view = self.views.get(&TypeId::of::<T>())?;
        view.downcast_ref::<Arc<T>>().cloned()
    }

    /// 组件能否作为该接口的实现
    pub fn implements(&self, interface: &TypeInfo) -> bool {
        self.definition.implements(interface)
    }

    /// 执行初始化钩子，未声明时直接成功
    pub fn post_construct(&self) -> ContextResult<()> {
        match self.definition.run_post_construct(self.instance.as_ref()) {
            Some(Err(source)) => Err(ContextError::PostConstructFailed {
                type_name: self.type_info().name().to_string(),
                source,
            }),
            _ => Ok(()),
        }
    }

    /// 执行关闭钩子，未声明时返回 `None`
    pub fn close(&self) -> Option<Result<(), CloseFailure>> {
        self.definition
            .run_close(self.instance.as_ref())
            .map(|result| {
                result.map_err(|source| CloseFailure {
                    type_name: self.type_info().name().to_string(),
                    source,
                })
            })
    }
}

impl fmt::Debug for Bean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bean")
            .field("position", &self.position)
            .field("type", &self.type_info().name())
            .field("views", &self.views.len())
            .finish()
    }
}
