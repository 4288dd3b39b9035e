//! 组件定义缓存

use dashmap::DashMap;
use di_abstractions::{BeanDefinition, Component};
use infrastructure_common::{ContextResult, TypeInfo};
use std::any::TypeId;
use std::sync::Arc;
use tracing::debug;

/// 字段检查器
///
/// 按具体类型缓存 [`BeanDefinition`]，容器构建和 `inject` 共用同一份缓存。
/// 并发检查同一类型时只保留先写入的定义。
#[derive(Debug, Default)]
pub struct FieldInspector {
    cache: DashMap<TypeId, Arc<BeanDefinition>>,
}

impl FieldInspector {
    /// 创建空的检查器
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取组件定义，未缓存时生成并缓存
    pub fn inspect<C: Component>(&self) -> ContextResult<Arc<BeanDefinition>> {
        let type_id = TypeId::of::<C>();
        if let Some(definition) = self.cache.get(&type_id) {
            return Ok(definition.value().clone());
        }

        let definition = Arc::new(BeanDefinition::of::<C>()?);
        debug!(
            "缓存组件定义: {} ({} 个字段)",
            definition.type_info(),
            definition.fields().len()
        );

        let cached = self.cache.entry(type_id).or_insert(definition);
        Ok(cached.value().clone())
    }

    /// 类型是否已缓存
    pub fn contains(&self, type_info: &TypeInfo) -> bool {
        self.cache.contains_key(&type_info.id())
    }

    /// 已缓存的类型数量
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// 是否没有缓存任何类型
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
