//! 线程安全的组件注册表

use di_abstractions::{Bean, BeanRegistry};
use infrastructure_common::TypeInfo;
use parking_lot::RwLock;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
struct Entries {
    by_type: HashMap<TypeId, Arc<Bean>>,
    by_name: HashMap<String, Vec<Arc<Bean>>>,
}

/// 组件注册表实现
///
/// 读多写少，使用读写锁保护；写入时在写锁内再次检查，保证并发注册同一类型时只生效一次。
#[derive(Default)]
pub struct BeanRegistryImpl {
    entries: RwLock<Entries>,
}

impl BeanRegistryImpl {
    /// 创建空的注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 已注册的限定类型名
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.entries.read().by_name.keys().cloned().collect();
        names.sort();
        names
    }
}

impl BeanRegistry for BeanRegistryImpl {
    fn find_by_type(&self, type_info: &TypeInfo) -> Option<Arc<Bean>> {
        self.entries.read().by_type.get(&type_info.id()).cloned()
    }

    fn find_by_name(&self, name: &str) -> Vec<Arc<Bean>> {
        self.entries
            .read()
            .by_name
            .get(name)
            .cloned()
            .unwrap_or_default()
    }

    fn add_bean(&self, type_info: TypeInfo, bean: Arc<Bean>) -> Arc<Bean> {
        let mut entries = self.entries.write();
        if let Some(existing) = entries.by_type.get(&type_info.id()) {
            return existing.clone();
        }

        entries.by_type.insert(type_info.id(), bean.clone());
        entries
            .by_name
            .entry(type_info.qualified_name().to_string())
            .or_default()
            .push(bean.clone());
        bean
    }

    fn len(&self) -> usize {
        self.entries.read().by_type.len()
    }
}

impl std::fmt::Debug for BeanRegistryImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeanRegistryImpl")
            .field("types", &self.len())
            .field("names", &self.names())
            .finish()
    }
}
