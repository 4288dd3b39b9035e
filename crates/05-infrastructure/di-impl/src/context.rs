//! 依赖注入容器实现

use crate::engine::{self, Core, ScanEntry};
use crate::inspector::FieldInspector;
use crate::registry::BeanRegistryImpl;
use di_abstractions::{Bean, BeanContext, BeanRegistry, Component, FactoryBean, Instance};
use infrastructure_common::{
    CloseFailure, ContextConfig, ContextError, ContextResult, MissingDependency, TypeInfo,
};
use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 容器构建器
///
/// 按添加顺序扫描组件实例和工厂，`build` 时一次性完成所有注入。
pub struct ContextBuilder {
    config: ContextConfig,
    inspector: Arc<FieldInspector>,
    entries: Vec<ScanEntry>,
}

impl ContextBuilder {
    /// 创建构建器
    pub fn new() -> Self {
        Self {
            config: ContextConfig::default(),
            inspector: Arc::new(FieldInspector::new()),
            entries: Vec::new(),
        }
    }

    /// 设置容器配置
    pub fn with_config(mut self, config: ContextConfig) -> Self {
        self.config = config;
        self
    }

    /// 使用共享的字段检查器，多个容器可以复用同一份定义缓存
    pub fn with_inspector(mut self, inspector: Arc<FieldInspector>) -> Self {
        self.inspector = inspector;
        self
    }

    /// 添加组件实例
    pub fn bean<C: Component>(mut self, instance: Arc<C>) -> Self {
        self.entries.push(ScanEntry {
            type_info: TypeInfo::of::<C>(),
            source: Box::new(move || Some(instance as Instance)),
            inspect: FieldInspector::inspect::<C>,
        });
        self
    }

    /// 添加工厂，在该位置扫描工厂产出的对象
    pub fn factory<F: FactoryBean>(mut self, factory: F) -> Self {
        self.entries.push(ScanEntry {
            type_info: TypeInfo::of::<F::Object>(),
            source: Box::new(move || factory.object().map(|object| object as Instance)),
            inspect: FieldInspector::inspect::<F::Object>,
        });
        self
    }

    /// 已添加的扫描项数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否没有添加扫描项
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 构建容器
    ///
    /// 扫描、匹配、注入和初始化全部成功才返回容器，任一步失败都返回错误。
    pub fn build(self) -> ContextResult<BeanContextImpl> {
        let verbose = self.config.verbose;
        info!("开始构建容器 '{}'，共 {} 个扫描项", self.config.name, self.entries.len());

        let core = engine::scan(self.entries, &self.inspector, verbose)?;
        let registry = BeanRegistryImpl::new();
        let wired = engine::wire(&core, &registry, verbose)?;

        info!(
            "容器 '{}' 构建完成: {} 个组件，{} 个注入点，{} 个已登记类型",
            self.config.name,
            core.len(),
            wired,
            registry.len()
        );

        Ok(BeanContextImpl {
            config: self.config,
            core,
            registry,
            inspector: self.inspector,
            closed: AtomicBool::new(false),
        })
    }
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 依赖注入容器实现
///
/// 组件之间通过 [`Autowired`](di_abstractions::Autowired) 持有强引用，
/// 存在循环依赖时容器释放后这些组件也不会被回收，容器应与进程同生命周期。
pub struct BeanContextImpl {
    config: ContextConfig,
    core: Core,
    registry: BeanRegistryImpl,
    inspector: Arc<FieldInspector>,
    closed: AtomicBool,
}

impl BeanContextImpl {
    /// 创建构建器
    pub fn builder() -> ContextBuilder {
        ContextBuilder::new()
    }

    /// 字段检查器
    pub fn inspector(&self) -> &Arc<FieldInspector> {
        &self.inspector
    }

    /// 注册表
    pub fn registry(&self) -> &BeanRegistryImpl {
        &self.registry
    }

    /// 容器是否已关闭
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// 按类型解析组件，未命中注册表时按需登记
    ///
    /// 查找顺序：注册表、核心具体类型、唯一接口实现。只有成功的结果会登记，
    /// `requesters` 只用于错误说明。
    fn resolve_for(&self, type_info: &TypeInfo, requesters: &[String]) -> ContextResult<Arc<Bean>> {
        if let Some(bean) = self.registry.find_by_type(type_info) {
            return Ok(bean);
        }

        if let Some(bean) = self.core.get(type_info) {
            return Ok(self.cache(type_info, bean.clone()));
        }

        if type_info.is_interface() {
            let bean = engine::find_implementation(&self.core, type_info, requesters)?;
            return Ok(self.cache(type_info, bean));
        }

        Err(ContextError::unsatisfied(type_info.name(), requesters.to_vec()))
    }

    fn cache(&self, type_info: &TypeInfo, bean: Arc<Bean>) -> Arc<Bean> {
        debug!("登记类型 '{}' -> {}", type_info, bean.type_info());
        self.registry.add_bean(*type_info, bean)
    }
}

impl BeanContext for BeanContextImpl {
    fn config(&self) -> &ContextConfig {
        &self.config
    }

    fn core(&self) -> Vec<TypeInfo> {
        self.core.types()
    }

    fn len(&self) -> usize {
        self.core.len()
    }

    fn resolve_by_type(&self, type_info: &TypeInfo) -> ContextResult<Arc<Bean>> {
        self.resolve_for(type_info, &[])
    }

    fn lookup(&self, name: &str) -> Vec<Arc<Bean>> {
        self.registry.find_by_name(name)
    }

    fn inject<C: Component>(&self, target: &C) -> ContextResult<()> {
        let definition = self.inspector.inspect::<C>()?;
        let verbose = self.config.verbose;

        let mut plan = Vec::with_capacity(definition.fields().len());
        let mut missing: Vec<MissingDependency> = Vec::new();
        for field in definition.fields() {
            match self.resolve_for(field.required(), &[field.requester()]) {
                Ok(bean) => plan.push((field, bean)),
                Err(ContextError::UnsatisfiedDependency { missing: more }) => missing.extend(more),
                Err(e) => return Err(e),
            }
        }
        if !missing.is_empty() {
            return Err(ContextError::UnsatisfiedDependency { missing });
        }

        let target: &(dyn Any + Send + Sync) = target;
        for (field, bean) in &plan {
            field.check(target, bean)?;
        }
        for (field, bean) in &plan {
            field.inject(target, bean)?;
            verbose_event!(verbose, "注入 {} <- {}", field.requester(), bean.type_info());
        }

        Ok(())
    }

    fn close(&self) -> ContextResult<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            debug!("容器 '{}' 已关闭，忽略重复关闭", self.config.name);
            return Ok(());
        }

        let mut failures: Vec<CloseFailure> = Vec::new();
        for bean in self.core.iter() {
            match bean.close() {
                Some(Ok(())) => {
                    verbose_event!(self.config.verbose, "已关闭组件: {}", bean.type_info())
                }
                Some(Err(failure)) => {
                    warn!("{}", failure);
                    failures.push(failure);
                }
                None => {}
            }
        }

        info!(
            "容器 '{}' 已关闭，{} 个组件关闭失败",
            self.config.name,
            failures.len()
        );

        match failures.len() {
            0 => Ok(()),
            1 => Err(failures.remove(0).into()),
            _ => Err(ContextError::AggregateCloseFailure { failures }),
        }
    }
}

impl fmt::Debug for BeanContextImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanContextImpl")
            .field("name", &self.config.name)
            .field("core", &self.core.types().iter().map(TypeInfo::name).collect::<Vec<_>>())
            .field("registry", &self.registry)
            .field("closed", &self.is_closed())
            .finish()
    }
}
