//! 匹配引擎
//!
//! 构建流程分为三步：
//!
//! 1. 扫描：按顺序实例化扫描项，检查类型重复，生成 [`Bean`]；
//! 2. 规划：先按具体类型精确匹配，再按唯一接口实现匹配，得到完整的注入计划；
//! 3. 执行：检查所有字段都可写入后统一写入，再按扫描顺序执行初始化钩子。
//!
//! 任何一步失败都不会返回容器。

use crate::inspector::FieldInspector;
use di_abstractions::{Bean, BeanDefinition, BeanRegistry, FieldDescriptor, Instance};
use indexmap::IndexMap;
use infrastructure_common::{ContextError, ContextResult, MissingDependency, TypeInfo, TypeKind};
use std::sync::Arc;

/// 扫描项：类型、实例来源和定义获取方式
pub(crate) struct ScanEntry {
    pub(crate) type_info: TypeInfo,
    pub(crate) source: Box<dyn FnOnce() -> Option<Instance> + Send>,
    pub(crate) inspect: fn(&FieldInspector) -> ContextResult<Arc<BeanDefinition>>,
}

/// 核心组件集合
///
/// 按扫描顺序保存具体类型到组件的映射，构建完成后不再变化。
#[derive(Debug, Default)]
pub struct Core {
    beans: IndexMap<TypeInfo, Arc<Bean>>,
}

impl Core {
    /// 按具体类型查找
    pub fn get(&self, type_info: &TypeInfo) -> Option<&Arc<Bean>> {
        self.beans.get(type_info)
    }

    /// 按扫描顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Bean>> {
        self.beans.values()
    }

    /// 按扫描顺序排列的具体类型
    pub fn types(&self) -> Vec<TypeInfo> {
        self.beans.keys().copied().collect()
    }

    /// 组件数量
    pub fn len(&self) -> usize {
        self.beans.len()
    }

    /// 是否没有任何组件
    pub fn is_empty(&self) -> bool {
        self.beans.is_empty()
    }
}

/// 一次字段注入
struct Wiring {
    target: Arc<Bean>,
    field: FieldDescriptor,
    source: Arc<Bean>,
}

/// 按需求类型分组的字段，保持首次出现的顺序
type Requirements = IndexMap<TypeInfo, Vec<(Arc<Bean>, FieldDescriptor)>>;

/// 扫描所有条目，生成核心组件集合
pub(crate) fn scan(
    entries: Vec<ScanEntry>,
    inspector: &FieldInspector,
    verbose: bool,
) -> ContextResult<Core> {
    let mut core = Core::default();

    for (position, entry) in entries.into_iter().enumerate() {
        let instance = (entry.source)().ok_or_else(|| ContextError::InvalidArgument {
            position,
            message: format!("工厂没有产出 '{}' 实例", entry.type_info),
        })?;

        let definition = (entry.inspect)(inspector)?;
        if entry.type_info != *definition.type_info() {
            return Err(ContextError::InvalidArgument {
                position,
                message: format!(
                    "扫描项类型 '{}' 与组件定义 '{}' 不一致",
                    entry.type_info,
                    definition.type_info()
                ),
            });
        }

        if let Some(first) = core.get(&entry.type_info) {
            return Err(ContextError::DuplicateInstance {
                position,
                first_position: first.position(),
                type_name: entry.type_info.name().to_string(),
            });
        }

        verbose_event!(verbose, "扫描组件 #{}: {}", position, entry.type_info);
        for field in definition.fields() {
            verbose_event!(
                verbose,
                "  可注入字段 {}: {}",
                field.name(),
                field.required()
            );
        }

        let bean = Bean::new(position, instance, definition)?;
        core.beans.insert(entry.type_info, Arc::new(bean));
    }

    Ok(core)
}

/// 解析核心组件的所有依赖并写入字段
///
/// 成功后把解析到的类型登记到注册表，返回写入的字段数量。
pub(crate) fn wire(
    core: &Core,
    registry: &dyn BeanRegistry,
    verbose: bool,
) -> ContextResult<usize> {
    let (references, interfaces) = collect_requirements(core)?;

    let mut plan = Vec::new();
    let mut resolved = Vec::new();

    // 精确类型匹配，汇总所有缺失的类型
    let mut missing = Vec::new();
    for (required, requesters) in &references {
        match core.get(required) {
            Some(source) => {
                verbose_event!(
                    verbose,
                    "按类型注入 '{}' 到 {:?}",
                    required,
                    requester_names(requesters)
                );
                plan_wirings(&mut plan, source, requesters);
                resolved.push((*required, source.clone()));
            }
            None => missing.push(MissingDependency {
                type_name: required.name().to_string(),
                requesters: requester_names(requesters),
            }),
        }
    }
    if !missing.is_empty() {
        return Err(ContextError::UnsatisfiedDependency { missing });
    }

    // 接口匹配
    for (interface, requesters) in &interfaces {
        let source = find_implementation(core, interface, &requester_names(requesters))?;
        verbose_event!(
            verbose,
            "按实现注入 '{}' ({}) 到 {:?}",
            interface,
            source.type_info(),
            requester_names(requesters)
        );
        plan_wirings(&mut plan, &source, requesters);
        resolved.push((*interface, source));
    }

    apply(&plan)?;

    for bean in core.iter() {
        bean.post_construct()?;
    }

    for (type_info, bean) in resolved {
        registry.add_bean(type_info, bean);
    }

    Ok(plan.len())
}

/// 在核心组件中查找接口的唯一实现
///
/// 候选组件按扫描顺序排列；opaque 集合中的接口不参与匹配。
pub fn find_implementation(
    core: &Core,
    interface: &TypeInfo,
    requesters: &[String],
) -> ContextResult<Arc<Bean>> {
    let candidates: Vec<&Arc<Bean>> = core
        .iter()
        .filter(|bean| bean.implements(interface))
        .collect();

    match candidates.as_slice() {
        [] => Err(ContextError::MissingImplementation {
            interface: interface.name().to_string(),
            requesters: requesters.to_vec(),
        }),
        [single] => Ok(Arc::clone(single)),
        _ => Err(ContextError::AmbiguousImplementation {
            interface: interface.name().to_string(),
            candidates: candidates
                .iter()
                .map(|bean| bean.type_info().name().to_string())
                .collect(),
            requesters: requesters.to_vec(),
        }),
    }
}

/// 检查所有字段都可写入后统一写入
fn apply(plan: &[Wiring]) -> ContextResult<()> {
    for wiring in plan {
        wiring.field.check(&**wiring.target.instance(), &wiring.source)?;
    }
    for wiring in plan {
        wiring.field.inject(&**wiring.target.instance(), &wiring.source)?;
    }
    Ok(())
}

fn collect_requirements(core: &Core) -> ContextResult<(Requirements, Requirements)> {
    let mut references = Requirements::new();
    let mut interfaces = Requirements::new();

    for bean in core.iter() {
        for field in bean.definition().fields() {
            let group = match field.required().kind() {
                TypeKind::Reference => &mut references,
                TypeKind::Interface => &mut interfaces,
                TypeKind::Unsupported => {
                    return Err(ContextError::UnsupportedFieldKind {
                        owner: bean.type_info().name().to_string(),
                        field: field.name().to_string(),
                        type_name: field.required().name().to_string(),
                    })
                }
            };
            group
                .entry(*field.required())
                .or_default()
                .push((bean.clone(), field.clone()));
        }
    }

    Ok((references, interfaces))
}

fn plan_wirings(plan: &mut Vec<Wiring>, source: &Arc<Bean>, requesters: &[(Arc<Bean>, FieldDescriptor)]) {
    plan.extend(requesters.iter().map(|(target, field)| Wiring {
        target: target.clone(),
        field: field.clone(),
        source: source.clone(),
    }));
}

fn requester_names(requesters: &[(Arc<Bean>, FieldDescriptor)]) -> Vec<String> {
    requesters.iter().map(|(_, field)| field.requester()).collect()
}
