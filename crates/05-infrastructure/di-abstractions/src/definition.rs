//! 组件定义
//!
//! 组件通过 [`DefinitionBuilder`] 显式声明可注入字段、对外提供的接口、
//! 只消费不提供的接口（opaque）以及生命周期钩子，构建结果为 [`BeanDefinition`]。

use crate::autowired::Autowired;
use crate::bean::Bean;
use crate::component::Component;
use infrastructure_common::{
    BoxError, Closable, ContextError, ContextResult, Initializing, TypeInfo, TypeKind,
};
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// 类型擦除后的组件实例（实际为 `Arc<C>`）
pub type Instance = Arc<dyn Any + Send + Sync>;

/// 把实例转换为指定视图（`Box<Arc<C>>` 或 `Box<Arc<dyn I>>`）
type Caster = Arc<dyn Fn(&Instance) -> Option<Box<dyn Any + Send + Sync>> + Send + Sync>;

/// 生命周期钩子
type Hook = Arc<dyn Fn(&(dyn Any + Send + Sync)) -> Result<(), BoxError> + Send + Sync>;

/// 字段写入器
type FieldWriter =
    Arc<dyn Fn(&(dyn Any + Send + Sync), &Bean, WriteMode) -> Result<(), String> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteMode {
    Check,
    Write,
}

/// 可注入字段描述
#[derive(Clone)]
pub struct FieldDescriptor {
    owner: TypeInfo,
    position: usize,
    name: &'static str,
    required: TypeInfo,
    embedded: bool,
    writer: FieldWriter,
}

impl FieldDescriptor {
    /// 字段所属类型
    pub fn owner(&self) -> &TypeInfo {
        &self.owner
    }

    /// 字段在声明中的位置
    pub fn position(&self) -> usize {
        self.position
    }

    /// 字段名称
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 字段需要的依赖类型
    pub fn required(&self) -> &TypeInfo {
        &self.required
    }

    /// 是否为内嵌字段（其接口同时进入 opaque 集合）
    pub fn is_embedded(&self) -> bool {
        self.embedded
    }

    /// 依赖方描述，格式为 `类型->字段`
    pub fn requester(&self) -> String {
        format!("{}->{}", self.owner.name(), self.name)
    }

    /// 检查字段能否写入指定组件，不做写入
    pub fn check(&self, target: &(dyn Any + Send + Sync), bean: &Bean) -> ContextResult<()> {
        (self.writer)(target, bean, WriteMode::Check).map_err(|reason| self.not_settable(reason))
    }

    /// 把组件写入目标对象的字段
    pub fn inject(&self, target: &(dyn Any + Send + Sync), bean: &Bean) -> ContextResult<()> {
        (self.writer)(target, bean, WriteMode::Write).map_err(|reason| self.not_settable(reason))
    }

    fn not_settable(&self, reason: String) -> ContextError {
        ContextError::NotSettable {
            owner: self.owner.name().to_string(),
            field: self.name.to_string(),
            reason,
        }
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("owner", &self.owner.name())
            .field("position", &self.position)
            .field("name", &self.name)
            .field("required", &self.required.name())
            .field("embedded", &self.embedded)
            .finish()
    }
}

/// 组件对外提供的接口
#[derive(Clone)]
pub struct Exposure {
    interface: TypeInfo,
    caster: Caster,
}

impl Exposure {
    /// 接口类型
    pub fn interface(&self) -> &TypeInfo {
        &self.interface
    }

    /// 把实例转换为 `Box<Arc<dyn I>>`
    pub fn cast(&self, instance: &Instance) -> Option<Box<dyn Any + Send + Sync>> {
        (self.caster)(instance)
    }
}

impl fmt::Debug for Exposure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Exposure").field(&self.interface.name()).finish()
    }
}

/// 组件定义构建器
pub struct DefinitionBuilder<C> {
    type_info: TypeInfo,
    fields: Vec<FieldDescriptor>,
    exposed: Vec<Exposure>,
    opaque: Vec<TypeInfo>,
    post_construct: Option<Hook>,
    close: Option<Hook>,
    _marker: PhantomData<fn() -> C>,
}

impl<C: Component> DefinitionBuilder<C> {
    /// 创建空的构建器
    pub fn new() -> Self {
        Self {
            type_info: TypeInfo::of::<C>(),
            fields: Vec::new(),
            exposed: Vec::new(),
            opaque: Vec::new(),
            post_construct: None,
            close: None,
            _marker: PhantomData,
        }
    }

    /// 声明可注入字段
    pub fn autowired<T>(&mut self, name: &'static str, accessor: fn(&C) -> &Autowired<T>) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.push_field(name, accessor, false);
        self
    }

    /// 声明内嵌字段
    ///
    /// 字段照常注入，同时该接口进入 opaque 集合：组件包装并消费这个能力，
    /// 即使自身也实现了该接口，也不会被选作它的实现。
    pub fn embedded<T>(&mut self, name: &'static str, accessor: fn(&C) -> &Autowired<T>) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.push_field(name, accessor, true);
        self.opaque::<T>()
    }

    /// 声明对外提供的接口
    pub fn provides<I>(&mut self, cast: fn(Arc<C>) -> Arc<I>) -> &mut Self
    where
        I: ?Sized + Send + Sync + 'static,
    {
        let caster: Caster = Arc::new(move |instance: &Instance| -> Option<Box<dyn Any + Send + Sync>> {
            let concrete = instance.clone().downcast::<C>().ok()?;
            Some(Box::new(cast(concrete)) as Box<dyn Any + Send + Sync>)
        });

        self.exposed.push(Exposure {
            interface: TypeInfo::of::<I>(),
            caster,
        });
        self
    }

    /// 声明只消费不提供的接口
    pub fn opaque<I>(&mut self) -> &mut Self
    where
        I: ?Sized + 'static,
    {
        let interface = TypeInfo::of::<I>();
        if !self.opaque.contains(&interface) {
            self.opaque.push(interface);
        }
        self
    }

    /// 声明构建完成后调用 [`Initializing::post_construct`]
    pub fn post_construct(&mut self) -> &mut Self
    where
        C: Initializing,
    {
        let hook: Hook = Arc::new(|target: &(dyn Any + Send + Sync)| -> Result<(), BoxError> {
            match target.downcast_ref::<C>() {
                Some(component) => Initializing::post_construct(component),
                None => Err(format!("目标对象不是 '{}'", type_name::<C>()).into()),
            }
        });
        self.post_construct = Some(hook);
        self
    }

    /// 声明容器关闭时调用 [`Closable::close`]
    pub fn closable(&mut self) -> &mut Self
    where
        C: Closable,
    {
        let hook: Hook = Arc::new(|target: &(dyn Any + Send + Sync)| -> Result<(), BoxError> {
            match target.downcast_ref::<C>() {
                Some(component) => Closable::close(component),
                None => Err(format!("目标对象不是 '{}'", type_name::<C>()).into()),
            }
        });
        self.close = Some(hook);
        self
    }

    /// 构建组件定义
    ///
    /// 字段类型既不是具体类型也不是 trait 对象时返回 [`ContextError::UnsupportedFieldKind`]。
    pub fn build(self) -> ContextResult<BeanDefinition> {
        if let Some(field) = self
            .fields
            .iter()
            .find(|field| field.required.kind() == TypeKind::Unsupported)
        {
            return Err(ContextError::UnsupportedFieldKind {
                owner: self.type_info.name().to_string(),
                field: field.name.to_string(),
                type_name: field.required.name().to_string(),
            });
        }

        let concrete: Caster = Arc::new(|instance: &Instance| -> Option<Box<dyn Any + Send + Sync>> {
            let concrete = instance.clone().downcast::<C>().ok()?;
            Some(Box::new(concrete) as Box<dyn Any + Send + Sync>)
        });

        let exposed = self
            .exposed
            .into_iter()
            .map(|exposure| (exposure.interface.id(), exposure))
            .collect();

        Ok(BeanDefinition {
            type_info: self.type_info,
            fields: self.fields,
            exposed,
            opaque: self.opaque,
            concrete,
            post_construct: self.post_construct,
            close: self.close,
        })
    }

    fn push_field<T>(&mut self, name: &'static str, accessor: fn(&C) -> &Autowired<T>, embedded: bool)
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let writer: FieldWriter = Arc::new(
            move |target: &(dyn Any + Send + Sync), bean: &Bean, mode: WriteMode| -> Result<(), String> {
                let target = target
                    .downcast_ref::<C>()
                    .ok_or_else(|| format!("目标对象不是 '{}'", type_name::<C>()))?;
                let value = bean.view::<T>().ok_or_else(|| {
                    format!(
                        "组件 '{}' 不能作为 '{}' 注入",
                        bean.type_info().name(),
                        type_name::<T>()
                    )
                })?;

                let field = accessor(target);
                match mode {
                    WriteMode::Check => field.check(&value),
                    WriteMode::Write => field.set(value),
                }
            },
        );

        self.fields.push(FieldDescriptor {
            owner: self.type_info,
            position: self.fields.len(),
            name,
            required: TypeInfo::of::<T>(),
            embedded,
            writer,
        });
    }
}

impl<C: Component> Default for DefinitionBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// 组件定义
///
/// 由具体类型唯一决定，可以按类型缓存。
pub struct BeanDefinition {
    type_info: TypeInfo,
    fields: Vec<FieldDescriptor>,
    exposed: HashMap<TypeId, Exposure>,
    opaque: Vec<TypeInfo>,
    concrete: Caster,
    post_construct: Option<Hook>,
    close: Option<Hook>,
}

impl BeanDefinition {
    /// 检查组件类型并生成定义
    pub fn of<C: Component>() -> ContextResult<Self> {
        let mut builder = DefinitionBuilder::<C>::new();
        C::describe(&mut builder);
        builder.build()
    }

    /// 组件的具体类型
    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    /// 按声明顺序排列的可注入字段
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// opaque 接口集合
    pub fn opaque(&self) -> &[TypeInfo] {
        &self.opaque
    }

    /// 对外提供的接口
    pub fn exposures(&self) -> impl Iterator<Item = &Exposure> {
        self.exposed.values()
    }

    /// 接口是否在 opaque 集合中
    pub fn is_opaque(&self, interface: &TypeInfo) -> bool {
        self.opaque.contains(interface)
    }

    /// 组件能否作为该接口的实现
    ///
    /// 先判断 opaque 集合，再判断是否提供该接口。
    pub fn implements(&self, interface: &TypeInfo) -> bool {
        if self.is_opaque(interface) {
            return false;
        }
        self.exposed.contains_key(&interface.id())
    }

    /// 是否声明了初始化钩子
    pub fn is_initializing(&self) -> bool {
        self.post_construct.is_some()
    }

    /// 是否声明了关闭钩子
    pub fn is_closable(&self) -> bool {
        self.close.is_some()
    }

    pub(crate) fn cast_concrete(&self, instance: &Instance) -> Option<Box<dyn Any + Send + Sync>> {
        (self.concrete)(instance)
    }

    pub(crate) fn run_post_construct(&self, target: &(dyn Any + Send + Sync)) -> Option<Result<(), BoxError>> {
        self.post_construct.as_ref().map(|hook| hook(target))
    }

    pub(crate) fn run_close(&self, target: &(dyn Any + Send + Sync)) -> Option<Result<(), BoxError>> {
        self.close.as_ref().map(|hook| hook(target))
    }
}

impl fmt::Debug for BeanDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanDefinition")
            .field("type", &self.type_info.name())
            .field("fields", &self.fields)
            .field("exposed", &self.exposed.values().collect::<Vec<_>>())
            .field("opaque", &self.opaque.iter().map(TypeInfo::name).collect::<Vec<_>>())
            .field("initializing", &self.is_initializing())
            .field("closable", &self.is_closable())
            .finish()
    }
}
