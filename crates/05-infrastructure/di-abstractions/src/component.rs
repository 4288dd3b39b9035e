//! 组件 trait

use crate::definition::DefinitionBuilder;

/// 可被容器扫描和注入的组件
///
/// 默认实现不声明任何字段和接口；需要依赖注入的组件在 [`Component::describe`]
/// 中显式声明，或者使用 `#[derive(Component)]` 由属性生成。
///
/// ```ignore
/// impl Component for UserServiceImpl {
///     fn describe(definition: &mut DefinitionBuilder<Self>) {
///         definition
///             .autowired("storage", |bean| &bean.storage)
///             .provides::<dyn UserService>(|bean| bean as Arc<dyn UserService>);
///     }
/// }
/// ```
pub trait Component: Sized + Send + Sync + 'static {
    /// 声明可注入字段、对外接口和生命周期钩子
    fn describe(definition: &mut DefinitionBuilder<Self>) {
        let _ = definition;
    }
}
