//! 组件注册表抽象接口

use crate::bean::Bean;
use infrastructure_common::TypeInfo;
use std::sync::Arc;

/// 组件注册表 trait
///
/// 保存已解析的类型到组件的映射，以及限定类型名到组件列表的映射。
/// 实现必须是线程安全的，并发注册同一类型时名称列表不能出现重复项。
pub trait BeanRegistry: Send + Sync {
    /// 按类型查找已注册的组件
    fn find_by_type(&self, type_info: &TypeInfo) -> Option<Arc<Bean>>;

    /// 按限定类型名查找所有注册过的组件，保持注册顺序
    fn find_by_name(&self, name: &str) -> Vec<Arc<Bean>>;

    /// 注册组件
    ///
    /// 类型已注册时不做修改，返回已有的组件。
    fn add_bean(&self, type_info: TypeInfo, bean: Arc<Bean>) -> Arc<Bean>;

    /// 已注册的类型数量
    fn len(&self) -> usize;

    /// 是否没有注册任何类型
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
