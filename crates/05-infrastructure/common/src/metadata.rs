//! 元数据定义
//!
//! 提供依赖类型的元数据信息

use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem::size_of;

/// 依赖类型的种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// 具体组件类型，按类型精确匹配
    Reference,
    /// trait 对象（`dyn Trait`），按唯一实现匹配
    Interface,
    /// 其他不定长类型（切片、`str` 等），不能参与注入
    Unsupported,
}

/// 类型信息
///
/// 相等性和哈希只由 [`TypeId`] 决定，名称仅用于日志和按名称查找。
#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    id: TypeId,
    name: &'static str,
    kind: TypeKind,
}

impl TypeInfo {
    /// 从类型获取类型信息
    ///
    /// 定长类型归为 [`TypeKind::Reference`]，`dyn Trait` 归为
    /// [`TypeKind::Interface`]，其余不定长类型归为 [`TypeKind::Unsupported`]。
    pub fn of<T: ?Sized + 'static>() -> Self {
        let name = type_name::<T>();
        let kind = if size_of::<*const T>() == size_of::<*const ()>() {
            TypeKind::Reference
        } else if name.starts_with("dyn ") {
            TypeKind::Interface
        } else {
            TypeKind::Unsupported
        };

        Self {
            id: TypeId::of::<T>(),
            name,
            kind,
        }
    }

    /// 类型ID
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// 完整类型名称（`std::any::type_name`）
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 类型种类
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// 是否为 trait 对象
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// 按名称查找时使用的完整限定名
    ///
    /// trait 对象去掉 `dyn ` 前缀，例如 `dyn app::UserService` 对应 `app::UserService`。
    pub fn qualified_name(&self) -> &'static str {
        self.name.strip_prefix("dyn ").unwrap_or(self.name)
    }

    /// 获取简短的类型名称（不包含模块路径和泛型参数）
    pub fn short_name(&self) -> &'static str {
        let base = self
            .qualified_name()
            .split('<')
            .next()
            .unwrap_or(self.name);
        base.rsplit("::").next().unwrap_or(base)
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

impl Hash for TypeInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
