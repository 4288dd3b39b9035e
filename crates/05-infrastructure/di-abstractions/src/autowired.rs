//! 可注入字段
//!
//! [`Autowired`] 是一个只能写入一次的槽位，容器通过共享引用写入依赖，
//! 组件在构建完成后通过 `Deref` 或 [`Autowired::get`] 读取。

use once_cell::sync::OnceCell;
use std::any::type_name;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// 可注入字段
///
/// `T` 可以是具体组件类型（按类型精确匹配），也可以是 `dyn Trait`（按唯一实现匹配）。
///
/// 槽位持有依赖的强引用 `Arc<T>`，组件之间的循环依赖会形成引用环，不会随容器释放。
pub struct Autowired<T: ?Sized> {
    cell: OnceCell<Arc<T>>,
}

impl<T: ?Sized> Autowired<T> {
    /// 创建未注入的字段
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// 获取已注入的实例
    pub fn get(&self) -> Option<&Arc<T>> {
        self.cell.get()
    }

    /// 是否已注入
    pub fn is_wired(&self) -> bool {
        self.cell.get().is_some()
    }

    /// 写入实例
    ///
    /// 重复写入同一个实例视为成功；已写入其他实例时返回错误说明。
    pub fn set(&self, value: Arc<T>) -> Result<(), String> {
        self.check(&value)?;
        match self.cell.set(value) {
            Ok(()) => Ok(()),
            Err(value) => self.check(&value),
        }
    }

    /// 检查字段能否写入指定实例，不做写入
    pub fn check(&self, value: &Arc<T>) -> Result<(), String> {
        match self.cell.get() {
            Some(current) if !same_instance(current, value) => Err(format!(
                "字段已注入其他 '{}' 实例",
                type_name::<T>()
            )),
            _ => Ok(()),
        }
    }
}

impl<T: ?Sized> Default for Autowired<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Deref for Autowired<T> {
    type Target = T;

    /// 未注入时 panic，只应在容器构建成功之后使用
    fn deref(&self) -> &T {
        match self.cell.get() {
            Some(value) => value,
            None => panic!("字段 '{}' 尚未注入", type_name::<T>()),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Autowired<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Autowired")
            .field("type", &type_name::<T>())
            .field("wired", &self.is_wired())
            .finish()
    }
}

/// 判断两个指针是否指向同一个实例，忽略 trait 对象的元数据
pub fn same_instance<A: ?Sized, B: ?Sized>(a: &Arc<A>, b: &Arc<B>) -> bool {
    Arc::as_ptr(a).cast::<()>() == Arc::as_ptr(b).cast::<()>()
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }

    struct English;

    impl Greeter for English {
        fn greet(&self) -> String {
            "hello".to_string()
        }
    }

    #[test]
    fn test_set_and_deref() {
        let field: Autowired<dyn Greeter> = Autowired::new();
        assert!(!field.is_wired());

        field.set(Arc::new(English)).unwrap();

        assert!(field.is_wired());
        assert_eq!(field.greet(), "hello");
    }

    #[test]
    fn test_setting_same_instance_twice_is_idempotent() {
        let field: Autowired<English> = Autowired::default();
        let instance = Arc::new(English);

        field.set(instance.clone()).unwrap();
        field.set(instance.clone()).unwrap();

        assert!(same_instance(field.get().unwrap(), &instance));
    }

    #[test]
    fn test_setting_other_instance_fails() {
        let field: Autowired<English> = Autowired::new();
        field.set(Arc::new(English)).unwrap();

        let other = Arc::new(English);
        assert!(field.check(&other).is_err());
        assert!(field.set(other).is_err());
    }

    #[test]
    fn test_same_instance_across_trait_objects() {
        let concrete = Arc::new(English);
        let erased: Arc<dyn Greeter> = concrete.clone();

        assert!(same_instance(&concrete, &erased));
        assert!(!same_instance(&Arc::new(English), &erased));
    }

    #[test]
    #[should_panic(expected = "尚未注入")]
    fn test_deref_unwired_panics() {
        let field: Autowired<dyn Greeter> = Autowired::new();
        let _ = field.greet();
    }
}
