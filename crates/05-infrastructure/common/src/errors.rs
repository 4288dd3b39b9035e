//! 错误类型定义

use crate::lifecycle::BoxError;
use std::fmt;
use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置解析失败: {source}")]
    ParseError {
        #[from]
        source: config::ConfigError,
    },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },
}

/// 缺失的依赖类型及其所有依赖方
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingDependency {
    /// 缺失的类型名称
    pub type_name: String,
    /// 依赖方，格式为 `类型->字段`
    pub requesters: Vec<String>,
}

impl fmt::Display for MissingDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' required by [{}]", self.type_name, self.requesters.join(", "))
    }
}

/// 单个组件关闭失败
#[derive(Error, Debug)]
#[error("组件 '{type_name}' 关闭失败: {source}")]
pub struct CloseFailure {
    /// 组件类型名称
    pub type_name: String,
    /// 关闭钩子返回的原始错误
    #[source]
    pub source: BoxError,
}

/// 依赖注入容器错误类型
#[derive(Error, Debug)]
pub enum ContextError {
    #[error("扫描列表第 {position} 项参数无效: {message}")]
    InvalidArgument { position: usize, message: String },

    #[error("扫描列表第 {position} 项类型重复: '{type_name}'，已在第 {first_position} 项出现")]
    DuplicateInstance {
        position: usize,
        first_position: usize,
        type_name: String,
    },

    #[error("字段 {owner}->{field} 的类型 '{type_name}' 不支持注入，只允许具体组件类型或 trait 对象")]
    UnsupportedFieldKind {
        owner: String,
        field: String,
        type_name: String,
    },

    #[error("找不到以下类型的候选组件: [{}]", join_missing(.missing))]
    UnsatisfiedDependency { missing: Vec<MissingDependency> },

    #[error("接口 '{interface}' 存在多个实现: {candidates:?}，依赖方: {requesters:?}")]
    AmbiguousImplementation {
        interface: String,
        candidates: Vec<String>,
        requesters: Vec<String>,
    },

    #[error("接口 '{interface}' 找不到实现，依赖方: {requesters:?}")]
    MissingImplementation {
        interface: String,
        requesters: Vec<String>,
    },

    #[error("字段 {owner}->{field} 无法写入: {reason}")]
    NotSettable {
        owner: String,
        field: String,
        reason: String,
    },

    #[error("组件 '{type_name}' 初始化失败: {source}")]
    PostConstructFailed {
        type_name: String,
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    CloseFailed(#[from] CloseFailure),

    #[error("关闭容器时发生多个错误: [{}]", join_failures(.failures))]
    AggregateCloseFailure { failures: Vec<CloseFailure> },
}

impl ContextError {
    /// 创建单个类型缺失的错误
    pub fn unsatisfied(type_name: impl Into<String>, requesters: Vec<String>) -> Self {
        Self::UnsatisfiedDependency {
            missing: vec![MissingDependency {
                type_name: type_name.into(),
                requesters,
            }],
        }
    }
}

fn join_missing(missing: &[MissingDependency]) -> String {
    missing
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn join_failures(failures: &[CloseFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type ContextResult<T> = Result<T, ContextError>;
