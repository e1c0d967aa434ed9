//! # error 模块说明
//!
//! ## 角色定位（Why）
//! - 选择器本身的分派永远不会失败：两条轴都是封闭枚举，`match` 由编译器保证穷尽；
//! - 失败只可能发生在“开放值空间 → 封闭枚举”的边界（配置文本、环境变量），以及
//!   宿主平台不提供某个原生后端的可用性校验上，本模块集中定义这些错误。
//!
//! ## 设计要求（What）
//! - [`SelectionError`] 只包含两个变体：未知后端、未知角色，均携带出错轴与原始值；
//! - 每个错误都提供稳定错误码 `code()`，格式与传输层其余 crate 的 `spark.transport.*` 对齐；
//! - 所有错误实现 `thiserror::Error`，并且都是 `Send + Sync + 'static`，可跨线程传播。

use crate::backend::BackendKind;
use thiserror::Error;

/// 未知后端的稳定错误码。
pub const UNKNOWN_BACKEND: &str = "spark.transport.selector.unknown_backend";
/// 未知角色的稳定错误码。
pub const UNKNOWN_ROLE: &str = "spark.transport.selector.unknown_role";
/// 后端在当前宿主平台不可用的稳定错误码。
pub const BACKEND_UNAVAILABLE: &str = "spark.transport.selector.backend_unavailable";
/// 配置文本无法解析的稳定错误码。
pub const MALFORMED_CONFIG: &str = "spark.transport.selector.malformed_config";

/// 边界解析阶段的选择错误。
///
/// # 教案式说明
/// - **意图 (Why)**：当 `BackendKind`/`RoleKind` 由外部文本构造时，越界值必须立即失败，
///   绝不能静默回退到某个默认后端；
/// - **契约 (What)**：
///   - `UnknownBackend`：后端轴收到了 `{portable, epoll, kqueue}` 之外的值；
///   - `UnknownRole`：角色轴收到了 `{acceptor, connector}` 之外的值；
///   - `raw` 字段保留未经修剪的原始输入，便于运维直接定位配置项；
/// - **风险 (Trade-offs)**：两类错误都属于配置/编程错误，不具备重试意义，调用方应直接上报。
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    /// 后端轴越界。
    #[error("unknown transport backend `{raw}` (expected one of: portable, epoll, kqueue)")]
    UnknownBackend { raw: String },

    /// 角色轴越界。
    #[error("unknown transport role `{raw}` (expected one of: acceptor, connector)")]
    UnknownRole { raw: String },
}

impl SelectionError {
    /// 构造未知后端错误。
    pub fn unknown_backend(raw: impl Into<String>) -> Self {
        Self::UnknownBackend { raw: raw.into() }
    }

    /// 构造未知角色错误。
    pub fn unknown_role(raw: impl Into<String>) -> Self {
        Self::UnknownRole { raw: raw.into() }
    }

    /// 返回稳定错误码。
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownBackend { .. } => UNKNOWN_BACKEND,
            Self::UnknownRole { .. } => UNKNOWN_ROLE,
        }
    }

    /// 返回出错的轴名称：`"backend"` 或 `"role"`。
    pub fn axis(&self) -> &'static str {
        match self {
            Self::UnknownBackend { .. } => "backend",
            Self::UnknownRole { .. } => "role",
        }
    }

    /// 返回导致失败的原始输入。
    pub fn raw(&self) -> &str {
        match self {
            Self::UnknownBackend { raw } | Self::UnknownRole { raw } => raw,
        }
    }
}

/// 请求的原生后端在当前宿主平台上不存在。
///
/// # 教案式说明
/// - **意图 (Why)**：`NativeEpoll` 只在 Linux 系内核上存在，`NativeKqueue` 只在 BSD/macOS 上存在；
///   在构造工厂时就拒绝它们，比等到反应器注册时才失败更容易排障；
/// - **契约 (What)**：`backend` 为被拒绝的后端，`host_os` 为编译目标的操作系统名
///   （即 `std::env::consts::OS`）；
/// - **风险 (Trade-offs)**：可用性按编译目标判定，不探测运行期内核特性（例如容器内禁用 epoll 的
///   seccomp 策略），这类失败仍由反应器在真正注册时暴露。
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("transport backend `{backend}` is not available on `{host_os}`")]
pub struct BackendUnavailable {
    pub backend: BackendKind,
    pub host_os: &'static str,
}

impl BackendUnavailable {
    /// 返回稳定错误码。
    pub fn code(&self) -> &'static str {
        BACKEND_UNAVAILABLE
    }
}

/// 配置边界返回的错误。
///
/// # 教案式说明
/// - **意图 (Why)**：把“文本语法错误”“取值越界”“平台不可用”三类问题汇聚到一个类型，
///   让引导程序只需一次 `?` 即可向运维呈现完整原因；
/// - **契约 (What)**：`code()` 对内层错误透传其稳定错误码，语法/缺项类问题统一为
///   [`MALFORMED_CONFIG`]。
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 取值越界。
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// 后端在宿主平台不可用。
    #[error(transparent)]
    Unavailable(#[from] BackendUnavailable),

    /// 配置文档缺少必需的表或键。
    #[error("transport selection is missing `{key}`")]
    Missing { key: &'static str },

    /// TOML 语法错误。
    #[error("malformed transport selection")]
    Malformed(#[source] toml::de::Error),
}

impl ConfigError {
    /// 返回稳定错误码。
    pub fn code(&self) -> &'static str {
        match self {
            Self::Selection(err) => err.code(),
            Self::Unavailable(err) => err.code(),
            Self::Missing { .. } | Self::Malformed(_) => MALFORMED_CONFIG,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_error_names_axis_and_value() {
        let err = SelectionError::unknown_backend("iocp");
        assert_eq!(err.axis(), "backend");
        assert_eq!(err.raw(), "iocp");
        assert_eq!(err.code(), UNKNOWN_BACKEND);
        assert!(err.to_string().contains("`iocp`"));

        let err = SelectionError::unknown_role("relay");
        assert_eq!(err.axis(), "role");
        assert_eq!(err.raw(), "relay");
        assert_eq!(err.code(), UNKNOWN_ROLE);
    }

    #[test]
    fn config_error_forwards_inner_code() {
        let err = ConfigError::from(SelectionError::unknown_role("peer"));
        assert_eq!(err.code(), UNKNOWN_ROLE);
        assert_eq!(err.to_string(), SelectionError::unknown_role("peer").to_string());

        let err = ConfigError::Missing { key: "transport.role" };
        assert_eq!(err.code(), MALFORMED_CONFIG);
    }

    #[test]
    fn malformed_message_leaves_detail_to_source() {
        use std::error::Error as _;

        let syntax = toml::from_str::<toml::Table>("[transport").unwrap_err();
        let detail = syntax.to_string();
        let err = ConfigError::Malformed(syntax);
        assert_eq!(err.to_string(), "malformed transport selection");
        let source = err.source().expect("toml error is kept as source");
        assert_eq!(source.to_string(), detail);
        assert_eq!(err.code(), MALFORMED_CONFIG);
    }

    #[test]
    fn errors_are_thread_safe() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<SelectionError>();
        assert_send_sync::<BackendUnavailable>();
        assert_send_sync::<ConfigError>();
    }
}
