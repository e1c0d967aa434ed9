//! # config 模块说明
//!
//! ## 角色定位（Why）
//! - 这里是 (后端, 角色) 从开放值空间进入封闭枚举的唯一入口：配置文本、环境变量或命令行
//!   参数都应先经过本模块，再交给 [`DynEndpointFactory`]；
//! - 越界值在此处立即失败，错误中带出出错的轴与原始文本，绝不静默回退。
//!
//! ## 设计要求（What）
//! - TOML 文档形如：
//!   ```toml
//!   [transport]
//!   backend = "epoll"
//!   role = "acceptor"
//!   ```
//! - 先校验后端轴、再校验角色轴；两轴都越界时报告 `UnknownBackend`；
//! - [`SelectionConfig::into_factory`] 总是执行宿主平台可用性校验。

use crate::{
    backend::BackendKind,
    error::{ConfigError, SelectionError},
    factory::DynEndpointFactory,
    role::RoleKind,
};
use serde::{Deserialize, Serialize};

/// 已校验的 (后端, 角色) 选择。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct SelectionConfig {
    pub backend: BackendKind,
    pub role: RoleKind,
}

#[derive(Debug, Deserialize)]
struct Document {
    transport: Option<RawSelection>,
}

#[derive(Debug, Deserialize)]
struct RawSelection {
    backend: Option<String>,
    role: Option<String>,
}

impl SelectionConfig {
    /// 由两段原始文本解析选择。
    ///
    /// # 教案级注释
    ///
    /// ## 契约（What）
    /// - `backend`/`role`：未经处理的外部输入，大小写与首尾空白不敏感；
    /// - 返回：两轴均合法时的选择；否则返回首个越界轴对应的 [`SelectionError`]；
    /// - **后置条件**：每次拒绝都会以 `warn` 级别记录 `axis`、`raw`、`code` 字段。
    pub fn from_raw(backend: &str, role: &str) -> Result<Self, SelectionError> {
        let backend = backend.parse::<BackendKind>().inspect_err(log_rejection)?;
        let role = role.parse::<RoleKind>().inspect_err(log_rejection)?;
        tracing::debug!(
            backend = backend.as_str(),
            role = role.as_str(),
            "transport selection accepted"
        );
        Ok(Self { backend, role })
    }

    /// 由 TOML 文档中的 `[transport]` 表解析选择。
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let document: Document = toml::from_str(text).map_err(ConfigError::Malformed)?;
        let section = document
            .transport
            .ok_or(ConfigError::Missing { key: "transport" })?;
        let backend = section
            .backend
            .ok_or(ConfigError::Missing {
                key: "transport.backend",
            })?;
        let role = section.role.ok_or(ConfigError::Missing {
            key: "transport.role",
        })?;
        Ok(Self::from_raw(&backend, &role)?)
    }

    /// 校验后端可用性并构造运行期工厂。
    pub fn into_factory(self) -> Result<DynEndpointFactory, ConfigError> {
        DynEndpointFactory::checked(self.backend, self.role).map_err(|err| {
            tracing::warn!(
                backend = err.backend.as_str(),
                host_os = err.host_os,
                code = err.code(),
                "transport backend unavailable on this host"
            );
            ConfigError::from(err)
        })
    }
}

impl std::str::FromStr for SelectionConfig {
    type Err = ConfigError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::from_toml_str(text)
    }
}

fn log_rejection(err: &SelectionError) {
    tracing::warn!(
        axis = err.axis(),
        raw = err.raw(),
        code = err.code(),
        "transport selection rejected"
    );
}
