use crate::{
    backend::BackendKind,
    endpoint::{ConnectionEndpoint, Endpoint, ListeningEndpoint},
    error::SelectionError,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

/// 端点承担的角色。
///
/// # 教案级注释
///
/// ## 意图（Why）
/// - `Acceptor` 监听地址并产出入站连接；`Connector` 代表一条出站（或已接受的）连接；
/// - 运行期需要以数据形式携带角色时（配置、日志字段）使用本枚举；编译期已知角色时
///   应使用标记类型 [`Acceptor`] / [`Connector`]，让返回值形状由类型系统决定。
///
/// ## 契约（What）
/// - 名称、别名、解析与 serde 行为与 [`BackendKind`] 对称，越界输入返回
///   [`SelectionError::UnknownRole`]。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RoleKind {
    /// 监听并接受入站连接。
    Acceptor,
    /// 单条出站或已接受的连接。
    Connector,
}

impl RoleKind {
    /// 全部角色，顺序与分派表的行一致。
    pub const ALL: [RoleKind; 2] = [RoleKind::Acceptor, RoleKind::Connector];

    /// 返回稳定名称。
    pub const fn as_str(self) -> &'static str {
        match self {
            RoleKind::Acceptor => "acceptor",
            RoleKind::Connector => "connector",
        }
    }
}

impl fmt::Display for RoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleKind {
    type Err = SelectionError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "acceptor" | "server" | "listener" => Ok(RoleKind::Acceptor),
            "connector" | "client" => Ok(RoleKind::Connector),
            _ => Err(SelectionError::unknown_role(raw)),
        }
    }
}

impl Serialize for RoleKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RoleKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

mod sealed {
    pub trait Sealed {}
}

/// 编译期角色：把角色映射到端点形状。
///
/// # 教案级注释
///
/// ## 意图（Why）
/// - 让 `EndpointFactory<Acceptor>` 只能产出 [`ListeningEndpoint`]，
///   `EndpointFactory<Connector>` 只能产出 [`ConnectionEndpoint`]，调用点无需运行期转换；
/// - trait 被封闭（sealed），角色集合与 [`RoleKind`] 一一对应，外部无法追加第三种角色。
///
/// ## 契约（What）
/// - `KIND`：对应的运行期角色标签；
/// - `Shape`：该角色的端点形状；
/// - `unbound`：按后端分派出一个全新、未绑定的端点，不做任何系统调用。
pub trait Role: sealed::Sealed + Send + Sync + 'static {
    /// 运行期角色标签。
    const KIND: RoleKind;

    /// 该角色产出的端点形状。
    type Shape: Endpoint;

    /// 按后端构造一个未绑定端点。
    fn unbound(backend: BackendKind) -> Self::Shape;
}

/// 监听角色的标记类型。
#[derive(Clone, Copy, Debug)]
pub enum Acceptor {}

/// 连接角色的标记类型。
#[derive(Clone, Copy, Debug)]
pub enum Connector {}

impl sealed::Sealed for Acceptor {}
impl sealed::Sealed for Connector {}

impl Role for Acceptor {
    const KIND: RoleKind = RoleKind::Acceptor;
    type Shape = ListeningEndpoint;

    fn unbound(backend: BackendKind) -> ListeningEndpoint {
        ListeningEndpoint::unbound(backend)
    }
}

impl Role for Connector {
    const KIND: RoleKind = RoleKind::Connector;
    type Shape = ConnectionEndpoint;

    fn unbound(backend: BackendKind) -> ConnectionEndpoint {
        ConnectionEndpoint::unbound(backend)
    }
}
