use crate::{backend::BackendKind, role::RoleKind};
use std::{fmt, net::SocketAddr};

/// 端点生命周期中由本 crate 可观测的状态。
///
/// 绑定、监听、建连都由下游协作者完成，本 crate 只区分“尚未打开”与“已被调用方关闭”。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EndpointState {
    /// 刚构造完成，未绑定、未连接，也未注册到任何反应器。
    Unbound,
    /// 调用方已关闭该端点。
    Closed,
}

/// 所有端点共享的只读视图与关闭能力。
///
/// # 教案级注释
///
/// ## 意图（Why）
/// - 引导程序与反应器需要在不关心具体后端的前提下读取端点的后端/角色标签，
///   并能在放弃使用时显式关闭它；
/// - 六个具体类型、两个角色形状枚举与 [`AnyEndpoint`] 都实现本 trait，调用方可以任选粒度。
///
/// ## 契约（What）
/// - `backend`/`role`：构造时固定，之后永不改变；
/// - `state`：新端点为 [`EndpointState::Unbound`]；
/// - `local_addr`：本 crate 从不绑定端点，因此始终为 `None`，绑定后的地址由下游协作者提供；
/// - `close`：首次调用把状态切换为 [`EndpointState::Closed`] 并返回 `true`，
///   重复调用无副作用并返回 `false`；只影响当前端点本身。
pub trait Endpoint: fmt::Debug + Send + Sync + 'static {
    /// 端点使用的多路复用后端。
    fn backend(&self) -> BackendKind;

    /// 端点角色。
    fn role(&self) -> RoleKind;

    /// 当前状态。
    fn state(&self) -> EndpointState;

    /// 已绑定的本地地址；未绑定的端点返回 `None`。
    fn local_addr(&self) -> Option<SocketAddr>;

    /// 关闭端点，返回本次调用是否真正改变了状态。
    fn close(&mut self) -> bool;

    /// 端点是否尚未关闭。
    fn is_open(&self) -> bool {
        self.state() != EndpointState::Closed
    }
}

macro_rules! concrete_endpoint {
    ($(#[$meta:meta])* $name:ident => $backend:ident, $role:ident) => {
        $(#[$meta])*
        #[derive(Debug, PartialEq, Eq)]
        pub struct $name {
            state: EndpointState,
        }

        impl $name {
            /// 构造一个未绑定的端点。
            pub const fn new() -> Self {
                Self {
                    state: EndpointState::Unbound,
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Endpoint for $name {
            fn backend(&self) -> BackendKind {
                BackendKind::$backend
            }

            fn role(&self) -> RoleKind {
                RoleKind::$role
            }

            fn state(&self) -> EndpointState {
                self.state
            }

            fn local_addr(&self) -> Option<SocketAddr> {
                None
            }

            fn close(&mut self) -> bool {
                let was_open = self.state != EndpointState::Closed;
                self.state = EndpointState::Closed;
                was_open
            }
        }
    };
}

concrete_endpoint!(
    /// 基于可移植就绪轮询的监听端点。
    PortableListener => Portable, Acceptor
);
concrete_endpoint!(
    /// 基于 epoll 的监听端点。
    EpollListener => NativeEpoll, Acceptor
);
concrete_endpoint!(
    /// 基于 kqueue 的监听端点。
    KqueueListener => NativeKqueue, Acceptor
);
concrete_endpoint!(
    /// 基于可移植就绪轮询的连接端点。
    PortableConnection => Portable, Connector
);
concrete_endpoint!(
    /// 基于 epoll 的连接端点。
    EpollConnection => NativeEpoll, Connector
);
concrete_endpoint!(
    /// 基于 kqueue 的连接端点。
    KqueueConnection => NativeKqueue, Connector
);

/// 监听形状的端点：后端被封装在变体内部，不泄漏到调用方的类型签名。
///
/// # 教案级注释
///
/// ## 意图（Why）
/// - `EndpointFactory<Acceptor>` 的返回类型固定为本枚举，调用方拿到的永远是“能监听的东西”，
///   而具体由哪种多路复用机制支撑只在需要时通过 `match` 或 [`Endpoint::backend`] 查看。
///
/// ## 契约（What）
/// - [`ListeningEndpoint::unbound`] 即分派表中 `Acceptor` 一行：每个后端恰好对应一个变体；
/// - 新增后端时在此处补一个变体与一条 `match` 分支，编译器会指出其余遗漏。
#[derive(Debug, PartialEq, Eq)]
pub enum ListeningEndpoint {
    Portable(PortableListener),
    NativeEpoll(EpollListener),
    NativeKqueue(KqueueListener),
}

impl ListeningEndpoint {
    /// 按后端构造一个未绑定的监听端点。
    pub const fn unbound(backend: BackendKind) -> Self {
        match backend {
            BackendKind::Portable => Self::Portable(PortableListener::new()),
            BackendKind::NativeEpoll => Self::NativeEpoll(EpollListener::new()),
            BackendKind::NativeKqueue => Self::NativeKqueue(KqueueListener::new()),
        }
    }

    fn inner(&self) -> &dyn Endpoint {
        match self {
            Self::Portable(endpoint) => endpoint,
            Self::NativeEpoll(endpoint) => endpoint,
            Self::NativeKqueue(endpoint) => endpoint,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Endpoint {
        match self {
            Self::Portable(endpoint) => endpoint,
            Self::NativeEpoll(endpoint) => endpoint,
            Self::NativeKqueue(endpoint) => endpoint,
        }
    }
}

/// 连接形状的端点，与 [`ListeningEndpoint`] 对称，对应分派表中 `Connector` 一行。
#[derive(Debug, PartialEq, Eq)]
pub enum ConnectionEndpoint {
    Portable(PortableConnection),
    NativeEpoll(EpollConnection),
    NativeKqueue(KqueueConnection),
}

impl ConnectionEndpoint {
    /// 按后端构造一个未连接的连接端点。
    pub const fn unbound(backend: BackendKind) -> Self {
        match backend {
            BackendKind::Portable => Self::Portable(PortableConnection::new()),
            BackendKind::NativeEpoll => Self::NativeEpoll(EpollConnection::new()),
            BackendKind::NativeKqueue => Self::NativeKqueue(KqueueConnection::new()),
        }
    }

    fn inner(&self) -> &dyn Endpoint {
        match self {
            Self::Portable(endpoint) => endpoint,
            Self::NativeEpoll(endpoint) => endpoint,
            Self::NativeKqueue(endpoint) => endpoint,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Endpoint {
        match self {
            Self::Portable(endpoint) => endpoint,
            Self::NativeEpoll(endpoint) => endpoint,
            Self::NativeKqueue(endpoint) => endpoint,
        }
    }
}

/// 角色在运行期才确定时的端点（例如由配置文本选出）。
#[derive(Debug, PartialEq, Eq)]
pub enum AnyEndpoint {
    Listening(ListeningEndpoint),
    Connection(ConnectionEndpoint),
}

impl AnyEndpoint {
    /// 取出监听端点；角色不符时原样返回。
    pub fn into_listening(self) -> Result<ListeningEndpoint, Self> {
        match self {
            Self::Listening(endpoint) => Ok(endpoint),
            other => Err(other),
        }
    }

    /// 取出连接端点；角色不符时原样返回。
    pub fn into_connection(self) -> Result<ConnectionEndpoint, Self> {
        match self {
            Self::Connection(endpoint) => Ok(endpoint),
            other => Err(other),
        }
    }

    fn inner(&self) -> &dyn Endpoint {
        match self {
            Self::Listening(endpoint) => endpoint,
            Self::Connection(endpoint) => endpoint,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Endpoint {
        match self {
            Self::Listening(endpoint) => endpoint,
            Self::Connection(endpoint) => endpoint,
        }
    }
}

impl From<ListeningEndpoint> for AnyEndpoint {
    fn from(endpoint: ListeningEndpoint) -> Self {
        Self::Listening(endpoint)
    }
}

impl From<ConnectionEndpoint> for AnyEndpoint {
    fn from(endpoint: ConnectionEndpoint) -> Self {
        Self::Connection(endpoint)
    }
}

macro_rules! delegate_endpoint {
    ($($name:ty),+) => {
        $(
            impl Endpoint for $name {
                fn backend(&self) -> BackendKind {
                    self.inner().backend()
                }

                fn role(&self) -> RoleKind {
                    self.inner().role()
                }

                fn state(&self) -> EndpointState {
                    self.inner().state()
                }

                fn local_addr(&self) -> Option<SocketAddr> {
                    self.inner().local_addr()
                }

                fn close(&mut self) -> bool {
                    self.inner_mut().close()
                }
            }
        )+
    };
}

delegate_endpoint!(ListeningEndpoint, ConnectionEndpoint, AnyEndpoint);
