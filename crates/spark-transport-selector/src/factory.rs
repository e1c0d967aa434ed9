use crate::{
    backend::BackendKind,
    endpoint::{AnyEndpoint, ConnectionEndpoint, Endpoint, ListeningEndpoint},
    error::BackendUnavailable,
    role::{Acceptor, Connector, Role, RoleKind},
};
use std::{fmt, marker::PhantomData};

/// 产出端点的统一入口。
///
/// # 教案级注释
///
/// ## 意图（Why）
/// - 引导程序可以对“任何能产出端点的东西”编写泛型代码，而不关心它是编译期角色的
///   [`EndpointFactory`] 还是运行期角色的 [`DynEndpointFactory`]。
///
/// ## 契约（What）
/// - `produce` 每次调用都返回一个全新、未绑定、由调用方独占的端点；
/// - 不做系统调用、不阻塞、不触碰任何共享或全局状态，因此可在任意线程并发调用；
/// - 工厂不保留对已产出端点的任何引用。
pub trait MakeEndpoint: Send + Sync {
    /// 产出的端点类型。
    type Output: Endpoint;

    /// 构造一个新端点。
    fn produce(&self) -> Self::Output;
}

/// 角色在编译期确定的端点工厂。
///
/// # 教案级注释
///
/// ## 意图（Why）
/// - 以类型参数 `R` 固定角色，返回值形状随之确定：`Acceptor` 产出 [`ListeningEndpoint`]，
///   `Connector` 产出 [`ConnectionEndpoint`]；后端只作为值保存，不出现在返回类型中；
/// - 支持 `const` 构造，六个预置实例因此可以是普通常量，不需要惰性初始化。
///
/// ## 逻辑（How）
/// - 第一级分派（角色）由 `R` 在编译期完成；
/// - 第二级分派（后端）在 [`Role::unbound`] 内部以穷尽 `match` 完成。
///
/// ## 注意事项（Trade-offs）
/// - [`EndpointFactory::new`] 不校验宿主平台是否提供该后端（`const` 构造不能失败）；
///   需要在启动时尽早暴露平台不匹配的调用方应使用 [`EndpointFactory::checked`]。
pub struct EndpointFactory<R: Role> {
    backend: BackendKind,
    _role: PhantomData<fn() -> R>,
}

impl<R: Role> EndpointFactory<R> {
    /// 以给定后端构造工厂，不校验可用性。
    pub const fn new(backend: BackendKind) -> Self {
        Self {
            backend,
            _role: PhantomData,
        }
    }

    /// 以给定后端构造工厂，后端在宿主平台不可用时返回错误。
    pub fn checked(backend: BackendKind) -> Result<Self, BackendUnavailable> {
        let factory = Self::new(backend.ensure_available()?);
        log_factory_ready(backend, R::KIND);
        Ok(factory)
    }

    /// 工厂固定的后端。
    pub const fn backend(&self) -> BackendKind {
        self.backend
    }

    /// 工厂固定的角色。
    pub const fn role(&self) -> RoleKind {
        R::KIND
    }

    /// 构造一个新端点。
    ///
    /// 不记录日志，也不触碰任何全局状态。
    pub fn produce(&self) -> R::Shape {
        R::unbound(self.backend)
    }

    /// 擦除编译期角色，转换为运行期工厂。
    pub const fn erase(&self) -> DynEndpointFactory {
        DynEndpointFactory::new(self.backend, R::KIND)
    }
}

impl<R: Role> MakeEndpoint for EndpointFactory<R> {
    type Output = R::Shape;

    fn produce(&self) -> R::Shape {
        EndpointFactory::produce(self)
    }
}

// 手写实现：派生宏会为标记类型 `R` 追加多余的约束。
impl<R: Role> Clone for EndpointFactory<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: Role> Copy for EndpointFactory<R> {}

impl<R: Role> PartialEq for EndpointFactory<R> {
    fn eq(&self, other: &Self) -> bool {
        self.backend == other.backend
    }
}

impl<R: Role> Eq for EndpointFactory<R> {}

impl<R: Role> fmt::Debug for EndpointFactory<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointFactory")
            .field("backend", &self.backend)
            .field("role", &R::KIND)
            .finish()
    }
}

/// 角色在运行期确定的端点工厂，通常由配置边界构造。
///
/// # 教案级注释
///
/// ## 意图（Why）
/// - 当 (后端, 角色) 二元组来自配置文本时，角色无法提升到类型参数，此时用本类型承载，
///   产出 [`AnyEndpoint`]。
///
/// ## 逻辑（How）
/// - `produce` 先按 [`RoleKind`] 分派，再委托对应角色的按后端分派，六个合法格子
///   全部由穷尽 `match` 覆盖，不存在第七个格子。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DynEndpointFactory {
    backend: BackendKind,
    role: RoleKind,
}

impl DynEndpointFactory {
    /// 以给定 (后端, 角色) 构造工厂，不校验可用性。
    pub const fn new(backend: BackendKind, role: RoleKind) -> Self {
        Self { backend, role }
    }

    /// 以给定 (后端, 角色) 构造工厂，后端在宿主平台不可用时返回错误。
    pub fn checked(backend: BackendKind, role: RoleKind) -> Result<Self, BackendUnavailable> {
        let factory = Self::new(backend.ensure_available()?, role);
        log_factory_ready(backend, role);
        Ok(factory)
    }

    /// 工厂固定的后端。
    pub const fn backend(&self) -> BackendKind {
        self.backend
    }

    /// 工厂固定的角色。
    pub const fn role(&self) -> RoleKind {
        self.role
    }

    /// 构造一个新端点。
    pub fn produce(&self) -> AnyEndpoint {
        match self.role {
            RoleKind::Acceptor => AnyEndpoint::Listening(Acceptor::unbound(self.backend)),
            RoleKind::Connector => AnyEndpoint::Connection(Connector::unbound(self.backend)),
        }
    }
}

impl MakeEndpoint for DynEndpointFactory {
    type Output = AnyEndpoint;

    fn produce(&self) -> AnyEndpoint {
        DynEndpointFactory::produce(self)
    }
}

impl<R: Role> From<EndpointFactory<R>> for DynEndpointFactory {
    fn from(factory: EndpointFactory<R>) -> Self {
        factory.erase()
    }
}

/// 可移植后端的监听工厂。
pub const PORTABLE_ACCEPTOR: EndpointFactory<Acceptor> =
    EndpointFactory::new(BackendKind::Portable);
/// epoll 后端的监听工厂。
pub const NATIVE_EPOLL_ACCEPTOR: EndpointFactory<Acceptor> =
    EndpointFactory::new(BackendKind::NativeEpoll);
/// kqueue 后端的监听工厂。
pub const NATIVE_KQUEUE_ACCEPTOR: EndpointFactory<Acceptor> =
    EndpointFactory::new(BackendKind::NativeKqueue);

/// 可移植后端的连接工厂。
pub const PORTABLE_CONNECTOR: EndpointFactory<Connector> =
    EndpointFactory::new(BackendKind::Portable);
/// epoll 后端的连接工厂。
pub const NATIVE_EPOLL_CONNECTOR: EndpointFactory<Connector> =
    EndpointFactory::new(BackendKind::NativeEpoll);
/// kqueue 后端的连接工厂。
pub const NATIVE_KQUEUE_CONNECTOR: EndpointFactory<Connector> =
    EndpointFactory::new(BackendKind::NativeKqueue);

fn log_factory_ready(backend: BackendKind, role: RoleKind) {
    tracing::debug!(
        backend = backend.as_str(),
        role = role.as_str(),
        "transport endpoint factory ready"
    );
}

#[allow(dead_code)]
fn _assert_factories_are_shareable()
where
    EndpointFactory<Acceptor>: MakeEndpoint<Output = ListeningEndpoint> + Send + Sync + 'static,
    EndpointFactory<Connector>: MakeEndpoint<Output = ConnectionEndpoint> + Send + Sync + 'static,
    DynEndpointFactory: MakeEndpoint<Output = AnyEndpoint> + Send + Sync + 'static,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::EndpointState;
    use tracing_test::traced_test;

    #[test]
    fn prebuilt_factories_cover_the_matrix() {
        let acceptors = [
            (PORTABLE_ACCEPTOR, BackendKind::Portable),
            (NATIVE_EPOLL_ACCEPTOR, BackendKind::NativeEpoll),
            (NATIVE_KQUEUE_ACCEPTOR, BackendKind::NativeKqueue),
        ];
        for (factory, backend) in acceptors {
            assert_eq!(factory.backend(), backend);
            assert_eq!(factory.role(), RoleKind::Acceptor);
        }

        let connectors = [
            (PORTABLE_CONNECTOR, BackendKind::Portable),
            (NATIVE_EPOLL_CONNECTOR, BackendKind::NativeEpoll),
            (NATIVE_KQUEUE_CONNECTOR, BackendKind::NativeKqueue),
        ];
        for (factory, backend) in connectors {
            assert_eq!(factory.backend(), backend);
            assert_eq!(factory.role(), RoleKind::Connector);
        }
    }

    #[test]
    fn dyn_factory_dispatches_role_then_backend() {
        for role in RoleKind::ALL {
            for backend in BackendKind::ALL {
                let endpoint = DynEndpointFactory::new(backend, role).produce();
                assert_eq!(endpoint.backend(), backend);
                assert_eq!(endpoint.role(), role);
                assert_eq!(endpoint.state(), EndpointState::Unbound);
                match role {
                    RoleKind::Acceptor => assert!(matches!(endpoint, AnyEndpoint::Listening(_))),
                    RoleKind::Connector => assert!(matches!(endpoint, AnyEndpoint::Connection(_))),
                }
            }
        }
    }

    #[test]
    fn erase_keeps_both_axes() {
        let erased = DynEndpointFactory::from(NATIVE_EPOLL_CONNECTOR);
        assert_eq!(
            erased,
            DynEndpointFactory::new(BackendKind::NativeEpoll, RoleKind::Connector)
        );
    }

    #[test]
    fn checked_rejects_unavailable_backends() {
        for backend in BackendKind::ALL {
            let typed = EndpointFactory::<Acceptor>::checked(backend);
            let dynamic = DynEndpointFactory::checked(backend, RoleKind::Connector);
            assert_eq!(typed.is_ok(), backend.is_available());
            assert_eq!(dynamic.is_ok(), backend.is_available());
        }
    }

    #[test]
    fn debug_names_both_axes() {
        let rendered = format!("{:?}", PORTABLE_ACCEPTOR);
        assert!(rendered.contains("Portable"));
        assert!(rendered.contains("Acceptor"));
    }

    #[traced_test]
    #[test]
    fn produce_emits_no_events() {
        for _ in 0..3 {
            let _ = PORTABLE_ACCEPTOR.produce();
            let _ = DynEndpointFactory::new(BackendKind::Portable, RoleKind::Connector).produce();
        }
        assert!(!logs_contain("transport"));
    }

    #[traced_test]
    #[test]
    fn checked_construction_logs_once() {
        let factory = EndpointFactory::<Connector>::checked(BackendKind::Portable)
            .expect("portable is always available");
        assert!(logs_contain("transport endpoint factory ready"));
        let _ = factory.produce();
        logs_assert(|lines: &[&str]| {
            match lines
                .iter()
                .filter(|line| line.contains("transport endpoint factory ready"))
                .count()
            {
                1 => Ok(()),
                n => Err(format!("expected one factory event, found {n}")),
            }
        });
    }
}
