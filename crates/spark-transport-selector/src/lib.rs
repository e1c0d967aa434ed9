#![deny(unsafe_code)]
#![doc = r#"
# spark-transport-selector

## 设计动机（Why）
- **定位**：传输引导程序需要按“多路复用后端 × 端点角色”挑选正确的端点实现；
  本 crate 把这张 3 × 2 的决策表固化为封闭枚举与穷尽 `match`，由编译器保证
  六个合法格子全部覆盖、不存在第七个格子。
- **架构角色**：叶子组件。引导程序持有预置工厂并在需要时调用 `produce`；
  反应器与连接管理层接收产出的端点，负责绑定/监听/建连、注册就绪通知以及最终关闭。
- **设计理念**：角色决定返回值形状（监听形状 vs. 连接形状），后端只作为值保存，
  不泄漏到调用点的类型签名中。

## 核心契约（What）
- [`EndpointFactory<Acceptor>`](EndpointFactory) 产出 [`ListeningEndpoint`]，
  [`EndpointFactory<Connector>`](EndpointFactory) 产出 [`ConnectionEndpoint`]；
  角色在运行期才确定时使用 [`DynEndpointFactory`]，产出 [`AnyEndpoint`]；
- `produce` 同步、无阻塞、不做系统调用、不触碰全局状态，每次返回一个全新且由调用方独占的端点；
- 六个预置工厂以普通常量提供：[`PORTABLE_ACCEPTOR`]、[`NATIVE_EPOLL_ACCEPTOR`]、
  [`NATIVE_KQUEUE_ACCEPTOR`]、[`PORTABLE_CONNECTOR`]、[`NATIVE_EPOLL_CONNECTOR`]、
  [`NATIVE_KQUEUE_CONNECTOR`]。

## 实现策略（How）
- 第一级分派按角色：编译期由 [`Role`] 标记类型完成，运行期由 [`RoleKind`] 的 `match` 完成；
- 第二级分派按后端：[`ListeningEndpoint::unbound`] 与 [`ConnectionEndpoint::unbound`]
  各自对 [`BackendKind`] 做穷尽 `match`；
- 开放值空间（配置文本）只在 [`config`] 模块进入封闭枚举，越界值以
  [`SelectionError`] 报告出错的轴与原始值。

## 风险与考量（Trade-offs）
- **可用性校验**：预置常量不校验宿主平台是否提供该后端；`checked` 构造器与配置边界会校验，
  并以 [`BackendUnavailable`] 拒绝；
- **扩展**：新增后端只需新增一个 [`BackendKind`] 变体，并在两个角色的分派表中各补一行，
  使用既有预置常量的调用点无需改动。
"#]

pub mod backend;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod factory;
pub mod role;

pub use backend::BackendKind;
pub use config::SelectionConfig;
pub use endpoint::{
    AnyEndpoint, ConnectionEndpoint, Endpoint, EndpointState, EpollConnection, EpollListener,
    KqueueConnection, KqueueListener, ListeningEndpoint, PortableConnection, PortableListener,
};
pub use error::{BackendUnavailable, ConfigError, SelectionError};
pub use factory::{
    DynEndpointFactory, EndpointFactory, MakeEndpoint, NATIVE_EPOLL_ACCEPTOR,
    NATIVE_EPOLL_CONNECTOR, NATIVE_KQUEUE_ACCEPTOR, NATIVE_KQUEUE_CONNECTOR, PORTABLE_ACCEPTOR,
    PORTABLE_CONNECTOR,
};
pub use role::{Acceptor, Connector, Role, RoleKind};
