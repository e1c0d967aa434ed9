use crate::error::{BackendUnavailable, SelectionError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

/// 端点所依赖的 I/O 多路复用机制。
///
/// # 教案级注释
///
/// ## 意图（Why）
/// - 以封闭枚举表达“可移植就绪轮询 / Linux epoll / BSD kqueue”三选一，
///   使分派表的穷尽性由编译器而非运行期断言保证；
/// - 工厂在构造时固定该值，此后产出的每个端点都携带同一后端标签。
///
/// ## 契约（What）
/// - `as_str` 返回稳定的小写名称（`portable`/`epoll`/`kqueue`），可用于日志与指标标签；
/// - `FromStr` 忽略大小写与首尾空白，并接受若干别名（如 `nio`、`native-epoll`）；
///   越界输入返回 [`SelectionError::UnknownBackend`]，错误中保留原始文本；
/// - serde 的读写都经由上述名称，配置文件中的越界值与 `FromStr` 报同样的错误。
///
/// ## 注意事项（Trade-offs）
/// - 新增后端只需新增一个变体，并在每个角色的分派表中补一行；编译器会指出所有遗漏的 `match`；
/// - 已有调用点若只使用预置工厂常量，则无需任何修改。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BackendKind {
    /// 可移植的就绪轮询（poll/select 一类机制）。
    Portable,
    /// Linux 原生 epoll。
    NativeEpoll,
    /// BSD/macOS 原生 kqueue。
    NativeKqueue,
}

impl BackendKind {
    /// 全部后端，顺序与分派表的列一致。
    pub const ALL: [BackendKind; 3] = [
        BackendKind::Portable,
        BackendKind::NativeEpoll,
        BackendKind::NativeKqueue,
    ];

    /// 返回稳定名称。
    pub const fn as_str(self) -> &'static str {
        match self {
            BackendKind::Portable => "portable",
            BackendKind::NativeEpoll => "epoll",
            BackendKind::NativeKqueue => "kqueue",
        }
    }

    /// 判断后端在编译目标平台上是否存在。
    ///
    /// 可用性按编译目标静态判定，不做任何系统调用。
    pub const fn is_available(self) -> bool {
        match self {
            BackendKind::Portable => true,
            BackendKind::NativeEpoll => cfg!(any(target_os = "linux", target_os = "android")),
            BackendKind::NativeKqueue => cfg!(any(
                target_os = "macos",
                target_os = "ios",
                target_os = "freebsd",
                target_os = "netbsd",
                target_os = "openbsd",
                target_os = "dragonfly"
            )),
        }
    }

    /// 校验可用性，不可用时返回 [`BackendUnavailable`]。
    pub fn ensure_available(self) -> Result<Self, BackendUnavailable> {
        if self.is_available() {
            Ok(self)
        } else {
            Err(BackendUnavailable {
                backend: self,
                host_os: std::env::consts::OS,
            })
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = SelectionError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "portable" | "nio" => Ok(BackendKind::Portable),
            "epoll" | "native-epoll" | "native_epoll" => Ok(BackendKind::NativeEpoll),
            "kqueue" | "native-kqueue" | "native_kqueue" => Ok(BackendKind::NativeKqueue),
            _ => Err(SelectionError::unknown_backend(raw)),
        }
    }
}

impl Serialize for BackendKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BackendKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for backend in BackendKind::ALL {
            assert_eq!(backend.as_str().parse::<BackendKind>(), Ok(backend));
            assert_eq!(backend.to_string(), backend.as_str());
        }
    }

    #[test]
    fn aliases_are_accepted() {
        assert_eq!("NIO".parse(), Ok(BackendKind::Portable));
        assert_eq!(" native_epoll ".parse(), Ok(BackendKind::NativeEpoll));
        assert_eq!("Native-KQueue".parse(), Ok(BackendKind::NativeKqueue));
    }

    #[test]
    fn unknown_backend_keeps_raw_text() {
        let err = " iocp ".parse::<BackendKind>().unwrap_err();
        assert_eq!(err, SelectionError::unknown_backend(" iocp "));
        assert_eq!(err.axis(), "backend");
    }

    #[test]
    fn portable_is_available_everywhere() {
        assert!(BackendKind::Portable.is_available());
        assert_eq!(
            BackendKind::Portable.ensure_available(),
            Ok(BackendKind::Portable)
        );
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn linux_offers_epoll_but_not_kqueue() {
        assert!(BackendKind::NativeEpoll.ensure_available().is_ok());
        let err = BackendKind::NativeKqueue.ensure_available().unwrap_err();
        assert_eq!(err.backend, BackendKind::NativeKqueue);
        assert_eq!(err.host_os, "linux");
    }

    #[cfg(target_os = "macos")]
    #[test]
    fn macos_offers_kqueue_but_not_epoll() {
        assert!(BackendKind::NativeKqueue.ensure_available().is_ok());
        assert!(BackendKind::NativeEpoll.ensure_available().is_err());
    }

    #[derive(Debug, serde::Deserialize)]
    struct Selected {
        backend: BackendKind,
    }

    #[test]
    fn toml_values_go_through_from_str() {
        let selected: Selected = toml::from_str("backend = \"NIO\"").expect("alias accepted");
        assert_eq!(selected.backend, BackendKind::Portable);

        let err = toml::from_str::<Selected>("backend = \"iocp\"").unwrap_err();
        assert!(
            err.to_string().contains("unknown transport backend `iocp`"),
            "unexpected message: {err}"
        );
    }
}
