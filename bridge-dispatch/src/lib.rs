//! 命名消息分发与阻塞桥接
//!
//! - `registry`：按事件名保存监听器，写时复制，快照迭代不受并发修改影响；
//! - `dispatcher`：解析 `{ "type": ... }` 消息，按注册顺序通知监听器并收集同步应答；
//! - `bridge`：发送请求并等待应答（泵送运行时队列，或异步等待）；
//! - `prompt`：提示框应答者，演示同步/异步两种应答方式。
//!
pub mod bridge;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod listener;
pub mod message;
pub mod prompt;
pub mod registry;
pub mod reply;
pub mod runtime;

pub use bridge::BlockingBridge;
pub use config::{BridgeConfig, DispatcherConfig, ResponderPolicy};
pub use dispatcher::{DispatchReport, Dispatcher};
pub use error::{BridgeError, BridgeResult, ProtocolViolation};
pub use listener::{EventListener, EventResponder, FnListener, FnResponder};
pub use message::NamedMessage;
pub use registry::{ListenerHandle, ListenerRegistry, ListenerSnapshot};
pub use reply::ReplySlot;
pub use runtime::{InMemoryRuntime, RuntimeQueue};
