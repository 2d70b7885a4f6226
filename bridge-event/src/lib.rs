//! 运行时桥接的事件编码层（bridge-event）
//!
//! 将异构的 UI/平台事件（输入、传感器、生命周期、输入法、网络等）
//! 编码为统一的、可跨边界传递的事件信封：
//! - 稳定编号表（`kind`）：事件种类与附属枚举的数值，只允许追加；
//! - 事件信封（`envelope`）：不可变的带标签记录，变体决定种类；
//! - 输入与传感器（`input`、`sensor`、`ime`、`viewport`）：从原始事件读取载荷；
//! - 线格式（`wire`）：原生边界消费的扁平记录。
//!
//! 构造过程只读取原始事件，不修改也不保留；前置条件不满足（例如渲染表面尚未就绪）时
//! 返回 `EnvelopeUnavailable`，由调用方决定是否稍后重试。
//!
pub mod context;
pub mod envelope;
pub mod error;
pub mod geometry;
pub mod ime;
pub mod input;
pub mod kind;
pub mod sensor;
pub mod viewport;
pub mod wire;

pub use envelope::{EventEnvelope, EventPayload, LoadMode};
pub use error::{EnvelopeUnavailable, EventError};
pub use kind::EventKind;
pub use wire::WireEvent;
