//! 事件编码错误定义
//!
//! - `EnvelopeUnavailable`：构造前置条件不满足，调用方收到“未产生事件”，可择机重试；
//! - `EventError`：稳定编号表之间的转换错误。
//!
use thiserror::Error;

/// 无法产生事件信封（非致命）
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeUnavailable {
    /// 渲染表面尚未就绪，无法完成坐标变换
    #[error("rendering surface is not ready for coordinate transform")]
    SurfaceNotReady,

    /// 运行时没有对应的传感器类型
    #[error("unsupported sensor type: {0}")]
    UnsupportedSensor(i32),
}

/// 编号表转换错误
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    #[error("unknown event kind value: {0}")]
    UnknownKind(i32),

    #[error("unknown {table} value: {value}")]
    UnknownValue { table: &'static str, value: i32 },
}

pub type EnvelopeResult<T> = Result<T, EnvelopeUnavailable>;
