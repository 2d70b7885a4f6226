//! 桥接层错误定义
//!
//! 分发路径上的错误都在本地恢复并记录日志，不会以错误形式返回给 `dispatch` 的调用方；
//! 这里的类型用于内部传递、`DispatchReport` 诊断与阻塞桥接的返回值。
//!
use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("serialization error: {source}")]
    Serde {
        #[from]
        source: serde_json::Error,
    },

    #[error("malformed message: {reason}")]
    MalformedMessage { reason: String },

    #[error("listener fault: event={event}, listener={listener}, reason={reason}")]
    ListenerFault {
        event: String,
        listener: String,
        reason: String,
    },

    #[error("reply rejected: reply_id={reply_id}, reason={reason}")]
    ReplyRejected { reply_id: String, reason: String },

    #[error("reply not delivered after {steps} pump steps: event={event}")]
    NotDelivered { event: String, steps: usize },

    #[error("reply timed out: event={event}")]
    Timeout { event: String },
}

impl BridgeError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        BridgeError::MalformedMessage {
            reason: reason.into(),
        }
    }
}

/// 协议违例：记录在分发报告中，不会中断分发
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolViolation {
    /// 同一条消息收到两个非空应答
    DuplicateResponse {
        event: String,
        kept: String,
        discarded: String,
    },
}

pub type BridgeResult<T> = Result<T, BridgeError>;
