//! 事件监听器（EventListener）与应答能力（EventResponder）
//!
//! 监听器按事件名注册，收到通知后可以产生任意副作用；
//! 需要同步应答的监听器额外实现 `EventResponder`，并通过 `as_responder` 暴露该能力。
//!
use serde_json::Value;
use std::sync::Arc;

/// 事件监听器
pub trait EventListener: Send + Sync {
    /// 监听器名称（用于日志与故障定位）
    fn listener_name(&self) -> &str;

    /// 处理一条消息；返回错误只影响本监听器
    fn handle_message(&self, event: &str, message: &Value) -> anyhow::Result<()>;

    /// 可选的应答能力
    fn as_responder(&self) -> Option<&dyn EventResponder> {
        None
    }
}

/// 同步应答能力
pub trait EventResponder: Send + Sync {
    /// 在通知之后调用，为同一条消息给出应答；`None` 或空串表示不应答
    fn response(&self, message: &Value) -> Option<String>;
}

/// 以闭包实现的监听器
pub struct FnListener<F> {
    name: String,
    f: F,
}

impl<F> FnListener<F>
where
    F: Fn(&str, &Value) -> anyhow::Result<()> + Send + Sync + 'static,
{
    pub fn new(name: impl Into<String>, f: F) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            f,
        })
    }
}

impl<F> EventListener for FnListener<F>
where
    F: Fn(&str, &Value) -> anyhow::Result<()> + Send + Sync,
{
    fn listener_name(&self) -> &str {
        &self.name
    }

    fn handle_message(&self, event: &str, message: &Value) -> anyhow::Result<()> {
        (self.f)(event, message)
    }
}

/// 以闭包实现的应答器：通知为空操作，应答由闭包给出
pub struct FnResponder<F> {
    name: String,
    f: F,
}

impl<F> FnResponder<F>
where
    F: Fn(&Value) -> Option<String> + Send + Sync + 'static,
{
    pub fn new(name: impl Into<String>, f: F) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            f,
        })
    }
}

impl<F> EventListener for FnResponder<F>
where
    F: Fn(&Value) -> Option<String> + Send + Sync,
{
    fn listener_name(&self) -> &str {
        &self.name
    }

    fn handle_message(&self, _event: &str, _message: &Value) -> anyhow::Result<()> {
        Ok(())
    }

    fn as_responder(&self) -> Option<&dyn EventResponder> {
        Some(self)
    }
}

impl<F> EventResponder for FnResponder<F>
where
    F: Fn(&Value) -> Option<String> + Send + Sync,
{
    fn response(&self, message: &Value) -> Option<String> {
        (self.f)(message)
    }
}
