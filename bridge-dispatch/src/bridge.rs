//! 阻塞桥接（BlockingBridge）
//!
//! 为调用方提供“发送请求并等待应答”的能力：
//! - 同步应答者在分发过程中直接给出非空应答时，立即返回；
//! - 否则应答稍后以 `"<命名空间>:Reply"` 消息（携带 `replyId` 与 `value`）到达，
//!   同步路径通过逐步泵送运行时队列等待，异步路径挂起等待应答槽。
//!
//! 每次泵送只执行一个工作单元，并在每一步之间检查应答槽。
//!
use crate::config::BridgeConfig;
use crate::dispatcher::Dispatcher;
use crate::error::{BridgeError, BridgeResult};
use crate::listener::EventListener;
use crate::message::NamedMessage;
use crate::reply::ReplySlot;
use crate::runtime::RuntimeQueue;
use bon::Builder;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

pub const REPLY_ID_KEY: &str = "replyId";
pub const REPLY_VALUE_KEY: &str = "value";

/// 应答值的文本形式：字符串原样返回，null 为空，其余序列化为 JSON
pub fn reply_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// 挂起中的请求，同时作为应答消息的监听器注册到分发器
#[derive(Default)]
pub struct PendingReplies {
    slots: DashMap<String, Arc<ReplySlot>>,
}

impl PendingReplies {
    fn insert(&self, slot: Arc<ReplySlot>) {
        self.slots.insert(slot.id().to_string(), slot);
    }

    fn remove(&self, reply_id: &str) {
        self.slots.remove(reply_id);
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// 写入应答；未知或已完成的 id 会被丢弃并返回错误
    pub fn complete(&self, reply_id: &str, value: impl Into<String>) -> BridgeResult<()> {
        let Some(slot) = self.slots.get(reply_id).map(|s| Arc::clone(s.value())) else {
            warn!(reply_id, "bridge: discarding reply for unknown request");
            return Err(BridgeError::ReplyRejected {
                reply_id: reply_id.to_string(),
                reason: "unknown or already resolved request".to_string(),
            });
        };
        slot.deliver(value)
    }
}

impl EventListener for PendingReplies {
    fn listener_name(&self) -> &str {
        "blocking-bridge"
    }

    fn handle_message(&self, event: &str, message: &Value) -> anyhow::Result<()> {
        let Some(reply_id) = message.get(REPLY_ID_KEY).and_then(Value::as_str) else {
            warn!(event, "bridge: reply message without replyId");
            return Ok(());
        };
        let value = message.get(REPLY_VALUE_KEY).map(reply_text).unwrap_or_default();
        // 拒绝已记录在日志中，不作为监听器故障上报
        let _ = self.complete(reply_id, value);
        Ok(())
    }
}

#[derive(Builder)]
pub struct BlockingBridge {
    dispatcher: Arc<Dispatcher>,
    runtime: Arc<dyn RuntimeQueue>,
    #[builder(default)]
    config: BridgeConfig,
    #[builder(skip)]
    pending: Arc<PendingReplies>,
    /// 已接入应答路由的应答类型
    #[builder(skip)]
    routes: DashMap<String, ()>,
}

impl BlockingBridge {
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn pending(&self) -> &Arc<PendingReplies> {
        &self.pending
    }

    /// 请求类型对应的应答类型：命名空间（最后一个 `:` 之前的部分）加后缀，
    /// 没有命名空间时直接加后缀（`Prompt:Show` -> `Prompt:Reply`，`Compute` -> `Compute:Reply`）
    pub fn reply_type(&self, event_type: &str) -> String {
        let namespace = event_type
            .rsplit_once(':')
            .map_or(event_type, |(namespace, _)| namespace);
        format!("{namespace}{}", self.config.reply_suffix)
    }

    /// 发送请求并逐步泵送运行时队列，直到应答到达
    pub fn request(&self, event_type: &str, payload: Value) -> BridgeResult<String> {
        let (slot, sync_reply) = self.submit(event_type, payload);
        if let Some(reply) = sync_reply {
            return Ok(reply);
        }

        let mut steps = 0usize;
        let outcome = loop {
            if let Some(value) = slot.try_take() {
                break Ok(value);
            }
            if self.config.max_pump_steps.is_some_and(|max| steps >= max) {
                break Err(BridgeError::NotDelivered {
                    event: event_type.to_string(),
                    steps,
                });
            }
            // 空闲轮询同样计入步数，上限总能终止等待
            steps += 1;
            if !self.runtime.process_next_event() {
                // 队列空闲，应答可能由其他线程写入
                std::thread::yield_now();
            }
        };
        debug!(event = event_type, steps, "bridge: request finished");
        self.pending.remove(slot.id());
        outcome
    }

    /// 发送请求并异步等待应答，不泵送运行时
    pub async fn request_async(&self, event_type: &str, payload: Value) -> BridgeResult<String> {
        let (slot, sync_reply) = self.submit(event_type, payload);
        if let Some(reply) = sync_reply {
            return Ok(reply);
        }

        let outcome = match self.config.reply_timeout {
            Some(limit) => tokio::time::timeout(limit, slot.recv())
                .await
                .map_err(|_| BridgeError::Timeout {
                    event: event_type.to_string(),
                }),
            None => Ok(slot.recv().await),
        };
        self.pending.remove(slot.id());
        outcome
    }

    /// 直接完成一个挂起的请求
    pub fn complete(&self, reply_id: &str, value: impl Into<String>) -> BridgeResult<()> {
        self.pending.complete(reply_id, value)
    }

    /// 分配应答槽并分发请求；同步应答非空时直接返回
    fn submit(&self, event_type: &str, payload: Value) -> (Arc<ReplySlot>, Option<String>) {
        self.ensure_reply_route(event_type);

        let slot = Arc::new(ReplySlot::new(Uuid::new_v4().to_string()));
        self.pending.insert(slot.clone());

        let message = NamedMessage::new(event_type, payload).with_field(REPLY_ID_KEY, json!(slot.id()));
        let report = self.dispatcher.dispatch_message(&message);
        if report.has_reply() {
            self.pending.remove(slot.id());
            return (slot, Some(report.reply));
        }
        (slot, None)
    }

    fn ensure_reply_route(&self, event_type: &str) {
        let reply_type = self.reply_type(event_type);
        if let Entry::Vacant(entry) = self.routes.entry(reply_type) {
            self.dispatcher
                .register_listener(entry.key(), self.pending.clone());
            entry.insert(());
        }
    }
}

impl Drop for BlockingBridge {
    fn drop(&mut self) {
        for route in self.routes.iter() {
            self.dispatcher
                .unregister_listener(route.key(), &self.pending);
        }
    }
}
