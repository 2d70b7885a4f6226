//! 提示框应答者（PromptResponder）
//!
//! `Prompt:Show` 消息到达后，提示框被排入 UI 侧执行器，由 `PromptPresenter` 给出结果：
//! - 同步模式：应答阶段泵送运行时队列，直到 UI 侧产出结果，作为同步应答返回；
//! - 异步模式（消息带 `"async": true`）：不给同步应答，结果产出后以
//!   `Prompt:Reply` 广播信封发送给运行时，携带原请求的 `replyId`。
//!
use crate::bridge::{REPLY_ID_KEY, REPLY_VALUE_KEY, reply_text};
use crate::listener::{EventListener, EventResponder};
use crate::runtime::{InMemoryRuntime, RuntimeQueue};
use bon::Builder;
use bridge_event::EventEnvelope;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::debug;

pub const PROMPT_SHOW: &str = "Prompt:Show";
pub const PROMPT_REPLY: &str = "Prompt:Reply";

/// 在 UI 侧展示提示框并返回用户的选择
pub trait PromptPresenter: Send + Sync {
    fn present(&self, prompt: &Value) -> Value;
}

impl<F> PromptPresenter for F
where
    F: Fn(&Value) -> Value + Send + Sync,
{
    fn present(&self, prompt: &Value) -> Value {
        self(prompt)
    }
}

#[derive(Builder)]
pub struct PromptResponder {
    /// UI 侧执行器
    ui: Arc<InMemoryRuntime>,
    /// 运行时队列：同步模式下泵送，异步模式下接收应答信封
    runtime: Arc<dyn RuntimeQueue>,
    presenter: Arc<dyn PromptPresenter>,
    /// 同步结果，按请求分开存放
    #[builder(skip)]
    answers: Arc<DashMap<String, VecDeque<Value>>>,
}

fn is_async(message: &Value) -> bool {
    message.get("async").and_then(Value::as_bool).unwrap_or(false)
}

/// 同步结果的归属：优先使用 `replyId`，否则以消息全文区分
fn answer_key(message: &Value) -> String {
    match message.get(REPLY_ID_KEY).and_then(Value::as_str) {
        Some(id) => id.to_string(),
        None => message.to_string(),
    }
}

impl EventListener for PromptResponder {
    fn listener_name(&self) -> &str {
        "prompt"
    }

    fn handle_message(&self, event: &str, message: &Value) -> anyhow::Result<()> {
        if event != PROMPT_SHOW {
            return Ok(());
        }
        let presenter = self.presenter.clone();
        let prompt = message.clone();

        if is_async(message) {
            let runtime = self.runtime.clone();
            self.ui.post(move || {
                let result = presenter.present(&prompt);
                let data = json!({
                    (REPLY_ID_KEY): prompt.get(REPLY_ID_KEY).cloned().unwrap_or(Value::Null),
                    (REPLY_VALUE_KEY): result,
                });
                debug!("prompt: sending async reply");
                runtime.send_event(EventEnvelope::broadcast(PROMPT_REPLY, Some(data.to_string())));
            });
        } else {
            let answers = self.answers.clone();
            let key = answer_key(message);
            self.ui.post(move || {
                let result = presenter.present(&prompt);
                answers.entry(key).or_default().push_back(result);
            });
        }
        Ok(())
    }

    fn as_responder(&self) -> Option<&dyn EventResponder> {
        Some(self)
    }
}

impl PromptResponder {
    fn take_answer(&self, key: &str) -> Option<Value> {
        match self.answers.entry(key.to_string()) {
            Entry::Occupied(mut e) => {
                let answer = e.get_mut().pop_front();
                if e.get().is_empty() {
                    e.remove();
                }
                answer
            }
            Entry::Vacant(_) => None,
        }
    }
}

impl EventResponder for PromptResponder {
    fn response(&self, message: &Value) -> Option<String> {
        if is_async(message) {
            return None;
        }
        let key = answer_key(message);
        loop {
            if let Some(answer) = self.take_answer(&key) {
                return Some(reply_text(&answer));
            }
            if !self.runtime.process_next_event() {
                std::thread::yield_now();
            }
        }
    }
}
