//! 分发器（Dispatcher）
//!
//! `dispatch(message) -> reply` 的完整流程：
//! 1. 解析消息得到 `type` 与载荷；解析失败记录日志并返回空应答；
//! 2. 取该类型的监听器快照；为空是正常情况（无人订阅），返回空应答；
//! 3. 按注册顺序依次通知每个监听器，单个监听器的错误/panic 被隔离并记录；
//! 4. 具备应答能力的监听器在通知后给出应答；出现两个非空应答时记为协议违例，
//!    按 `ResponderPolicy` 保留其一，绝不合并；
//! 5. 返回收集到的应答（可能为空）。
//!
//! 分发器本身不持有可变状态，全部委托给注册表；实例由组合根显式创建并注入。
//!
use crate::config::{DispatcherConfig, ResponderPolicy};
use crate::error::{BridgeError, ProtocolViolation};
use crate::listener::EventListener;
use crate::message::NamedMessage;
use crate::registry::{ListenerHandle, ListenerRegistry};
use bon::Builder;
use serde_json::Value;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error};

/// 一次分发的结果明细
#[derive(Debug, Default)]
pub struct DispatchReport {
    /// 收集到的应答；无应答时为空串
    pub reply: String,
    /// 成功处理通知的监听器数量
    pub delivered: usize,
    /// 各监听器的故障
    pub faults: Vec<BridgeError>,
    pub violations: Vec<ProtocolViolation>,
}

impl DispatchReport {
    pub fn has_reply(&self) -> bool {
        !self.reply.is_empty()
    }
}

#[derive(Builder)]
pub struct Dispatcher {
    #[builder(default = Arc::new(ListenerRegistry::new()))]
    registry: Arc<ListenerRegistry>,
    #[builder(default)]
    config: DispatcherConfig,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &Arc<ListenerRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    pub fn register_listener(&self, event: &str, listener: ListenerHandle) -> bool {
        self.registry.register(event, listener)
    }

    pub fn unregister_listener<L>(&self, event: &str, listener: &Arc<L>) -> bool
    where
        L: EventListener + ?Sized,
    {
        self.registry.unregister(event, listener)
    }

    /// 分发文本消息，返回应答（可能为空）
    pub fn dispatch(&self, raw: &str) -> String {
        match NamedMessage::parse(raw, &self.config.legacy_wrapper_key) {
            Ok(message) => self.dispatch_message(&message).reply,
            Err(err) => {
                error!(error = %err, "dispatch: malformed message");
                String::new()
            }
        }
    }

    /// 分发 JSON 消息，返回应答（可能为空）
    pub fn dispatch_value(&self, value: Value) -> String {
        match NamedMessage::from_value(value, &self.config.legacy_wrapper_key) {
            Ok(message) => self.dispatch_message(&message).reply,
            Err(err) => {
                error!(error = %err, "dispatch: malformed message");
                String::new()
            }
        }
    }

    /// 分发已解析的消息并返回明细
    pub fn dispatch_message(&self, message: &NamedMessage) -> DispatchReport {
        let event = message.event_type();
        let payload = message.payload();
        let listeners = self.registry.snapshot_for(event);

        let mut report = DispatchReport::default();
        if listeners.is_empty() {
            debug!(event, "dispatch: no listeners registered for event");
            return report;
        }

        let mut reply: Option<String> = None;
        for listener in &listeners {
            if let Err(fault) = Self::notify(listener.as_ref(), event, payload) {
                error!(error = %fault, "dispatch: listener failed");
                report.faults.push(fault);
                continue;
            }
            report.delivered += 1;

            let Some(responder) = listener.as_responder() else {
                continue;
            };
            let response = match Self::guard(|| responder.response(payload)) {
                Ok(response) => response,
                Err(reason) => {
                    let fault = Self::fault(listener.as_ref(), event, reason);
                    error!(error = %fault, "dispatch: responder failed");
                    report.faults.push(fault);
                    continue;
                }
            };
            let Some(response) = response.filter(|r| !r.is_empty()) else {
                continue;
            };

            reply = Some(match reply.take() {
                None => response,
                Some(previous) => self.resolve_conflict(event, previous, response, &mut report),
            });
        }

        report.reply = reply.unwrap_or_default();
        report
    }

    fn resolve_conflict(
        &self,
        event: &str,
        previous: String,
        incoming: String,
        report: &mut DispatchReport,
    ) -> String {
        let (kept, discarded) = match self.config.responder_policy {
            ResponderPolicy::LastWins => (incoming, previous),
            ResponderPolicy::FirstWins => (previous, incoming),
        };
        error!(
            event,
            policy = ?self.config.responder_policy,
            "dispatch: received two responses for message"
        );
        report.violations.push(ProtocolViolation::DuplicateResponse {
            event: event.to_string(),
            kept: kept.clone(),
            discarded,
        });
        kept
    }

    fn notify(listener: &dyn EventListener, event: &str, payload: &Value) -> Result<(), BridgeError> {
        match Self::guard(|| listener.handle_message(event, payload)) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(Self::fault(listener, event, format!("{err:#}"))),
            Err(reason) => Err(Self::fault(listener, event, reason)),
        }
    }

    fn fault(listener: &dyn EventListener, event: &str, reason: String) -> BridgeError {
        BridgeError::ListenerFault {
            event: event.to_string(),
            listener: listener.listener_name().to_string(),
            reason,
        }
    }

    /// 捕获监听器内的 panic，转换为故障原因
    fn guard<T>(f: impl FnOnce() -> T) -> Result<T, String> {
        panic::catch_unwind(AssertUnwindSafe(f)).map_err(|p| panic_reason(&*p))
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener::{EventResponder, FnListener, FnResponder};
    use serde_json::json;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn malformed_message_yields_empty_reply() {
        let d = Dispatcher::new();
        d.register_listener("E", FnResponder::new("r", |_: &Value| Some("x".into())));
        assert_eq!(d.dispatch("{oops"), "");
        assert_eq!(d.dispatch(r#"{"notype":"E"}"#), "");
        assert_eq!(d.dispatch_value(json!("E")), "");
    }

    #[test]
    fn no_subscriber_is_not_an_error() {
        let d = Dispatcher::new();
        let report = d.dispatch_message(&NamedMessage::new("Nobody:Home", json!({})));
        assert_eq!(report.reply, "");
        assert_eq!(report.delivered, 0);
        assert!(report.faults.is_empty());
    }

    #[test]
    fn listeners_run_in_registration_order() {
        let d = Dispatcher::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for name in ["first", "second", "third"] {
            let order = order.clone();
            d.register_listener(
                "E",
                FnListener::new(name, move |_: &str, _: &Value| {
                    order.lock().unwrap().push(name);
                    Ok(())
                }),
            );
        }
        d.dispatch(r#"{"type":"E"}"#);
        assert_eq!(*order.lock().unwrap(), ["first", "second", "third"]);
    }

    #[test]
    fn failing_listener_does_not_stop_the_rest() {
        let d = Dispatcher::new();
        let hits = Arc::new(AtomicUsize::new(0));
        d.register_listener(
            "E",
            FnListener::new("errs", |_: &str, _: &Value| anyhow::bail!("boom")),
        );
        d.register_listener(
            "E",
            FnListener::new("panics", |_: &str, _: &Value| panic!("kaboom")),
        );
        let counter = hits.clone();
        d.register_listener(
            "E",
            FnListener::new("ok", move |_: &str, _: &Value| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        );

        let report = d.dispatch_message(&NamedMessage::new("E", json!({})));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(report.delivered, 1);
        assert_eq!(report.faults.len(), 2);
        match &report.faults[1] {
            BridgeError::ListenerFault {
                listener, reason, ..
            } => {
                assert_eq!(listener, "panics");
                assert!(reason.contains("kaboom"));
            }
            other => panic!("unexpected fault: {other:?}"),
        }
    }

    struct Echo;

    impl EventListener for Echo {
        fn listener_name(&self) -> &str {
            "echo"
        }

        fn handle_message(&self, _event: &str, _message: &Value) -> anyhow::Result<()> {
            Ok(())
        }

        fn as_responder(&self) -> Option<&dyn EventResponder> {
            Some(self)
        }
    }

    impl EventResponder for Echo {
        fn response(&self, message: &Value) -> Option<String> {
            message["text"].as_str().map(str::to_owned)
        }
    }

    #[test]
    fn single_responder_reply_is_returned_unmodified() {
        let d = Dispatcher::new();
        d.register_listener("Echo", Arc::new(Echo));
        let reply = d.dispatch(r#"{"type":"Echo","text":"  spaced  "}"#);
        assert_eq!(reply, "  spaced  ");
    }

    #[test]
    fn empty_responses_do_not_count() {
        let d = Dispatcher::new();
        d.register_listener("E", FnResponder::new("a", |_: &Value| Some("a".into())));
        d.register_listener("E", FnResponder::new("b", |_: &Value| Some(String::new())));
        d.register_listener("E", FnResponder::new("c", |_: &Value| None));
        let report = d.dispatch_message(&NamedMessage::new("E", json!({})));
        assert_eq!(report.reply, "a");
        assert!(report.violations.is_empty());
    }

    #[test]
    fn first_wins_policy_keeps_earliest_reply() {
        let d = Dispatcher::builder()
            .config(DispatcherConfig {
                responder_policy: ResponderPolicy::FirstWins,
                ..Default::default()
            })
            .build();
        d.register_listener("E", FnResponder::new("a", |_: &Value| Some("a".into())));
        d.register_listener("E", FnResponder::new("b", |_: &Value| Some("b".into())));
        let report = d.dispatch_message(&NamedMessage::new("E", json!({})));
        assert_eq!(report.reply, "a");
        assert_eq!(
            report.violations,
            vec![ProtocolViolation::DuplicateResponse {
                event: "E".into(),
                kept: "a".into(),
                discarded: "b".into(),
            }]
        );
    }

    #[test]
    fn legacy_wrapper_is_unwrapped_before_lookup() {
        let d = Dispatcher::new();
        d.register_listener("Echo", Arc::new(Echo));
        let reply = d.dispatch_value(json!({ "runtime": { "type": "Echo", "text": "hi" } }));
        assert_eq!(reply, "hi");
    }
}
