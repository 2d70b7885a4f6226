//! 运行时队列（RuntimeQueue）
//!
//! 运行时侧只暴露两个能力：执行一个排队的工作单元、接收一个事件信封。
//! `InMemoryRuntime` 是本地实现：任务 FIFO 加上已发送信封的记录，
//! 可选地把广播信封回送给分发器，模拟运行时侧观察者对命名消息的处理。
//!
use crate::dispatcher::Dispatcher;
use crate::message::NamedMessage;
use bon::Builder;
use bridge_event::{EventEnvelope, EventPayload};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, warn};

/// 运行时侧的事件队列
pub trait RuntimeQueue: Send + Sync {
    /// 执行恰好一个排队的工作单元；队列空闲时返回 false
    fn process_next_event(&self) -> bool;

    /// 把信封交给运行时
    fn send_event(&self, envelope: EventEnvelope);
}

type Task = Box<dyn FnOnce() + Send>;

#[derive(Builder)]
pub struct InMemoryRuntime {
    #[builder(skip)]
    tasks: Mutex<VecDeque<Task>>,
    #[builder(skip)]
    sent: Mutex<Vec<EventEnvelope>>,
    #[builder(skip)]
    steps: AtomicUsize,
    /// 广播信封回送的目标分发器
    loopback: Option<Arc<Dispatcher>>,
}

impl Default for InMemoryRuntime {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl InMemoryRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// 排入一个工作单元
    pub fn post(&self, task: impl FnOnce() + Send + 'static) {
        self.lock_tasks().push_back(Box::new(task));
    }

    pub fn pending_tasks(&self) -> usize {
        self.lock_tasks().len()
    }

    /// 已执行的工作单元数量
    pub fn steps_processed(&self) -> usize {
        self.steps.load(Ordering::SeqCst)
    }

    /// 已发送信封的副本（按发送顺序）
    pub fn sent_events(&self) -> Vec<EventEnvelope> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// 执行队列中的全部工作（包括执行过程中新排入的），返回执行数量
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        while self.process_next_event() {
            ran += 1;
        }
        ran
    }

    fn lock_tasks(&self) -> std::sync::MutexGuard<'_, VecDeque<Task>> {
        self.tasks.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn loop_back(&self, dispatcher: &Arc<Dispatcher>, subject: &str, data: Option<&str>) {
        let fields = match data.map(serde_json::from_str::<Value>) {
            None => Value::Null,
            Some(Ok(fields)) => fields,
            Some(Err(err)) => {
                warn!(event = subject, error = %err, "runtime: broadcast data is not JSON");
                return;
            }
        };
        let message = NamedMessage::new(subject, fields);
        let dispatcher = dispatcher.clone();
        self.post(move || {
            dispatcher.dispatch_message(&message);
        });
    }
}

impl RuntimeQueue for InMemoryRuntime {
    fn process_next_event(&self) -> bool {
        // 出队后释放锁再执行，任务内部可以继续排队
        let Some(task) = self.lock_tasks().pop_front() else {
            return false;
        };
        task();
        let steps = self.steps.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(steps, "runtime: processed one event");
        true
    }

    fn send_event(&self, envelope: EventEnvelope) {
        if let (Some(dispatcher), EventPayload::Broadcast { subject, data }) =
            (&self.loopback, envelope.payload())
        {
            self.loop_back(dispatcher, subject, data.as_deref());
        }
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(envelope);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener::FnListener;
    use bridge_event::EventKind;

    #[test]
    fn runs_one_task_per_step_in_fifo_order() {
        let runtime = Arc::new(InMemoryRuntime::new());
        let log = Arc::new(Mutex::new(Vec::new()));
        for i in 0..3 {
            let log = log.clone();
            runtime.post(move || log.lock().unwrap().push(i));
        }

        assert!(runtime.process_next_event());
        assert_eq!(*log.lock().unwrap(), [0]);
        assert_eq!(runtime.run_until_idle(), 2);
        assert_eq!(*log.lock().unwrap(), [0, 1, 2]);
        assert!(!runtime.process_next_event());
        assert_eq!(runtime.steps_processed(), 3);
    }

    #[test]
    fn tasks_may_post_more_work() {
        let runtime = Arc::new(InMemoryRuntime::new());
        let inner = runtime.clone();
        runtime.post(move || inner.post(|| {}));
        assert_eq!(runtime.run_until_idle(), 2);
    }

    #[test]
    fn broadcast_loops_back_as_named_message() {
        let dispatcher = Arc::new(Dispatcher::new());
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        dispatcher.register_listener(
            "Prompt:Reply",
            FnListener::new("sink", move |_: &str, msg: &Value| {
                *sink.lock().unwrap() = Some(msg["value"].clone());
                Ok(())
            }),
        );
        let runtime = InMemoryRuntime::builder()
            .loopback(dispatcher.clone())
            .build();

        runtime.send_event(EventEnvelope::broadcast(
            "Prompt:Reply",
            Some(r#"{"value":"ok"}"#.to_string()),
        ));
        assert_eq!(runtime.sent_events()[0].kind(), EventKind::Broadcast);
        assert!(seen.lock().unwrap().is_none());

        assert!(runtime.process_next_event());
        assert_eq!(*seen.lock().unwrap(), Some(Value::from("ok")));
    }
}
