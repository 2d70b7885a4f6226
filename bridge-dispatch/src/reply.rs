//! 应答槽（ReplySlot）
//!
//! 阻塞桥接中，一次请求对应一个应答槽：应答在任意线程写入一次，请求方读取一次。
//! 第二次写入、以及读取之后的写入都会被拒绝并记录日志，不会覆盖已有的值。
//!
use crate::error::{BridgeError, BridgeResult};
use std::sync::Mutex;
use tokio::sync::Notify;
use tracing::error;

#[derive(Debug)]
enum SlotState {
    Empty,
    Filled(String),
    Consumed,
}

#[derive(Debug)]
pub struct ReplySlot {
    id: String,
    state: Mutex<SlotState>,
    notify: Notify,
}

impl ReplySlot {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: Mutex::new(SlotState::Empty),
            notify: Notify::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// 写入应答；只有第一次写入生效
    pub fn deliver(&self, value: impl Into<String>) -> BridgeResult<()> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let reason = match *state {
            SlotState::Empty => None,
            SlotState::Filled(_) => Some("reply already delivered"),
            SlotState::Consumed => Some("reply already consumed"),
        };
        let Some(reason) = reason else {
            *state = SlotState::Filled(value.into());
            drop(state);
            self.notify.notify_one();
            return Ok(());
        };
        drop(state);
        error!(reply_id = %self.id, reason, "reply slot: discarding late reply");
        Err(BridgeError::ReplyRejected {
            reply_id: self.id.clone(),
            reason: reason.to_string(),
        })
    }

    pub fn is_filled(&self) -> bool {
        matches!(
            *self.state.lock().unwrap_or_else(|e| e.into_inner()),
            SlotState::Filled(_)
        )
    }

    /// 取走应答；未写入或已取走时返回 `None`
    pub fn try_take(&self) -> Option<String> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        match std::mem::replace(&mut *state, SlotState::Consumed) {
            SlotState::Filled(value) => Some(value),
            previous => {
                *state = previous;
                None
            }
        }
    }

    /// 异步等待应答写入并取走
    pub async fn recv(&self) -> String {
        loop {
            let notified = self.notify.notified();
            if let Some(value) = self.try_take() {
                return value;
            }
            notified.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn first_write_wins() {
        let slot = ReplySlot::new("r1");
        slot.deliver("a").unwrap();
        assert!(matches!(
            slot.deliver("b"),
            Err(BridgeError::ReplyRejected { .. })
        ));
        assert_eq!(slot.try_take().as_deref(), Some("a"));
    }

    struct LevelLog(Arc<std::sync::Mutex<Vec<tracing::Level>>>);

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for LevelLog {
        fn on_event(
            &self,
            event: &tracing::Event<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            self.0.lock().unwrap().push(*event.metadata().level());
        }
    }

    #[test]
    fn second_write_is_logged_as_error() {
        use tracing_subscriber::layer::SubscriberExt;

        let levels = Arc::new(std::sync::Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::registry().with(LevelLog(levels.clone()));
        tracing::subscriber::with_default(subscriber, || {
            let slot = ReplySlot::new("r4");
            slot.deliver("a").unwrap();
            assert!(slot.deliver("b").is_err());
            slot.try_take();
            assert!(slot.deliver("c").is_err());
        });
        assert_eq!(
            *levels.lock().unwrap(),
            [tracing::Level::ERROR, tracing::Level::ERROR]
        );
    }

    #[test]
    fn take_consumes_and_rejects_later_writes() {
        let slot = ReplySlot::new("r2");
        assert_eq!(slot.try_take(), None);
        slot.deliver("v").unwrap();
        assert_eq!(slot.try_take().as_deref(), Some("v"));
        assert_eq!(slot.try_take(), None);
        assert!(slot.deliver("again").is_err());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn recv_wakes_on_delivery_from_another_thread() {
        let slot = Arc::new(ReplySlot::new("r3"));
        let writer = slot.clone();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            writer.deliver("late").unwrap();
        });
        let value = tokio::time::timeout(Duration::from_secs(5), slot.recv())
            .await
            .unwrap();
        assert_eq!(value, "late");
    }
}
