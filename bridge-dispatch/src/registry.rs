//! 监听器注册表（ListenerRegistry）
//!
//! 事件名 → 有序监听器集合，是分发路径上唯一的共享可变状态：
//! - 每次变更都以新切片整体替换旧切片（写时复制），快照只是一次 `Arc` 克隆；
//! - 正在遍历的快照不受后续注册/注销影响，也不会出现遍历中修改的故障；
//! - 同一监听器（同一 `Arc` 分配）对同一事件重复注册时告警并忽略，
//!   因此每次分发对每个监听器只投递一次；
//! - 某事件的最后一个监听器注销后，整个条目被移除。
//!
use crate::listener::EventListener;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use tracing::{debug, warn};

pub type ListenerHandle = Arc<dyn EventListener>;

fn same_listener<L: ?Sized>(a: &ListenerHandle, b: &Arc<L>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// 某事件在某一时刻的监听器视图
#[derive(Clone)]
pub struct ListenerSnapshot {
    listeners: Arc<[ListenerHandle]>,
}

impl ListenerSnapshot {
    fn empty() -> Self {
        Self {
            listeners: Arc::from(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ListenerHandle> {
        self.listeners.iter()
    }

    /// 是否包含该监听器
    pub fn contains<L: ?Sized>(&self, listener: &Arc<L>) -> bool {
        self.listeners.iter().any(|l| same_listener(l, listener))
    }
}

impl<'a> IntoIterator for &'a ListenerSnapshot {
    type Item = &'a ListenerHandle;
    type IntoIter = std::slice::Iter<'a, ListenerHandle>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// 线程安全的监听器注册表
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: DashMap<String, Arc<[ListenerHandle]>>,
}

enum Removal {
    NoListeners,
    NotRegistered,
    Removed { emptied: bool },
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册监听器；重复注册时告警并返回 `false`
    pub fn register(&self, event: &str, listener: ListenerHandle) -> bool {
        let name = listener.listener_name().to_string();

        let added = match self.listeners.entry(event.to_string()) {
            Entry::Occupied(mut e) => {
                if e.get().iter().any(|l| same_listener(l, &listener)) {
                    false
                } else {
                    let next: Arc<[ListenerHandle]> = e
                        .get()
                        .iter()
                        .cloned()
                        .chain(std::iter::once(listener))
                        .collect();
                    e.insert(next);
                    true
                }
            }
            Entry::Vacant(e) => {
                e.insert(Arc::from(vec![listener]));
                true
            }
        };

        if added {
            debug!(event, listener = %name, "listener registered");
        } else {
            warn!(event, listener = %name, "listener already registered for event");
        }
        added
    }

    /// 注销监听器；未注册时告警并返回 `false`
    pub fn unregister<L>(&self, event: &str, listener: &Arc<L>) -> bool
    where
        L: EventListener + ?Sized,
    {
        let removal = match self.listeners.entry(event.to_string()) {
            Entry::Vacant(_) => Removal::NoListeners,
            Entry::Occupied(mut e) => {
                let next: Vec<ListenerHandle> = e
                    .get()
                    .iter()
                    .filter(|l| !same_listener(l, listener))
                    .cloned()
                    .collect();

                if next.len() == e.get().len() {
                    Removal::NotRegistered
                } else if next.is_empty() {
                    e.remove();
                    Removal::Removed { emptied: true }
                } else {
                    e.insert(Arc::from(next));
                    Removal::Removed { emptied: false }
                }
            }
        };

        match removal {
            Removal::NoListeners => {
                warn!(event, "unregister: event has no listeners");
                false
            }
            Removal::NotRegistered => {
                warn!(
                    event,
                    listener = listener.listener_name(),
                    "unregister: listener was not registered for event"
                );
                false
            }
            Removal::Removed { emptied } => {
                debug!(event, listener = listener.listener_name(), emptied, "listener unregistered");
                true
            }
        }
    }

    /// 取得某事件当前监听器的稳定快照
    pub fn snapshot_for(&self, event: &str) -> ListenerSnapshot {
        self.listeners
            .get(event)
            .map(|entry| ListenerSnapshot {
                listeners: entry.value().clone(),
            })
            .unwrap_or_else(ListenerSnapshot::empty)
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.get(event).map(|e| e.len()).unwrap_or(0)
    }

    /// 当前有监听器的事件名（无序）
    pub fn event_names(&self) -> Vec<String> {
        self.listeners.iter().map(|e| e.key().clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
