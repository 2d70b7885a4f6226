use bridge_dispatch::{FnListener, ListenerHandle, ListenerRegistry, ListenerSnapshot};
use proptest::prelude::*;
use serde_json::Value;
use std::sync::Arc;

fn listener(name: String) -> ListenerHandle {
    FnListener::new(name, |_: &str, _: &Value| Ok(()))
}

fn names(snapshot: &ListenerSnapshot) -> Vec<String> {
    snapshot
        .iter()
        .map(|l| l.listener_name().to_string())
        .collect()
}

#[derive(Debug, Clone)]
enum Op {
    Register(usize),
    Unregister(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..8).prop_map(Op::Register),
        (0usize..8).prop_map(Op::Unregister),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// 快照迭代期间的并发增删不影响快照内容
    #[test]
    fn snapshot_is_isolated_from_concurrent_mutation(
        initial in 0usize..6,
        batches in prop::collection::vec(prop::collection::vec(op(), 1..20), 1..5),
    ) {
        let registry = Arc::new(ListenerRegistry::new());
        let pool: Vec<ListenerHandle> = (0..8).map(|i| listener(format!("l{i}"))).collect();
        for l in pool.iter().take(initial) {
            registry.register("E", l.clone());
        }
        let expected: Vec<String> = (0..initial).map(|i| format!("l{i}")).collect();

        let snapshot = registry.snapshot_for("E");
        let observed = std::thread::scope(|s| {
            for batch in &batches {
                let registry = registry.clone();
                let pool = &pool;
                s.spawn(move || {
                    for op in batch {
                        match op {
                            Op::Register(i) => {
                                registry.register("E", pool[*i].clone());
                            }
                            Op::Unregister(i) => {
                                registry.unregister("E", &pool[*i]);
                            }
                        }
                    }
                });
            }
            let mut seen = Vec::new();
            for l in snapshot.iter() {
                seen.push(l.listener_name().to_string());
                std::thread::yield_now();
            }
            seen
        });

        prop_assert_eq!(observed, expected);
        // 增删结束后不会出现重复项
        let after = names(&registry.snapshot_for("E"));
        let mut dedup = after.clone();
        dedup.sort();
        dedup.dedup();
        prop_assert_eq!(after.len(), dedup.len());
    }

    /// 注册后再注销同一监听器，列表恢复原状
    #[test]
    fn register_then_unregister_restores_list(initial in 0usize..6, extra in 6usize..8) {
        let registry = ListenerRegistry::new();
        let pool: Vec<ListenerHandle> = (0..8).map(|i| listener(format!("l{i}"))).collect();
        for l in pool.iter().take(initial) {
            registry.register("E", l.clone());
        }
        let before = names(&registry.snapshot_for("E"));

        prop_assert!(registry.register("E", pool[extra].clone()));
        prop_assert!(registry.unregister("E", &pool[extra]));
        prop_assert_eq!(names(&registry.snapshot_for("E")), before);
        prop_assert_eq!(registry.listener_count("E"), initial);
    }
}
