use anyhow::Result as AnyResult;
use bridge_dispatch::bridge::REPLY_ID_KEY;
use bridge_dispatch::{BlockingBridge, BridgeConfig, Dispatcher, FnListener, InMemoryRuntime};
use serde_json::{Value, json};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> AnyResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let dispatcher = Arc::new(Dispatcher::new());
    let bridge = Arc::new(
        BlockingBridge::builder()
            .dispatcher(dispatcher.clone())
            .runtime(Arc::new(InMemoryRuntime::new()))
            .config(BridgeConfig {
                reply_timeout: Some(Duration::from_millis(500)),
                ..Default::default()
            })
            .build(),
    );

    // 后台线程稍后完成请求
    let completer: Weak<BlockingBridge> = Arc::downgrade(&bridge);
    dispatcher.register_listener(
        "Math:Square",
        FnListener::new("square", move |_: &str, msg: &Value| {
            let id = msg[REPLY_ID_KEY]
                .as_str()
                .ok_or_else(|| anyhow::anyhow!("missing replyId"))?
                .to_string();
            let n = msg["n"].as_i64().unwrap_or(0);
            let completer = completer.clone();
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(50));
                if let Some(bridge) = completer.upgrade() {
                    let _ = bridge.complete(&id, (n * n).to_string());
                }
            });
            Ok(())
        }),
    );

    let answer = bridge.request_async("Math:Square", json!({ "n": 7 })).await?;
    println!("7^2 = {answer}");

    match bridge.request_async("Math:Unknown", json!({})).await {
        Ok(v) => println!("unexpected reply: {v}"),
        Err(err) => println!("no responder: {err}"),
    }
    Ok(())
}
