use anyhow::Result as AnyResult;
use bridge_dispatch::prompt::{PROMPT_SHOW, PromptResponder};
use bridge_dispatch::{BlockingBridge, Dispatcher, FnResponder, InMemoryRuntime};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() -> AnyResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into()))
        .with_target(false)
        .init();

    let dispatcher = Arc::new(Dispatcher::new());
    let runtime = Arc::new(
        InMemoryRuntime::builder()
            .loopback(dispatcher.clone())
            .build(),
    );

    // 同步应答
    dispatcher.register_listener(
        "Test:Ping",
        FnResponder::new("ping", |_: &Value| Some("pong".to_string())),
    );
    println!("Test:Ping -> {}", dispatcher.dispatch(r#"{"type":"Test:Ping"}"#));

    // 提示框：UI 侧给出固定选择
    let prompt = PromptResponder::builder()
        .ui(runtime.clone())
        .runtime(runtime.clone())
        .presenter(Arc::new(|p: &Value| {
            json!({ "button": 1, "title": p["title"].clone() })
        }))
        .build();
    dispatcher.register_listener(PROMPT_SHOW, Arc::new(prompt));

    let bridge = BlockingBridge::builder()
        .dispatcher(dispatcher.clone())
        .runtime(runtime.clone())
        .build();

    let reply = bridge.request(PROMPT_SHOW, json!({ "title": "Sync prompt" }))?;
    println!("sync prompt -> {reply}");

    let reply = bridge.request(PROMPT_SHOW, json!({ "title": "Async prompt", "async": true }))?;
    println!(
        "async prompt -> {reply} (runtime steps: {})",
        runtime.steps_processed()
    );

    for envelope in runtime.sent_events() {
        println!("sent to runtime: {}", serde_json::to_string(&envelope.to_wire())?);
    }
    Ok(())
}
