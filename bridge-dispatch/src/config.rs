//! 分发器与阻塞桥接的配置
//!
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 同一消息出现多个非空应答时保留哪一个
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponderPolicy {
    /// 最后一个非空应答生效（兼容既有行为）
    #[default]
    LastWins,
    /// 第一个非空应答生效
    FirstWins,
}

/// 分发器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    pub responder_policy: ResponderPolicy,
    /// 已废弃的外层包装键，存在时先解包再分发
    pub legacy_wrapper_key: String,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            responder_policy: ResponderPolicy::default(),
            legacy_wrapper_key: "runtime".to_string(),
        }
    }
}

/// 阻塞桥接配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// 泵送步数上限（队列空闲时的轮询也计入）；`None` 表示一直等待
    pub max_pump_steps: Option<usize>,
    /// 异步应答消息类型的后缀（`Prompt:Show` 的应答为 `Prompt:Reply`）
    pub reply_suffix: String,
    /// 异步等待的超时；`None` 表示一直等待
    #[serde(with = "opt_millis")]
    pub reply_timeout: Option<Duration>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            max_pump_steps: None,
            reply_suffix: ":Reply".to_string(),
            reply_timeout: None,
        }
    }
}

mod opt_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(v: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match v {
            Some(d) => s.serialize_some(&(d.as_millis() as u64)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_millis))
    }
}
