//! 命名消息（NamedMessage）
//!
//! 入站消息形如 `{ "type": <string>, ...任意字段... }`；
//! 可选地包裹在已废弃的外层对象中（键名见 `DispatcherConfig::legacy_wrapper_key`），
//! 此时先解包并记录告警，再按内层消息处理。
//!
use crate::error::{BridgeError, BridgeResult};
use serde_json::{Map, Value};
use tracing::warn;

pub const TYPE_KEY: &str = "type";

/// 一条带类型的消息
#[derive(Debug, Clone, PartialEq)]
pub struct NamedMessage {
    event_type: String,
    payload: Value,
}

impl NamedMessage {
    /// 以类型与附加字段构造消息；`fields` 非对象时忽略
    pub fn new(event_type: impl Into<String>, fields: Value) -> Self {
        let event_type = event_type.into();
        let mut map = match fields {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        map.insert(TYPE_KEY.to_string(), Value::String(event_type.clone()));

        Self {
            event_type,
            payload: Value::Object(map),
        }
    }

    /// 从文本解析
    pub fn parse(raw: &str, legacy_wrapper_key: &str) -> BridgeResult<Self> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_value(value, legacy_wrapper_key)
    }

    /// 从 JSON 值解析
    pub fn from_value(value: Value, legacy_wrapper_key: &str) -> BridgeResult<Self> {
        let Value::Object(mut map) = value else {
            return Err(BridgeError::malformed("message is not a JSON object"));
        };

        let wrapped = match map.remove(legacy_wrapper_key) {
            Some(Value::Object(inner)) => {
                map = inner;
                true
            }
            Some(other) => {
                // 非对象的同名字段不是包装，放回原处
                map.insert(legacy_wrapper_key.to_string(), other);
                false
            }
            None => false,
        };

        let event_type = match map.get(TYPE_KEY) {
            Some(Value::String(t)) if !t.is_empty() => t.clone(),
            Some(_) => return Err(BridgeError::malformed("'type' is not a non-empty string")),
            None => return Err(BridgeError::malformed("missing 'type'")),
        };

        if wrapped {
            warn!(event = %event_type, key = legacy_wrapper_key, "message uses deprecated wrapper");
        }

        Ok(Self {
            event_type,
            payload: Value::Object(map),
        })
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// 完整载荷（包含 `type` 字段）
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn into_payload(self) -> Value {
        self.payload
    }

    /// 附加字段后返回新消息
    pub fn with_field(mut self, key: &str, value: Value) -> Self {
        if let Value::Object(map) = &mut self.payload {
            map.insert(key.to_string(), value);
        }
        self
    }

    /// 序列化为文本
    pub fn to_json_string(&self) -> String {
        self.payload.to_string()
    }
}
