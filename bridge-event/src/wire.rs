//! 扁平线格式（WireEvent）
//!
//! 原生边界按固定字段读取事件：所有变体共享同一组字段，
//! 变体未使用的字段保持零值，并在 JSON 中省略。
//!
use crate::envelope::{EventEnvelope, EventPayload};
use crate::geometry::{Point, Rect};
use crate::ime::ImeRange;
use crate::input::KeyEvent;
use crate::kind::{DomKeyLocation, EventKind};
use crate::sensor::Location;
use serde::Serialize;

fn is_zero_i32(v: &i32) -> bool {
    *v == 0
}

fn is_zero_i64(v: &i64) -> bool {
    *v == 0
}

fn is_zero_f64(v: &f64) -> bool {
    *v == 0.0
}

fn is_false(v: &bool) -> bool {
    !*v
}

/// 原生边界消费的扁平事件记录
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireEvent {
    #[serde(rename = "type")]
    pub kind: i32,
    #[serde(skip_serializing_if = "is_zero_i32")]
    pub action: i32,
    #[serde(skip_serializing_if = "is_false")]
    pub ack_needed: bool,
    #[serde(skip_serializing_if = "is_zero_i64")]
    pub time: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub points: Vec<Point>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub point_indices: Vec<i32>,
    #[serde(skip_serializing_if = "is_zero_i32")]
    pub pointer_index: i32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub orientations: Vec<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pressures: Vec<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub point_radii: Vec<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rect: Option<Rect>,
    #[serde(skip_serializing_if = "is_zero_f64")]
    pub x: f64,
    #[serde(skip_serializing_if = "is_zero_f64")]
    pub y: f64,
    #[serde(skip_serializing_if = "is_zero_f64")]
    pub z: f64,
    #[serde(skip_serializing_if = "is_zero_i32")]
    pub meta_state: i32,
    #[serde(skip_serializing_if = "is_zero_i32")]
    pub flags: i32,
    #[serde(skip_serializing_if = "is_zero_i32")]
    pub key_code: i32,
    #[serde(skip_serializing_if = "is_zero_i32")]
    pub unicode_char: i32,
    #[serde(skip_serializing_if = "is_zero_i32")]
    pub base_unicode_char: i32,
    #[serde(skip_serializing_if = "is_zero_i32")]
    pub repeat_count: i32,
    #[serde(skip_serializing_if = "is_zero_i32")]
    pub count: i32,
    #[serde(skip_serializing_if = "is_zero_i32")]
    pub start: i32,
    #[serde(skip_serializing_if = "is_zero_i32")]
    pub end: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub characters: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub characters_extra: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(flatten)]
    pub range: Option<WireRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dom_key_location: Option<DomKeyLocation>,
    #[serde(skip_serializing_if = "is_zero_f64")]
    pub bandwidth: f64,
    #[serde(skip_serializing_if = "is_false")]
    pub can_be_metered: bool,
    #[serde(skip_serializing_if = "is_zero_i32")]
    pub screen_orientation: i32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub buffer: Vec<u8>,
    #[serde(skip_serializing_if = "is_zero_i32")]
    pub width: i32,
    #[serde(skip_serializing_if = "is_zero_i32")]
    pub height: i32,
}

/// 输入法区间字段
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireRange {
    pub range_type: i32,
    pub range_styles: i32,
    pub range_line_style: i32,
    pub range_bold_line: bool,
    pub range_fore_color: i32,
    pub range_back_color: i32,
    pub range_line_color: i32,
}

impl From<&ImeRange> for WireRange {
    fn from(r: &ImeRange) -> Self {
        Self {
            range_type: r.range_type(),
            range_styles: r.styles(),
            range_line_style: r.line_style(),
            range_bold_line: r.bold_line(),
            range_fore_color: r.fore_color(),
            range_back_color: r.back_color(),
            range_line_color: r.line_color(),
        }
    }
}

impl WireEvent {
    fn of_kind(kind: EventKind) -> Self {
        Self {
            kind: kind.value(),
            ..Default::default()
        }
    }

    fn with_key(mut self, k: &KeyEvent) -> Self {
        self.action = k.action();
        self.time = k.time();
        self.meta_state = k.meta_state();
        self.flags = k.flags();
        self.key_code = k.key_code();
        self.unicode_char = k.unicode_char();
        self.base_unicode_char = k.base_unicode_char();
        self.repeat_count = k.repeat_count();
        self.characters = k.characters().map(str::to_owned);
        self.dom_key_location = Some(k.dom_key_location());
        self
    }
}

impl From<&EventEnvelope> for WireEvent {
    fn from(envelope: &EventEnvelope) -> Self {
        let mut w = WireEvent::of_kind(envelope.kind());
        w.ack_needed = envelope.ack_needed();

        match envelope.payload() {
            EventPayload::NativePoke
            | EventPayload::AppBackgrounding
            | EventPayload::AppForegrounding
            | EventPayload::Noop
            | EventPayload::CompositorPause
            | EventPayload::CompositorResume => {}
            EventPayload::Key(k) | EventPayload::ImeKey(k) => w = w.with_key(k),
            EventPayload::Motion(m) => {
                w.action = m.action();
                w.time = m.time();
                w.meta_state = m.meta_state();
                w.pointer_index = m.pointer_index();
                w.count = m.count() as i32;
                for p in m.points() {
                    w.points.push(p.position);
                    w.point_indices.push(p.pointer_id);
                    w.orientations.push(p.orientation);
                    w.pressures.push(p.pressure);
                    w.point_radii.push(p.radius);
                }
            }
            EventPayload::NativeGesture(g) => {
                w.action = g.action();
                w.count = 1;
                w.points = vec![g.point()];
                w.x = g.size();
                w.time = g.time();
            }
            EventPayload::Sensor(s) => {
                w.flags = s.sensor().value();
                w.meta_state = s.accuracy().value();
                w.x = s.x();
                w.y = s.y();
                w.z = s.z();
            }
            EventPayload::Location(l) => w.location = Some(*l),
            EventPayload::Ime(ime) => {
                w.action = ime.action().value();
                w.start = ime.start();
                w.end = ime.end();
                w.characters = ime.text().map(str::to_owned);
                w.range = ime.range().map(WireRange::from);
            }
            EventPayload::Draw(rect) => w.rect = Some(*rect),
            EventPayload::SizeChanged { window, screen } => w.points = vec![*window, *screen],
            EventPayload::LoadUri { uri, mode } => {
                w.characters = Some(uri.clone());
                w.characters_extra = Some(mode.extra().to_string());
            }
            EventPayload::Broadcast { subject, data } => {
                w.characters = Some(subject.clone());
                w.characters_extra = data.clone();
            }
            EventPayload::Viewport { subject, data } => {
                w.characters = Some(subject.clone());
                w.characters_extra = Some(data.clone());
            }
            EventPayload::Visited { data } => w.characters = Some(data.clone()),
            EventPayload::NetworkChanged {
                bandwidth,
                can_be_metered,
            } => {
                w.bandwidth = *bandwidth;
                w.can_be_metered = *can_be_metered;
            }
            EventPayload::Thumbnail(t) => {
                w.points = vec![Point::new(t.width, t.height)];
                w.meta_state = t.tab_id;
                w.buffer = t.buffer.to_vec();
            }
            EventPayload::ScreenOrientationChanged(o) => w.screen_orientation = i32::from(*o),
            EventPayload::CompositorCreate { width, height } => {
                w.width = *width;
                w.height = *height;
            }
            EventPayload::CallObserver {
                observer_key,
                topic,
                data,
            } => {
                w.characters = Some(observer_key.clone());
                w.characters_extra = Some(topic.clone());
                w.data = Some(data.clone());
            }
            EventPayload::RemoveObserver { observer_key } => {
                w.characters = Some(observer_key.clone())
            }
            EventPayload::LowMemory { level } => w.meta_state = *level,
            EventPayload::NetworkLinkChange { status } => w.characters = Some(status.clone()),
        }

        w
    }
}

impl EventEnvelope {
    /// 转换为原生边界的扁平记录
    pub fn to_wire(&self) -> WireEvent {
        WireEvent::from(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unused_fields_are_omitted() {
        let wire = EventEnvelope::compositor_create(800, 600).to_wire();
        assert_eq!(
            serde_json::to_value(&wire).unwrap(),
            json!({ "type": 28, "width": 800, "height": 600 })
        );
    }

    #[test]
    fn observer_call_uses_string_triplet() {
        let wire = EventEnvelope::call_observer("obs-1", "topic", "payload").to_wire();
        assert_eq!(wire.kind, 33);
        assert_eq!(wire.characters.as_deref(), Some("obs-1"));
        assert_eq!(wire.characters_extra.as_deref(), Some("topic"));
        assert_eq!(wire.data.as_deref(), Some("payload"));
    }

    #[test]
    fn thumbnail_carries_raw_buffer() {
        let wire = EventEnvelope::thumbnail(7, 2, 1, vec![1u8, 2, 3, 4, 5, 6, 7, 8]).to_wire();
        assert_eq!(wire.meta_state, 7);
        assert_eq!(wire.points, vec![Point::new(2, 1)]);
        assert_eq!(wire.buffer.len(), 8);
    }
}
