//! 事件信封（EventEnvelope）
//!
//! 描述一次 UI/平台事件的不可变记录，与投递方式无关：
//! - `EventPayload` 的每个变体拥有互不相交的字段集合，变体决定 `kind()`；
//! - 构造后不可修改，只能在交付前通过 `with_ack_needed` 生成新值；
//! - 交付给分发器/原生边界后即丢弃，不保留、不复用。
//!
use crate::context::{Clock, CoordinateTransform};
use crate::error::EnvelopeResult;
use crate::geometry::{Point, PointF, Rect};
use crate::ime::{ImeEvent, ImeRange};
use crate::input::{GestureEvent, KeyEvent, KeyOccurrence, MotionEvent, MotionOccurrence};
use crate::kind::{EventKind, ImeAction};
use crate::sensor::{Location, SensorEvent, SensorReading};
use crate::viewport::{
    DisplayPortMetrics, VIEWPORT_CHANGE_SUBJECT, ViewportMetrics, viewport_change_json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// URI 加载方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadMode {
    Plain,
    Webapp,
    Bookmark,
}

impl LoadMode {
    /// 原生侧以附加字符串区分加载方式
    pub fn extra(self) -> &'static str {
        match self {
            LoadMode::Plain => "",
            LoadMode::Webapp => "-webapp",
            LoadMode::Bookmark => "-bookmark",
        }
    }
}

/// 标签页缩略图
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub tab_id: i32,
    pub width: i32,
    pub height: i32,
    pub buffer: Arc<[u8]>,
}

/// 各事件种类的载荷
#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    NativePoke,
    Key(KeyEvent),
    Motion(MotionEvent),
    Sensor(SensorEvent),
    Location(Location),
    Ime(ImeEvent),
    Draw(Rect),
    SizeChanged { window: Point, screen: Point },
    AppBackgrounding,
    AppForegrounding,
    LoadUri { uri: String, mode: LoadMode },
    Noop,
    Broadcast { subject: String, data: Option<String> },
    Viewport { subject: String, data: String },
    Visited { data: String },
    NetworkChanged { bandwidth: f64, can_be_metered: bool },
    Thumbnail(Thumbnail),
    ScreenOrientationChanged(i16),
    CompositorCreate { width: i32, height: i32 },
    CompositorPause,
    CompositorResume,
    NativeGesture(GestureEvent),
    ImeKey(KeyEvent),
    CallObserver {
        observer_key: String,
        topic: String,
        data: String,
    },
    RemoveObserver { observer_key: String },
    LowMemory { level: i32 },
    NetworkLinkChange { status: String },
}

impl EventPayload {
    pub fn kind(&self) -> EventKind {
        match self {
            EventPayload::NativePoke => EventKind::NativePoke,
            EventPayload::Key(_) => EventKind::Key,
            EventPayload::Motion(_) => EventKind::Motion,
            EventPayload::Sensor(_) => EventKind::Sensor,
            EventPayload::Location(_) => EventKind::Location,
            EventPayload::Ime(_) => EventKind::Ime,
            EventPayload::Draw(_) => EventKind::Draw,
            EventPayload::SizeChanged { .. } => EventKind::SizeChanged,
            EventPayload::AppBackgrounding => EventKind::AppBackgrounding,
            EventPayload::AppForegrounding => EventKind::AppForegrounding,
            EventPayload::LoadUri { .. } => EventKind::LoadUri,
            EventPayload::Noop => EventKind::Noop,
            EventPayload::Broadcast { .. } => EventKind::Broadcast,
            EventPayload::Viewport { .. } => EventKind::Viewport,
            EventPayload::Visited { .. } => EventKind::Visited,
            EventPayload::NetworkChanged { .. } => EventKind::NetworkChanged,
            EventPayload::Thumbnail(_) => EventKind::Thumbnail,
            EventPayload::ScreenOrientationChanged(_) => EventKind::ScreenOrientationChanged,
            EventPayload::CompositorCreate { .. } => EventKind::CompositorCreate,
            EventPayload::CompositorPause => EventKind::CompositorPause,
            EventPayload::CompositorResume => EventKind::CompositorResume,
            EventPayload::NativeGesture(_) => EventKind::NativeGesture,
            EventPayload::ImeKey(_) => EventKind::ImeKey,
            EventPayload::CallObserver { .. } => EventKind::CallObserver,
            EventPayload::RemoveObserver { .. } => EventKind::RemoveObserver,
            EventPayload::LowMemory { .. } => EventKind::LowMemory,
            EventPayload::NetworkLinkChange { .. } => EventKind::NetworkLinkChange,
        }
    }
}

/// 事件信封
#[derive(Debug, Clone, PartialEq)]
pub struct EventEnvelope {
    payload: EventPayload,
    ack_needed: bool,
}

impl From<EventPayload> for EventEnvelope {
    fn from(payload: EventPayload) -> Self {
        Self {
            payload,
            ack_needed: false,
        }
    }
}

impl EventEnvelope {
    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }

    pub fn payload(&self) -> &EventPayload {
        &self.payload
    }

    /// 运行时处理完成后是否需要回执
    pub fn ack_needed(&self) -> bool {
        self.ack_needed
    }

    pub fn with_ack_needed(self, ack_needed: bool) -> Self {
        Self { ack_needed, ..self }
    }

    // --- 生命周期 ---

    pub fn native_poke() -> Self {
        EventPayload::NativePoke.into()
    }

    pub fn app_backgrounding() -> Self {
        EventPayload::AppBackgrounding.into()
    }

    pub fn app_foregrounding() -> Self {
        EventPayload::AppForegrounding.into()
    }

    pub fn noop() -> Self {
        EventPayload::Noop.into()
    }

    pub fn compositor_create(width: i32, height: i32) -> Self {
        EventPayload::CompositorCreate { width, height }.into()
    }

    pub fn compositor_pause() -> Self {
        EventPayload::CompositorPause.into()
    }

    pub fn compositor_resume() -> Self {
        EventPayload::CompositorResume.into()
    }

    pub fn low_memory(level: i32) -> Self {
        EventPayload::LowMemory { level }.into()
    }

    // --- 输入 ---

    /// `modifier_state` 为单独累积的修饰键状态
    pub fn key(k: &impl KeyOccurrence, modifier_state: i32) -> Self {
        EventPayload::Key(KeyEvent::read(k, modifier_state)).into()
    }

    pub fn ime_key(k: &impl KeyOccurrence) -> Self {
        EventPayload::ImeKey(KeyEvent::read(k, 0)).into()
    }

    /// 多点触控；单个触点失败只会退化为占位，不会导致整个事件失败
    pub fn motion(
        m: &impl MotionOccurrence,
        keep_in_view_coordinates: bool,
        transform: &dyn CoordinateTransform,
        clock: &dyn Clock,
    ) -> Self {
        EventPayload::Motion(MotionEvent::read(
            m,
            keep_in_view_coordinates,
            transform,
            clock,
        ))
        .into()
    }

    /// 原生手势；渲染表面未就绪时返回 `EnvelopeUnavailable::SurfaceNotReady`
    pub fn native_gesture(
        action: i32,
        point: PointF,
        size: f64,
        transform: &dyn CoordinateTransform,
        clock: &dyn Clock,
    ) -> EnvelopeResult<Self> {
        GestureEvent::read(action, point, size, transform, clock)
            .map(|g| EventPayload::NativeGesture(g).into())
    }

    // --- 传感器 / 定位 / 网络 ---

    pub fn sensor(reading: &SensorReading) -> EnvelopeResult<Self> {
        SensorEvent::read(reading).map(|s| EventPayload::Sensor(s).into())
    }

    pub fn location(location: Location) -> Self {
        EventPayload::Location(location).into()
    }

    pub fn network_changed(bandwidth: f64, can_be_metered: bool) -> Self {
        EventPayload::NetworkChanged {
            bandwidth,
            can_be_metered,
        }
        .into()
    }

    pub fn network_link_change(status: impl Into<String>) -> Self {
        EventPayload::NetworkLinkChange {
            status: status.into(),
        }
        .into()
    }

    // --- 输入法 ---

    pub fn ime(action: ImeAction) -> Self {
        EventPayload::Ime(ImeEvent::action_only(action)).into()
    }

    pub fn ime_replace(start: i32, end: i32, text: impl Into<String>) -> Self {
        EventPayload::Ime(ImeEvent::replace_text(start, end, text)).into()
    }

    pub fn ime_select(start: i32, end: i32) -> Self {
        EventPayload::Ime(ImeEvent::set_selection(start, end)).into()
    }

    pub fn ime_composition(start: i32, end: i32) -> Self {
        EventPayload::Ime(ImeEvent::update_composition(start, end)).into()
    }

    pub fn ime_range(start: i32, end: i32, range: ImeRange) -> Self {
        EventPayload::Ime(ImeEvent::add_composition_range(start, end, range)).into()
    }

    // --- 视图 ---

    pub fn draw(rect: Rect) -> Self {
        EventPayload::Draw(rect).into()
    }

    pub fn size_changed(width: i32, height: i32, screen_width: i32, screen_height: i32) -> Self {
        EventPayload::SizeChanged {
            window: Point::new(width, height),
            screen: Point::new(screen_width, screen_height),
        }
        .into()
    }

    pub fn viewport(
        metrics: &ViewportMetrics,
        display_port: &DisplayPortMetrics,
    ) -> serde_json::Result<Self> {
        Ok(EventPayload::Viewport {
            subject: VIEWPORT_CHANGE_SUBJECT.to_string(),
            data: viewport_change_json(metrics, display_port)?,
        }
        .into())
    }

    pub fn screen_orientation(orientation: i16) -> Self {
        EventPayload::ScreenOrientationChanged(orientation).into()
    }

    pub fn thumbnail(tab_id: i32, width: i32, height: i32, buffer: impl Into<Arc<[u8]>>) -> Self {
        EventPayload::Thumbnail(Thumbnail {
            tab_id,
            width,
            height,
            buffer: buffer.into(),
        })
        .into()
    }

    // --- 导航 / 消息 ---

    pub fn load_uri(uri: impl Into<String>, mode: LoadMode) -> Self {
        EventPayload::LoadUri {
            uri: uri.into(),
            mode,
        }
        .into()
    }

    pub fn visited(data: impl Into<String>) -> Self {
        EventPayload::Visited { data: data.into() }.into()
    }

    /// 向运行时广播一条命名消息
    pub fn broadcast(subject: impl Into<String>, data: Option<String>) -> Self {
        EventPayload::Broadcast {
            subject: subject.into(),
            data,
        }
        .into()
    }

    pub fn call_observer(
        observer_key: impl Into<String>,
        topic: impl Into<String>,
        data: impl Into<String>,
    ) -> Self {
        EventPayload::CallObserver {
            observer_key: observer_key.into(),
            topic: topic.into(),
            data: data.into(),
        }
        .into()
    }

    pub fn remove_observer(observer_key: impl Into<String>) -> Self {
        EventPayload::RemoveObserver {
            observer_key: observer_key.into(),
        }
        .into()
    }
}
