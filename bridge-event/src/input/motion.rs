//! 多点触控与原生手势
//!
//! 每个触点的方向/半径遵循 W3C touch events 约定：
//! - 方向以角度表示，归一化到 [0°, 90°)；
//! - 恰好 90° 先折叠为 -90°，随后与其他负角度一样平移 +90°，并交换长短轴；
//! - 非负角度时 y 半径为长轴、x 半径为短轴。
//!
//! 单个触点读取失败只会让该触点退化为零尺寸/零位置占位，不影响整个事件。
//!
use crate::context::{Clock, CoordinateTransform};
use crate::error::{EnvelopeResult, EnvelopeUnavailable};
use crate::geometry::{Point, PointF};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// 平台触摸动作（已去掉指针索引位）
pub mod motion_action {
    pub const DOWN: i32 = 0;
    pub const UP: i32 = 1;
    pub const MOVE: i32 = 2;
    pub const CANCEL: i32 = 3;
    pub const OUTSIDE: i32 = 4;
    pub const POINTER_DOWN: i32 = 5;
    pub const POINTER_UP: i32 = 6;
    pub const HOVER_MOVE: i32 = 7;
    pub const SCROLL: i32 = 8;
    pub const HOVER_ENTER: i32 = 9;
    pub const HOVER_EXIT: i32 = 10;

    /// 需要采集触点的动作
    pub fn carries_points(action: i32) -> bool {
        matches!(
            action,
            DOWN | UP | MOVE | CANCEL | POINTER_DOWN | POINTER_UP | HOVER_MOVE | HOVER_ENTER
                | HOVER_EXIT
        )
    }
}

/// 单个触点的原始读数
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerSample {
    pub x: f32,
    pub y: f32,
    pub pointer_id: i32,
    /// 弧度
    pub orientation: f32,
    pub tool_major: f32,
    pub tool_minor: f32,
    pub pressure: f32,
}

/// 触点读取失败
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PointerReadError {
    #[error("pointer index {index} out of range")]
    OutOfRange { index: usize },
    #[error("sensor read failed: {0}")]
    Sensor(String),
    #[error("surface not ready for pointer {index}")]
    SurfaceNotReady { index: usize },
}

/// 平台触摸事件的只读视图
pub trait MotionOccurrence {
    fn action_masked(&self) -> i32;
    /// 发生变化的指针索引
    fn action_index(&self) -> usize;
    /// 单调时钟毫秒
    fn event_time(&self) -> i64;
    fn meta_state(&self) -> i32;
    fn pointer_count(&self) -> usize;
    fn pointer(&self, index: usize) -> Result<PointerSample, PointerReadError>;
}

/// 编码后的触点
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub position: Point,
    pub pointer_id: i32,
    /// 角度，[0, 90)
    pub orientation: f32,
    pub pressure: f32,
    pub radius: Point,
}

impl TouchPoint {
    /// 读取失败时的占位
    pub const PLACEHOLDER: TouchPoint = TouchPoint {
        position: Point::ZERO,
        pointer_id: 0,
        orientation: 0.0,
        pressure: 0.0,
        radius: Point::ZERO,
    };
}

/// 方向归一化，返回（角度, 半径）
pub fn normalize_orientation(radians: f32, tool_major: f32, tool_minor: f32) -> (f32, Point) {
    let mut degrees = f64::from(radians).to_degrees() as f32;
    if degrees == 90.0 {
        degrees = -90.0;
    }

    let major = tool_major as i32 / 2;
    let minor = tool_minor as i32 / 2;
    if degrees < 0.0 {
        (degrees + 90.0, Point::new(major, minor))
    } else {
        (degrees, Point::new(minor, major))
    }
}

/// 触摸事件载荷
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionEvent {
    action: i32,
    time: i64,
    meta_state: i32,
    pointer_index: i32,
    points: Vec<TouchPoint>,
}

impl MotionEvent {
    /// 读取触摸事件
    ///
    /// `keep_in_view_coordinates` 为 false 时，触点从视图像素转换为布局坐标。
    pub fn read(
        m: &impl MotionOccurrence,
        keep_in_view_coordinates: bool,
        transform: &dyn CoordinateTransform,
        clock: &dyn Clock,
    ) -> Self {
        let action = m.action_masked();
        let time = clock.now_millis() - clock.uptime_millis() + m.event_time();

        let (pointer_index, points) = if motion_action::carries_points(action) {
            let points = (0..m.pointer_count())
                .map(|i| Self::sample_point(m, i, keep_in_view_coordinates, transform))
                .collect();
            (m.action_index() as i32, points)
        } else {
            (-1, Vec::new())
        };

        Self {
            action,
            time,
            meta_state: m.meta_state(),
            pointer_index,
            points,
        }
    }

    fn sample_point(
        m: &impl MotionOccurrence,
        index: usize,
        keep_in_view_coordinates: bool,
        transform: &dyn CoordinateTransform,
    ) -> TouchPoint {
        match Self::read_point(m, index, keep_in_view_coordinates, transform) {
            Ok(point) => point,
            Err(err) => {
                warn!(index, error = %err, "motion point degraded to placeholder");
                TouchPoint::PLACEHOLDER
            }
        }
    }

    fn read_point(
        m: &impl MotionOccurrence,
        index: usize,
        keep_in_view_coordinates: bool,
        transform: &dyn CoordinateTransform,
    ) -> Result<TouchPoint, PointerReadError> {
        let sample = m.pointer(index)?;
        let mut position = PointF::new(sample.x, sample.y);
        if !keep_in_view_coordinates {
            position = transform
                .view_to_layer(position)
                .ok_or(PointerReadError::SurfaceNotReady { index })?;
        }

        let (orientation, radius) =
            normalize_orientation(sample.orientation, sample.tool_major, sample.tool_minor);

        Ok(TouchPoint {
            position: position.round(),
            pointer_id: sample.pointer_id,
            orientation,
            pressure: sample.pressure,
            radius,
        })
    }

    pub fn action(&self) -> i32 {
        self.action
    }

    pub fn time(&self) -> i64 {
        self.time
    }

    pub fn meta_state(&self) -> i32 {
        self.meta_state
    }

    /// 发生变化的触点索引；无触点动作时为 -1
    pub fn pointer_index(&self) -> i32 {
        self.pointer_index
    }

    pub fn count(&self) -> usize {
        self.points.len()
    }

    pub fn points(&self) -> &[TouchPoint] {
        &self.points
    }
}

/// 原生手势（缩放）载荷
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureEvent {
    action: i32,
    point: Point,
    size: f64,
    time: i64,
}

impl GestureEvent {
    /// 渲染表面未就绪时无法换算坐标，返回 `SurfaceNotReady`
    pub fn read(
        action: i32,
        point: PointF,
        size: f64,
        transform: &dyn CoordinateTransform,
        clock: &dyn Clock,
    ) -> EnvelopeResult<Self> {
        let layer = transform
            .view_to_layer(point)
            .ok_or(EnvelopeUnavailable::SurfaceNotReady)?;

        Ok(Self {
            action,
            point: layer.round(),
            size,
            time: clock.now_millis(),
        })
    }

    pub fn action(&self) -> i32 {
        self.action
    }

    pub fn point(&self) -> Point {
        self.point
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn time(&self) -> i64 {
        self.time
    }
}
