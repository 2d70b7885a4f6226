//! 构造事件所需的环境上下文
//!
//! 事件构造本身是纯函数，但部分事件依赖外部状态：
//! - `CoordinateTransform`：视图坐标 → 布局坐标，渲染表面未就绪时返回 `None`；
//! - `Clock`：墙钟与单调开机时长，用于把输入事件时间换算为墙钟时间。
//!
use crate::geometry::PointF;
use chrono::Utc;
use std::time::Instant;

/// 坐标变换（由渲染层提供）
pub trait CoordinateTransform: Send + Sync {
    /// 将视图坐标转换为布局坐标；目标表面尚不存在时返回 `None`
    fn view_to_layer(&self, point: PointF) -> Option<PointF>;
}

/// 恒等变换：视图坐标即布局坐标
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTransform;

impl CoordinateTransform for IdentityTransform {
    fn view_to_layer(&self, point: PointF) -> Option<PointF> {
        Some(point)
    }
}

/// 渲染表面尚未创建时使用的变换
#[derive(Debug, Clone, Copy, Default)]
pub struct SurfaceNotReady;

impl CoordinateTransform for SurfaceNotReady {
    fn view_to_layer(&self, _point: PointF) -> Option<PointF> {
        None
    }
}

impl<F> CoordinateTransform for F
where
    F: Fn(PointF) -> Option<PointF> + Send + Sync,
{
    fn view_to_layer(&self, point: PointF) -> Option<PointF> {
        self(point)
    }
}

/// 时钟
pub trait Clock: Send + Sync {
    /// 墙钟毫秒（Unix 纪元）
    fn now_millis(&self) -> i64;

    /// 单调时钟毫秒（输入事件的时间基准）
    fn uptime_millis(&self) -> i64;
}

/// 系统时钟：墙钟取自 chrono，开机时长以创建时刻为零点
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    started: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }

    fn uptime_millis(&self) -> i64 {
        i64::try_from(self.started.elapsed().as_millis()).unwrap_or(i64::MAX)
    }
}

/// 固定时钟（测试与回放）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedClock {
    pub now_millis: i64,
    pub uptime_millis: i64,
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.now_millis
    }

    fn uptime_millis(&self) -> i64 {
        self.uptime_millis
    }
}
