//! 视口变化
//!
//! 视口事件以广播形式送达运行时：主题固定为 `Viewport:Change`，
//! 数据为描述视口与显示端口的 JSON 文本。
//!
use bon::Builder;
use serde::{Deserialize, Serialize};

pub const VIEWPORT_CHANGE_SUBJECT: &str = "Viewport:Change";

/// 当前视口度量
#[derive(Builder, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportMetrics {
    pub viewport_rect_left: f32,
    pub viewport_rect_top: f32,
    #[builder(default = 1.0)]
    pub zoom_factor: f32,
    #[builder(default)]
    pub margin_left: f32,
    #[builder(default)]
    pub margin_top: f32,
    #[builder(default)]
    pub margin_right: f32,
    #[builder(default)]
    pub margin_bottom: f32,
}

/// 显示端口（预渲染区域）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayPortMetrics {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub resolution: f32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ViewportChange<'a> {
    x: f32,
    y: f32,
    zoom: f32,
    fixed_margin_left: f32,
    fixed_margin_top: f32,
    fixed_margin_right: f32,
    fixed_margin_bottom: f32,
    display_port: &'a DisplayPortMetrics,
}

/// 生成 `Viewport:Change` 的数据文本
pub fn viewport_change_json(
    metrics: &ViewportMetrics,
    display_port: &DisplayPortMetrics,
) -> serde_json::Result<String> {
    serde_json::to_string(&ViewportChange {
        x: metrics.viewport_rect_left,
        y: metrics.viewport_rect_top,
        zoom: metrics.zoom_factor,
        fixed_margin_left: metrics.margin_left,
        fixed_margin_top: metrics.margin_top,
        fixed_margin_right: metrics.margin_right,
        fixed_margin_bottom: metrics.margin_bottom,
        display_port,
    })
}
