//! 稳定编号表（跨边界 ABI）
//!
//! 事件种类及其附属枚举的数值一经发布即固定：
//! - 只允许追加，新增项使用下一个未用编号；
//! - 已删除/未使用的编号保留为空洞，绝不压缩或重排。
//!
//! 原生侧按整数读取这些值，因此序列化形式同样是整数。
//!
use crate::error::EventError;
use serde::{Deserialize, Serialize};

macro_rules! stable_table {
    (@err "event kind", $v:expr) => { EventError::UnknownKind($v) };
    (@err $table:literal, $v:expr) => { EventError::UnknownValue { table: $table, value: $v } };
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $table:tt {
            $( $(#[$vmeta:meta])* $variant:ident = $value:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(into = "i32", try_from = "i32")]
        #[repr(i32)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant = $value, )+
        }

        impl $name {
            /// 全部取值（按编号升序）
            pub const ALL: &'static [$name] = &[ $( $name::$variant, )+ ];

            /// 稳定数值
            pub const fn value(self) -> i32 {
                self as i32
            }

            /// 表名（用于日志与错误）
            pub const fn table() -> &'static str {
                $table
            }
        }

        impl From<$name> for i32 {
            fn from(v: $name) -> Self {
                v.value()
            }
        }

        impl TryFrom<i32> for $name {
            type Error = EventError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                match value {
                    $( $value => Ok($name::$variant), )+
                    other => Err(stable_table!(@err $table, other)),
                }
            }
        }
    };
}

stable_table! {
    /// 事件种类
    ///
    /// 与原生侧的事件枚举保持同步；编号 4、11、13、14、16-18、23、24、26 为历史空洞。
    pub enum EventKind: "event kind" {
        NativePoke = 0,
        Key = 1,
        Motion = 2,
        Sensor = 3,
        Location = 5,
        Ime = 6,
        Draw = 7,
        SizeChanged = 8,
        AppBackgrounding = 9,
        AppForegrounding = 10,
        LoadUri = 12,
        Noop = 15,
        Broadcast = 19,
        Viewport = 20,
        Visited = 21,
        NetworkChanged = 22,
        Thumbnail = 25,
        ScreenOrientationChanged = 27,
        CompositorCreate = 28,
        CompositorPause = 29,
        CompositorResume = 30,
        NativeGesture = 31,
        ImeKey = 32,
        CallObserver = 33,
        RemoveObserver = 34,
        LowMemory = 35,
        NetworkLinkChange = 36,
    }
}

stable_table! {
    /// DOM KeyboardEvent 的按键位置常量
    pub enum DomKeyLocation: "dom key location" {
        Standard = 0,
        Left = 1,
        Right = 2,
        Numpad = 3,
        Mobile = 4,
        Joystick = 5,
    }
}

stable_table! {
    /// 输入法动作
    pub enum ImeAction: "ime action" {
        Synchronize = 0,
        ReplaceText = 1,
        SetSelection = 2,
        AddCompositionRange = 3,
        UpdateComposition = 4,
        RemoveComposition = 5,
        AcknowledgeFocus = 6,
    }
}

stable_table! {
    /// HAL 侧的传感器种类
    pub enum HalSensor: "hal sensor" {
        Orientation = 0,
        Acceleration = 1,
        Proximity = 2,
        LinearAcceleration = 3,
        Gyroscope = 4,
        Light = 5,
    }
}

stable_table! {
    /// HAL 侧的传感器精度
    pub enum SensorAccuracy: "sensor accuracy" {
        Unknown = -1,
        Unreliable = 0,
        Low = 1,
        Med = 2,
        High = 3,
    }
}

/// 输入法组合区间的类型
pub mod ime_range {
    pub const CARET_POSITION: i32 = 1;
    pub const RAW_INPUT: i32 = 2;
    pub const SELECTED_RAW_TEXT: i32 = 3;
    pub const CONVERTED_TEXT: i32 = 4;
    pub const SELECTED_CONVERTED_TEXT: i32 = 5;

    /// 下划线样式
    pub const LINE_NONE: i32 = 0;
    pub const LINE_DOTTED: i32 = 1;
    pub const LINE_DASHED: i32 = 2;
    pub const LINE_SOLID: i32 = 3;
    pub const LINE_DOUBLE: i32 = 4;
    pub const LINE_WAVY: i32 = 5;

    /// 样式位标志
    pub const UNDERLINE: i32 = 1;
    pub const FORECOLOR: i32 = 2;
    pub const BACKCOLOR: i32 = 4;
    pub const LINECOLOR: i32 = 8;
}

/// 原生手势动作（缩放）
pub mod gesture_action {
    pub const MAGNIFY_START: i32 = 11;
    pub const MAGNIFY: i32 = 12;
    pub const MAGNIFY_END: i32 = 13;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_values_are_pinned() {
        let pinned = [
            (EventKind::NativePoke, 0),
            (EventKind::Key, 1),
            (EventKind::Motion, 2),
            (EventKind::Sensor, 3),
            (EventKind::Location, 5),
            (EventKind::Ime, 6),
            (EventKind::Draw, 7),
            (EventKind::SizeChanged, 8),
            (EventKind::AppBackgrounding, 9),
            (EventKind::AppForegrounding, 10),
            (EventKind::LoadUri, 12),
            (EventKind::Noop, 15),
            (EventKind::Broadcast, 19),
            (EventKind::Viewport, 20),
            (EventKind::Visited, 21),
            (EventKind::NetworkChanged, 22),
            (EventKind::Thumbnail, 25),
            (EventKind::ScreenOrientationChanged, 27),
            (EventKind::CompositorCreate, 28),
            (EventKind::CompositorPause, 29),
            (EventKind::CompositorResume, 30),
            (EventKind::NativeGesture, 31),
            (EventKind::ImeKey, 32),
            (EventKind::CallObserver, 33),
            (EventKind::RemoveObserver, 34),
            (EventKind::LowMemory, 35),
            (EventKind::NetworkLinkChange, 36),
        ];
        assert_eq!(pinned.len(), EventKind::ALL.len());
        for (kind, value) in pinned {
            assert_eq!(kind.value(), value, "{kind:?}");
            assert_eq!(EventKind::try_from(value), Ok(kind));
        }
    }

    #[test]
    fn gaps_stay_unassigned() {
        for gap in [4, 11, 13, 14, 16, 17, 18, 23, 24, 26, 37] {
            assert_eq!(EventKind::try_from(gap), Err(EventError::UnknownKind(gap)));
        }
    }

    #[test]
    fn all_is_strictly_ascending() {
        assert!(EventKind::ALL.windows(2).all(|w| w[0].value() < w[1].value()));
    }

    #[test]
    fn kinds_serialize_as_integers() {
        let json = serde_json::to_string(&EventKind::NetworkLinkChange).unwrap();
        assert_eq!(json, "36");
        let back: EventKind = serde_json::from_str("31").unwrap();
        assert_eq!(back, EventKind::NativeGesture);
        assert!(serde_json::from_str::<EventKind>("4").is_err());
    }

    #[test]
    fn auxiliary_tables_report_their_name() {
        assert_eq!(
            ImeAction::try_from(9),
            Err(EventError::UnknownValue {
                table: "ime action",
                value: 9
            })
        );
        assert_eq!(SensorAccuracy::Unknown.value(), -1);
        assert_eq!(DomKeyLocation::table(), "dom key location");
    }
}
