//! 输入事件（按键、多点触控、原生手势）
//!
//! 原始输入以只读 trait 的形式传入，构造过程只读取、不保留。
//!
pub mod key;
pub mod keycode;
pub mod motion;

pub use key::{KeyEvent, KeyOccurrence};
pub use motion::{
    GestureEvent, MotionEvent, MotionOccurrence, PointerReadError, PointerSample, TouchPoint,
    motion_action, normalize_orientation,
};
