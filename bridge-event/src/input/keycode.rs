//! 平台按键码（仅列出编码时需要区分的部分）

pub const DPAD_UP: i32 = 19;
pub const DPAD_DOWN: i32 = 20;
pub const DPAD_LEFT: i32 = 21;
pub const DPAD_RIGHT: i32 = 22;
pub const DPAD_CENTER: i32 = 23;

pub const BUTTON_A: i32 = 96;
pub const BUTTON_B: i32 = 97;
pub const BUTTON_C: i32 = 98;
pub const BUTTON_X: i32 = 99;
pub const BUTTON_Y: i32 = 100;
pub const BUTTON_Z: i32 = 101;
pub const BUTTON_L1: i32 = 102;
pub const BUTTON_R1: i32 = 103;
pub const BUTTON_L2: i32 = 104;
pub const BUTTON_R2: i32 = 105;
pub const BUTTON_THUMBL: i32 = 106;
pub const BUTTON_THUMBR: i32 = 107;
pub const BUTTON_START: i32 = 108;
pub const BUTTON_SELECT: i32 = 109;
pub const BUTTON_MODE: i32 = 110;

pub const BUTTON_1: i32 = 188;
pub const BUTTON_16: i32 = 203;

/// 方向键
pub fn is_dpad(key_code: i32) -> bool {
    (DPAD_UP..=DPAD_CENTER).contains(&key_code)
}

/// 手柄按键（A..MODE 与 1..16）
pub fn is_gamepad_button(key_code: i32) -> bool {
    (BUTTON_A..=BUTTON_MODE).contains(&key_code) || (BUTTON_1..=BUTTON_16).contains(&key_code)
}

/// 方向键与手柄按键都按“摇杆”位置上报
pub fn is_joystick_button(key_code: i32) -> bool {
    is_dpad(key_code) || is_gamepad_button(key_code)
}
