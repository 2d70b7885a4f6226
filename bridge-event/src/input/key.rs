use super::keycode;
use crate::kind::DomKeyLocation;
use serde::{Deserialize, Serialize};

/// 平台按键事件的只读视图
pub trait KeyOccurrence {
    fn action(&self) -> i32;
    fn event_time(&self) -> i64;
    fn meta_state(&self) -> i32;
    fn flags(&self) -> i32;
    fn key_code(&self) -> i32;
    /// 在给定修饰键状态下解析出的字符（无字符时为 0）
    fn unicode_char(&self, meta_state: i32) -> i32;
    fn repeat_count(&self) -> i32;
    /// 多字符事件携带的文本
    fn characters(&self) -> Option<&str>;
}

/// 按键事件载荷
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    action: i32,
    time: i64,
    meta_state: i32,
    flags: i32,
    key_code: i32,
    unicode_char: i32,
    base_unicode_char: i32,
    repeat_count: i32,
    characters: Option<String>,
    dom_key_location: DomKeyLocation,
}

impl KeyEvent {
    /// 读取按键事件
    ///
    /// 部分软键盘生成的事件不带修饰键状态，因此需要与单独累积的
    /// `modifier_state` 合并；`base_unicode_char` 为不带修饰键的字符
    /// （例如 Ctrl+A 时 `unicode_char` 为 0，但运行时仍需要 'a'）。
    pub fn read(k: &impl KeyOccurrence, modifier_state: i32) -> Self {
        let meta_state = k.meta_state() | modifier_state;
        let key_code = k.key_code();
        let dom_key_location = if keycode::is_joystick_button(key_code) {
            DomKeyLocation::Joystick
        } else {
            DomKeyLocation::Mobile
        };

        Self {
            action: k.action(),
            time: k.event_time(),
            meta_state,
            flags: k.flags(),
            key_code,
            unicode_char: k.unicode_char(meta_state),
            base_unicode_char: k.unicode_char(0),
            repeat_count: k.repeat_count(),
            characters: k.characters().map(str::to_owned),
            dom_key_location,
        }
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

    pub fn flags(&self) -> i32 {
        self.flags
    }

    pub fn key_code(&self) -> i32 {
        self.key_code
    }

    pub fn unicode_char(&self) -> i32 {
        self.unicode_char
    }

    pub fn base_unicode_char(&self) -> i32 {
        self.base_unicode_char
    }

    pub fn repeat_count(&self) -> i32 {
        self.repeat_count
    }

    pub fn characters(&self) -> Option<&str> {
        self.characters.as_deref()
    }

    pub fn dom_key_location(&self) -> DomKeyLocation {
        self.dom_key_location
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const META_CTRL_ON: i32 = 0x1000;

    struct CtrlA;

    impl KeyOccurrence for CtrlA {
        fn action(&self) -> i32 {
            0
        }
        fn event_time(&self) -> i64 {
            1234
        }
        fn meta_state(&self) -> i32 {
            0
        }
        fn flags(&self) -> i32 {
            0
        }
        fn key_code(&self) -> i32 {
            29
        }
        fn unicode_char(&self, meta_state: i32) -> i32 {
            if meta_state & META_CTRL_ON != 0 { 0 } else { 'a' as i32 }
        }
        fn repeat_count(&self) -> i32 {
            0
        }
        fn characters(&self) -> Option<&str> {
            None
        }
    }

    #[test]
    fn accumulated_modifiers_are_merged() {
        let ev = KeyEvent::read(&CtrlA, META_CTRL_ON);
        assert_eq!(ev.meta_state(), META_CTRL_ON);
        assert_eq!(ev.unicode_char(), 0);
        assert_eq!(ev.base_unicode_char(), 'a' as i32);
        assert_eq!(ev.dom_key_location(), DomKeyLocation::Mobile);
        assert_eq!(ev.time(), 1234);
    }
}
