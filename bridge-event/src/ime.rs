//! 输入法（IME）事件
//!
use crate::kind::ImeAction;
use bon::Builder;
use serde::{Deserialize, Serialize};

/// 组合区间的样式描述
#[derive(Builder, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImeRange {
    /// 见 `kind::ime_range` 中的区间类型
    range_type: i32,
    #[builder(default)]
    styles: i32,
    #[builder(default)]
    line_style: i32,
    #[builder(default)]
    bold_line: bool,
    #[builder(default)]
    fore_color: i32,
    #[builder(default)]
    back_color: i32,
    #[builder(default)]
    line_color: i32,
}

impl ImeRange {
    pub fn range_type(&self) -> i32 {
        self.range_type
    }

    pub fn styles(&self) -> i32 {
        self.styles
    }

    pub fn line_style(&self) -> i32 {
        self.line_style
    }

    pub fn bold_line(&self) -> bool {
        self.bold_line
    }

    pub fn fore_color(&self) -> i32 {
        self.fore_color
    }

    pub fn back_color(&self) -> i32 {
        self.back_color
    }

    pub fn line_color(&self) -> i32 {
        self.line_color
    }
}

/// 输入法事件载荷
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImeEvent {
    action: ImeAction,
    start: i32,
    end: i32,
    text: Option<String>,
    range: Option<ImeRange>,
}

impl ImeEvent {
    pub fn action_only(action: ImeAction) -> Self {
        Self {
            action,
            start: 0,
            end: 0,
            text: None,
            range: None,
        }
    }

    pub fn replace_text(start: i32, end: i32, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: Some(text.into()),
            ..Self::action_only(ImeAction::ReplaceText)
        }
    }

    pub fn set_selection(start: i32, end: i32) -> Self {
        Self {
            start,
            end,
            ..Self::action_only(ImeAction::SetSelection)
        }
    }

    pub fn update_composition(start: i32, end: i32) -> Self {
        Self {
            start,
            end,
            ..Self::action_only(ImeAction::UpdateComposition)
        }
    }

    pub fn add_composition_range(start: i32, end: i32, range: ImeRange) -> Self {
        Self {
            start,
            end,
            range: Some(range),
            ..Self::action_only(ImeAction::AddCompositionRange)
        }
    }

    pub fn action(&self) -> ImeAction {
        self.action
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn range(&self) -> Option<&ImeRange> {
        self.range.as_ref()
    }
}
