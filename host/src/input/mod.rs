//! # Input 模块
//!
//! 命令行时间线输入：把 `"<毫秒>:<动作>"` 形式的文本解析为定时动作，并应用到 Stage。
//!
//! ```text
//! 500:next          手动下一张
//! 800:prev          手动上一张
//! 1200:goto:3       跳转到索引 3
//! 0:autoplay:on     开启自动播放
//! 2000:teardown     卸载轮播
//! ```
//!
//! 负数索引在这里就被拒绝，不会进入控制器。

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::scheduler::WidgetId;
use crate::stage::{Stage, StageError, StageEvent};

/// 输入解析错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// 缺少时间前缀
    #[error("缺少时间前缀: '{0}'（格式为 <毫秒>:<动作>）")]
    MissingTime(String),

    /// 时间不是非负整数
    #[error("无效的时间 '{0}'")]
    InvalidTime(String),

    /// 未知动作
    #[error("未知动作 '{0}'")]
    UnknownAction(String),

    /// 缺少参数
    #[error("动作 '{action}' 缺少参数")]
    MissingArgument { action: String },

    /// 负数索引
    #[error("幻灯片索引不能为负数: {0}")]
    NegativeIndex(i64),

    /// 无效参数
    #[error("动作 '{action}' 的参数 '{value}' 无效")]
    InvalidArgument { action: String, value: String },
}

/// 轮播动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Next,
    Previous,
    GoTo(usize),
    AutoPlay(bool),
    Teardown,
}

impl FromStr for Action {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name.trim(), Some(arg.trim())),
            None => (s.trim(), None),
        };

        match name.to_ascii_lowercase().as_str() {
            "next" => Ok(Action::Next),
            "prev" | "previous" => Ok(Action::Previous),
            "teardown" => Ok(Action::Teardown),
            "goto" => {
                let value = arg.ok_or_else(|| InputError::MissingArgument {
                    action: name.to_string(),
                })?;
                let index: i64 = value.parse().map_err(|_| InputError::InvalidArgument {
                    action: name.to_string(),
                    value: value.to_string(),
                })?;
                let index = usize::try_from(index).map_err(|_| InputError::NegativeIndex(index))?;
                Ok(Action::GoTo(index))
            }
            "autoplay" => {
                let value = arg.ok_or_else(|| InputError::MissingArgument {
                    action: name.to_string(),
                })?;
                match value {
                    "on" | "true" => Ok(Action::AutoPlay(true)),
                    "off" | "false" => Ok(Action::AutoPlay(false)),
                    other => Err(InputError::InvalidArgument {
                        action: name.to_string(),
                        value: other.to_string(),
                    }),
                }
            }
            _ => Err(InputError::UnknownAction(name.to_string())),
        }
    }
}

/// 定时动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedAction {
    /// 触发时间（自时间线开始）
    pub at: Duration,
    pub action: Action,
}

impl FromStr for TimedAction {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (time, action) = s
            .split_once(':')
            .ok_or_else(|| InputError::MissingTime(s.to_string()))?;
        let ms: u64 = time
            .trim()
            .parse()
            .map_err(|_| InputError::InvalidTime(time.to_string()))?;
        Ok(Self {
            at: Duration::from_millis(ms),
            action: action.parse()?,
        })
    }
}

/// 把动作应用到轮播
///
/// 返回需要渲染的事件（切换自动播放与卸载不产生事件）。
pub fn apply_action(
    stage: &mut Stage,
    id: WidgetId,
    action: Action,
) -> Result<Option<StageEvent>, StageError> {
    match action {
        Action::Next => stage.carousel_next(id).map(Some),
        Action::Previous => stage.carousel_previous(id).map(Some),
        Action::GoTo(index) => stage.carousel_go_to(id, index).map(Some),
        Action::AutoPlay(enabled) => stage.carousel_set_auto_play(id, enabled).map(|_| None),
        Action::Teardown => stage.unmount(id).map(|_| None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_actions() {
        assert_eq!("next".parse::<Action>(), Ok(Action::Next));
        assert_eq!("PREV".parse::<Action>(), Ok(Action::Previous));
        assert_eq!("goto:3".parse::<Action>(), Ok(Action::GoTo(3)));
        assert_eq!("autoplay:off".parse::<Action>(), Ok(Action::AutoPlay(false)));
        assert_eq!("teardown".parse::<Action>(), Ok(Action::Teardown));
    }

    #[test]
    fn test_parse_timed_action() {
        let timed: TimedAction = "1200:goto:2".parse().unwrap();
        assert_eq!(timed.at, Duration::from_millis(1200));
        assert_eq!(timed.action, Action::GoTo(2));
    }

    #[test]
    fn test_negative_index_rejected() {
        assert_eq!("goto:-1".parse::<Action>(), Err(InputError::NegativeIndex(-1)));
        assert!(matches!(
            "100:goto:-5".parse::<TimedAction>(),
            Err(InputError::NegativeIndex(-5))
        ));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "next".parse::<TimedAction>(),
            Err(InputError::MissingTime(_))
        ));
        assert!(matches!(
            "soon:next".parse::<TimedAction>(),
            Err(InputError::InvalidTime(_))
        ));
        assert_eq!(
            "jump".parse::<Action>(),
            Err(InputError::UnknownAction("jump".to_string()))
        );
        assert!(matches!(
            "goto".parse::<Action>(),
            Err(InputError::MissingArgument { .. })
        ));
        assert!(matches!(
            "goto:x".parse::<Action>(),
            Err(InputError::InvalidArgument { .. })
        ));
        assert!(matches!(
            "autoplay:maybe".parse::<Action>(),
            Err(InputError::InvalidArgument { .. })
        ));
    }
}
