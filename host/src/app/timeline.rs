//! 时间线驱动：按固定帧间隔推进 Stage，并在指定时刻应用动作。

use std::time::Duration;

use tracing::warn;

use crate::input::{Action, TimedAction, apply_action};
use crate::scheduler::WidgetId;
use crate::stage::{Stage, StageError, StageEvent};

/// 时间线记录
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineEntry {
    /// 渲染事件
    Event { at: Duration, event: StageEvent },
    /// 被拒绝的动作
    Rejected {
        at: Duration,
        action: Action,
        error: StageError,
    },
}

impl TimelineEntry {
    pub fn at(&self) -> Duration {
        match self {
            TimelineEntry::Event { at, .. } | TimelineEntry::Rejected { at, .. } => *at,
        }
    }

    pub fn event(&self) -> Option<&StageEvent> {
        match self {
            TimelineEntry::Event { event, .. } => Some(event),
            TimelineEntry::Rejected { .. } => None,
        }
    }
}

/// 驱动一个轮播的时间线
///
/// 动作在 `stage.now() >= at` 的第一帧之前应用；被拒绝的动作会被记录，不会中断时间线。
/// `frame` 为 0 时返回 [`StageError::ZeroFrame`]。
pub fn run_carousel(
    stage: &mut Stage,
    id: WidgetId,
    actions: &[TimedAction],
    run_for: Duration,
    frame: Duration,
) -> Result<Vec<TimelineEntry>, StageError> {
    if frame.is_zero() {
        return Err(StageError::ZeroFrame);
    }

    let mut actions = actions.to_vec();
    actions.sort_by_key(|a| a.at);
    let mut queue = actions.into_iter().peekable();

    let start = stage.now();
    let mut entries = Vec::new();

    loop {
        let now = stage.now();
        while let Some(timed) = queue.next_if(|a| start + a.at <= now) {
            match apply_action(stage, id, timed.action) {
                Ok(Some(event)) => entries.push(TimelineEntry::Event { at: now, event }),
                Ok(None) => {}
                Err(error) => {
                    warn!(action = ?timed.action, error = %error, "动作被拒绝");
                    entries.push(TimelineEntry::Rejected {
                        at: now,
                        action: timed.action,
                        error,
                    });
                }
            }
        }

        if now >= start + run_for {
            break;
        }

        let events = stage.advance(frame);
        let at = stage.now();
        entries.extend(events.into_iter().map(|event| TimelineEntry::Event { at, event }));
    }

    Ok(entries)
}

/// 播放一个计数器直到结束，返回每一帧的文本
pub fn run_counter(
    value: &str,
    duration: Duration,
    frame: Duration,
) -> Result<Vec<String>, StageError> {
    if frame.is_zero() {
        return Err(StageError::ZeroFrame);
    }

    let mut stage = Stage::new();
    let id = stage.mount_counter(value, duration);
    let mut frames = Vec::new();

    if let Some(StageEvent::CounterFrame { text, .. }) = stage.set_visible(id, true)? {
        frames.push(text);
    }
    while !stage.is_idle() {
        for event in stage.advance(frame) {
            if let StageEvent::CounterFrame { text, .. } = event {
                frames.push(text);
            }
        }
    }

    stage.shutdown();
    Ok(frames)
}
