//! # Stage 模块
//!
//! 页面组合层：持有调度器、已挂载的组件与反馈音效资源。
//!
//! ## 执行模型
//!
//! ```text
//! advance(dt) -> Vec<StageEvent>
//! ```
//!
//! 1. 推进调度器时钟，取出到期的 Wakeup
//! 2. 按所有者分发给组件；组件已卸载则丢弃
//! 3. 组件校验句柄后推进状态，返回需要渲染的事件

use std::collections::BTreeMap;
use std::time::Duration;

use showcase_runtime::{CounterAnimator, FeedbackCue, RuntimeError, SlideChange};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::audio::FeedbackAudio;
use crate::scheduler::{FrameScheduler, TaskKind, WidgetId};
use crate::views::{CarouselView, CounterView};

/// 幻灯片切换原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeCause {
    /// 用户操作
    Manual,
    /// 自动播放
    Auto,
}

/// 需要宿主渲染的事件
#[derive(Debug, Clone, PartialEq)]
pub enum StageEvent {
    /// 计数器新的一帧
    CounterFrame {
        id: WidgetId,
        text: String,
        finished: bool,
    },
    /// 轮播切换
    SlideChanged {
        id: WidgetId,
        change: SlideChange,
        title: String,
        cause: ChangeCause,
    },
}

/// Stage 错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StageError {
    /// 组件不存在（未挂载或已卸载）
    #[error("组件 {0} 不存在")]
    UnknownWidget(WidgetId),

    /// 组件类型不匹配
    #[error("组件 {id} 不是{expected}")]
    WrongKind { id: WidgetId, expected: &'static str },

    /// 帧间隔为 0，时钟无法推进
    #[error("帧间隔必须大于 0")]
    ZeroFrame,

    /// runtime 错误
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// 已挂载的组件
#[derive(Debug)]
enum Widget {
    Counter(CounterView),
    Carousel(CarouselView),
}

/// 页面
#[derive(Debug, Default)]
pub struct Stage {
    scheduler: FrameScheduler,
    widgets: BTreeMap<WidgetId, Widget>,
    next_id: u64,
    audio: Option<FeedbackAudio>,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 附加反馈音效资源（手动翻页时播放点击音）
    pub fn with_audio(mut self, audio: FeedbackAudio) -> Self {
        self.audio = Some(audio);
        self
    }

    /// 当前时间
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    /// 挂载计数器
    pub fn mount_counter(&mut self, value: impl Into<String>, duration: Duration) -> WidgetId {
        let id = self.alloc_id();
        let animator = CounterAnimator::new(value, duration);
        info!(id = %id, value = animator.source(), "挂载计数器");
        let view = CounterView::new(id, animator, self.scheduler.now());
        self.widgets.insert(id, Widget::Counter(view));
        id
    }

    /// 挂载轮播
    pub fn mount_carousel(
        &mut self,
        slides: Vec<String>,
        auto_play: bool,
        interval: Duration,
    ) -> Result<WidgetId, StageError> {
        let id = self.alloc_id();
        let count = slides.len();
        let view = CarouselView::mount(id, slides, auto_play, interval, &mut self.scheduler)?;
        info!(id = %id, slides = count, auto_play, "挂载轮播");
        self.widgets.insert(id, Widget::Carousel(view));
        Ok(id)
    }

    /// 组件进入/离开视口
    pub fn set_visible(
        &mut self,
        id: WidgetId,
        visible: bool,
    ) -> Result<Option<StageEvent>, StageError> {
        let scheduler = &mut self.scheduler;
        match self.widgets.get_mut(&id) {
            Some(Widget::Counter(view)) => Ok(view.set_visible(visible, scheduler)),
            // 轮播不依赖可见性
            Some(Widget::Carousel(_)) => Ok(None),
            None => Err(StageError::UnknownWidget(id)),
        }
    }

    pub fn carousel_next(&mut self, id: WidgetId) -> Result<StageEvent, StageError> {
        let event = {
            let scheduler = &self.scheduler;
            carousel_mut(&mut self.widgets, id)?.next(scheduler)?
        };
        self.play_feedback(FeedbackCue::Click);
        Ok(event)
    }

    pub fn carousel_previous(&mut self, id: WidgetId) -> Result<StageEvent, StageError> {
        let event = {
            let scheduler = &self.scheduler;
            carousel_mut(&mut self.widgets, id)?.previous(scheduler)?
        };
        self.play_feedback(FeedbackCue::Click);
        Ok(event)
    }

    pub fn carousel_go_to(&mut self, id: WidgetId, index: usize) -> Result<StageEvent, StageError> {
        let result = {
            let scheduler = &self.scheduler;
            carousel_mut(&mut self.widgets, id)?.go_to(index, scheduler)
        };
        match result {
            Ok(event) => {
                self.play_feedback(FeedbackCue::Click);
                Ok(event)
            }
            Err(e) => {
                warn!(id = %id, index, error = %e, "拒绝跳转");
                Err(e.into())
            }
        }
    }

    pub fn carousel_set_auto_play(&mut self, id: WidgetId, enabled: bool) -> Result<(), StageError> {
        let scheduler = &mut self.scheduler;
        carousel_mut(&mut self.widgets, id)?.set_auto_play(enabled, scheduler)?;
        debug!(id = %id, enabled, "切换自动播放");
        Ok(())
    }

    /// 卸载组件，取消其全部等待中的任务
    pub fn unmount(&mut self, id: WidgetId) -> Result<(), StageError> {
        let mut widget = self
            .widgets
            .remove(&id)
            .ok_or(StageError::UnknownWidget(id))?;
        match &mut widget {
            Widget::Counter(view) => view.teardown(&mut self.scheduler),
            Widget::Carousel(view) => view.teardown(&mut self.scheduler),
        }
        let leftover = self.scheduler.cancel_owner(id);
        info!(id = %id, leftover, "卸载组件");
        Ok(())
    }

    /// 推进一帧
    pub fn advance(&mut self, dt: Duration) -> Vec<StageEvent> {
        let wakeups = self.scheduler.advance(dt);
        let mut events = Vec::new();

        for wakeup in wakeups {
            let scheduler = &mut self.scheduler;
            let Some(widget) = self.widgets.get_mut(&wakeup.owner) else {
                debug!(owner = %wakeup.owner, "组件已卸载，丢弃回调");
                continue;
            };
            match (widget, wakeup.kind) {
                (Widget::Counter(view), TaskKind::Frame) => {
                    events.extend(view.on_frame(wakeup.handle, scheduler));
                }
                (Widget::Carousel(view), TaskKind::Timeout) => {
                    events.extend(view.on_timeout(wakeup.handle, scheduler));
                }
                (_, kind) => {
                    debug!(owner = %wakeup.owner, ?kind, "组件不处理此类回调");
                }
            }
        }

        events
    }

    /// 计数器当前文本
    pub fn counter_text(&self, id: WidgetId) -> Option<&str> {
        match self.widgets.get(&id) {
            Some(Widget::Counter(view)) => Some(view.text()),
            _ => None,
        }
    }

    /// 轮播当前索引
    pub fn carousel_index(&self, id: WidgetId) -> Option<usize> {
        match self.widgets.get(&id) {
            Some(Widget::Carousel(view)) => Some(view.current()),
            _ => None,
        }
    }

    /// 轮播视图（只读）
    pub fn carousel(&self, id: WidgetId) -> Option<&CarouselView> {
        match self.widgets.get(&id) {
            Some(Widget::Carousel(view)) => Some(view),
            _ => None,
        }
    }

    pub fn is_mounted(&self, id: WidgetId) -> bool {
        self.widgets.contains_key(&id)
    }

    /// 是否还有需要驱动的任务
    pub fn is_idle(&self) -> bool {
        self.scheduler.pending() == 0
    }

    /// 卸载全部组件并关闭音效资源
    pub fn shutdown(&mut self) {
        let ids: Vec<WidgetId> = self.widgets.keys().copied().collect();
        for id in ids {
            // 遍历的是当前已挂载的 id，不会失败
            let _ = self.unmount(id);
        }
        if let Some(audio) = self.audio.as_mut() {
            audio.close();
        }
    }

    fn play_feedback(&mut self, cue: FeedbackCue) {
        let now = self.scheduler.now();
        if let Some(audio) = self.audio.as_mut() {
            audio.play(cue, now);
        }
    }

    fn alloc_id(&mut self) -> WidgetId {
        self.next_id += 1;
        WidgetId(self.next_id)
    }
}

fn carousel_mut(
    widgets: &mut BTreeMap<WidgetId, Widget>,
    id: WidgetId,
) -> Result<&mut CarouselView, StageError> {
    match widgets.get_mut(&id) {
        Some(Widget::Carousel(view)) => Ok(view),
        Some(_) => Err(StageError::WrongKind {
            id,
            expected: "轮播",
        }),
        None => Err(StageError::UnknownWidget(id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_unknown_widget() {
        let mut stage = Stage::new();
        assert_eq!(
            stage.carousel_next(WidgetId(42)),
            Err(StageError::UnknownWidget(WidgetId(42)))
        );
        assert!(stage.unmount(WidgetId(42)).is_err());
    }

    #[test]
    fn test_wrong_kind() {
        let mut stage = Stage::new();
        let id = stage.mount_counter("10", ms(100));
        assert!(matches!(
            stage.carousel_next(id),
            Err(StageError::WrongKind { .. })
        ));
    }

    #[test]
    fn test_counter_runs_only_after_visible() {
        let mut stage = Stage::new();
        let id = stage.mount_counter("100", ms(100));
        assert!(stage.advance(ms(500)).is_empty());
        assert_eq!(stage.counter_text(id), Some("0"));

        stage.set_visible(id, true).unwrap();
        while !stage.is_idle() {
            stage.advance(ms(16));
        }
        assert_eq!(stage.counter_text(id), Some("100"));
    }

    #[test]
    fn test_empty_carousel_rejected() {
        let mut stage = Stage::new();
        let result = stage.mount_carousel(Vec::new(), false, ms(1000));
        assert!(matches!(result, Err(StageError::Runtime(_))));
    }
}
