//! # CounterView
//!
//! 把 [`CounterAnimator`] 接到帧调度器上：首次可见时启动，逐帧推进直到结束。

use std::time::Duration;

use showcase_runtime::{CounterAnimator, FrameRequest};
use tracing::{debug, warn};

use crate::scheduler::{FrameScheduler, TaskHandle, WidgetId};
use crate::stage::StageEvent;

/// 计数器视图
#[derive(Debug)]
pub struct CounterView {
    id: WidgetId,
    animator: CounterAnimator,
    /// 挂载时间（计数器内部时间以此为零点）
    mounted_at: Duration,
    /// 等待中的帧回调
    pending: Option<TaskHandle>,
}

impl CounterView {
    pub fn new(id: WidgetId, animator: CounterAnimator, mounted_at: Duration) -> Self {
        if !animator.is_animated() {
            warn!(id = %id, value = animator.source(), "展示值中没有数字，按原文显示");
        }
        Self {
            id,
            animator,
            mounted_at,
            pending: None,
        }
    }

    /// 可见性变化
    pub fn set_visible(&mut self, visible: bool, scheduler: &mut FrameScheduler) -> Option<StageEvent> {
        if !visible {
            return None;
        }
        let request = self.animator.on_visible(self.local(scheduler));
        self.handle_request(request, scheduler)
    }

    /// 帧回调
    ///
    /// 句柄与当前等待的回调不一致时忽略（已取消或已过期）。
    pub fn on_frame(&mut self, handle: TaskHandle, scheduler: &mut FrameScheduler) -> Option<StageEvent> {
        if self.pending != Some(handle) {
            debug!(id = %self.id, "忽略过期的帧回调");
            return None;
        }
        self.pending = None;
        let request = self.animator.on_frame(self.local(scheduler));
        self.handle_request(request, scheduler)
    }

    /// 卸载：取消等待中的帧回调
    pub fn teardown(&mut self, scheduler: &mut FrameScheduler) {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel(handle);
        }
    }

    pub fn text(&self) -> &str {
        self.animator.display()
    }

    pub fn animator(&self) -> &CounterAnimator {
        &self.animator
    }

    pub fn has_pending_frame(&self) -> bool {
        self.pending.is_some()
    }

    fn handle_request(
        &mut self,
        request: FrameRequest,
        scheduler: &mut FrameScheduler,
    ) -> Option<StageEvent> {
        match request {
            FrameRequest::Idle => None,
            FrameRequest::Continue => {
                self.pending = Some(scheduler.request_frame(self.id));
                Some(self.frame_event(false))
            }
            FrameRequest::Finished => {
                debug!(id = %self.id, text = self.text(), "计数器动画结束");
                Some(self.frame_event(true))
            }
        }
    }

    fn frame_event(&self, finished: bool) -> StageEvent {
        StageEvent::CounterFrame {
            id: self.id,
            text: self.text().to_string(),
            finished,
        }
    }

    fn local(&self, scheduler: &FrameScheduler) -> Duration {
        scheduler.now().saturating_sub(self.mounted_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_first_visible_starts_once() {
        let mut scheduler = FrameScheduler::new();
        let mut view = CounterView::new(WidgetId(1), CounterAnimator::new("100", ms(100)), ms(0));

        let event = view.set_visible(true, &mut scheduler);
        assert!(matches!(
            event,
            Some(StageEvent::CounterFrame { ref text, finished: false, .. }) if text == "0"
        ));
        assert!(view.has_pending_frame());

        // 再次进入视口不会重启
        assert!(view.set_visible(false, &mut scheduler).is_none());
        assert!(view.set_visible(true, &mut scheduler).is_none());
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn test_stale_frame_ignored() {
        let mut scheduler = FrameScheduler::new();
        let mut view = CounterView::new(WidgetId(1), CounterAnimator::new("100", ms(100)), ms(0));
        view.set_visible(true, &mut scheduler);

        let wakeups = scheduler.advance(ms(16));
        assert_eq!(wakeups.len(), 1);
        let handle = wakeups[0].handle;
        assert!(view.on_frame(handle, &mut scheduler).is_some());
        // 同一个句柄第二次到达时忽略
        assert!(view.on_frame(handle, &mut scheduler).is_none());
    }

    #[test]
    fn test_teardown_cancels_frame() {
        let mut scheduler = FrameScheduler::new();
        let mut view = CounterView::new(WidgetId(1), CounterAnimator::new("$12.9B", ms(100)), ms(0));
        view.set_visible(true, &mut scheduler);
        view.teardown(&mut scheduler);

        assert!(!view.has_pending_frame());
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(view.text(), "$0.0B");
    }

    #[test]
    fn test_unparsable_finishes_immediately() {
        let mut scheduler = FrameScheduler::new();
        let mut view = CounterView::new(WidgetId(3), CounterAnimator::new("Global", ms(100)), ms(0));
        let event = view.set_visible(true, &mut scheduler);
        assert!(matches!(event, Some(StageEvent::CounterFrame { finished: true, .. })));
        assert_eq!(view.text(), "Global");
        assert_eq!(scheduler.pending(), 0);
    }
}
