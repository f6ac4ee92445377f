//! # CarouselView
//!
//! 把 [`CarouselController`] 接到调度器上：
//!
//! - 自动播放的下一次触发时间注册为定时任务，触发后重新注册
//! - 手动导航只改变索引，不影响已注册的定时任务（节拍不变）
//! - 每次索引变化同时记录过渡方向与开始时间，宿主渲染时一并读取

use std::time::Duration;

use showcase_runtime::{
    CarouselConfig, CarouselController, RuntimeResult, SlideChange, SlideDirection,
    TRANSITION_DURATION,
};
use tracing::debug;

use crate::scheduler::{FrameScheduler, TaskHandle, WidgetId};
use crate::stage::{ChangeCause, StageEvent};

/// 进行中的过渡
#[derive(Debug, Clone, Copy)]
struct ActiveTransition {
    direction: SlideDirection,
    started_at: Duration,
}

/// 轮播视图
#[derive(Debug)]
pub struct CarouselView {
    id: WidgetId,
    controller: CarouselController,
    /// 幻灯片标题
    slides: Vec<String>,
    /// 挂载时间（控制器内部时间以此为零点）
    mounted_at: Duration,
    /// 等待中的自动播放定时任务
    pending: Option<TaskHandle>,
    /// 最近一次过渡
    transition: Option<ActiveTransition>,
}

impl CarouselView {
    /// 创建视图并注册自动播放定时任务
    pub fn mount(
        id: WidgetId,
        slides: Vec<String>,
        auto_play: bool,
        interval: Duration,
        scheduler: &mut FrameScheduler,
    ) -> RuntimeResult<Self> {
        let config = CarouselConfig {
            slide_count: slides.len(),
            auto_play,
            interval,
        };
        let controller = CarouselController::new(config, Duration::ZERO)?;

        let mut view = Self {
            id,
            controller,
            slides,
            mounted_at: scheduler.now(),
            pending: None,
            transition: None,
        };
        view.reschedule(scheduler);
        Ok(view)
    }

    pub fn next(&mut self, scheduler: &FrameScheduler) -> RuntimeResult<StageEvent> {
        let change = self.controller.next()?;
        Ok(self.apply(change, ChangeCause::Manual, scheduler))
    }

    pub fn previous(&mut self, scheduler: &FrameScheduler) -> RuntimeResult<StageEvent> {
        let change = self.controller.previous()?;
        Ok(self.apply(change, ChangeCause::Manual, scheduler))
    }

    pub fn go_to(&mut self, index: usize, scheduler: &FrameScheduler) -> RuntimeResult<StageEvent> {
        let change = self.controller.go_to(index)?;
        Ok(self.apply(change, ChangeCause::Manual, scheduler))
    }

    /// 开关自动播放，并同步定时任务
    pub fn set_auto_play(
        &mut self,
        enabled: bool,
        scheduler: &mut FrameScheduler,
    ) -> RuntimeResult<()> {
        let local = self.local(scheduler);
        self.controller.set_auto_play(enabled, local)?;
        self.reschedule(scheduler);
        Ok(())
    }

    /// 定时回调
    pub fn on_timeout(
        &mut self,
        handle: TaskHandle,
        scheduler: &mut FrameScheduler,
    ) -> Vec<StageEvent> {
        if self.pending != Some(handle) {
            debug!(id = %self.id, "忽略过期的定时回调");
            return Vec::new();
        }
        self.pending = None;

        let changes = self.controller.poll(self.local(scheduler));
        let events: Vec<StageEvent> = changes
            .into_iter()
            .map(|change| self.apply(change, ChangeCause::Auto, scheduler))
            .collect();
        self.reschedule(scheduler);
        events
    }

    /// 卸载：取消定时任务并销毁控制器
    pub fn teardown(&mut self, scheduler: &mut FrameScheduler) {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel(handle);
        }
        self.controller.teardown();
    }

    pub fn current(&self) -> usize {
        self.controller.current()
    }

    pub fn current_title(&self) -> &str {
        &self.slides[self.controller.current()]
    }

    pub fn controller(&self) -> &CarouselController {
        &self.controller
    }

    pub fn has_pending_timer(&self) -> bool {
        self.pending.is_some()
    }

    /// 当前幻灯片的水平偏移（过渡结束后为 0）
    pub fn slide_offset(&self, now: Duration) -> f64 {
        let Some(transition) = self.transition else {
            return 0.0;
        };
        let elapsed = now.saturating_sub(transition.started_at);
        let progress = elapsed.as_secs_f64() / TRANSITION_DURATION.as_secs_f64();
        transition.direction.enter_offset(progress)
    }

    fn apply(
        &mut self,
        change: SlideChange,
        cause: ChangeCause,
        scheduler: &FrameScheduler,
    ) -> StageEvent {
        self.transition = Some(ActiveTransition {
            direction: change.direction,
            started_at: scheduler.now(),
        });
        let title = self.slides[change.to].clone();
        debug!(id = %self.id, from = change.from, to = change.to, ?cause, "切换幻灯片");
        StageEvent::SlideChanged {
            id: self.id,
            change,
            title,
            cause,
        }
    }

    fn reschedule(&mut self, scheduler: &mut FrameScheduler) {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel(handle);
        }
        if let Some(deadline) = self.controller.next_deadline() {
            self.pending = Some(scheduler.set_timeout(self.id, self.mounted_at + deadline));
        }
    }

    fn local(&self, scheduler: &FrameScheduler) -> Duration {
        scheduler.now().saturating_sub(self.mounted_at)
    }
}
