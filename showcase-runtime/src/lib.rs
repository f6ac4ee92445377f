//! # Showcase Runtime
//!
//! 展示页交互组件的纯逻辑核心。
//!
//! ## 架构概述
//!
//! `showcase-runtime` 不依赖任何 IO、渲染或真实时钟。
//! 所有随时间变化的操作都由宿主传入 `now`（自挂载起经过的时间）：
//!
//! ```text
//! Host                               Runtime
//!   │                                   │
//!   │──── on_visible(now) ─────────────►│ CounterAnimator
//!   │◄─── FrameRequest ─────────────────│
//!   │──── on_frame(now) ───────────────►│
//!   │                                   │
//!   │──── next() / go_to(i) ───────────►│ CarouselController
//!   │──── poll(now) ───────────────────►│
//!   │◄─── SlideChange ──────────────────│
//! ```
//!
//! ## 模块结构
//!
//! - [`easing`]：缓动函数
//! - [`display_value`]：展示数值的解析与格式化
//! - [`counter`]：一次性计数器动画
//! - [`timer`]：固定节拍循环定时器
//! - [`carousel`]：轮播控制器
//! - [`feedback`]：界面反馈音效描述
//! - [`error`]：错误类型定义

pub mod carousel;
pub mod counter;
pub mod display_value;
pub mod easing;
pub mod error;
pub mod feedback;
pub mod timer;

// 重导出核心类型
pub use carousel::{
    CarouselConfig, CarouselController, DEFAULT_INTERVAL, SLIDE_OFFSET_PX, SlideChange,
    SlideDirection, TRANSITION_DURATION,
};
pub use counter::{CounterAnimator, CounterPhase, DEFAULT_COUNTER_DURATION, FrameRequest};
pub use display_value::{DisplayValue, GROUP_SEPARATOR};
pub use easing::EasingFunction;
pub use error::{CarouselError, RuntimeError, RuntimeResult};
pub use feedback::{FeedbackCue, Tone};
pub use timer::IntervalTimer;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_public_api_accessible() {
        // 验证所有公共类型都可以正常使用
        let _counter = CounterAnimator::with_default_duration("$12.9B");
        let _carousel = CarouselController::new(CarouselConfig::new(3), Duration::ZERO);
        let _cue = FeedbackCue::Click;
        let err: RuntimeError = CarouselError::Empty.into();
        assert!(err.to_string().contains("轮播"));
    }
}
