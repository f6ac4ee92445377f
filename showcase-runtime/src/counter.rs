//! # Counter 模块
//!
//! 数值计数器动画：从 0 增长到展示值中的目标数值，只播放一次。
//!
//! ## 状态转换
//!
//! ```text
//! Idle ──on_visible──► Running ──progress >= 1──► Done
//!   │                                              ▲
//!   └──────── 无法解析 / duration 为 0 ────────────┘
//! ```
//!
//! 没有回到 `Idle` 的转换：同一次挂载内动画最多播放一次。
//! 计数器不读取真实时钟，`now` 由宿主传入（自挂载起经过的时间）。

use std::time::Duration;

use crate::display_value::DisplayValue;
use crate::easing::EasingFunction;

/// 默认动画时长
pub const DEFAULT_COUNTER_DURATION: Duration = Duration::from_millis(2000);

/// 计数器缓动曲线（四次缓出）
const COUNTER_EASING: EasingFunction = EasingFunction::EaseOutQuart;

/// 计数器阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterPhase {
    /// 尚未可见
    Idle,
    /// 播放中
    Running {
        /// 开始时间
        started_at: Duration,
    },
    /// 已结束，保持最终值
    Done,
}

/// 计数器对宿主的帧请求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRequest {
    /// 无需调度
    Idle,
    /// 请在下一帧再次调用 `on_frame`
    Continue,
    /// 动画刚刚结束，不再需要帧回调
    Finished,
}

impl FrameRequest {
    /// 宿主是否需要调度下一帧
    pub fn wants_frame(&self) -> bool {
        matches!(self, Self::Continue)
    }
}

/// 数值计数器动画
#[derive(Debug, Clone)]
pub struct CounterAnimator {
    /// 原始展示字符串
    source: String,
    /// 解析结果（无法解析时为 None）
    parsed: Option<DisplayValue>,
    /// 动画时长
    duration: Duration,
    /// 当前阶段
    phase: CounterPhase,
    /// 当前显示文本
    display: String,
}

impl CounterAnimator {
    /// 创建计数器
    pub fn new(value: impl Into<String>, duration: Duration) -> Self {
        let source = value.into();
        let parsed = DisplayValue::parse(&source);
        let display = match &parsed {
            Some(v) => v.format(0.0),
            None => source.clone(),
        };

        Self {
            source,
            parsed,
            duration,
            phase: CounterPhase::Idle,
            display,
        }
    }

    /// 使用默认时长创建计数器
    pub fn with_default_duration(value: impl Into<String>) -> Self {
        Self::new(value, DEFAULT_COUNTER_DURATION)
    }

    /// 首次可见时触发动画
    ///
    /// 只有 `Idle` 状态会响应，之后的可见性变化一律忽略。
    pub fn on_visible(&mut self, now: Duration) -> FrameRequest {
        if self.phase != CounterPhase::Idle {
            return FrameRequest::Idle;
        }

        let Some(value) = &self.parsed else {
            // 无法解析：直接显示原文，不播放动画
            self.display = self.source.clone();
            self.phase = CounterPhase::Done;
            return FrameRequest::Finished;
        };

        if self.duration.is_zero() {
            self.display = value.format_target();
            self.phase = CounterPhase::Done;
            return FrameRequest::Finished;
        }

        self.phase = CounterPhase::Running { started_at: now };
        self.on_frame(now)
    }

    /// 帧回调：推进动画并更新显示文本
    pub fn on_frame(&mut self, now: Duration) -> FrameRequest {
        let CounterPhase::Running { .. } = self.phase else {
            return FrameRequest::Idle;
        };
        let Some(value) = &self.parsed else {
            return FrameRequest::Idle;
        };

        let progress = self.progress_at(now);
        if progress >= 1.0 {
            self.display = value.format_target();
            self.phase = CounterPhase::Done;
            return FrameRequest::Finished;
        }

        self.display = value.format(value.target() * COUNTER_EASING.apply(progress));
        FrameRequest::Continue
    }

    /// 线性进度（未缓动），范围 0.0 - 1.0
    pub fn progress_at(&self, now: Duration) -> f64 {
        match self.phase {
            CounterPhase::Idle => 0.0,
            CounterPhase::Done => 1.0,
            CounterPhase::Running { started_at } => {
                if self.duration.is_zero() {
                    return 1.0;
                }
                let elapsed = now.saturating_sub(started_at);
                (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
            }
        }
    }

    /// 当前显示文本
    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn phase(&self) -> CounterPhase {
        self.phase
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// 输入是否包含可动画的数值
    pub fn is_animated(&self) -> bool {
        self.parsed.is_some()
    }

    /// 是否已结束
    pub fn is_done(&self) -> bool {
        self.phase == CounterPhase::Done
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    /// 以固定帧间隔播放完整动画，返回所有帧文本
    fn run_to_end(counter: &mut CounterAnimator, step: u64) -> Vec<String> {
        let mut frames = Vec::new();
        let mut now = 0;
        let mut request = counter.on_visible(ms(now));
        frames.push(counter.display().to_string());
        while request.wants_frame() {
            now += step;
            request = counter.on_frame(ms(now));
            frames.push(counter.display().to_string());
        }
        frames
    }

    #[test]
    fn test_initial_display_is_zero_frame() {
        assert_eq!(CounterAnimator::with_default_duration("$12.9B").display(), "$0.0B");
        assert_eq!(CounterAnimator::with_default_duration("2,500+").display(), "0+");
        assert_eq!(CounterAnimator::with_default_duration("N/A").display(), "N/A");
    }

    #[test]
    fn test_final_frame_matches_input() {
        for raw in ["$12.9B", "2,500+", "1.87", "-3.1%", "15+ Years"] {
            let mut counter = CounterAnimator::with_default_duration(raw);
            let frames = run_to_end(&mut counter, 16);
            assert_eq!(frames.last().map(String::as_str), Some(raw));
            assert!(counter.is_done());
        }
    }

    #[test]
    fn test_final_frame_exact_beyond_f64() {
        for raw in ["12345678901234567890", "0.12345678901234567891", "99999999999999999+"] {
            let mut counter = CounterAnimator::new(raw, ms(100));
            let frames = run_to_end(&mut counter, 16);
            assert_eq!(frames.last().map(String::as_str), Some(raw));
        }
    }

    #[test]
    fn test_grouped_frames() {
        let mut counter = CounterAnimator::new("2,500+", ms(1000));
        counter.on_visible(ms(0));
        counter.on_frame(ms(500));
        // 2500 * (1 - 0.5^4) = 2343.75
        insta::assert_snapshot!(counter.display(), @"2,343+");
    }

    #[test]
    fn test_frame_sequence() {
        let mut counter = CounterAnimator::new("$12.9B", ms(1000));
        let frames = run_to_end(&mut counter, 250);
        insta::assert_snapshot!(frames.join(" | "), @"$0.0B | $8.8B | $12.1B | $12.8B | $12.9B");
    }

    #[test]
    fn test_monotonic_values() {
        let mut counter = CounterAnimator::new("1,000,000", ms(2000));
        let frames = run_to_end(&mut counter, 7);
        let values: Vec<u64> = frames
            .iter()
            .map(|f| f.replace(',', "").parse().unwrap())
            .collect();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*values.last().unwrap(), 1_000_000);
    }

    #[test]
    fn test_one_shot_trigger() {
        let mut counter = CounterAnimator::new("100", ms(100));
        assert_eq!(counter.on_visible(ms(0)), FrameRequest::Continue);
        // 再次可见不会重启
        assert_eq!(counter.on_visible(ms(50)), FrameRequest::Idle);
        assert_eq!(counter.on_frame(ms(100)), FrameRequest::Finished);
        assert_eq!(counter.display(), "100");
        assert_eq!(counter.on_visible(ms(500)), FrameRequest::Idle);
        assert_eq!(counter.on_frame(ms(600)), FrameRequest::Idle);
        assert_eq!(counter.display(), "100");
    }

    #[test]
    fn test_frame_before_visible_is_ignored() {
        let mut counter = CounterAnimator::new("100", ms(100));
        assert_eq!(counter.on_frame(ms(50)), FrameRequest::Idle);
        assert_eq!(counter.phase(), CounterPhase::Idle);
        assert_eq!(counter.display(), "0");
    }

    #[test]
    fn test_unparsable_degrades_to_raw() {
        let mut counter = CounterAnimator::new("Global", ms(100));
        assert!(!counter.is_animated());
        assert_eq!(counter.on_visible(ms(0)), FrameRequest::Finished);
        assert_eq!(counter.display(), "Global");
        assert!(counter.is_done());
    }

    #[test]
    fn test_zero_duration_jumps_to_target() {
        let mut counter = CounterAnimator::new("$12.9B", Duration::ZERO);
        assert_eq!(counter.on_visible(ms(10)), FrameRequest::Finished);
        assert_eq!(counter.display(), "$12.9B");
    }

    #[test]
    fn test_progress_clamped() {
        let mut counter = CounterAnimator::new("10", ms(100));
        counter.on_visible(ms(1000));
        assert_eq!(counter.progress_at(ms(1050)), 0.5);
        assert_eq!(counter.progress_at(ms(5000)), 1.0);
        // 时间倒退按 0 处理
        assert_eq!(counter.progress_at(ms(0)), 0.0);
    }
}
