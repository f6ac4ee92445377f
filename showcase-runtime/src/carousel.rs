//! # Carousel 模块
//!
//! 轮播控制器：维护固定幻灯片序列中的当前索引，支持前后翻页、跳转与定时自动播放。
//!
//! ## 设计要点
//!
//! - 索引始终满足 `0 <= current < slide_count`
//! - 越界跳转会被拒绝（不做截断），索引保持不变
//! - 每次导航返回 [`SlideChange`]，宿主据此一次性应用新索引与过渡方向
//! - 手动导航**不会**重置自动播放节拍
//! - `teardown()` 之后控制器不再发生任何变化

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::easing::EasingFunction;
use crate::error::CarouselError;
use crate::timer::IntervalTimer;

/// 默认自动播放间隔
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(5000);

/// 幻灯片过渡时长
pub const TRANSITION_DURATION: Duration = Duration::from_millis(500);

/// 过渡起点的水平偏移（像素）
pub const SLIDE_OFFSET_PX: f64 = 300.0;

/// 轮播配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarouselConfig {
    /// 幻灯片数量（至少 1）
    pub slide_count: usize,
    /// 是否自动播放
    #[serde(default)]
    pub auto_play: bool,
    /// 自动播放间隔
    #[serde(default = "default_interval")]
    pub interval: Duration,
}

fn default_interval() -> Duration {
    DEFAULT_INTERVAL
}

impl CarouselConfig {
    /// 创建不自动播放的配置
    pub fn new(slide_count: usize) -> Self {
        Self {
            slide_count,
            auto_play: false,
            interval: DEFAULT_INTERVAL,
        }
    }

    /// 启用自动播放
    pub fn with_auto_play(mut self, interval: Duration) -> Self {
        self.auto_play = true;
        self.interval = interval;
        self
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), CarouselError> {
        if self.slide_count == 0 {
            return Err(CarouselError::Empty);
        }
        if self.auto_play && self.interval.is_zero() {
            return Err(CarouselError::ZeroInterval);
        }
        Ok(())
    }
}

/// 过渡方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlideDirection {
    /// 新幻灯片从右侧进入
    Forward,
    /// 新幻灯片从左侧进入
    Backward,
    /// 索引未变化
    None,
}

impl SlideDirection {
    /// 新幻灯片进入时的水平偏移
    ///
    /// `progress` 为过渡的线性进度 (0.0 - 1.0)，内部使用缓入缓出。
    pub fn enter_offset(&self, progress: f64) -> f64 {
        let remaining = 1.0 - EasingFunction::EaseInOut.apply(progress);
        match self {
            SlideDirection::Forward => SLIDE_OFFSET_PX * remaining,
            SlideDirection::Backward => -SLIDE_OFFSET_PX * remaining,
            SlideDirection::None => 0.0,
        }
    }

    /// 旧幻灯片离开时的水平偏移
    pub fn exit_offset(&self, progress: f64) -> f64 {
        let eased = EasingFunction::EaseInOut.apply(progress);
        match self {
            SlideDirection::Forward => -SLIDE_OFFSET_PX * eased,
            SlideDirection::Backward => SLIDE_OFFSET_PX * eased,
            SlideDirection::None => 0.0,
        }
    }
}

/// 一次导航的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideChange {
    /// 原索引
    pub from: usize,
    /// 新索引
    pub to: usize,
    /// 过渡方向
    pub direction: SlideDirection,
}

impl SlideChange {
    /// 索引是否未变化（例如只有 1 张幻灯片时翻页）
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

/// 轮播控制器
#[derive(Debug, Clone)]
pub struct CarouselController {
    /// 幻灯片数量
    slide_count: usize,
    /// 当前索引
    current: usize,
    /// 是否自动播放
    auto_play: bool,
    /// 自动播放定时器
    timer: IntervalTimer,
    /// 是否已销毁
    disposed: bool,
}

impl CarouselController {
    /// 创建控制器
    ///
    /// # 参数
    ///
    /// - `config`: 轮播配置
    /// - `now`: 当前时间（自动播放从此刻开始计时）
    pub fn new(config: CarouselConfig, now: Duration) -> Result<Self, CarouselError> {
        config.validate()?;

        let mut timer = IntervalTimer::new(config.interval);
        if config.auto_play {
            timer.arm(now);
        }

        Ok(Self {
            slide_count: config.slide_count,
            current: 0,
            auto_play: config.auto_play,
            timer,
            disposed: false,
        })
    }

    /// 下一张（末尾回到开头）
    pub fn next(&mut self) -> Result<SlideChange, CarouselError> {
        self.ensure_live()?;
        Ok(self.step_forward())
    }

    /// 上一张（开头回到末尾）
    pub fn previous(&mut self) -> Result<SlideChange, CarouselError> {
        self.ensure_live()?;
        let from = self.current;
        self.current = (self.current + self.slide_count - 1) % self.slide_count;
        Ok(SlideChange {
            from,
            to: self.current,
            direction: SlideDirection::Backward,
        })
    }

    /// 跳转到指定索引
    ///
    /// 越界时返回 [`CarouselError::OutOfRange`]，索引保持不变。
    pub fn go_to(&mut self, index: usize) -> Result<SlideChange, CarouselError> {
        self.ensure_live()?;
        if index >= self.slide_count {
            return Err(CarouselError::OutOfRange {
                index,
                len: self.slide_count,
            });
        }

        let from = self.current;
        self.current = index;
        let direction = match index.cmp(&from) {
            std::cmp::Ordering::Greater => SlideDirection::Forward,
            std::cmp::Ordering::Less => SlideDirection::Backward,
            std::cmp::Ordering::Equal => SlideDirection::None,
        };
        Ok(SlideChange {
            from,
            to: index,
            direction,
        })
    }

    /// 开关自动播放
    ///
    /// 开启时从 `now` 重新计时；已开启时保持原节拍。
    pub fn set_auto_play(&mut self, enabled: bool, now: Duration) -> Result<(), CarouselError> {
        self.ensure_live()?;
        if enabled {
            if self.timer.interval().is_zero() {
                return Err(CarouselError::ZeroInterval);
            }
            if !self.auto_play {
                self.timer.arm(now);
            }
        } else {
            self.timer.cancel();
        }
        self.auto_play = enabled;
        Ok(())
    }

    /// 推进自动播放
    ///
    /// 返回截至 `now` 到期的所有自动翻页；未开启自动播放或已销毁时返回空。
    pub fn poll(&mut self, now: Duration) -> Vec<SlideChange> {
        if self.disposed || !self.auto_play {
            return Vec::new();
        }

        let fired = self.timer.poll(now);
        (0..fired).map(|_| self.step_forward()).collect()
    }

    /// 下一次自动翻页的时间
    pub fn next_deadline(&self) -> Option<Duration> {
        if self.disposed || !self.auto_play {
            return None;
        }
        self.timer.next_due()
    }

    /// 销毁控制器：取消定时器，之后不再响应任何操作
    pub fn teardown(&mut self) {
        self.timer.cancel();
        self.auto_play = false;
        self.disposed = true;
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn slide_count(&self) -> usize {
        self.slide_count
    }

    pub fn is_auto_play(&self) -> bool {
        self.auto_play
    }

    pub fn interval(&self) -> Duration {
        self.timer.interval()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn step_forward(&mut self) -> SlideChange {
        let from = self.current;
        self.current = (self.current + 1) % self.slide_count;
        SlideChange {
            from,
            to: self.current,
            direction: SlideDirection::Forward,
        }
    }

    fn ensure_live(&self) -> Result<(), CarouselError> {
        if self.disposed {
            Err(CarouselError::Disposed)
        } else {
            Ok(())
        }
    }
}
