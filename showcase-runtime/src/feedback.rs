//! # Feedback 模块
//!
//! 界面反馈音效的描述：每种提示音由若干正弦音组成，音量按指数曲线衰减。
//!
//! 本模块只描述"播放什么"，真正的输出由宿主持有的音频资源负责。

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 衰减终点音量
const RAMP_FLOOR: f32 = 0.01;

/// 反馈提示音类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackCue {
    /// 点击
    Click,
    /// 悬停
    Hover,
    /// 成功（C 大三和弦琶音）
    Success,
}

/// 单个正弦音
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tone {
    /// 频率（Hz）
    pub frequency_hz: f32,
    /// 相对提示音开始的偏移
    pub offset: Duration,
    /// 持续时长
    pub duration: Duration,
    /// 起始音量
    pub gain_start: f32,
    /// 结束音量
    pub gain_end: f32,
}

impl Tone {
    fn decaying(frequency_hz: f32, offset: Duration, duration: Duration, gain: f32) -> Self {
        Self {
            frequency_hz,
            offset,
            duration,
            gain_start: gain,
            gain_end: RAMP_FLOOR,
        }
    }

    /// `t` 时刻（相对本音开始）的音量，超出时长返回 0
    pub fn gain_at(&self, t: Duration) -> f32 {
        if t > self.duration || self.duration.is_zero() {
            return 0.0;
        }
        let progress = t.as_secs_f32() / self.duration.as_secs_f32();
        self.gain_start * (self.gain_end / self.gain_start).powf(progress)
    }

    /// 结束时间（相对提示音开始）
    pub fn end(&self) -> Duration {
        self.offset + self.duration
    }
}

impl FeedbackCue {
    /// 组成该提示音的所有正弦音
    pub fn tones(&self) -> Vec<Tone> {
        match self {
            FeedbackCue::Click => vec![Tone::decaying(
                800.0,
                Duration::ZERO,
                Duration::from_millis(100),
                0.1,
            )],
            FeedbackCue::Hover => vec![Tone::decaying(
                600.0,
                Duration::ZERO,
                Duration::from_millis(50),
                0.05,
            )],
            FeedbackCue::Success => [523.0, 659.0, 784.0]
                .into_iter()
                .enumerate()
                .map(|(i, freq)| {
                    Tone::decaying(
                        freq,
                        Duration::from_millis(100 * i as u64),
                        Duration::from_millis(300),
                        0.1,
                    )
                })
                .collect(),
        }
    }

    /// 提示音总时长
    pub fn total_duration(&self) -> Duration {
        self.tones()
            .iter()
            .map(Tone::end)
            .max()
            .unwrap_or(Duration::ZERO)
    }
}
