//! # Audio 模块
//!
//! 界面反馈音效资源。
//!
//! `FeedbackAudio` 由宿主显式创建、显式关闭，并由需要它的组件持有；
//! 不存在全局单例或惰性初始化的共享上下文。
//! 实际的发声后端通过 [`ToneSink`] 接入。

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use showcase_runtime::{FeedbackCue, Tone};
use tracing::{debug, info, warn};

use crate::config::AudioConfig;

/// 音频输出后端
pub trait ToneSink {
    /// 在 `at` 时刻以 `volume` 缩放后的音量播放一个正弦音
    fn play_tone(&mut self, at: Duration, tone: &Tone, volume: f32);
}

/// 只输出日志的后端（headless 模式）
#[derive(Debug, Default)]
pub struct TraceSink;

impl ToneSink for TraceSink {
    fn play_tone(&mut self, at: Duration, tone: &Tone, volume: f32) {
        debug!(
            at_ms = at.as_millis() as u64,
            freq = tone.frequency_hz,
            duration_ms = tone.duration.as_millis() as u64,
            gain = tone.gain_start * volume,
            "播放正弦音"
        );
    }
}

/// 已播放的正弦音记录
#[derive(Debug, Clone, PartialEq)]
pub struct PlayedTone {
    pub at: Duration,
    pub tone: Tone,
    pub volume: f32,
}

/// 记录播放内容的后端
///
/// 克隆后的实例共享同一份记录，便于在交出所有权后继续检查。
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    played: Rc<RefCell<Vec<PlayedTone>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已播放的全部正弦音
    pub fn played(&self) -> Vec<PlayedTone> {
        self.played.borrow().clone()
    }
}

impl ToneSink for RecordingSink {
    fn play_tone(&mut self, at: Duration, tone: &Tone, volume: f32) {
        self.played.borrow_mut().push(PlayedTone {
            at,
            tone: *tone,
            volume,
        });
    }
}

/// 反馈音效资源
pub struct FeedbackAudio {
    /// 输出后端
    sink: Box<dyn ToneSink>,
    /// 音效音量 (0.0 - 1.0)
    volume: f32,
    /// 是否静音
    muted: bool,
    /// 是否已关闭
    closed: bool,
}

impl FeedbackAudio {
    /// 创建反馈音效资源
    pub fn new(config: &AudioConfig, sink: Box<dyn ToneSink>) -> Self {
        info!(muted = config.muted, "反馈音效初始化");
        Self {
            sink,
            volume: (config.master_volume * config.sfx_volume).clamp(0.0, 1.0),
            muted: config.muted,
            closed: false,
        }
    }

    /// 播放提示音
    ///
    /// # 参数
    ///
    /// - `cue`: 提示音类型
    /// - `now`: 当前时间，各正弦音按自身偏移排在其后
    ///
    /// # 返回
    ///
    /// 实际送入后端的正弦音数量
    pub fn play(&mut self, cue: FeedbackCue, now: Duration) -> usize {
        if self.closed {
            warn!(?cue, "反馈音效已关闭，忽略播放请求");
            return 0;
        }
        if self.muted || self.volume <= 0.0 {
            return 0;
        }

        let tones = cue.tones();
        for tone in &tones {
            self.sink.play_tone(now + tone.offset, tone, self.volume);
        }
        tones.len()
    }

    /// 关闭资源，之后的播放请求全部忽略
    pub fn close(&mut self) {
        if !self.closed {
            info!("反馈音效已关闭");
            self.closed = true;
        }
    }
}

impl std::fmt::Debug for FeedbackAudio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedbackAudio")
            .field("volume", &self.volume)
            .field("muted", &self.muted)
            .field("closed", &self.closed)
            .finish()
    }
}
