//! # Config 模块
//!
//! 运行时配置管理，集中管理所有配置项。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (config.json)
//! 3. 默认值（最低）

use serde::{Deserialize, Serialize};
use showcase_runtime::{DEFAULT_COUNTER_DURATION, DEFAULT_INTERVAL};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 计数器配置
    #[serde(default)]
    pub counter: CounterConfig,

    /// 轮播配置
    #[serde(default)]
    pub carousel: CarouselSettings,

    /// 音频配置
    #[serde(default)]
    pub audio: AudioConfig,

    /// 演示页面配置
    #[serde(default)]
    pub demo: DemoConfig,
}

/// 计数器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounterConfig {
    /// 动画时长（毫秒）
    #[serde(default = "default_counter_duration_ms")]
    pub duration_ms: u64,
}

/// 轮播配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarouselSettings {
    /// 是否自动播放
    #[serde(default)]
    pub auto_play: bool,

    /// 自动播放间隔（毫秒）
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

/// 音频配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// 主音量 (0.0 - 1.0)
    #[serde(default = "default_master_volume")]
    pub master_volume: f32,

    /// SFX 音量 (0.0 - 1.0)
    #[serde(default = "default_sfx_volume")]
    pub sfx_volume: f32,

    /// 是否静音
    #[serde(default)]
    pub muted: bool,
}

/// 演示页面配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    /// 帧间隔（毫秒）
    #[serde(default = "default_frame_ms")]
    pub frame_ms: u64,

    /// 模拟运行时长（毫秒）
    #[serde(default = "default_run_ms")]
    pub run_ms: u64,

    /// 统计数字
    #[serde(default = "default_stats")]
    pub stats: Vec<String>,

    /// 幻灯片标题
    #[serde(default = "default_slides")]
    pub slides: Vec<String>,
}

// 默认值函数
fn default_counter_duration_ms() -> u64 {
    DEFAULT_COUNTER_DURATION.as_millis() as u64
}

fn default_interval_ms() -> u64 {
    DEFAULT_INTERVAL.as_millis() as u64
}

fn default_master_volume() -> f32 {
    1.0
}

fn default_sfx_volume() -> f32 {
    1.0
}

fn default_frame_ms() -> u64 {
    16
}

fn default_run_ms() -> u64 {
    20_000
}

fn default_stats() -> Vec<String> {
    ["$12.9B", "1.87", "-3.1%", "2,500+"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_slides() -> Vec<String> {
    ["Founder", "Leadership Pods", "Mission & Differentiators"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_counter_duration_ms(),
        }
    }
}

impl Default for CarouselSettings {
    fn default() -> Self {
        Self {
            auto_play: false,
            interval_ms: default_interval_ms(),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            master_volume: default_master_volume(),
            sfx_volume: default_sfx_volume(),
            muted: false,
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            frame_ms: default_frame_ms(),
            run_ms: default_run_ms(),
            stats: default_stats(),
            slides: default_slides(),
        }
    }
}

impl CounterConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

impl CarouselSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl AppConfig {
    /// 加载配置文件
    ///
    /// 如果文件不存在或解析失败，返回默认配置并记录警告。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            warn!(path = %path.display(), "配置文件不存在，使用默认配置");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => {
                    info!(path = %path.display(), "配置文件加载成功");
                    config
                }
                Err(e) => {
                    warn!(error = %e, "配置文件解析失败，使用默认配置");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(error = %e, "配置文件读取失败，使用默认配置");
                Self::default()
            }
        }
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        fs::write(path, json).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.carousel.auto_play && self.carousel.interval_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "自动播放间隔必须大于 0".to_string(),
            ));
        }

        if self.demo.frame_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "帧间隔必须大于 0".to_string(),
            ));
        }

        if self.demo.slides.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "至少需要 1 张幻灯片".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.audio.master_volume) {
            return Err(ConfigError::ValidationFailed(
                "主音量必须在 0.0 - 1.0 之间".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.audio.sfx_volume) {
            return Err(ConfigError::ValidationFailed(
                "SFX 音量必须在 0.0 - 1.0 之间".to_string(),
            ));
        }

        Ok(())
    }
}

/// 配置错误
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// 序列化失败
    #[error("配置序列化失败: {0}")]
    SerializationFailed(String),
    /// IO 错误
    #[error("配置 IO 错误: {0}")]
    IoError(String),
    /// 验证失败
    #[error("配置验证失败: {0}")]
    ValidationFailed(String),
}
