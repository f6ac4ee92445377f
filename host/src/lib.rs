//! # Host 层
//!
//! 展示页交互组件的宿主层实现（headless）。
//!
//! ## 架构说明
//!
//! Host 层负责：
//! - 帧/定时调度（单线程事件循环）
//! - 组件挂载、可见性与卸载
//! - 反馈音效资源的创建与关闭
//! - 配置加载与命令行时间线输入
//!
//! Host 层不包含组件逻辑，计数器与轮播的行为全部来自 `showcase-runtime`。

pub mod app;
pub mod audio;
pub mod config;
pub mod input;
pub mod scheduler;
pub mod stage;
pub mod views;

pub use app::{DemoPage, TimelineEntry, describe, run_carousel, run_counter};
pub use audio::{FeedbackAudio, PlayedTone, RecordingSink, ToneSink, TraceSink};
pub use config::{AppConfig, AudioConfig, CarouselSettings, ConfigError, CounterConfig, DemoConfig};
pub use input::{Action, InputError, TimedAction, apply_action};
pub use scheduler::{FrameScheduler, TaskHandle, TaskKind, Wakeup, WidgetId};
pub use stage::{ChangeCause, Stage, StageError, StageEvent};
pub use views::{CarouselView, CounterView};
