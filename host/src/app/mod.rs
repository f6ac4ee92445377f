//! # App 模块
//!
//! 应用初始化与演示页面的主循环。

mod timeline;

pub use timeline::{TimelineEntry, run_carousel, run_counter};

use std::time::Duration;

use tracing::info;

use crate::audio::{FeedbackAudio, ToneSink};
use crate::config::AppConfig;
use crate::input::TimedAction;
use crate::scheduler::WidgetId;
use crate::stage::{Stage, StageError, StageEvent};

/// 两个统计数字进入视口的间隔（模拟滚动）
const SCROLL_STAGGER: Duration = Duration::from_millis(300);

/// 演示页面
#[derive(Debug)]
pub struct DemoPage {
    pub stage: Stage,
    pub counters: Vec<WidgetId>,
    pub carousel: WidgetId,
}

impl DemoPage {
    /// 按配置挂载统计数字与轮播
    pub fn mount(config: &AppConfig, sink: Box<dyn ToneSink>) -> Result<Self, StageError> {
        let audio = FeedbackAudio::new(&config.audio, sink);
        let mut stage = Stage::new().with_audio(audio);

        let duration = config.counter.duration();
        let counters = config
            .demo
            .stats
            .iter()
            .map(|value| stage.mount_counter(value.as_str(), duration))
            .collect();

        let carousel = stage.mount_carousel(
            config.demo.slides.clone(),
            config.carousel.auto_play,
            config.carousel.interval(),
        )?;

        info!(counters = config.demo.stats.len(), "演示页面已挂载");
        Ok(Self {
            stage,
            counters,
            carousel,
        })
    }

    /// 运行演示：统计数字依次进入视口，轮播按时间线操作
    pub fn run(
        &mut self,
        actions: &[TimedAction],
        run_for: Duration,
        frame: Duration,
    ) -> Result<Vec<TimelineEntry>, StageError> {
        if frame.is_zero() {
            return Err(StageError::ZeroFrame);
        }
        let mut entries = Vec::new();

        // 统计数字依次进入视口，期间轮播照常运行
        for (i, id) in self.counters.clone().into_iter().enumerate() {
            let reveal_at = SCROLL_STAGGER * i as u32;
            while self.stage.now() < reveal_at {
                let events = self.stage.advance(frame);
                let at = self.stage.now();
                entries.extend(events.into_iter().map(|event| TimelineEntry::Event { at, event }));
            }
            if let Ok(Some(event)) = self.stage.set_visible(id, true) {
                entries.push(TimelineEntry::Event {
                    at: self.stage.now(),
                    event,
                });
            }
        }

        let elapsed = self.stage.now();
        let remaining = run_for.saturating_sub(elapsed);
        let shifted: Vec<TimedAction> = actions
            .iter()
            .map(|a| TimedAction {
                at: a.at.saturating_sub(elapsed),
                action: a.action,
            })
            .collect();
        entries.extend(run_carousel(
            &mut self.stage,
            self.carousel,
            &shifted,
            remaining,
            frame,
        )?);
        Ok(entries)
    }

    /// 所有计数器当前文本
    pub fn counter_texts(&self) -> Vec<String> {
        self.counters
            .iter()
            .filter_map(|id| self.stage.counter_text(*id))
            .map(String::from)
            .collect()
    }

    pub fn shutdown(&mut self) {
        self.stage.shutdown();
    }
}

/// 把事件格式化为一行输出
pub fn describe(entry: &TimelineEntry) -> String {
    let at = entry.at().as_millis();
    match entry {
        TimelineEntry::Event {
            event: StageEvent::CounterFrame { id, text, finished },
            ..
        } => {
            let mark = if *finished { " ✓" } else { "" };
            format!("{at:>6}ms counter {id} {text}{mark}")
        }
        TimelineEntry::Event {
            event:
                StageEvent::SlideChanged {
                    id,
                    change,
                    title,
                    cause,
                },
            ..
        } => format!(
            "{at:>6}ms carousel {id} {} -> {} [{title}] ({cause:?}, {:?})",
            change.from, change.to, change.direction
        ),
        TimelineEntry::Rejected { action, error, .. } => {
            format!("{at:>6}ms rejected {action:?}: {error}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingSink;

    #[test]
    fn test_demo_page_reveals_counters() {
        let config = AppConfig::default();
        let mut page = DemoPage::mount(&config, Box::new(RecordingSink::new())).unwrap();
        page.run(&[], Duration::from_millis(4000), Duration::from_millis(16))
            .unwrap();
        assert_eq!(page.counter_texts(), config.demo.stats);
        page.shutdown();
        assert!(page.stage.is_idle());
    }

    #[test]
    fn test_describe() {
        let entry = TimelineEntry::Event {
            at: Duration::from_millis(32),
            event: StageEvent::CounterFrame {
                id: WidgetId(1),
                text: "2,500+".to_string(),
                finished: true,
            },
        };
        assert_eq!(describe(&entry), "    32ms counter #1 2,500+ ✓");
    }
}
