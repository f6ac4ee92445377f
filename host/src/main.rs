//! # showcase - headless 宿主
//!
//! 用虚拟时钟驱动计数器与轮播，把每一帧需要渲染的内容打印到标准输出。
//!
//! ```text
//! showcase counter '$12.9B' --duration-ms 1000 --frame-ms 100
//! showcase carousel --slides 4 --auto-play --interval-ms 2000 \
//!     --action 500:next --action 1200:goto:3 --action 6000:teardown
//! showcase demo --config config.json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use host::{AppConfig, DemoPage, Stage, TimedAction, TraceSink, describe, run_carousel, run_counter};
use tracing::{Level, info};

#[derive(Parser)]
#[command(name = "showcase")]
#[command(about = "展示页组件 headless 宿主 - 计数器动画与轮播")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 配置文件路径（默认：config.json）
    #[arg(short, long, default_value = "config.json", global = true)]
    config: PathBuf,

    /// 帧间隔（毫秒），覆盖配置文件
    #[arg(long, global = true)]
    frame_ms: Option<u64>,

    /// 输出调试日志
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// 播放一个计数器动画
    Counter {
        /// 展示值，如 "$12.9B"、"2,500+"
        value: String,

        /// 动画时长（毫秒），覆盖配置文件
        #[arg(long)]
        duration_ms: Option<u64>,
    },

    /// 按时间线驱动一个轮播
    Carousel {
        /// 幻灯片数量（默认使用配置中的标题）
        #[arg(long)]
        slides: Option<usize>,

        /// 开启自动播放
        #[arg(long)]
        auto_play: bool,

        /// 自动播放间隔（毫秒），覆盖配置文件
        #[arg(long)]
        interval_ms: Option<u64>,

        /// 模拟时长（毫秒）
        #[arg(long, default_value = "10000")]
        run_ms: u64,

        /// 定时动作，如 500:next、1200:goto:3、0:autoplay:on、6000:teardown
        #[arg(short, long = "action")]
        actions: Vec<TimedAction>,
    },

    /// 运行配置中的演示页面
    Demo {
        /// 定时动作（作用于轮播）
        #[arg(short, long = "action")]
        actions: Vec<TimedAction>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main(cli) {
        eprintln!("showcase error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main(cli: Cli) -> anyhow::Result<()> {
    let mut config = AppConfig::load(&cli.config);
    if let Some(frame_ms) = cli.frame_ms {
        config.demo.frame_ms = frame_ms;
    }

    match cli.command {
        Commands::Counter { value, duration_ms } => {
            if let Some(ms) = duration_ms {
                config.counter.duration_ms = ms;
            }
            config.validate()?;

            let frames = run_counter(
                &value,
                config.counter.duration(),
                Duration::from_millis(config.demo.frame_ms),
            )?;
            for frame in &frames {
                println!("{frame}");
            }
            info!(frames = frames.len(), "计数器播放完毕");
        }
        Commands::Carousel {
            slides,
            auto_play,
            interval_ms,
            run_ms,
            actions,
        } => {
            if auto_play {
                config.carousel.auto_play = true;
            }
            if let Some(ms) = interval_ms {
                config.carousel.interval_ms = ms;
            }
            if let Some(count) = slides {
                config.demo.slides = (1..=count).map(|i| format!("Slide {i}")).collect();
            }
            config.validate()?;

            let mut stage = Stage::new();
            let id = stage.mount_carousel(
                config.demo.slides.clone(),
                config.carousel.auto_play,
                config.carousel.interval(),
            )?;
            let entries = run_carousel(
                &mut stage,
                id,
                &actions,
                Duration::from_millis(run_ms),
                Duration::from_millis(config.demo.frame_ms),
            )?;
            for entry in &entries {
                println!("{}", describe(entry));
            }
            stage.shutdown();
        }
        Commands::Demo { actions } => {
            config.validate()?;

            let mut page = DemoPage::mount(&config, Box::new(TraceSink))?;
            let entries = page.run(
                &actions,
                Duration::from_millis(config.demo.run_ms),
                Duration::from_millis(config.demo.frame_ms),
            )?;
            for entry in &entries {
                println!("{}", describe(entry));
            }
            page.shutdown();
        }
    }

    Ok(())
}
