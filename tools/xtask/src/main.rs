//! # xtask - 开发辅助工具
//!
//! 提供本地质量门禁与开发辅助命令。
//!
//! ## 命令
//!
//! - `check-all`: 运行 fmt、clippy、test
//! - `cov-runtime`: 运行 showcase-runtime 覆盖率
//! - `cov-workspace`: 运行 workspace 覆盖率
//! - `value-check`: 检查配置中的展示值（能否解析、能否原样还原）

use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

use showcase_runtime::DisplayValue;

/// 运行一条 cargo 命令，失败时带上完整命令行报错
fn cargo(args: &[&str]) -> anyhow::Result<()> {
    let step = format!("cargo {}", args.join(" "));
    eprintln!("\n==> {step}");
    let status = Command::new("cargo").args(args).status()?;
    anyhow::ensure!(status.success(), "{step} failed with {status}");
    Ok(())
}

/// 覆盖率依赖 cargo-llvm-cov 子命令
fn coverage(scope: &[&str]) -> anyhow::Result<()> {
    let installed = Command::new("cargo")
        .args(["llvm-cov", "--version"])
        .status()
        .is_ok_and(|s| s.success());
    anyhow::ensure!(
        installed,
        "需要 cargo-llvm-cov：cargo install cargo-llvm-cov && rustup component add llvm-tools-preview"
    );

    let mut args = vec!["llvm-cov"];
    args.extend_from_slice(scope);
    args.extend(["--all-features", "--html"]);
    cargo(&args)?;

    eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
    Ok(())
}

fn main() -> ExitCode {
    match real_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("xtask error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn real_main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let sub = args.next().unwrap_or_else(|| "help".to_string());

    match sub.as_str() {
        "check-all" => {
            cargo(&["fmt", "--all", "--", "--check"])?;
            cargo(&["clippy", "--workspace", "--all-targets"])?;
            cargo(&["test", "--workspace"])?;
        }
        "cov-runtime" => coverage(&["-p", "showcase-runtime"])?,
        "cov-workspace" => coverage(&["--workspace", "--exclude", "xtask"])?,
        "value-check" => {
            let path = args.next().map(PathBuf::from);
            value_check(path.as_deref())?;
        }
        "help" | "-h" | "--help" => print_help(),
        other => anyhow::bail!("unknown xtask subcommand: {other}"),
    }

    Ok(())
}

fn print_help() {
    eprintln!(
        r#"xtask - 开发辅助工具

USAGE:
  cargo xtask <command>

COMMANDS:
  check-all       运行 fmt、clippy、test 门禁检查
  cov-runtime     运行 showcase-runtime 覆盖率报告
  cov-workspace   运行 workspace 覆盖率报告
  value-check     检查配置中的展示值

VALUE-CHECK:
  cargo xtask value-check [config.json]

  检查 demo.stats 中的每个展示值：
    - 能否解析出数字（不能解析的值会直接显示原文，不做动画）
    - 最终帧是否与原文完全一致

ALIASES (in .cargo/config.toml):
  cargo check-all     -> cargo xtask check-all
  cargo cov-runtime   -> cargo xtask cov-runtime
  cargo cov-workspace -> cargo xtask cov-workspace
  cargo value-check   -> cargo xtask value-check
"#
    );
}

//=============================================================================
// value-check 命令实现
//=============================================================================

/// 单个展示值的检查结论
enum Verdict {
    /// 可解析，最终帧与原文一致
    Ok,
    /// 无法解析，将静态显示
    Static,
    /// 最终帧与原文不一致
    Mismatch(String),
}

fn check_value(raw: &str) -> Verdict {
    match DisplayValue::parse(raw) {
        None => Verdict::Static,
        Some(value) => {
            let last = value.format_target();
            if last == raw {
                Verdict::Ok
            } else {
                Verdict::Mismatch(last)
            }
        }
    }
}

/// 读取配置中的 demo.stats
fn load_stats(path: &Path) -> anyhow::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("无法读取 {}: {e}", path.display()))?;
    let json: serde_json::Value = serde_json::from_str(&content)?;

    let Some(stats) = json.pointer("/demo/stats") else {
        return Ok(Vec::new());
    };
    let stats = stats
        .as_array()
        .ok_or_else(|| anyhow::anyhow!("demo.stats 必须是字符串数组"))?;

    stats
        .iter()
        .map(|v| {
            v.as_str()
                .map(String::from)
                .ok_or_else(|| anyhow::anyhow!("demo.stats 中存在非字符串项: {v}"))
        })
        .collect()
}

fn value_check(path: Option<&Path>) -> anyhow::Result<()> {
    let path = path.unwrap_or(Path::new("config.json"));
    if !path.exists() {
        anyhow::bail!(
            "配置文件不存在: {}\n请在 workspace 根目录运行，或指定配置路径",
            path.display()
        );
    }

    let stats = load_stats(path)?;
    if stats.is_empty() {
        eprintln!("配置中没有展示值（demo.stats）");
        return Ok(());
    }

    eprintln!("==> 检查 {} 个展示值...\n", stats.len());

    let mut mismatches = 0;
    let mut statics = 0;
    for raw in &stats {
        match check_value(raw) {
            Verdict::Ok => eprintln!("[OK]    {raw}"),
            Verdict::Static => {
                statics += 1;
                eprintln!("[WARN]  {raw}: 无法解析数字，将静态显示");
            }
            Verdict::Mismatch(last) => {
                mismatches += 1;
                eprintln!("[ERROR] {raw}: 最终帧为 '{last}'");
            }
        }
    }

    eprintln!();
    if mismatches > 0 {
        eprintln!("❌ {mismatches} 个错误, {statics} 个警告");
        anyhow::bail!("展示值检查发现错误");
    } else if statics > 0 {
        eprintln!("⚠️  0 个错误, {statics} 个警告");
    } else {
        eprintln!("✅ 检查通过，无错误");
    }

    Ok(())
}
