//! cedar-plan - MPEG 寄存器写入计划工具
//!
//! 读取一帧解码任务 (JSON), 生成视频引擎的寄存器写入序列,
//! 可以打印、导出为二进制轨迹, 或与硬件抓取的轨迹逐条比对.

mod job;

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use cedar::logging::{self, LoggingConfig};
use cedar_mpeg::trace::{self, Divergence};
use cedar_mpeg::{CommandSequencer, PlatformConfig, WritePlan};

use job::DecodeJob;

/// Cedar MPEG 寄存器写入计划工具
#[derive(Parser, Debug)]
#[command(name = "cedar-plan", version, about = "生成并比对 Cedar MPEG 解码寄存器序列")]
struct Cli {
    /// 解码任务文件 (JSON)
    job: PathBuf,

    /// 平台配置文件 (JSON, 缺省为 sunxi A10/A20 参数)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 以 JSON 输出写入计划
    #[arg(long)]
    json: bool,

    /// 把写入计划导出为二进制轨迹
    #[arg(long = "trace-out")]
    trace_out: Option<PathBuf>,

    /// 与已有二进制轨迹比对
    #[arg(long)]
    compare: Option<PathBuf>,

    /// 静默模式 (不打印写入计划)
    #[arg(short, long)]
    quiet: bool,

    /// 日志级别 (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = logging::init(LoggingConfig::with_verbosity("cedar-plan", cli.verbose)) {
        eprintln!("警告: 日志初始化失败: {e:#}");
    }

    match run(&cli) {
        Ok(true) => {}
        Ok(false) => process::exit(2),
        Err(e) => {
            eprintln!("错误: {e:#}");
            process::exit(1);
        }
    }
}

/// 返回值表示比对是否一致 (未比对时为 true)
fn run(cli: &Cli) -> Result<bool> {
    let config = match &cli.config {
        Some(path) => load_platform_config(path)?,
        None => PlatformConfig::default(),
    };

    let job = DecodeJob::load(&cli.job)?;
    let refs = job.resolve_references()?;
    let plan = CommandSequencer::new(config).plan(
        &job.header,
        &job.input_buffer(),
        &job.output,
        &refs,
    );
    info!(
        "{} 生成 {} 次寄存器写入, trigger={:#010x}",
        cli.job.display(),
        plan.len(),
        plan.trigger().unwrap_or(0)
    );

    if !cli.quiet {
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        } else {
            print!("{plan}");
        }
    }

    if let Some(path) = &cli.trace_out {
        let mut w = BufWriter::new(
            File::create(path).with_context(|| format!("创建轨迹文件失败, path={}", path.display()))?,
        );
        trace::write_trace(&mut w, &plan)?;
        w.flush()
            .with_context(|| format!("写入轨迹文件失败, path={}", path.display()))?;
        info!("轨迹已写入 {}", path.display());
    }

    if let Some(path) = &cli.compare {
        let captured = load_trace(path)?;
        return Ok(report_comparison(&plan, &captured));
    }

    Ok(true)
}

fn load_platform_config(path: &Path) -> Result<PlatformConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("读取平台配置失败, path={}", path.display()))?;
    let config: PlatformConfig = serde_json::from_str(&text)
        .with_context(|| format!("解析平台配置失败, path={}", path.display()))?;
    config.validate()?;
    Ok(config)
}

fn load_trace(path: &Path) -> Result<WritePlan> {
    let mut r = BufReader::new(
        File::open(path).with_context(|| format!("打开轨迹文件失败, path={}", path.display()))?,
    );
    Ok(trace::read_trace(&mut r)?)
}

fn report_comparison(expected: &WritePlan, captured: &WritePlan) -> bool {
    match trace::first_divergence(expected, captured) {
        None => {
            println!("一致: {} 次写入", expected.len());
            true
        }
        Some(Divergence {
            index,
            expected,
            actual,
        }) => {
            let show = |w: Option<cedar_mpeg::RegisterWrite>| match w {
                Some(w) => w.to_string(),
                None => "<结束>".to_string(),
            };
            println!("第 {index} 次写入不一致");
            println!("  期望: {}", show(expected));
            println!("  实际: {}", show(actual));
            false
        }
    }
}
