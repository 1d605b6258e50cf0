use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use scangate_core::{available_scanners, load_config, run_scanners, RepositoryContext, RunOptions, ShellRunner, KNOWN_SCANNERS};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

/// 命令行入口（基于 clap）
#[derive(Parser, Debug)]
#[command(name = "scangate", version, about = "Run third-party security scanners and normalize their results")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 扫描项目目录并输出 JSON 报告
    Scan {
        /// 项目根目录
        #[arg(long, default_value = ".")]
        repo: PathBuf,

        /// 配置文件（TOML），默认 ./scangate.toml（不存在则使用默认配置）
        #[arg(long)]
        config: Option<PathBuf>,

        /// 输出文件；为空则写 stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// 并行执行的扫描器数（"auto"=CPU 核心数）
        #[arg(long, default_value = "auto")]
        threads: String,

        /// 有扫描器失败或出错时以退出码 1 结束
        #[arg(long)]
        fail_on_findings: bool,
    },
    /// 列出已知扫描器
    List,
}

fn main() -> Result<ExitCode> {
    // 支持通过 RUST_LOG 控制等级；日志写 stderr，避免污染 JSON 输出
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan { repo, config, output, threads, fail_on_findings } => {
            let config = load_config(config.as_deref())?;
            let scanners = available_scanners(&config).context("build scanners")?;
            let ctx = RepositoryContext::new(repo);
            let opts = RunOptions { threads: parse_threads(&threads) };

            let summary = run_scanners(&ctx, &scanners, &ShellRunner, &opts).context("run scanners")?;

            let mut out: Box<dyn Write> = match &output {
                Some(path) => Box::new(BufWriter::new(File::create(path).context("create output file")?)),
                None => Box::new(BufWriter::new(std::io::stdout().lock())),
            };
            summary.write_json(&mut *out).context("write report")?;
            writeln!(out)?;
            out.flush()?;

            info!(?output, passed = summary.passed, "report written");
            if fail_on_findings && !summary.passed {
                return Ok(ExitCode::from(1));
            }
        }
        Commands::List => {
            for name in KNOWN_SCANNERS {
                println!("{name}");
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(env_filter).with_writer(std::io::stderr).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// 解析线程参数
fn parse_threads(s: &str) -> Option<usize> {
    if s.eq_ignore_ascii_case("auto") { return None; }
    match s.parse::<usize>() {
        Ok(n) if n >= 1 => Some(n),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threads_arg() {
        assert_eq!(parse_threads("auto"), None);
        assert_eq!(parse_threads("AUTO"), None);
        assert_eq!(parse_threads("3"), Some(3));
        assert_eq!(parse_threads("0"), None);
        assert_eq!(parse_threads("many"), None);
    }

    #[test]
    fn cli_parses_scan() {
        let cli = Cli::try_parse_from(["scangate", "scan", "--repo", "/src", "--threads", "2", "--fail-on-findings"]).unwrap();
        match cli.command {
            Commands::Scan { repo, threads, fail_on_findings, output, .. } => {
                assert_eq!(repo, PathBuf::from("/src"));
                assert_eq!(threads, "2");
                assert!(fail_on_findings);
                assert!(output.is_none());
            }
            Commands::List => panic!("expected scan"),
        }
    }
}
