//! # abrbench-app
//!
//! abrbench 바이너리 진입점.
//! 설정 로드, tracing 초기화, 하위 명령별 DI를 담당한다.
//!
//! - `serve`: 캠페인 동안 플레이어 텔레메트리 수집
//! - `analyze`: 종료된 캠페인 요약 (JSON)
//! - `configs`: 실행된 (omega, sigma) 조건 목록

mod analyze;
mod lifecycle;
mod serve;

use std::path::PathBuf;

use abrbench_core::config::AppConfig;
use abrbench_core::config_manager::{ConfigManager, CONFIG_FILE_NAME};
use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use directories::ProjectDirs;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::analyze::StreamArgs;

/// 로그를 남기는 crate target
const LOG_TARGETS: &[&str] = &[
    "abrbench",
    "abrbench_app",
    "abrbench_core",
    "abrbench_storage",
    "abrbench_analysis",
    "abrbench_web",
    "tower_http",
];

/// ABR 알고리즘 평가 캠페인 도구
///
/// 플레이어 텔레메트리를 수집하고, 종료된 캠페인을 런 단위 통계로 요약한다.
#[derive(Parser, Debug)]
#[command(name = "abrbench")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info", global = true)]
    log_level: String,

    /// 설정 파일 경로 (기본: 플랫폼별 설정 디렉토리)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 수집 서버 실행 (새 캠페인 디렉토리 생성)
    Serve {
        /// 서버 포트 (기본: 설정값, 5000)
        #[arg(long, short = 'p')]
        port: Option<u16>,

        /// 캠페인 디렉토리들을 만들 로그 루트
        #[arg(long)]
        log_root: Option<PathBuf>,

        /// 외부 접근 허용 (0.0.0.0 바인드)
        #[arg(long)]
        allow_external: bool,

        /// 레코드마다 디스크 동기화하지 않음
        #[arg(long)]
        no_sync: bool,
    },

    /// 종료된 캠페인 분석
    Analyze {
        #[command(flatten)]
        streams: StreamArgs,

        /// 조건·알고리즘당 런 수 (기본: 설정값, 5)
        #[arg(long, short = 'r')]
        runs: Option<u32>,

        /// 비교할 알고리즘 (반복 지정, 출력 순서)
        #[arg(long = "algorithm", short = 'a')]
        algorithms: Vec<String>,

        /// 결과 JSON 파일 (기본: 표준 출력)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// 박스 플롯용 분포 요약 포함
        #[arg(long)]
        distributions: bool,
    },

    /// 다운로드 로그에서 실행된 조건 목록 출력
    Configs {
        #[command(flatten)]
        streams: StreamArgs,
    },
}

/// 설정 파일 경로 결정 (CLI 인자 또는 플랫폼별 기본 경로)
///
/// - macOS: `~/Library/Application Support/com.abrbench.abrbench/config.json`
/// - Windows: `%APPDATA%\abrbench\abrbench\config\config.json`
/// - Linux: `~/.config/abrbench/config.json`
fn resolve_config_path(config: Option<PathBuf>) -> PathBuf {
    config
        .or_else(|| {
            ProjectDirs::from("com", "abrbench", "abrbench")
                .map(|p| p.config_dir().join(CONFIG_FILE_NAME))
        })
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}

fn log_filter(level: &str) -> String {
    LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn load_config(path: PathBuf) -> Result<AppConfig> {
    let manager = ConfigManager::with_path(path)
        .map_err(|e| anyhow!("설정 로드 실패: {}", e))?;
    info!("설정 파일: {}", manager.config_path().display());
    Ok(manager.get())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(log_filter(&cli.log_level))),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = load_config(resolve_config_path(cli.config))?;

    match cli.command {
        Command::Serve {
            port,
            log_root,
            allow_external,
            no_sync,
        } => {
            if let Some(port) = port {
                config.web.port = port;
            }
            if let Some(log_root) = log_root {
                config.storage.log_root = log_root;
            }
            config.web.allow_external |= allow_external;
            if no_sync {
                config.storage.sync_writes = false;
            }
            serve::run(config).await
        }
        Command::Analyze {
            streams,
            runs,
            algorithms,
            output,
            distributions,
        } => {
            let analysis = analyze::apply_overrides(config.analysis, runs, &algorithms)?;
            let json = analyze::summary_json(streams.paths()?, &analysis, distributions)?;
            analyze::emit(&json, output.as_deref())
        }
        Command::Configs { streams } => {
            for config in analyze::discovered_configs(&streams.download_path()?)? {
                println!("{config}");
            }
            Ok(())
        }
    }
}
