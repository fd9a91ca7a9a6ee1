//! `abrbench analyze` / `abrbench configs`: 종료된 캠페인 분석.

use std::fs;
use std::path::{Path, PathBuf};

use abrbench_analysis::discover;
use abrbench_core::config::AnalysisConfig;
use abrbench_core::models::campaign::CampaignLog;
use abrbench_core::models::experiment::{Algorithm, ExperimentConfig};
use abrbench_core::models::metric::MetricKind;
use abrbench_storage::{read_stream, CampaignPaths, CampaignReader};
use anyhow::{bail, Context, Result};
use clap::Args;
use tracing::info;

/// 분석 입력 스트림 위치
#[derive(Args, Debug, Clone, Default)]
pub struct StreamArgs {
    /// 캠페인 디렉토리 (네 스트림을 표준 파일명으로 찾음)
    #[arg(long, conflicts_with_all = ["download", "delay", "skipped", "throughput"])]
    pub campaign_dir: Option<PathBuf>,

    /// 다운로드 로그 (download_log.csv)
    #[arg(long, short = 'd')]
    pub download: Option<PathBuf>,

    /// 지연 로그 (delay_log.csv)
    #[arg(long)]
    pub delay: Option<PathBuf>,

    /// 스킵 세그먼트 로그 (skipped.csv)
    #[arg(long, short = 's')]
    pub skipped: Option<PathBuf>,

    /// 처리량 로그 (throughput_log.csv)
    #[arg(long, short = 't')]
    pub throughput: Option<PathBuf>,
}

impl StreamArgs {
    /// 네 스트림 경로 확정
    pub fn paths(&self) -> Result<CampaignPaths> {
        if let Some(dir) = &self.campaign_dir {
            return Ok(CampaignPaths::from_dir(dir));
        }
        match (&self.download, &self.delay, &self.skipped, &self.throughput) {
            (Some(download), Some(delay), Some(skipped), Some(throughput)) => Ok(CampaignPaths {
                download: download.clone(),
                delay: delay.clone(),
                skipped: skipped.clone(),
                throughput: throughput.clone(),
            }),
            _ => bail!(
                "--campaign-dir 또는 --download/--delay/--skipped/--throughput 네 개를 모두 지정해야 합니다"
            ),
        }
    }

    /// 다운로드 스트림 경로만 확정
    pub fn download_path(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.campaign_dir {
            return Ok(dir.join(MetricKind::Download.file_name()));
        }
        self.download
            .clone()
            .context("--campaign-dir 또는 --download를 지정해야 합니다")
    }
}

/// CLI 값으로 분석 설정 덮어쓰기
pub fn apply_overrides(
    mut config: AnalysisConfig,
    runs: Option<u32>,
    algorithms: &[String],
) -> Result<AnalysisConfig> {
    if let Some(runs) = runs {
        config.runs = runs;
    }
    if !algorithms.is_empty() {
        config.algorithms = algorithms
            .iter()
            .map(|name| Algorithm::new(name.as_str()))
            .collect::<Result<Vec<_>, _>>()?;
    }
    config.validate()?;
    Ok(config)
}

/// 요약 JSON 생성
pub fn summary_json(
    paths: CampaignPaths,
    config: &AnalysisConfig,
    with_distributions: bool,
) -> Result<String> {
    let summary = abrbench_analysis::analyze(&CampaignReader::new(paths), config)
        .context("캠페인 분석 실패")?;

    let json = if with_distributions {
        serde_json::to_string_pretty(&serde_json::json!({
            "summary": summary,
            "distributions": summary.distributions(),
        }))?
    } else {
        summary.to_json_pretty()?
    };
    Ok(json)
}

/// 결과를 파일 또는 표준 출력으로
pub fn emit(json: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, format!("{json}\n"))
                .with_context(|| format!("결과 저장 실패: {}", path.display()))?;
            info!("분석 결과 저장: {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// 다운로드 스트림에서 실행된 조건 목록
pub fn discovered_configs(download: &Path) -> Result<Vec<ExperimentConfig>> {
    let log: CampaignLog = read_stream(MetricKind::Download, download)?
        .into_iter()
        .collect();
    Ok(discover(&log.downloads))
}
