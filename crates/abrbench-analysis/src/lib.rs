//! # abrbench-analysis
//!
//! 종료된 캠페인의 오프라인 분석.
//! 스트림을 적재해 실행된 조건을 찾고, (조건, 알고리즘, 런)마다 파생 통계를 계산해
//! 중첩 요약으로 돌려준다. 수집과 겹쳐 실행되지 않으며 스트림을 수정하지 않는다.
//!
//! ## 모듈
//! - `discovery`: 실행된 (omega, sigma) 조건 탐색
//! - `outlier`: 지연 샘플 이상치 정책
//! - `aggregator`: 런 단위 통계
//! - `summary`: 조건 → 알고리즘 → 런 요약
//! - `distribution`: 박스 플롯용 다섯 수 요약

pub mod aggregator;
pub mod discovery;
pub mod distribution;
pub mod outlier;
pub mod summary;

use abrbench_core::config::AnalysisConfig;
use abrbench_core::error::CoreError;
use abrbench_core::models::campaign::CampaignLog;
use abrbench_core::ports::storage::CampaignSource;
use tracing::info;

pub use aggregator::RunAggregator;
pub use discovery::discover;
pub use outlier::OutlierFilter;
pub use summary::{CampaignSummary, SummaryBuilder};

/// 캠페인 분석 진입점
///
/// 설정 검증 → 스트림 적재 → 조건 탐색 → 요약 구성.
pub fn analyze(
    source: &dyn CampaignSource,
    config: &AnalysisConfig,
) -> Result<CampaignSummary, CoreError> {
    config.validate()?;
    let log = source.load()?;
    Ok(summarize(&log, config))
}

/// 이미 적재된 로그의 요약
pub fn summarize(log: &CampaignLog, config: &AnalysisConfig) -> CampaignSummary {
    let configs = discover(&log.downloads);
    info!(
        "분석 시작: 조건 {}개, 알고리즘 {:?}, runs={}",
        configs.len(),
        config
            .algorithms
            .iter()
            .map(|a| a.as_str())
            .collect::<Vec<_>>(),
        config.runs
    );

    let filter = OutlierFilter::from_config(config);
    let aggregator = RunAggregator::new(log, &filter);
    SummaryBuilder::new(config.runs).build(&configs, &config.algorithms, &aggregator)
}
