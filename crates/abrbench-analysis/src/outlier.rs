//! 지연 샘플 이상치 필터.
//!
//! 두 가지 규칙으로 샘플을 버린다.
//! 1. 상한(기본 11초) 이상인 지연: 재생 정지로 간주
//! 2. 설정의 제외 런 목록에 있는 (조건, run_nr): 해당 런의 샘플 전부

use abrbench_core::config::{AnalysisConfig, ExcludedRun};
use abrbench_core::models::experiment::ExperimentConfig;
use tracing::warn;

/// 지연 이상치 정책
#[derive(Debug, Clone)]
pub struct OutlierFilter {
    ceiling_secs: f64,
    excluded: Vec<ExcludedRun>,
}

impl OutlierFilter {
    pub fn new(ceiling_secs: f64, excluded: Vec<ExcludedRun>) -> Self {
        Self {
            ceiling_secs,
            excluded,
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.delay_ceiling_secs, config.excluded_runs.clone())
    }

    /// 상한 미만인 샘플만 통과
    pub fn admits(&self, delay: f64) -> bool {
        delay < self.ceiling_secs
    }

    /// (조건, run_nr)에 걸린 제외 항목
    pub fn excluded_run(&self, config: ExperimentConfig, run_nr: u32) -> Option<&ExcludedRun> {
        self.excluded.iter().find(|r| r.matches(config, run_nr))
    }

    /// 한 런의 지연 샘플에서 남는 값 (입력 순서 유지)
    pub fn filter<I>(&self, config: ExperimentConfig, run_nr: u32, samples: I) -> Vec<f64>
    where
        I: IntoIterator<Item = f64>,
    {
        if let Some(rule) = self.excluded_run(config, run_nr) {
            warn!(
                "지연 샘플 제외: {} run={} ({})",
                config,
                run_nr,
                rule.reason.as_deref().unwrap_or("사유 없음")
            );
            return Vec::new();
        }
        samples.into_iter().filter(|d| self.admits(*d)).collect()
    }
}

impl Default for OutlierFilter {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}
