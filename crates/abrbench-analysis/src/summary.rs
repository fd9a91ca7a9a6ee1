//! 캠페인 요약 구성.
//!
//! 조건 → 알고리즘 → run 1..=RUNS 통계의 중첩 구조. 조건은 탐색 순서, 알고리즘은
//! 설정 순서를 따르며, 데이터가 없는 런도 빠짐없이 `null` 값으로 들어간다.
//! 같은 입력이면 직렬화 결과가 바이트 단위로 같다.

use abrbench_core::error::CoreError;
use abrbench_core::models::experiment::{Algorithm, ExperimentConfig};
use abrbench_core::models::stats::RunStatistics;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::aggregator::RunAggregator;
use crate::distribution::{FiveNumberSummary, Metric};

/// 알고리즘 하나의 런 통계 목록 (run_nr 오름차순)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmRuns {
    pub algorithm: Algorithm,
    pub runs: Vec<RunStatistics>,
}

impl AlgorithmRuns {
    pub fn run(&self, run_nr: u32) -> Option<&RunStatistics> {
        self.runs.iter().find(|r| r.run_nr == run_nr)
    }
}

/// 조건 하나의 알고리즘별 결과
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSummary {
    pub config: ExperimentConfig,
    pub algorithms: Vec<AlgorithmRuns>,
}

impl ConfigSummary {
    pub fn get(&self, algorithm: &Algorithm) -> Option<&AlgorithmRuns> {
        self.algorithms.iter().find(|a| &a.algorithm == algorithm)
    }
}

/// 분석 결과 전체
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignSummary {
    /// 조건·알고리즘당 런 수
    pub runs: u32,
    pub configs: Vec<ConfigSummary>,
}

impl CampaignSummary {
    pub fn get(&self, config: ExperimentConfig) -> Option<&ConfigSummary> {
        self.configs.iter().find(|c| c.config == config)
    }

    /// 조건·지표별 알고리즘 분포 (박스 플롯 한 장에 해당)
    pub fn distributions(&self) -> Vec<ConfigDistributions> {
        self.configs
            .iter()
            .map(|config| ConfigDistributions {
                config: config.config,
                metrics: Metric::ALL
                    .iter()
                    .map(|metric| MetricDistribution {
                        metric: *metric,
                        algorithms: config
                            .algorithms
                            .iter()
                            .map(|a| AlgorithmDistribution {
                                algorithm: a.algorithm.clone(),
                                summary: FiveNumberSummary::of_runs(*metric, &a.runs),
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect()
    }

    /// 들여쓰기된 JSON
    pub fn to_json_pretty(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// 조건 하나의 지표별 분포
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigDistributions {
    pub config: ExperimentConfig,
    pub metrics: Vec<MetricDistribution>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDistribution {
    pub metric: Metric,
    pub algorithms: Vec<AlgorithmDistribution>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmDistribution {
    pub algorithm: Algorithm,
    /// 정의된 런이 하나도 없으면 None
    pub summary: Option<FiveNumberSummary>,
}

/// 요약 구성기
pub struct SummaryBuilder {
    runs: u32,
}

impl SummaryBuilder {
    pub fn new(runs: u32) -> Self {
        Self { runs }
    }

    /// 모든 (조건, 알고리즘) 쌍에 대해 run 1..=runs 통계 구성
    pub fn build(
        &self,
        configs: &[ExperimentConfig],
        algorithms: &[Algorithm],
        aggregator: &RunAggregator<'_>,
    ) -> CampaignSummary {
        let configs: Vec<ConfigSummary> = configs
            .iter()
            .map(|config| ConfigSummary {
                config: *config,
                algorithms: algorithms
                    .iter()
                    .map(|algorithm| AlgorithmRuns {
                        algorithm: algorithm.clone(),
                        runs: (1..=self.runs)
                            .map(|run_nr| aggregator.aggregate(*config, algorithm, run_nr))
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        info!(
            "요약 구성 완료: 조건 {}개 × 알고리즘 {}개 × 런 {}회",
            configs.len(),
            algorithms.len(),
            self.runs
        );

        CampaignSummary {
            runs: self.runs,
            configs,
        }
    }
}
