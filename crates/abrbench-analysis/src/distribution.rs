//! 박스 플롯용 분포 요약.
//!
//! 조건 하나에서 알고리즘별로 런 통계를 모아 다섯 수 요약(최소, 1사분위, 중앙값,
//! 3사분위, 최대)을 만든다. 사분위수는 정렬된 값 사이의 선형 보간으로 계산한다.
//! 그림은 그리지 않는다.

use std::fmt;

use abrbench_core::models::stats::RunStatistics;
use serde::{Deserialize, Serialize};

/// 런 통계에서 뽑아낼 지표
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// 품질 전환 횟수
    QualityTransitions,
    /// 평균 비트레이트 (kbps)
    AverageBitrateKbps,
    /// 스킵 세그먼트 수
    SkippedSegments,
    /// 평균 지연 (초)
    AverageDelay,
    /// 평균 처리량 (bits/sec)
    AverageThroughput,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::QualityTransitions,
        Metric::AverageBitrateKbps,
        Metric::SkippedSegments,
        Metric::AverageDelay,
        Metric::AverageThroughput,
    ];

    /// 런 하나의 지표 값
    ///
    /// 횟수 지표는 다운로드 기록이 있는 런에서만 정의된다.
    pub fn value(self, stats: &RunStatistics) -> Option<f64> {
        match self {
            Metric::QualityTransitions => stats
                .has_downloads()
                .then_some(stats.quality_transition_count as f64),
            Metric::AverageBitrateKbps => stats.average_bitrate_kbps(),
            Metric::SkippedSegments => stats
                .has_downloads()
                .then_some(stats.skipped_count as f64),
            Metric::AverageDelay => stats.average_delay,
            Metric::AverageThroughput => stats.average_throughput,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Metric::QualityTransitions => "quality_transitions",
            Metric::AverageBitrateKbps => "average_bitrate_kbps",
            Metric::SkippedSegments => "skipped_segments",
            Metric::AverageDelay => "average_delay",
            Metric::AverageThroughput => "average_throughput",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 다섯 수 요약 + 표본 수
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiveNumberSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub count: usize,
}

impl FiveNumberSummary {
    /// 유한한 값만으로 요약. 값이 없으면 None.
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sorted: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        Some(Self {
            min: sorted[0],
            q1: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q3: quantile(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
            count: sorted.len(),
        })
    }

    /// 런 통계 묶음에서 지표 하나를 요약 (정의되지 않은 런은 제외)
    pub fn of_runs(metric: Metric, runs: &[RunStatistics]) -> Option<Self> {
        Self::from_values(runs.iter().filter_map(|r| metric.value(r)))
    }

    /// 사분위 범위
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// 정렬된 비어 있지 않은 슬라이스의 p 분위수 (선형 보간)
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let pos = p * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_count() {
        let s = FiveNumberSummary::from_values([5.0, 1.0, 3.0, 2.0, 4.0]).unwrap();
        assert_eq!(
            (s.min, s.q1, s.median, s.q3, s.max, s.count),
            (1.0, 2.0, 3.0, 4.0, 5.0, 5)
        );
        assert_eq!(s.iqr(), 2.0);
    }

    #[test]
    fn even_count_interpolates() {
        let s = FiveNumberSummary::from_values([1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(s.q1, 1.75);
        assert_eq!(s.median, 2.5);
        assert_eq!(s.q3, 3.25);
    }

    #[test]
    fn single_value() {
        let s = FiveNumberSummary::from_values([7.0]).unwrap();
        assert_eq!((s.min, s.median, s.max), (7.0, 7.0, 7.0));
    }

    #[test]
    fn nothing_to_summarize() {
        assert!(FiveNumberSummary::from_values(std::iter::empty()).is_none());
        assert!(FiveNumberSummary::from_values([f64::NAN]).is_none());
    }

    #[test]
    fn undefined_runs_are_skipped() {
        let mut with_data = RunStatistics::empty(1);
        with_data.average_bitrate = Some(500_000.0);
        with_data.quality_transition_count = 3;
        let runs = vec![with_data, RunStatistics::empty(2)];

        let kbps = FiveNumberSummary::of_runs(Metric::AverageBitrateKbps, &runs).unwrap();
        assert_eq!((kbps.median, kbps.count), (500.0, 1));

        let transitions = FiveNumberSummary::of_runs(Metric::QualityTransitions, &runs).unwrap();
        assert_eq!((transitions.median, transitions.count), (3.0, 1));

        assert!(FiveNumberSummary::of_runs(Metric::AverageDelay, &runs).is_none());
    }
}
