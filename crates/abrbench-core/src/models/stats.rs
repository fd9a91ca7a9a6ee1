//! 런 통계 모델.
//!
//! (ExperimentConfig, algorithm, run_nr) 하나에 대한 파생 통계.
//! 분석 패스마다 다시 계산되며 저장되지 않는다.

use serde::{Deserialize, Serialize};

/// 런 하나의 파생 통계
///
/// 샘플이 없는 평균값은 `None`(JSON `null`)으로 표현한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStatistics {
    /// 반복 인덱스 (1..=RUNS)
    pub run_nr: u32,
    /// 인접 다운로드 간 비트레이트 변경 횟수
    pub quality_transition_count: u32,
    /// 평균 비트레이트 (bits/sec)
    pub average_bitrate: Option<f64>,
    /// 스킵된 세그먼트 수
    pub skipped_count: u32,
    /// 이상치 제거 후 평균 지연 (초)
    pub average_delay: Option<f64>,
    /// 평균 처리량 (bits/sec)
    pub average_throughput: Option<f64>,
}

impl RunStatistics {
    /// 매칭 이벤트가 하나도 없는 런
    pub fn empty(run_nr: u32) -> Self {
        Self {
            run_nr,
            quality_transition_count: 0,
            average_bitrate: None,
            skipped_count: 0,
            average_delay: None,
            average_throughput: None,
        }
    }

    /// 평균 비트레이트 (kbps)
    pub fn average_bitrate_kbps(&self) -> Option<f64> {
        self.average_bitrate.map(|bps| bps / 1000.0)
    }

    /// 다운로드 데이터가 있는 런인지 여부
    pub fn has_downloads(&self) -> bool {
        self.average_bitrate.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_run_serializes_nulls() {
        let stats = RunStatistics::empty(3);
        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value["run_nr"], 3);
        assert!(value["average_bitrate"].is_null());
        assert!(value["average_delay"].is_null());
        assert_eq!(value["skipped_count"], 0);
        assert!(!stats.has_downloads());
    }

    #[test]
    fn kbps_conversion() {
        let mut stats = RunStatistics::empty(1);
        stats.average_bitrate = Some(1_500_000.0);
        assert_eq!(stats.average_bitrate_kbps(), Some(1500.0));
        assert_eq!(RunStatistics::empty(1).average_bitrate_kbps(), None);
    }
}
