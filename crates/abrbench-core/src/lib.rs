//! # abrbench-core
//!
//! ABR 평가 캠페인의 도메인 모델, 포트(trait) 정의, 에러 타입.
//! 모든 크레이트가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`]: 텔레메트리 이벤트, 실험 키, 런 통계 (serde Serialize/Deserialize)
//! - [`validation`]: 원시 필드 맵 → 검증된 [`models::telemetry::TelemetryEvent`]
//! - [`ingest`]: 수집 경계 (`report`)
//! - [`ports`]: Hexagonal Architecture 포트 인터페이스
//! - [`error`]: 핵심 에러 타입 (thiserror)
//! - [`config`]: 애플리케이션 설정 구조체
//! - [`config_manager`]: 설정 파일 관리 (로드/저장)

pub mod config;
pub mod config_manager;
pub mod error;
pub mod ingest;
pub mod models;
pub mod ports;
pub mod validation;

#[cfg(test)]
mod tests {
    use crate::models::experiment::{Algorithm, ExperimentConfig};
    use crate::models::metric::MetricKind;

    #[test]
    fn config_defaults() {
        let config = crate::config::AppConfig::default_config();
        assert_eq!(config.web.port, 5000);
        assert!(!config.web.allow_external);
        assert_eq!(config.analysis.runs, 5);
        assert_eq!(config.analysis.delay_ceiling_secs, 11.0);
        assert_eq!(config.analysis.algorithms.len(), 3);
        assert!(config.analysis.excluded_runs.is_empty());
        assert!(config.storage.sync_writes);
    }

    #[test]
    fn metric_kind_serde_uses_snake_case() {
        let json = serde_json::to_string(&MetricKind::Throughput).unwrap();
        assert_eq!(json, "\"throughput\"");
    }

    #[test]
    fn experiment_config_serde_roundtrip() {
        let config = ExperimentConfig::new(35, 4);
        let json = serde_json::to_string(&config).unwrap();
        let back: ExperimentConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn algorithm_serializes_transparently() {
        let algo = Algorithm::new("bola").unwrap();
        assert_eq!(serde_json::to_string(&algo).unwrap(), "\"bola\"");
    }
}
