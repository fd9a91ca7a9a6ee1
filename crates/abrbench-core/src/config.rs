//! 애플리케이션 설정 구조체.
//!
//! 로그 루트 경로, 수집 서버 포트, 분석 파라미터(RUNS, 알고리즘 집합,
//! 지연 상한, 제외 런 목록)를 정의한다. [`crate::config_manager`]를 통해 JSON 파일에서 로드.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::CoreError;
use crate::models::experiment::{Algorithm, ExperimentConfig};

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 캠페인 로그 저장 설정
    #[serde(default)]
    pub storage: StorageConfig,
    /// 수집 서버 설정
    #[serde(default)]
    pub web: WebConfig,
    /// 분석 설정
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl AppConfig {
    /// 기본 설정 생성
    pub fn default_config() -> Self {
        Self {
            storage: StorageConfig::default(),
            web: WebConfig::default(),
            analysis: AnalysisConfig::default(),
        }
    }

    /// 설정값 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        self.analysis.validate()
    }
}

// ============================================================
// 저장소 설정
// ============================================================

/// 캠페인 로그 저장 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// 캠페인 디렉토리들이 생성될 루트 (`<log_root>/<시작 시각>/`)
    #[serde(default = "default_log_root")]
    pub log_root: PathBuf,
    /// 레코드마다 `sync_data` 호출 여부
    #[serde(default = "default_true")]
    pub sync_writes: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            log_root: default_log_root(),
            sync_writes: true,
        }
    }
}

// ============================================================
// 수집 서버 설정
// ============================================================

/// 수집(HTTP) 서버 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// 서버 포트 (기본: 5000, 플레이어 리포터 기본 주소)
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// 외부 접근 허용 여부 (false: 127.0.0.1 only)
    #[serde(default)]
    pub allow_external: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: default_web_port(),
            allow_external: false,
        }
    }
}

// ============================================================
// 분석 설정
// ============================================================

/// 평균 지연 계산에서 통째로 제외할 런
///
/// 캠페인 중 수동으로 판별한 불량 런(브라우저 무응답 등)을 기록한다.
/// `sigma`가 `None`이면 해당 omega의 모든 sigma에 적용된다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedRun {
    pub omega: u32,
    #[serde(default)]
    pub sigma: Option<u32>,
    pub run_nr: u32,
    /// 제외 사유 (감사용 메모)
    #[serde(default)]
    pub reason: Option<String>,
}

impl ExcludedRun {
    /// (config, run_nr)에 적용되는지 여부
    pub fn matches(&self, config: ExperimentConfig, run_nr: u32) -> bool {
        self.omega == config.omega
            && self.run_nr == run_nr
            && self.sigma.map_or(true, |sigma| sigma == config.sigma)
    }
}

/// 오프라인 분석 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// 조건·알고리즘당 반복 횟수 (RUNS)
    #[serde(default = "default_runs")]
    pub runs: u32,
    /// 비교 대상 알고리즘 (출력 순서)
    #[serde(default = "Algorithm::default_set")]
    pub algorithms: Vec<Algorithm>,
    /// 이 값 이상인 지연 샘플은 재생 정지로 보고 제외 (초)
    #[serde(default = "default_delay_ceiling_secs")]
    pub delay_ceiling_secs: f64,
    /// 지연 집계에서 제외할 런 목록
    #[serde(default)]
    pub excluded_runs: Vec<ExcludedRun>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            runs: default_runs(),
            algorithms: Algorithm::default_set(),
            delay_ceiling_secs: default_delay_ceiling_secs(),
            excluded_runs: Vec::new(),
        }
    }
}

impl AnalysisConfig {
    /// 설정값 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.runs == 0 {
            return Err(CoreError::Config("runs는 1 이상이어야 합니다".to_string()));
        }
        if self.algorithms.is_empty() {
            return Err(CoreError::Config("알고리즘 목록이 비어 있습니다".to_string()));
        }
        if !self.delay_ceiling_secs.is_finite() || self.delay_ceiling_secs <= 0.0 {
            return Err(CoreError::Config(format!(
                "delay_ceiling_secs가 올바르지 않음: {}",
                self.delay_ceiling_secs
            )));
        }
        if let Some(bad) = self.excluded_runs.iter().find(|r| r.run_nr == 0) {
            return Err(CoreError::Config(format!(
                "제외 런의 run_nr은 1 이상이어야 합니다 (omega={})",
                bad.omega
            )));
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

fn default_log_root() -> PathBuf {
    PathBuf::from("logs")
}

fn default_web_port() -> u16 {
    5000
}

fn default_runs() -> u32 {
    5
}

fn default_delay_ceiling_secs() -> f64 {
    11.0
}
