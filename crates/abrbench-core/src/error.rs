//! abrbench 핵심 에러 타입.
//!
//! 모든 어댑터 crate는 자체 에러 타입에서 `CoreError`를 변환해 사용한다.
//! 빈 집계(샘플 없는 런)는 에러가 아니라 `None` 값으로 표현한다.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::metric::MetricKind;

/// 코어 레이어 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 수신 이벤트의 필드 누락/형식 오류: 이벤트는 저장되지 않는다
    #[error("유효성 검증 실패 [{kind}] {field}: {message}")]
    Validation {
        /// 선언된 메트릭 종류
        kind: MetricKind,
        /// 검증 실패한 필드명 (저장 컬럼명)
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 알 수 없는 메트릭 구분자
    #[error("알 수 없는 메트릭 종류: {0}")]
    UnknownMetricKind(String),

    /// 레코드 기록 실패: 해당 append 한 건에 대해서만 치명적, 재시도 없음
    #[error("기록 실패 [{kind}] {key}: {message}")]
    Persistence {
        /// 대상 스트림
        kind: MetricKind,
        /// 실험 키 (표시 문자열)
        key: String,
        /// 실패 사유
        message: String,
    },

    /// 캠페인 디렉토리/스트림 생성 실패
    #[error("캠페인 디렉토리 에러: {}: {message}", path.display())]
    Campaign {
        /// 캠페인 디렉토리 또는 스트림 경로
        path: PathBuf,
        /// 실패 사유
        message: String,
    },

    /// 저장된 스트림을 다시 읽는 중 형식 오류
    #[error("스트림 형식 오류: {}:{line}: {message}", path.display())]
    StreamFormat {
        /// 스트림 파일 경로
        path: PathBuf,
        /// 1부터 시작하는 줄 번호 (헤더 포함)
        line: u64,
        /// 실패 사유
        message: String,
    },

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),
}

impl CoreError {
    /// 호출자(수집 요청자)의 입력이 잘못된 경우인지 여부
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            CoreError::Validation { .. } | CoreError::UnknownMetricKind(_)
        )
    }
}
