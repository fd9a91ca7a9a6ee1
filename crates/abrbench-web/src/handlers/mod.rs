//! HTTP 핸들러 모듈.

pub mod report;

/// 서버 안내 문구 (`GET /`)
pub async fn index() -> &'static str {
    "abrbench 로그 서버: GET /report?metric_id=..&... 로 텔레메트리를 보고하세요\n"
}
