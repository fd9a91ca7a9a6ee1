//! abrbench 도메인 모델.
//!
//! 수집 단계와 분석 단계가 공유하는 데이터 구조체를 정의한다.
//! 모든 모델은 `serde` Serialize/Deserialize를 구현한다.

pub mod campaign;
pub mod experiment;
pub mod metric;
pub mod stats;
pub mod telemetry;
