//! # abrbench-storage
//!
//! 캠페인 로그 저장소 어댑터.
//! 캠페인 시작 시각으로 이름 붙인 디렉토리 아래에 메트릭 종류별 CSV 스트림 네 개를 두고,
//! 수집 중에는 append-only로 기록하며 분석 시에는 기록 순서대로 다시 적재한다.
//!
//! ## 모듈
//! - `campaign`: 캠페인 디렉토리 + 스트림 소유 (`MetricSink` 구현)
//! - `reader`: 종료된 캠페인 스트림 적재 (`CampaignSource` 구현)
//! - `record`: 이벤트 ↔ CSV 레코드 변환
//! - `stream`: 스트림 하나의 단일 작성자 기록

pub mod campaign;
pub mod reader;
pub mod record;
mod stream;

pub use campaign::MetricStore;
pub use reader::{read_stream, CampaignPaths, CampaignReader};
