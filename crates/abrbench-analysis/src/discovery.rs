//! 실험 조건 탐색.
//!
//! 다운로드 스트림에 실제로 나타난 (omega, sigma) 조합을 처음 등장한 순서대로 모은다.

use std::collections::HashSet;

use abrbench_core::models::experiment::ExperimentConfig;
use abrbench_core::models::telemetry::DownloadEvent;

/// 중복 없는 조건 목록 (첫 등장 순서)
pub fn discover<'a, I>(downloads: I) -> Vec<ExperimentConfig>
where
    I: IntoIterator<Item = &'a DownloadEvent>,
{
    let mut seen = HashSet::new();
    let mut configs = Vec::new();
    for event in downloads {
        let config = event.meta.key.config();
        if seen.insert(config) {
            configs.push(config);
        }
    }
    configs
}
