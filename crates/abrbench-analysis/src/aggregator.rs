//! 런 단위 집계.
//!
//! (조건, 알고리즘, run_nr) 하나에 속한 이벤트를 스트림 기록 순서대로 훑어
//! [`RunStatistics`]를 만든다. 같은 입력이면 항상 같은 결과를 낸다.

use abrbench_core::models::campaign::CampaignLog;
use abrbench_core::models::experiment::{Algorithm, ExperimentConfig};
use abrbench_core::models::stats::RunStatistics;
use tracing::debug;

use crate::outlier::OutlierFilter;

/// 인접한 두 비트레이트가 다른 횟수
pub fn count_quality_transitions<I>(bitrates: I) -> u32
where
    I: IntoIterator<Item = u64>,
{
    let mut previous = None;
    let mut count = 0;
    for bitrate in bitrates {
        if previous.is_some_and(|p| p != bitrate) {
            count += 1;
        }
        previous = Some(bitrate);
    }
    count
}

/// 산술 평균 (샘플이 없으면 None)
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0u64), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// 캠페인 로그 위의 런 집계기
pub struct RunAggregator<'a> {
    log: &'a CampaignLog,
    filter: &'a OutlierFilter,
}

impl<'a> RunAggregator<'a> {
    pub fn new(log: &'a CampaignLog, filter: &'a OutlierFilter) -> Self {
        Self { log, filter }
    }

    /// 런 하나의 통계
    pub fn aggregate(
        &self,
        config: ExperimentConfig,
        algorithm: &Algorithm,
        run_nr: u32,
    ) -> RunStatistics {
        let downloads: Vec<u64> = self
            .log
            .downloads
            .iter()
            .filter(|e| e.meta.key.matches(config, algorithm, run_nr))
            .map(|e| e.bitrate)
            .collect();

        let skipped_count = self
            .log
            .skipped
            .iter()
            .filter(|e| e.meta.key.matches(config, algorithm, run_nr))
            .count() as u32;

        let delays = self.filter.filter(
            config,
            run_nr,
            self.log
                .delays
                .iter()
                .filter(|e| e.meta.key.matches(config, algorithm, run_nr))
                .map(|e| e.delay),
        );

        let average_throughput = mean(
            self.log
                .throughputs
                .iter()
                .filter(|e| e.meta.key.matches(config, algorithm, run_nr))
                .map(|e| e.throughput_bps),
        );

        let stats = RunStatistics {
            run_nr,
            quality_transition_count: count_quality_transitions(downloads.iter().copied()),
            average_bitrate: mean(downloads.iter().map(|b| *b as f64)),
            skipped_count,
            average_delay: mean(delays),
            average_throughput,
        };

        if stats.average_bitrate.is_none()
            || stats.average_delay.is_none()
            || stats.average_throughput.is_none()
        {
            debug!(
                "빈 집계: {} {} run={} (bitrate={:?}, delay={:?}, throughput={:?})",
                config,
                algorithm,
                run_nr,
                stats.average_bitrate,
                stats.average_delay,
                stats.average_throughput
            );
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abrbench_core::config::ExcludedRun;
    use abrbench_core::models::experiment::ExperimentKey;
    use abrbench_core::models::telemetry::{
        DelayEvent, DownloadEvent, EventMeta, SkippedEvent, TelemetryEvent, ThroughputEvent,
    };

    fn meta(algo: &str, omega: u32, run_nr: u32) -> EventMeta {
        EventMeta {
            timestamp: 0,
            key: ExperimentKey {
                algorithm: Algorithm::new(algo).unwrap(),
                omega,
                sigma: 3,
                test_nr: 1,
                run_nr,
            },
        }
    }

    fn download(algo: &str, run_nr: u32, bitrate: u64) -> TelemetryEvent {
        TelemetryEvent::Download(DownloadEvent {
            meta: meta(algo, 10, run_nr),
            media_type: "video".to_string(),
            bitrate,
            send_time: 0,
            first_byte_time: 0,
            loaded_time: 0,
            bytes_loaded: 0,
            bytes_total: 0,
        })
    }

    fn delay(algo: &str, run_nr: u32, value: f64) -> TelemetryEvent {
        TelemetryEvent::Delay(DelayEvent {
            meta: meta(algo, 10, run_nr),
            delay: value,
        })
    }

    fn skipped(algo: &str, run_nr: u32) -> TelemetryEvent {
        TelemetryEvent::Skipped(SkippedEvent {
            meta: meta(algo, 10, run_nr),
            media_type: String::new(),
            bitrate: 0,
            send_time: 0,
            first_byte_time: 0,
            abort_time: 0,
            bytes_loaded: 0,
            bytes_total: 0,
        })
    }

    fn throughput(algo: &str, run_nr: u32, bps: f64) -> TelemetryEvent {
        TelemetryEvent::Throughput(ThroughputEvent {
            meta: meta(algo, 10, run_nr),
            media_type: String::new(),
            bytes: 0,
            activity_duration_s: 1.0,
            throughput_bps: bps,
        })
    }

    fn bola() -> Algorithm {
        Algorithm::new(Algorithm::BOLA).unwrap()
    }

    #[test]
    fn transitions() {
        assert_eq!(count_quality_transitions([500, 500, 750, 750, 300]), 2);
        assert_eq!(count_quality_transitions([500]), 0);
        assert_eq!(count_quality_transitions(Vec::<u64>::new()), 0);
        assert_eq!(count_quality_transitions([300, 500, 300]), 2);
    }

    #[test]
    fn mean_of_nothing_is_undefined() {
        assert_eq!(mean(std::iter::empty()), None);
        assert_eq!(mean([1.0, 2.0, 3.0]), Some(2.0));
    }

    #[test]
    fn aggregate_one_run() {
        let log: CampaignLog = vec![
            download("bola", 1, 500),
            download("bola", 1, 500),
            download("bola", 1, 750),
            download("bola", 2, 9_999),
            download("dashjs", 1, 100),
            delay("bola", 1, 1.0),
            delay("bola", 1, 2.0),
            delay("bola", 1, 11.0),
            delay("bola", 1, 3.0),
            skipped("bola", 1),
            skipped("bola", 1),
            skipped("dashjs", 1),
            throughput("bola", 1, 1000.0),
            throughput("bola", 1, 3000.0),
        ]
        .into_iter()
        .collect();
        let filter = OutlierFilter::default();
        let aggregator = RunAggregator::new(&log, &filter);

        let stats = aggregator.aggregate(ExperimentConfig::new(10, 3), &bola(), 1);
        assert_eq!(stats.run_nr, 1);
        assert_eq!(stats.quality_transition_count, 1);
        assert_eq!(stats.average_bitrate, Some(1750.0 / 3.0));
        assert_eq!(stats.skipped_count, 2);
        assert_eq!(stats.average_delay, Some(2.0));
        assert_eq!(stats.average_throughput, Some(2000.0));
    }

    #[test]
    fn run_without_events_is_undefined_not_zero() {
        let log = CampaignLog::new();
        let filter = OutlierFilter::default();
        let stats = RunAggregator::new(&log, &filter).aggregate(ExperimentConfig::new(10, 3), &bola(), 4);
        assert_eq!(stats, RunStatistics::empty(4));
    }

    #[test]
    fn excluded_run_has_no_delay_but_keeps_other_metrics() {
        let log: CampaignLog = vec![download("bola", 2, 500), delay("bola", 2, 1.0)]
            .into_iter()
            .collect();
        let filter = OutlierFilter::new(
            11.0,
            vec![ExcludedRun {
                omega: 10,
                sigma: None,
                run_nr: 2,
                reason: None,
            }],
        );
        let stats = RunAggregator::new(&log, &filter).aggregate(ExperimentConfig::new(10, 3), &bola(), 2);
        assert_eq!(stats.average_delay, None);
        assert_eq!(stats.average_bitrate, Some(500.0));
    }

    #[test]
    fn aggregate_is_repeatable() {
        let log: CampaignLog = vec![download("bola", 1, 500), delay("bola", 1, 0.25)]
            .into_iter()
            .collect();
        let filter = OutlierFilter::default();
        let aggregator = RunAggregator::new(&log, &filter);
        let config = ExperimentConfig::new(10, 3);
        assert_eq!(
            aggregator.aggregate(config, &bola(), 1),
            aggregator.aggregate(config, &bola(), 1)
        );
    }
}
