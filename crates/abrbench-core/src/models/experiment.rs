//! 실험 식별자.
//!
//! - [`Algorithm`]: 평가 대상 ABR 알고리즘 이름 (확장 가능한 집합)
//! - [`ExperimentConfig`]: (omega, sigma) 조건 쌍
//! - [`ExperimentKey`]: 이벤트 하나가 속하는 (algorithm, omega, sigma, test_nr, run_nr)

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// ABR 알고리즘 식별자
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Algorithm(String);

impl Algorithm {
    /// LoLYPoP
    pub const LOLYPOP: &'static str = "lolypop";
    /// BOLA
    pub const BOLA: &'static str = "bola";
    /// dash.js 기본 규칙
    pub const DASHJS: &'static str = "dashjs";

    /// 알고리즘 이름 검증 후 생성 (빈 문자열 불가)
    pub fn new(name: impl Into<String>) -> Result<Self, CoreError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CoreError::Config("알고리즘 이름이 비어 있음".to_string()));
        }
        Ok(Self(name))
    }

    /// 기본 비교 대상 집합
    pub fn default_set() -> Vec<Algorithm> {
        [Self::LOLYPOP, Self::BOLA, Self::DASHJS]
            .into_iter()
            .map(|name| Algorithm(name.to_string()))
            .collect()
    }

    /// 이름 문자열
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Algorithm {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Algorithm::new(value)
    }
}

impl From<Algorithm> for String {
    fn from(value: Algorithm) -> Self {
        value.0
    }
}

/// 실험 조건: 대역폭 변동(omega)과 지터(sigma), 단위는 정수 퍼센트
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub omega: u32,
    pub sigma: u32,
}

impl ExperimentConfig {
    pub fn new(omega: u32, sigma: u32) -> Self {
        Self { omega, sigma }
    }
}

impl fmt::Display for ExperimentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "omega={}% sigma={}%", self.omega, self.sigma)
    }
}

/// 실험 키: 모든 이벤트는 정확히 하나의 키에 속한다
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExperimentKey {
    pub algorithm: Algorithm,
    pub omega: u32,
    pub sigma: u32,
    /// 캠페인 내 조건 인덱스 (1부터)
    pub test_nr: u32,
    /// 반복 인덱스 (1..=RUNS)
    pub run_nr: u32,
}

impl ExperimentKey {
    /// 이 키의 실험 조건
    pub fn config(&self) -> ExperimentConfig {
        ExperimentConfig::new(self.omega, self.sigma)
    }

    /// 집계 그룹 일치 여부: (omega, sigma, algorithm, run_nr) 정확 일치
    pub fn matches(&self, config: ExperimentConfig, algorithm: &Algorithm, run_nr: u32) -> bool {
        self.omega == config.omega
            && self.sigma == config.sigma
            && self.run_nr == run_nr
            && &self.algorithm == algorithm
    }
}

impl fmt::Display for ExperimentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}/{}",
            self.algorithm, self.omega, self.sigma, self.test_nr, self.run_nr
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(algo: &str, omega: u32, sigma: u32, run_nr: u32) -> ExperimentKey {
        ExperimentKey {
            algorithm: Algorithm::new(algo).unwrap(),
            omega,
            sigma,
            test_nr: 1,
            run_nr,
        }
    }

    #[test]
    fn empty_algorithm_rejected() {
        assert!(Algorithm::new("").is_err());
        assert!(Algorithm::new("   ").is_err());
        assert!(serde_json::from_str::<Algorithm>("\"\"").is_err());
    }

    #[test]
    fn default_set_order() {
        let names: Vec<String> = Algorithm::default_set()
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(names, vec!["lolypop", "bola", "dashjs"]);
    }

    #[test]
    fn matches_is_exact() {
        let k = key("bola", 10, 3, 2);
        let bola = Algorithm::new("bola").unwrap();
        let bola_upper = Algorithm::new("BOLA").unwrap();

        assert!(k.matches(ExperimentConfig::new(10, 3), &bola, 2));
        assert!(!k.matches(ExperimentConfig::new(10, 6), &bola, 2));
        assert!(!k.matches(ExperimentConfig::new(20, 3), &bola, 2));
        assert!(!k.matches(ExperimentConfig::new(10, 3), &bola, 1));
        assert!(!k.matches(ExperimentConfig::new(10, 3), &bola_upper, 2));
    }

    #[test]
    fn test_nr_is_not_part_of_group() {
        let mut k = key("dashjs", 20, 6, 1);
        k.test_nr = 4;
        let dashjs = Algorithm::new("dashjs").unwrap();
        assert!(k.matches(ExperimentConfig::new(20, 6), &dashjs, 1));
    }

    #[test]
    fn key_display() {
        assert_eq!(key("lolypop", 35, 4, 5).to_string(), "lolypop/35/4/1/5");
        assert_eq!(
            ExperimentConfig::new(10, 3).to_string(),
            "omega=10% sigma=3%"
        );
    }
}
