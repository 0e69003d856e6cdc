use crate::instrument::{ChainFilter, FuturesContract};
use crate::schedule::{ScheduleError, SessionSchedule, SessionTime};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("No underlyings configured")]
    NoUnderlyings,
    #[error("Unknown underlying: {0}")]
    UnknownUnderlying(String),
    #[error("Lookback must be >= 1")]
    ZeroLookback,
    #[error("Order quantity must be >= 1")]
    ZeroQuantity,
    #[error("Order quantity {0} exceeds {max}", max = i32::MAX)]
    QuantityTooLarge(u32),
    #[error("RSI threshold {name} ({value}) outside [0, 100]")]
    ThresholdOutOfRange { name: &'static str, value: f64 },
    #[error("RSI oversold ({oversold}) must be below overbought ({overbought})")]
    ThresholdOrder { oversold: f64, overbought: f64 },
    #[error("Start date {start} is after end date {end}")]
    DateRange { start: NaiveDate, end: NaiveDate },
    #[error("Initial cash must be positive, got {0}")]
    NonPositiveCash(f64),
    #[error("Chain filter window [{min_days}, {max_days}] is empty")]
    ChainFilter { min_days: i64, max_days: i64 },
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

//entry rule parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalParams {
    pub lookback: usize,
    pub oversold: f64,
    pub overbought: f64,
    pub qty: u32,
}

impl Default for SignalParams {
    fn default() -> Self {
        SignalParams {
            lookback: 14,
            oversold: 30.0,
            overbought: 70.0,
            qty: 1,
        }
    }
}

//complete algorithm and backtest configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlgorithmConfig {
    //backtest window (inclusive, calendar days in time_zone)
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    pub initial_cash: f64,

    //subscribed roots (eg es, nq)
    pub underlyings: Vec<String>,

    pub chain_filter: ChainFilter,

    pub signal: SignalParams,

    //iana name the session times are expressed in
    pub time_zone: String,

    pub sessions: Vec<SessionTime>,
}

impl Default for AlgorithmConfig {
    fn default() -> Self {
        AlgorithmConfig {
            start_date: NaiveDate::from_ymd_opt(2022, 12, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2023, 1, 15).unwrap_or_default(),
            initial_cash: 100000.0,
            underlyings: vec!["ES".to_string(), "NQ".to_string()],
            chain_filter: ChainFilter::default(),
            signal: SignalParams::default(),
            time_zone: "America/Los_Angeles".to_string(),
            sessions: SessionSchedule::default_times(),
        }
    }
}

impl AlgorithmConfig {
    //checks every field, returning the first problem found
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.underlyings.is_empty() {
            return Err(ConfigError::NoUnderlyings);
        }
        self.contracts()?;

        if self.signal.lookback == 0 {
            return Err(ConfigError::ZeroLookback);
        }
        if self.signal.qty == 0 {
            return Err(ConfigError::ZeroQuantity);
        }
        if i32::try_from(self.signal.qty).is_err() {
            return Err(ConfigError::QuantityTooLarge(self.signal.qty));
        }

        for (name, value) in [
            ("oversold", self.signal.oversold),
            ("overbought", self.signal.overbought),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ConfigError::ThresholdOutOfRange { name, value });
            }
        }
        if self.signal.oversold >= self.signal.overbought {
            return Err(ConfigError::ThresholdOrder {
                oversold: self.signal.oversold,
                overbought: self.signal.overbought,
            });
        }

        if self.start_date > self.end_date {
            return Err(ConfigError::DateRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        if self.initial_cash.is_nan() || self.initial_cash <= 0.0 {
            return Err(ConfigError::NonPositiveCash(self.initial_cash));
        }
        if self.chain_filter.min_days > self.chain_filter.max_days {
            return Err(ConfigError::ChainFilter {
                min_days: self.chain_filter.min_days,
                max_days: self.chain_filter.max_days,
            });
        }

        self.schedule()?;
        Ok(())
    }

    //roots in subscription order, upper-cased
    pub fn roots(&self) -> Vec<String> {
        self.underlyings.iter().map(|u| u.to_uppercase()).collect()
    }

    //contract specs for every subscribed root
    pub fn contracts(&self) -> Result<Vec<FuturesContract>, ConfigError> {
        self.underlyings
            .iter()
            .map(|u| {
                FuturesContract::for_root(u).ok_or_else(|| ConfigError::UnknownUnderlying(u.clone()))
            })
            .collect()
    }

    pub fn schedule(&self) -> Result<SessionSchedule, ConfigError> {
        Ok(SessionSchedule::new(&self.time_zone, &self.sessions)?)
    }

    //load configuration from a JSON file
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: AlgorithmConfig = serde_json::from_str(&contents)?;
        Ok(config)
    }

    //save configuration to a JSON file
    pub fn to_json_file(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AlgorithmConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.signal.lookback, 14);
        assert_eq!(config.chain_filter.max_days, 90);
        assert_eq!(config.roots(), vec!["ES", "NQ"]);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: AlgorithmConfig =
            serde_json::from_str(r#"{ "underlyings": ["es"], "signal": { "lookback": 20 } }"#)
                .unwrap();
        assert_eq!(config.roots(), vec!["ES"]);
        assert_eq!(config.signal.lookback, 20);
        assert_eq!(config.signal.overbought, 70.0);
        assert_eq!(config.initial_cash, 100000.0);
        assert_eq!(config.sessions.len(), 4);
    }

    #[test]
    fn rejects_unknown_root() {
        let config = AlgorithmConfig {
            underlyings: vec!["CL".to_string()],
            ..AlgorithmConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::UnknownUnderlying("CL".to_string()))
        );
    }

    #[test]
    fn rejects_inverted_thresholds() {
        let mut config = AlgorithmConfig::default();
        config.signal.oversold = 80.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ThresholdOrder { .. })
        ));

        config.signal.oversold = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ThresholdOutOfRange {
                name: "oversold",
                ..
            })
        ));
    }

    #[test]
    fn rejects_quantity_that_does_not_fit_a_signed_order() {
        let mut config = AlgorithmConfig::default();
        config.signal.qty = 3_000_000_000;
        assert_eq!(
            config.validate(),
            Err(ConfigError::QuantityTooLarge(3_000_000_000))
        );

        config.signal.qty = i32::MAX as u32;
        assert_eq!(config.validate(), Ok(()));

        config.signal.qty = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroQuantity));
    }

    #[test]
    fn rejects_bad_time_zone() {
        let config = AlgorithmConfig {
            time_zone: "Nowhere/Land".to_string(),
            ..AlgorithmConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::Schedule(ScheduleError::UnknownTimeZone(
                "Nowhere/Land".to_string()
            )))
        );
    }

    #[test]
    fn rejects_reversed_dates() {
        let config = AlgorithmConfig {
            start_date: NaiveDate::from_ymd_opt(2023, 2, 1).unwrap(),
            ..AlgorithmConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DateRange { .. })
        ));
    }

    #[test]
    fn json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = AlgorithmConfig::default();
        config.initial_cash = 250000.0;
        config.to_json_file(&path).unwrap();

        let loaded = AlgorithmConfig::from_json_file(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
