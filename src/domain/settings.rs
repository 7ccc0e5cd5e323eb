//! Validated sweep configuration.

use std::time::Duration;

use crate::domain::error::PricesweepError;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_PERIOD_SECS: i64 = 10;
pub const DEFAULT_CONCURRENCY: i64 = 8;

/// Runtime settings for the refresh sweep, read from the `[refresh]` and
/// `[twelvedata]` config sections. A missing or blank API credential is not
/// an error: every resolution degrades to simulation instead.
#[derive(Debug, Clone)]
pub struct SweepSettings {
    pub period: Duration,
    pub drift_bound: f64,
    pub concurrency: usize,
    pub api_key: Option<String>,
}

impl SweepSettings {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, PricesweepError> {
        let period_secs = config.get_int("refresh", "period_secs", DEFAULT_PERIOD_SECS);
        if period_secs <= 0 {
            return Err(PricesweepError::ConfigInvalid {
                section: "refresh".into(),
                key: "period_secs".into(),
                reason: format!("must be positive, got {period_secs}"),
            });
        }

        let drift_bound = config.get_double(
            "refresh",
            "drift_bound",
            crate::domain::estimator::DEFAULT_DRIFT_BOUND,
        );
        if drift_bound <= 0.0 || drift_bound >= 1.0 {
            return Err(PricesweepError::ConfigInvalid {
                section: "refresh".into(),
                key: "drift_bound".into(),
                reason: format!("must be in (0, 1), got {drift_bound}"),
            });
        }

        let concurrency = config.get_int("refresh", "concurrency", DEFAULT_CONCURRENCY);
        if concurrency <= 0 {
            return Err(PricesweepError::ConfigInvalid {
                section: "refresh".into(),
                key: "concurrency".into(),
                reason: format!("must be positive, got {concurrency}"),
            });
        }

        let api_key = config
            .get_string("twelvedata", "apikey")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        Ok(SweepSettings {
            period: Duration::from_secs(period_secs as u64),
            drift_bound,
            concurrency: concurrency as usize,
            api_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn defaults_when_sections_absent() {
        let settings = SweepSettings::from_config(&config("")).unwrap();
        assert_eq!(settings.period, Duration::from_secs(10));
        assert!((settings.drift_bound - 0.01).abs() < f64::EPSILON);
        assert_eq!(settings.concurrency, 8);
        assert!(settings.api_key.is_none());
    }

    #[test]
    fn explicit_values_parsed() {
        let settings = SweepSettings::from_config(&config(
            "[refresh]\nperiod_secs = 30\ndrift_bound = 0.05\nconcurrency = 4\n\n[twelvedata]\napikey = abc123\n",
        ))
        .unwrap();
        assert_eq!(settings.period, Duration::from_secs(30));
        assert!((settings.drift_bound - 0.05).abs() < f64::EPSILON);
        assert_eq!(settings.concurrency, 4);
        assert_eq!(settings.api_key.as_deref(), Some("abc123"));
    }

    #[test]
    fn blank_api_key_treated_as_absent() {
        let settings =
            SweepSettings::from_config(&config("[twelvedata]\napikey =   \n")).unwrap();
        assert!(settings.api_key.is_none());
    }

    #[test]
    fn non_positive_period_rejected() {
        let err = SweepSettings::from_config(&config("[refresh]\nperiod_secs = 0\n"));
        assert!(matches!(
            err,
            Err(PricesweepError::ConfigInvalid { ref key, .. }) if key == "period_secs"
        ));
    }

    #[test]
    fn out_of_range_drift_rejected() {
        for content in ["[refresh]\ndrift_bound = 0\n", "[refresh]\ndrift_bound = 1.5\n"] {
            let err = SweepSettings::from_config(&config(content));
            assert!(matches!(
                err,
                Err(PricesweepError::ConfigInvalid { ref key, .. }) if key == "drift_bound"
            ));
        }
    }
}
