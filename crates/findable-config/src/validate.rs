//! Operator-input validation: sanity checks on the config values a run is
//! about to launch with, before the pipeline commits to a crawl. Narrowed
//! down from the teacher's request-layer security validation (payload size
//! limits, header counts, allowed content types for an inbound HTTP
//! request) to the one surface this crate actually fronts: config-path
//! sanity, since the HTTP API itself is an external collaborator (spec.md
//! §1) this core does not implement.

use findable_types::calibration::CalibrationConfig;
use findable_types::config::{CrawlConfig, PipelineConfig};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must be greater than zero, got {value}")]
    MustBePositive { field: String, value: i64 },

    #[error("{field} exceeds the maximum of {max}, got {value}")]
    ExceedsMaximum { field: String, value: i64, max: i64 },

    #[error("calibration config is invalid: weights must sum to 100, thresholds must satisfy fully > partial, and scoring sub-weights must sum to 1.0")]
    InvalidCalibration,

    #[error("user_agent must not be empty")]
    EmptyUserAgent,
}

/// A hard ceiling on `max_pages`, independent of whatever an operator
/// configures: the crawler's frontier and the per-site retrieval index are
/// both in-process, unbounded-growth structures, so this is the one limit
/// validation enforces rather than merely recommends.
pub const MAX_PAGES_CEILING: usize = 5_000;

/// A hard ceiling on `max_depth`: BFS frontiers widen combinatorially, and
/// nothing in spec.md calls for crawls deeper than a shallow site map.
pub const MAX_DEPTH_CEILING: u32 = 20;

pub fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ValidationError> {
    if config.max_pages == 0 {
        return Err(ValidationError::MustBePositive { field: "crawl.max_pages".to_string(), value: 0 });
    }
    if config.max_pages > MAX_PAGES_CEILING {
        return Err(ValidationError::ExceedsMaximum {
            field: "crawl.max_pages".to_string(),
            value: config.max_pages as i64,
            max: MAX_PAGES_CEILING as i64,
        });
    }
    if config.max_depth > MAX_DEPTH_CEILING {
        return Err(ValidationError::ExceedsMaximum {
            field: "crawl.max_depth".to_string(),
            value: config.max_depth as i64,
            max: MAX_DEPTH_CEILING as i64,
        });
    }
    if config.concurrency == 0 {
        return Err(ValidationError::MustBePositive { field: "crawl.concurrency".to_string(), value: 0 });
    }
    if config.user_agent.trim().is_empty() {
        return Err(ValidationError::EmptyUserAgent);
    }
    Ok(())
}

pub fn validate_pipeline_config(config: &PipelineConfig) -> Result<(), ValidationError> {
    if config.max_pages == 0 {
        return Err(ValidationError::MustBePositive { field: "pipeline.max_pages".to_string(), value: 0 });
    }
    if config.max_pages > MAX_PAGES_CEILING {
        return Err(ValidationError::ExceedsMaximum {
            field: "pipeline.max_pages".to_string(),
            value: config.max_pages as i64,
            max: MAX_PAGES_CEILING as i64,
        });
    }
    if config.concurrent_extractions == 0 {
        return Err(ValidationError::MustBePositive { field: "pipeline.concurrent_extractions".to_string(), value: 0 });
    }
    Ok(())
}

/// Delegates to `CalibrationConfig::is_valid` (weights sum to 100,
/// `fully > partial`, scoring sub-weights sum to 1.0) and turns a `false`
/// into a reportable error; this crate does not duplicate that invariant.
pub fn validate_calibration_config(config: &CalibrationConfig) -> Result<(), ValidationError> {
    if config.is_valid() {
        Ok(())
    } else {
        Err(ValidationError::InvalidCalibration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_crawl_config_is_valid() {
        assert!(validate_crawl_config(&CrawlConfig::default()).is_ok());
    }

    #[test]
    fn zero_max_pages_is_rejected() {
        let mut config = CrawlConfig::default();
        config.max_pages = 0;
        assert_eq!(
            validate_crawl_config(&config),
            Err(ValidationError::MustBePositive { field: "crawl.max_pages".to_string(), value: 0 })
        );
    }

    #[test]
    fn excessive_max_pages_is_rejected() {
        let mut config = CrawlConfig::default();
        config.max_pages = MAX_PAGES_CEILING + 1;
        assert!(validate_crawl_config(&config).is_err());
    }

    #[test]
    fn blank_user_agent_is_rejected() {
        let mut config = CrawlConfig::default();
        config.user_agent = "   ".to_string();
        assert_eq!(validate_crawl_config(&config), Err(ValidationError::EmptyUserAgent));
    }

    #[test]
    fn default_pipeline_config_is_valid() {
        assert!(validate_pipeline_config(&PipelineConfig::default()).is_ok());
    }

    #[test]
    fn default_active_calibration_config_is_valid() {
        assert!(validate_calibration_config(&CalibrationConfig::default_active()).is_ok());
    }

    #[test]
    fn calibration_config_with_bad_weights_is_rejected() {
        let mut config = CalibrationConfig::default_active();
        config.pillar_weights.insert(findable_types::pillar::Pillar::Technical, 9_999.0);
        assert_eq!(validate_calibration_config(&config), Err(ValidationError::InvalidCalibration));
    }
}
