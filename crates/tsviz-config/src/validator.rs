//! Runtime validation entry point.

use crate::schema::Config;
use tsviz_common::Result;

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a configuration.
    pub fn validate(config: &Config) -> Result<()> {
        config.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ColorScheme;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ConfigValidator::validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_rejects_inverted_quantiles() {
        let mut config = Config::default();
        config.data.lower_quantile = 0.9;
        config.data.upper_quantile = 0.1;
        assert!(ConfigValidator::validate(&config).is_err());

        config.data.lower_quantile = 0.5;
        config.data.upper_quantile = 0.5;
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_quantiles() {
        let mut config = Config::default();
        config.data.upper_quantile = 1.5;
        assert!(ConfigValidator::validate(&config).is_err());

        let mut config = Config::default();
        config.data.lower_quantile = -0.1;
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        let mut config = Config::default();
        config.charts.bar.height = 0;
        let err = ConfigValidator::validate(&config).unwrap_err();
        assert!(err.to_string().contains("charts.bar"));
    }

    #[test]
    fn test_rejects_zero_stride_and_empty_file_name() {
        let mut config = Config::default();
        config.charts.line.ticks.stride = 0;
        assert!(ConfigValidator::validate(&config).is_err());

        let mut config = Config::default();
        config.output.box_file = "  ".to_string();
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_rejects_bad_colors() {
        let mut config = Config::default();
        config.charts.line.line_color = "red".to_string();
        assert!(ConfigValidator::validate(&config).is_err());

        let mut config = Config::default();
        config.style.color_scheme = ColorScheme::Custom(vec!["#00FF00".into(), "#GG0000".into()]);
        assert!(ConfigValidator::validate(&config).is_err());

        config.style.color_scheme = ColorScheme::Custom(vec![]);
        assert!(ConfigValidator::validate(&config).is_err());

        config.style.color_scheme = ColorScheme::Custom(vec!["#00ff00".into()]);
        assert!(ConfigValidator::validate(&config).is_ok());
    }
}
