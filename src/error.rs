use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("No pricing found for model \"{model}\"")]
    UnknownModel { model: String },

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("Failed to serialize output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Failures inside pricing acquisition.
///
/// These never escape the loader: each one moves acquisition to the next
/// fallback tier.
#[derive(Debug, Error)]
pub(crate) enum PricingError {
    #[error("No configuration directory available for the pricing cache")]
    NoCacheDir,

    #[error("Pricing cache I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid pricing JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Pricing request failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("Pricing payload must be a JSON object, got {kind}")]
    MalformedPayload { kind: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_error_display_unknown_model() {
        let e = AppError::UnknownModel {
            model: "mystery-1".to_string(),
        };
        assert_eq!(e.to_string(), r#"No pricing found for model "mystery-1""#);
    }

    #[test]
    fn pricing_error_display_malformed() {
        let e = PricingError::MalformedPayload { kind: "array" };
        assert_eq!(e.to_string(), "Pricing payload must be a JSON object, got array");
    }

    #[test]
    fn pricing_error_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let e: PricingError = json_err.into();
        assert!(e.to_string().starts_with("Invalid pricing JSON"));
    }

    #[test]
    fn app_error_wraps_pricing_error() {
        let e: AppError = PricingError::NoCacheDir.into();
        assert!(matches!(e, AppError::Pricing(PricingError::NoCacheDir)));
        assert_eq!(e.to_string(), PricingError::NoCacheDir.to_string());
    }

    #[test]
    fn pricing_error_no_cache_dir() {
        assert_eq!(
            PricingError::NoCacheDir.to_string(),
            "No configuration directory available for the pricing cache"
        );
    }
}
