//! Error types for price lookups

/// Pricing gateway error type
#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Authentication failed: {0}")]
    AuthError(String),

    #[error("Pricing API error (HTTP {status}): {body}")]
    ApiError { status: u16, body: String },

    #[error("Malformed pricing response: {0}")]
    MalformedResponse(String),

    #[error("Pricing API credentials not configured")]
    NotConfigured,
}

/// Result type alias for pricing operations
pub type Result<T> = std::result::Result<T, PricingError>;

impl PricingError {
    pub fn malformed<S: Into<String>>(msg: S) -> Self {
        PricingError::MalformedResponse(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PricingError::ApiError {
            status: 429,
            body: "Too many requests".to_string(),
        };
        assert_eq!(err.to_string(), "Pricing API error (HTTP 429): Too many requests");
        assert_eq!(
            PricingError::NotConfigured.to_string(),
            "Pricing API credentials not configured"
        );
    }
}
