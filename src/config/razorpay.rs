//! Razorpay configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Razorpay credentials and order defaults
#[derive(Debug, Clone, Deserialize)]
pub struct RazorpayConfig {
    /// Public key id (`rzp_test_...` or `rzp_live_...`)
    pub key_id: String,

    /// API secret paired with the key id
    pub key_secret: SecretString,

    /// Secret configured on the webhook in the Razorpay dashboard
    pub webhook_secret: SecretString,

    /// Currency for new orders
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Razorpay API host
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

impl RazorpayConfig {
    pub fn new(
        key_id: impl Into<String>,
        key_secret: impl Into<String>,
        webhook_secret: impl Into<String>,
    ) -> Self {
        Self {
            key_id: key_id.into(),
            key_secret: SecretString::new(key_secret.into()),
            webhook_secret: SecretString::new(webhook_secret.into()),
            currency: default_currency(),
            api_base_url: default_api_base_url(),
        }
    }

    /// Check if using Razorpay test mode
    pub fn is_test_mode(&self) -> bool {
        self.key_id.starts_with("rzp_test_")
    }

    /// Validate Razorpay configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.key_id.is_empty() {
            return Err(ValidationError::MissingRequired("RAZORPAY__KEY_ID"));
        }
        if self.key_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("RAZORPAY__KEY_SECRET"));
        }
        if self.webhook_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("RAZORPAY__WEBHOOK_SECRET"));
        }
        if !self.key_id.starts_with("rzp_") {
            return Err(ValidationError::InvalidRazorpayKeyId);
        }
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ValidationError::InvalidCurrency);
        }
        Ok(())
    }
}

fn default_currency() -> String {
    "INR".to_string()
}

fn default_api_base_url() -> String {
    "https://api.razorpay.com".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> RazorpayConfig {
        RazorpayConfig::new("rzp_test_abcd1234", "key_secret", "webhook_secret")
    }

    #[test]
    fn test_defaults() {
        let config = valid();
        assert_eq!(config.currency, "INR");
        assert_eq!(config.api_base_url, "https://api.razorpay.com");
        assert!(config.is_test_mode());
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_validation_missing_key_secret() {
        let config = RazorpayConfig::new("rzp_test_abcd1234", "", "webhook_secret");
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("RAZORPAY__KEY_SECRET"))
        );
    }

    #[test]
    fn test_validation_missing_webhook_secret() {
        let config = RazorpayConfig::new("rzp_test_abcd1234", "key_secret", "");
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("RAZORPAY__WEBHOOK_SECRET"))
        );
    }

    #[test]
    fn test_validation_invalid_key_prefix() {
        let config = RazorpayConfig::new("pk_test_abcd", "key_secret", "webhook_secret");
        assert_eq!(config.validate(), Err(ValidationError::InvalidRazorpayKeyId));
    }

    #[test]
    fn test_validation_invalid_currency() {
        let config = RazorpayConfig {
            currency: "rupees".to_string(),
            ..valid()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidCurrency));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = RazorpayConfig::new("rzp_test_abcd1234", "s3cr3t_api", "s3cr3t_hook");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("s3cr3t"));
    }
}
