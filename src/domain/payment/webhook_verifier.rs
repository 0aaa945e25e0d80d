//! Razorpay webhook signature verification.
//!
//! Razorpay signs every webhook delivery with HMAC-SHA256 over the exact
//! request body, keyed with the webhook secret, and sends the hex digest in
//! the `X-Razorpay-Signature` header. Verification must run on the untouched
//! bytes: re-serializing parsed JSON changes key order and whitespace.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::razorpay_event::RazorpayEvent;
use super::webhook_errors::WebhookError;

type HmacSha256 = Hmac<Sha256>;

/// Name of the header carrying the webhook signature.
pub const SIGNATURE_HEADER: &str = "x-razorpay-signature";

/// Verifier for Razorpay webhook signatures.
#[derive(Clone)]
pub struct WebhookVerifier {
    /// The webhook secret configured in the Razorpay dashboard.
    secret: SecretString,
}

impl WebhookVerifier {
    /// Creates a new verifier with the given webhook secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: SecretString::new(secret.into()),
        }
    }

    /// Verifies that `signature` is the hex HMAC-SHA256 of `payload`.
    ///
    /// # Errors
    ///
    /// - `MissingSignature` - Header value is empty
    /// - `InvalidSignature` - Not hex, or digest does not match
    pub fn verify(&self, payload: &[u8], signature: &str) -> Result<(), WebhookError> {
        let signature = signature.trim();
        if signature.is_empty() {
            return Err(WebhookError::MissingSignature);
        }

        let provided = hex::decode(signature).map_err(|_| WebhookError::InvalidSignature)?;
        let expected = self.digest(payload)?;

        if !constant_time_compare(&expected, &provided) {
            return Err(WebhookError::InvalidSignature);
        }

        Ok(())
    }

    /// Verifies the signature, then parses the payload into an event.
    ///
    /// # Errors
    ///
    /// - Any error from [`WebhookVerifier::verify`]
    /// - `ParseError` - Signature valid but payload is not a Razorpay event
    pub fn verify_and_parse(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<RazorpayEvent, WebhookError> {
        self.verify(payload, signature)?;

        serde_json::from_slice(payload).map_err(|e| WebhookError::ParseError(e.to_string()))
    }

    /// Computes the hex signature Razorpay would send for `payload`.
    pub fn compute_signature(&self, payload: &[u8]) -> Result<String, WebhookError> {
        Ok(hex::encode(self.digest(payload)?))
    }

    fn digest(&self, payload: &[u8]) -> Result<Vec<u8>, WebhookError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|_| WebhookError::InvalidSignature)?;
        mac.update(payload);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
