//! Payment status state machine.
//!
//! A payment starts `pending` and moves forward exactly once, to either
//! `success` or `failed`. Both outcomes are terminal.

use std::fmt;

use crate::domain::foundation::{StateMachine, ValidationError};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a payment row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Order created, awaiting processor confirmation.
    Pending,

    /// Processor reported the payment as authorized or captured.
    Success,

    /// Processor reported the payment as failed.
    Failed,
}

impl PaymentStatus {
    /// Database / wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Success => "success",
            PaymentStatus::Failed => "failed",
        }
    }

    /// Parses the database / wire representation.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value {
            "pending" => Ok(PaymentStatus::Pending),
            "success" => Ok(PaymentStatus::Success),
            "failed" => Ok(PaymentStatus::Failed),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown payment status '{}'", other),
            )),
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StateMachine for PaymentStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use PaymentStatus::*;
        matches!((self, target), (Pending, Success) | (Pending, Failed))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use PaymentStatus::*;
        match self {
            Pending => vec![Success, Failed],
            Success | Failed => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_can_transition_to_success() {
        let result = PaymentStatus::Pending.transition_to(PaymentStatus::Success);
        assert_eq!(result, Ok(PaymentStatus::Success));
    }

    #[test]
    fn pending_can_transition_to_failed() {
        let result = PaymentStatus::Pending.transition_to(PaymentStatus::Failed);
        assert_eq!(result, Ok(PaymentStatus::Failed));
    }

    #[test]
    fn success_cannot_transition_to_failed() {
        assert!(PaymentStatus::Success
            .transition_to(PaymentStatus::Failed)
            .is_err());
    }

    #[test]
    fn failed_cannot_transition_to_success() {
        assert!(PaymentStatus::Failed
            .transition_to(PaymentStatus::Success)
            .is_err());
    }

    #[test]
    fn nothing_transitions_back_to_pending() {
        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Success,
            PaymentStatus::Failed,
        ] {
            assert!(!status.can_transition_to(&PaymentStatus::Pending));
        }
    }

    #[test]
    fn success_and_failed_are_terminal() {
        assert!(PaymentStatus::Success.is_terminal());
        assert!(PaymentStatus::Failed.is_terminal());
        assert!(!PaymentStatus::Pending.is_terminal());
    }

    #[test]
    fn parse_accepts_stored_values() {
        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Success,
            PaymentStatus::Failed,
        ] {
            assert_eq!(PaymentStatus::parse(status.as_str()), Ok(status));
        }
    }

    #[test]
    fn parse_rejects_unknown_value() {
        assert!(PaymentStatus::parse("refunded").is_err());
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&PaymentStatus::Success).unwrap();
        assert_eq!(json, "\"success\"");
    }
}
