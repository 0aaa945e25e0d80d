//! Payment aggregate - one order-to-settlement lifecycle.

use crate::domain::foundation::{
    CustomerId, OrderId, PaymentRecordId, ProcessorPaymentId, StateMachine, Timestamp,
    ValidationError,
};
use serde::{Deserialize, Serialize};

use super::PaymentStatus;

/// Minor units per major currency unit (paise per rupee).
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

/// Default description recorded when the customer leaves it blank.
pub const DEFAULT_DESCRIPTION: &str = "Payment";

/// Positive whole amount in major currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
    /// Creates an amount, rejecting zero, negatives and values whose
    /// minor-unit form would overflow.
    pub fn new(major_units: i64) -> Result<Self, ValidationError> {
        if major_units <= 0 {
            return Err(ValidationError::not_positive("amount", major_units));
        }
        if major_units.checked_mul(MINOR_UNITS_PER_MAJOR).is_none() {
            return Err(ValidationError::invalid_format("amount", "amount is too large"));
        }
        Ok(Self(major_units))
    }

    /// Amount in major units, as stored on the payment row.
    pub fn major_units(&self) -> i64 {
        self.0
    }

    /// Amount in minor units, as sent to the processor.
    pub fn minor_units(&self) -> i64 {
        self.0 * MINOR_UNITS_PER_MAJOR
    }
}

/// Local record of one processor order and its settlement outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    pub id: PaymentRecordId,
    pub order_id: OrderId,
    pub customer_id: CustomerId,
    pub amount: Amount,
    pub currency: String,
    pub status: PaymentStatus,
    pub payment_id: Option<ProcessorPaymentId>,
    pub description: String,
    pub created_at: Timestamp,
}

/// A status change requested by a verified webhook event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentTransition {
    /// Settle the payment with the processor's payment id.
    Succeed { payment_id: ProcessorPaymentId },
    /// Mark the payment as failed.
    Fail,
}

impl PaymentTransition {
    /// Status this transition moves the payment into.
    pub fn target(&self) -> PaymentStatus {
        match self {
            PaymentTransition::Succeed { .. } => PaymentStatus::Success,
            PaymentTransition::Fail => PaymentStatus::Failed,
        }
    }

    /// Settlement id carried by the transition, if any.
    pub fn payment_id(&self) -> Option<&ProcessorPaymentId> {
        match self {
            PaymentTransition::Succeed { payment_id } => Some(payment_id),
            PaymentTransition::Fail => None,
        }
    }
}

/// What applying a transition to the current row would do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionDecision {
    /// Row is pending; the transition moves it forward.
    Apply,
    /// Row already reflects exactly this transition.
    AlreadyApplied,
    /// Row is in a different terminal state; the transition must not override it.
    Reject { current: PaymentStatus },
}

impl Payment {
    /// Creates a new pending payment for a freshly created processor order.
    pub fn pending(
        order_id: OrderId,
        customer_id: CustomerId,
        amount: Amount,
        currency: impl Into<String>,
        description: Option<String>,
    ) -> Self {
        let description = description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());

        Self {
            id: PaymentRecordId::new(),
            order_id,
            customer_id,
            amount,
            currency: currency.into(),
            status: PaymentStatus::Pending,
            payment_id: None,
            description,
            created_at: Timestamp::now(),
        }
    }

    /// Decides how a transition relates to the current state without mutating.
    pub fn decide(&self, transition: &PaymentTransition) -> TransitionDecision {
        let target = transition.target();

        if self.status.can_transition_to(&target) {
            return TransitionDecision::Apply;
        }

        if self.status == target && self.payment_id.as_ref() == transition.payment_id() {
            return TransitionDecision::AlreadyApplied;
        }

        TransitionDecision::Reject {
            current: self.status,
        }
    }

    /// Applies the transition in place when the decision is `Apply`.
    pub fn apply(&mut self, transition: &PaymentTransition) -> TransitionDecision {
        let decision = self.decide(transition);
        if decision == TransitionDecision::Apply {
            self.status = transition.target();
            self.payment_id = transition.payment_id().cloned();
        }
        decision
    }
}
