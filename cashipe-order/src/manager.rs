use crate::models::{Order, OrderStatus, Payout};
use crate::transitions::TransitionPolicy;
use cashipe_core::payment::PaymentState;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Applies lifecycle mutations to an order record.
///
/// The manager is pure with respect to storage: handlers load the order,
/// call a mutation here, and persist the result.
pub struct OrderManager {
    policy: Arc<dyn TransitionPolicy>,
}

impl OrderManager {
    pub fn new(policy: Arc<dyn TransitionPolicy>) -> Self {
        Self { policy }
    }

    /// Sets (or re-sets) the pickup slot. Rescheduling is the same mutation
    /// applied again.
    pub fn schedule(
        &self,
        order: &mut Order,
        pickup_at: DateTime<Utc>,
        address: Option<String>,
    ) -> Result<(), OrderError> {
        self.check_transition(order.status, OrderStatus::Scheduled)?;
        order.pickup_at = Some(pickup_at);
        if let Some(address) = address {
            order.address = Some(address);
        }
        order.status = OrderStatus::Scheduled;
        order.append_timeline(
            OrderStatus::Scheduled,
            Some(format!("Pickup at {}", pickup_at.to_rfc3339())),
        );
        Ok(())
    }

    /// Cancels unconditionally; no check that the current status is
    /// cancellable.
    pub fn cancel(&self, order: &mut Order) -> Result<(), OrderError> {
        self.check_transition(order.status, OrderStatus::Cancelled)?;
        order.status = OrderStatus::Cancelled;
        order.updated_at = Utc::now();
        Ok(())
    }

    /// Records a verified gateway payment: status, payment sub-record, and a
    /// `paid` timeline entry.
    pub fn mark_paid(
        &self,
        order: &mut Order,
        payment_id: &str,
        signature: &str,
    ) -> Result<(), OrderError> {
        self.check_transition(order.status, OrderStatus::Paid)?;
        order.status = OrderStatus::Paid;
        if let Some(payment) = order.payment.as_mut() {
            payment.payment_id = Some(payment_id.to_string());
            payment.signature = Some(signature.to_string());
            payment.status = PaymentState::Verified;
        }
        order.append_timeline(
            OrderStatus::Paid,
            Some("Payment verified via Razorpay".to_string()),
        );
        Ok(())
    }

    pub fn save_payout(&self, order: &mut Order, payout: Payout) {
        order.payout = Some(payout);
        order.updated_at = Utc::now();
    }

    fn check_transition(&self, from: OrderStatus, to: OrderStatus) -> Result<(), OrderError> {
        if self.policy.allows(from, to) {
            Ok(())
        } else {
            Err(OrderError::InvalidTransition { from, to })
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
}
