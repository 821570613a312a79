pub mod payment;

pub use payment::{PaymentState, SignatureVerifier};
