pub mod invoice;
pub mod manager;
pub mod models;
pub mod repository;
pub mod transitions;

pub use manager::{OrderError, OrderManager};
pub use models::{
    BankAccount, DocumentRecord, Order, OrderItem, OrderStatus, OrderType, Payment, Payout,
    PayoutKind, TimelineEntry,
};
pub use repository::OrderRepository;
pub use transitions::{PermissiveTransitions, TransitionPolicy};
