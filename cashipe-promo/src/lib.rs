pub mod models;
pub mod repository;
pub mod resolver;

pub use models::{normalize_code, Promo, PromoType};
pub use repository::{PromoRepository, PromoStoreError};
pub use resolver::{PromoResolution, PromoResolver};
