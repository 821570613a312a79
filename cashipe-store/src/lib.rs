pub mod app_config;
pub mod catalog_repo;
pub mod database;
pub mod order_repo;
pub mod promo_repo;
pub mod quote_repo;
pub mod redis_repo;

pub use app_config::Config;
pub use catalog_repo::PgCatalogRepository;
pub use database::DbClient;
pub use order_repo::PgOrderRepository;
pub use promo_repo::PgPromoRepository;
pub use quote_repo::PgQuoteRepository;
pub use redis_repo::RedisClient;
