pub mod device;
pub mod pricing;
pub mod quote;
pub mod repository;
pub mod rules;

pub use device::{identify_by_imei, DeviceCatalogEntry, DeviceGrade};
pub use pricing::{
    Accessories, ConditionReport, Estimate, EstimateInput, EstimatorConfig, PromoApplied,
    QuoteBreakdown, QuoteEstimator,
};
pub use quote::Quote;
pub use repository::{CatalogRepository, QuoteRepository};
pub use rules::RuleEngine;
