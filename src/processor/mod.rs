pub mod csv_loader;
pub mod descriptive_stats;
pub mod grouping;
pub mod kpi_aggregator;
pub mod schema_validator;
pub mod type_normalizer;

pub use csv_loader::*;
pub use descriptive_stats::*;
pub use kpi_aggregator::*;
pub use schema_validator::*;
pub use type_normalizer::*;
