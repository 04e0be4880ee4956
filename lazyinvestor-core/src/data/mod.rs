//! Price data: sources of raw closes and the gap-filling series adapter

pub mod csv_source;
pub mod memory;
pub mod provider;
pub mod series;
pub mod synthetic;

pub use csv_source::CsvPriceSource;
pub use memory::InMemoryPriceSource;
pub use provider::{DailyClose, DataError, DataSource, PriceSource};
pub use series::{load_config_series, load_price_series, PriceSeries};
pub use synthetic::SyntheticPriceSource;
