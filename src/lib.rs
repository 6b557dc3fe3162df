pub mod cache;
pub mod codec;
pub mod config;
pub mod datasource;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;

pub use cache::TtlCache;
pub use codec::{decode, encode, DecodedPosition, EncodedPosition};
pub use config::Config;
pub use datasource::{DataSource, DataSourceError, MockSource, TunaApiSource};
pub use domain::{
    AggregatedPosition, Market, Pool, ProcessedPosition, RawPosition, TokenMeta,
};
pub use error::{AggregationError, PositionError};
pub use orchestration::Aggregator;
