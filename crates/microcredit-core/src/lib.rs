pub mod error;
pub mod rates;
pub mod schedule;
pub mod term_reduction;
pub mod types;

#[cfg(feature = "compliance")]
pub mod compliance;

#[cfg(feature = "compliance")]
pub mod tiers;

pub use error::MicrocreditError;
pub use types::*;

/// Standard result type for all microcredit operations
pub type MicrocreditResult<T> = Result<T, MicrocreditError>;
