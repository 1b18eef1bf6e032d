//! Standardized Precipitation Index engine.
//!
//! A monthly precipitation series is accumulated over each requested scale
//! ([`rolling::rolling_sum`]), the valid accumulations are fitted with a zero-location gamma
//! distribution ([`gamma::fit_gamma`]) and mapped through the gamma CDF and the inverse
//! standard-normal CDF ([`standardize::GammaStandardizer`]). Scales never influence each
//! other; a scale that cannot be fitted comes back as an all-missing column.

pub mod error;
pub mod gamma;
pub mod report;
pub mod rolling;
pub mod spi_frame;
pub mod standardize;
pub mod table;
