//! Reformatting of hourly ERA5-Land met data into MAESTRA met files.

pub mod error;
pub mod met;
pub mod writer;
