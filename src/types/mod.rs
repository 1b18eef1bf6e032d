pub mod area;
pub mod calendar;
pub mod series;
