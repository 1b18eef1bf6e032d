//! Plain-text SPI reports and drought classification.

use crate::spi::table::SpiTable;
use std::fmt;
use std::fmt::Write;

/// Drought/wetness classes for SPI values (McKee et al., 1993).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DroughtCategory {
    ExtremelyWet,
    VeryWet,
    ModeratelyWet,
    NearNormal,
    ModeratelyDry,
    SeverelyDry,
    ExtremelyDry,
}

impl DroughtCategory {
    /// Classifies an SPI value. Returns `None` for `NaN`.
    ///
    /// ```
    /// use era5_spi::DroughtCategory;
    ///
    /// assert_eq!(DroughtCategory::classify(-1.7), Some(DroughtCategory::SeverelyDry));
    /// assert_eq!(DroughtCategory::classify(f64::NEG_INFINITY), Some(DroughtCategory::ExtremelyDry));
    /// assert_eq!(DroughtCategory::classify(0.3), Some(DroughtCategory::NearNormal));
    /// ```
    pub fn classify(spi: f64) -> Option<Self> {
        if spi.is_nan() {
            return None;
        }
        Some(match spi {
            s if s >= 2.0 => DroughtCategory::ExtremelyWet,
            s if s >= 1.5 => DroughtCategory::VeryWet,
            s if s >= 1.0 => DroughtCategory::ModeratelyWet,
            s if s > -1.0 => DroughtCategory::NearNormal,
            s if s > -1.5 => DroughtCategory::ModeratelyDry,
            s if s > -2.0 => DroughtCategory::SeverelyDry,
            _ => DroughtCategory::ExtremelyDry,
        })
    }

    pub fn is_drought(self) -> bool {
        matches!(
            self,
            DroughtCategory::ModeratelyDry
                | DroughtCategory::SeverelyDry
                | DroughtCategory::ExtremelyDry
        )
    }
}

impl fmt::Display for DroughtCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DroughtCategory::ExtremelyWet => "extremely wet",
            DroughtCategory::VeryWet => "very wet",
            DroughtCategory::ModeratelyWet => "moderately wet",
            DroughtCategory::NearNormal => "near normal",
            DroughtCategory::ModeratelyDry => "moderately dry",
            DroughtCategory::SeverelyDry => "severely dry",
            DroughtCategory::ExtremelyDry => "extremely dry",
        };
        f.write_str(label)
    }
}

/// Month-by-month listing of every scale, grouped by year:
///
/// ```text
/// Year 2022:
///   Jan: SPI-1 = 0.41, SPI-3 = -0.12, SPI-6 = nan
/// ```
///
/// Missing values print as `nan`, infinities as `inf` / `-inf`.
pub fn yearly_report(table: &SpiTable) -> String {
    let mut out = String::new();
    let mut current_year = None;

    for (row, month) in table.index().iter().enumerate() {
        if current_year != Some(month.year()) {
            current_year = Some(month.year());
            // Writing to a String cannot fail.
            let _ = write!(out, "\nYear {}:\n", month.year());
        }
        let cells: Vec<String> = table
            .columns()
            .iter()
            .map(|c| format!("SPI-{} = {}", c.scale, format_value(c.values[row])))
            .collect();
        let _ = writeln!(out, "  {}: {}", month.abbreviation(), cells.join(", "));
    }
    out
}

fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "nan".to_string(),
    }
}
