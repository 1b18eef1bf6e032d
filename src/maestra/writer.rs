use crate::maestra::error::MaestraError;
use crate::maestra::met::{
    decimal_to_dms, hemisphere, normalise_longitude, Axis, HourlyMet, MaestraMet, COLUMN_NAMES,
};
use log::info;
use polars::prelude::*;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const CO2_PPM: u32 = 420;

/// Writes `met` as a MAESTRA met file at `path`.
pub fn write_met_file(met: &HourlyMet, path: &Path) -> Result<(), MaestraError> {
    let file = File::create(path).map_err(|e| MaestraError::OutputCreate(path.to_path_buf(), e))?;
    let mut writer = BufWriter::new(file);
    let rows = write_met(met, &mut writer)?;
    writer.flush().map_err(MaestraError::HeaderWrite)?;
    info!("Wrote {} hourly records to {:?}", rows, path);
    Ok(())
}

/// Writes the namelist header followed by one tab separated row per hour.
///
/// Returns the number of data rows written.
pub fn write_met<W: Write>(met: &HourlyMet, writer: &mut W) -> Result<usize, MaestraError> {
    let columns = MaestraMet::from_hourly(met)?;
    write_header(met, writer).map_err(MaestraError::HeaderWrite)?;

    let mut df = columns.to_frame().map_err(MaestraError::FrameBuild)?;
    CsvWriter::new(writer)
        .include_header(false)
        .with_separator(b'\t')
        .with_float_precision(Some(6))
        .finish(&mut df)
        .map_err(MaestraError::DataWrite)?;
    Ok(columns.len())
}

fn write_header<W: Write>(met: &HourlyMet, w: &mut W) -> std::io::Result<()> {
    let longitude = normalise_longitude(met.longitude);
    let (Some(first), Some(last)) = (met.times.first(), met.times.last()) else {
        return Ok(());
    };

    writeln!(w, "&environ")?;
    writeln!(w, "difsky = 0.0")?;
    writeln!(w, "ca = {CO2_PPM}")?;
    writeln!(w, "/\n")?;

    writeln!(w, "&latlong")?;
    writeln!(w, "lat={}", decimal_to_dms(met.latitude))?;
    writeln!(w, "long={}", decimal_to_dms(longitude))?;
    writeln!(w, "tzlong=0")?;
    writeln!(w, "lonhem='{}'", hemisphere(longitude, Axis::Longitude))?;
    writeln!(w, "lathem='{}'", hemisphere(met.latitude, Axis::Latitude))?;
    writeln!(w, "/\n")?;

    let names: String = COLUMN_NAMES.iter().map(|n| format!("\t'{n}'")).collect();
    writeln!(w, "&metformat")?;
    writeln!(w, "dayorhr=1")?;
    writeln!(w, "khrsperday=24")?;
    writeln!(w, "nocolumns={}", COLUMN_NAMES.len())?;
    writeln!(w, "startdate='{}'", first.format("%d/%m/%y"))?;
    writeln!(w, "enddate='{}'", last.format("%d/%m/%y"))?;
    writeln!(w, "columns={names}")?;
    writeln!(w, "/\n")?;
    writeln!(w, "DATA STARTS")
}
