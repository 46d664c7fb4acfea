use std::io::Write;

use super::UNDEFINED_MARKER;
use super::error::Error;
use crate::model::matrix::ElementMatrix;
use crate::smooth::DistanceCurve;

fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => UNDEFINED_MARKER.to_string(),
    }
}

/// Writes `distance,attention` rows; undefined positions are written as `NA`.
pub fn write_curve_csv<W: Write>(curve: &DistanceCurve, mut writer: W) -> Result<(), Error> {
    writeln!(writer, "distance,attention")?;
    for point in &curve.points {
        writeln!(writer, "{},{}", point.distance, format_value(point.attention))?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes a matrix with element symbols as header row and first column.
pub fn write_matrix_csv<W: Write>(matrix: &ElementMatrix, mut writer: W) -> Result<(), Error> {
    let header: Vec<&str> = matrix.elements().iter().map(|e| e.symbol()).collect();
    writeln!(writer, "z_i\\z_j,{}", header.join(","))?;
    for (element, row) in matrix.elements().iter().zip(matrix.rows()) {
        let cells: Vec<String> = row.iter().map(|c| format_value(*c)).collect();
        writeln!(writer, "{},{}", element, cells.join(","))?;
    }
    writer.flush()?;
    Ok(())
}
