use crate::error::PersistError;
use crate::lattice::{Axial, Lattice};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

const HALF_SQRT_3: f64 = 0.866_025_403_784_438_6;

/// Cartesian position of a lattice vertex (unit edge length)
pub fn axial_to_cartesian(coord: Axial) -> (f64, f64) {
    let x = coord.v as f64 + coord.u as f64 / 2.0;
    let y = HALF_SQRT_3 * coord.u as f64;
    (x, y)
}

/// Recover the lattice vertex at `(x, y)`, or `None` if the point is not on the lattice
pub fn cartesian_to_axial(x: f64, y: f64) -> Option<Axial> {
    const TOLERANCE: f64 = 1e-6;

    let u = y / HALF_SQRT_3;
    let v = x - u / 2.0;
    let (ru, rv) = (u.round(), v.round());
    if (u - ru).abs() > TOLERANCE || (v - rv).abs() > TOLERANCE {
        return None;
    }
    Some(Axial::new(ru as i32, rv as i32))
}

/// Write every frozen cell as a tab-separated `x\ty` line
pub fn write_nucleus(path: &Path, lattice: &Lattice) -> Result<(), PersistError> {
    let file = File::create(path).map_err(|e| PersistError::io(path, e))?;
    let mut out = BufWriter::new(file);
    for cell in lattice.frozen() {
        let (x, y) = axial_to_cartesian(cell);
        writeln!(out, "{}\t{}", x, y).map_err(|e| PersistError::io(path, e))?;
    }
    out.flush().map_err(|e| PersistError::io(path, e))
}

/// Read back a nucleus file written by `write_nucleus`.
///
/// Columns may be separated by any whitespace; blank lines are skipped. Every
/// point must be a lattice vertex.
pub fn read_nucleus(path: &Path) -> Result<Vec<(f64, f64)>, PersistError> {
    let content = fs::read_to_string(path).map_err(|e| PersistError::io(path, e))?;

    let mut points = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let malformed = || PersistError::MalformedLine {
            line: idx + 1,
            content: line.to_string(),
        };

        let mut fields = line.split_whitespace();
        let x = fields.next().and_then(|f| f.parse::<f64>().ok());
        let y = fields.next().and_then(|f| f.parse::<f64>().ok());
        match (x, y, fields.next()) {
            (Some(x), Some(y), None) if cartesian_to_axial(x, y).is_some() => {
                points.push((x, y))
            }
            _ => return Err(malformed()),
        }
    }
    Ok(points)
}
