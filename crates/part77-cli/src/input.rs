//! CSV runway tables.
//!
//! One runway per row, header required:
//!
//! ```text
//! name,type,approaches,coords,end_names,special_surface,visibility
//! 09/27,UTILITY,VISUAL-NON_PRECISION_INSTRUMENT,33.68_-117.83_33.69_-117.82,09-27,true,1-0.75
//! ```
//!
//! `visibility` is optional; a single value applies to both ends.

use crate::coords::degrees_to_feet;
use part77_core::{ApproachCategory, Runway, RunwayCategory, RunwayEnd};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{0} is not a .csv file")]
    NotCsv(PathBuf),

    #[error("Line {line}: unknown runway type {value:?}")]
    UnknownRunwayCategory { line: usize, value: String },

    #[error("Line {line}: unknown approach type {value:?}")]
    UnknownApproachCategory { line: usize, value: String },

    #[error("Line {line}: coords must be lat1_lon1_lat2_lon2, got {value:?}")]
    MalformedCoordinates { line: usize, value: String },

    #[error("Line {line}: malformed {field} {value:?}")]
    MalformedField {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("Invalid rules file {path}: {source}")]
    MalformedRulesFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Deserialize)]
struct RunwayRecord {
    name: String,
    #[serde(rename = "type")]
    category: String,
    approaches: String,
    coords: String,
    end_names: String,
    special_surface: String,
    #[serde(default)]
    visibility: Option<String>,
}

/// Load a runway table, projecting endpoints onto the frame centred on
/// `origin` `(lat, lon)`.
pub fn load_runways(path: &Path, origin: (f64, f64)) -> Result<Vec<Runway>, InputError> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return Err(InputError::NotCsv(path.to_path_buf()));
    }

    let file = File::open(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let runways = read_runways(file, origin)?;
    tracing::info!("Loaded {} runways from {}", runways.len(), path.display());
    Ok(runways)
}

/// Parse runway rows from any reader.
pub fn read_runways<R: Read>(reader: R, origin: (f64, f64)) -> Result<Vec<Runway>, InputError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut runways = Vec::new();
    for (idx, record) in csv_reader.deserialize::<RunwayRecord>().enumerate() {
        // header is line 1
        let line = idx + 2;
        runways.push(parse_record(record?, line, origin)?);
    }
    Ok(runways)
}

fn parse_record(record: RunwayRecord, line: usize, origin: (f64, f64)) -> Result<Runway, InputError> {
    let category = RunwayCategory::parse(&record.category).ok_or_else(|| {
        InputError::UnknownRunwayCategory {
            line,
            value: record.category.clone(),
        }
    })?;

    let (a1, a2) = split_pair(&record.approaches, line, "approaches")?;
    let approach = |token: &str| {
        ApproachCategory::parse(token).ok_or_else(|| InputError::UnknownApproachCategory {
            line,
            value: token.to_string(),
        })
    };
    let (approach1, approach2) = (approach(a1)?, approach(a2)?);

    let coords: Vec<f64> = record
        .coords
        .split('_')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .ok()
        .filter(|values: &Vec<f64>| values.len() == 4 && values.iter().all(|v| v.is_finite()))
        .ok_or_else(|| InputError::MalformedCoordinates {
            line,
            value: record.coords.clone(),
        })?;

    let (name1, name2) = split_pair(&record.end_names, line, "end_names")?;
    let special_surface = parse_bool(&record.special_surface).ok_or_else(|| {
        InputError::MalformedField {
            line,
            field: "special_surface",
            value: record.special_surface.clone(),
        }
    })?;
    let (vis1, vis2) = parse_visibility(record.visibility.as_deref(), line)?;

    let end1 = RunwayEnd::new(name1, degrees_to_feet((coords[0], coords[1]), origin), approach1)
        .with_visibility(vis1);
    let end2 = RunwayEnd::new(name2, degrees_to_feet((coords[2], coords[3]), origin), approach2)
        .with_visibility(vis2);

    Ok(Runway::new(record.name, category, end1, end2).with_special_surface(special_surface))
}

fn split_pair<'a>(
    value: &'a str,
    line: usize,
    field: &'static str,
) -> Result<(&'a str, &'a str), InputError> {
    match value.split('-').map(str::trim).collect::<Vec<_>>().as_slice() {
        [first, second] if !first.is_empty() && !second.is_empty() => Ok((*first, *second)),
        _ => Err(InputError::MalformedField {
            line,
            field,
            value: value.to_string(),
        }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" | "" => Some(false),
        _ => None,
    }
}

fn parse_visibility(value: Option<&str>, line: usize) -> Result<(f64, f64), InputError> {
    let malformed = || InputError::MalformedField {
        line,
        field: "visibility",
        value: value.unwrap_or_default().to_string(),
    };
    let parse = |part: &str| {
        part.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
    };

    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok((0.0, 0.0));
    };
    if value.contains('-') {
        let (first, second) = split_pair(value, line, "visibility")?;
        return Ok((
            parse(first).ok_or_else(malformed)?,
            parse(second).ok_or_else(malformed)?,
        ));
    }
    let both = parse(value).ok_or_else(malformed)?;
    Ok((both, both))
}

#[cfg(test)]
mod tests {
    use super::*;
    use part77_core::Point2;

    const ORIGIN: (f64, f64) = (33.6846, -117.8265);

    fn read(text: &str) -> Result<Vec<Runway>, InputError> {
        read_runways(text.as_bytes(), ORIGIN)
    }

    #[test]
    fn reads_runway_rows() {
        let runways = read(
            "name,type,approaches,coords,end_names,special_surface\n\
             09/27,UTILITY,VISUAL-NON_PRECISION_INSTRUMENT,33.6846_-117.8365_33.6846_-117.8165,09-27,TRUE\n\
             18/36,precision_instrument,PI-VISUAL,33.7000_-117.8265_33.6700_-117.8265,18-36,false\n",
        )
        .unwrap();
        assert_eq!(runways.len(), 2);

        let first = &runways[0];
        assert_eq!(first.name, "09/27");
        assert_eq!(first.category, RunwayCategory::Utility);
        assert_eq!(first.end1.name, "09");
        assert_eq!(first.end2.approach, ApproachCategory::NonPrecisionInstrument);
        assert!(first.special_surface);
        assert!(first.end1.point.x < 0.0 && first.end2.point.x > 0.0);
        assert!(first.end1.point.y.abs() < 1e-6);
        assert_eq!(first.end1.visibility_minimum_mi, 0.0);

        let second = &runways[1];
        assert_eq!(second.end1.approach, ApproachCategory::PrecisionInstrument);
        assert!(!second.special_surface);
        assert!(second.end1.point.y > 0.0);
    }

    #[test]
    fn reads_optional_visibility() {
        let runways = read(
            "name,type,approaches,coords,end_names,special_surface,visibility\n\
             A,NON_PRECISION_INSTRUMENT,NPI-NPI,33.68_-117.83_33.69_-117.82,04-22,false,1-0.75\n\
             B,NON_PRECISION_INSTRUMENT,NPI-NPI,33.68_-117.83_33.69_-117.82,04-22,false,0.75\n\
             C,VISUAL,VISUAL-VISUAL,33.68_-117.83_33.69_-117.82,04-22,false,\n",
        )
        .unwrap();
        assert_eq!(runways[0].end1.visibility_minimum_mi, 1.0);
        assert_eq!(runways[0].end2.visibility_minimum_mi, 0.75);
        assert_eq!(runways[1].end1.visibility_minimum_mi, 0.75);
        assert_eq!(runways[1].end2.visibility_minimum_mi, 0.75);
        assert_eq!(runways[2].end1.visibility_minimum_mi, 0.0);
    }

    #[test]
    fn rejects_unknown_categories() {
        let err = read(
            "name,type,approaches,coords,end_names,special_surface\n\
             X,GRASS,VISUAL-VISUAL,33.68_-117.83_33.69_-117.82,01-19,false\n",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            InputError::UnknownRunwayCategory { line: 2, ref value } if value == "GRASS"
        ));

        let err = read(
            "name,type,approaches,coords,end_names,special_surface\n\
             X,VISUAL,VISUAL-CIRCLING,33.68_-117.83_33.69_-117.82,01-19,false\n",
        )
        .unwrap_err();
        assert!(matches!(err, InputError::UnknownApproachCategory { .. }));
    }

    #[test]
    fn rejects_malformed_fields() {
        let err = read(
            "name,type,approaches,coords,end_names,special_surface\n\
             X,VISUAL,VISUAL-VISUAL,33.68_-117.83_33.69,01-19,false\n",
        )
        .unwrap_err();
        assert!(matches!(err, InputError::MalformedCoordinates { .. }));

        let err = read(
            "name,type,approaches,coords,end_names,special_surface\n\
             X,VISUAL,VISUAL,33.68_-117.83_33.69_-117.82,01-19,false\n",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            InputError::MalformedField { field: "approaches", .. }
        ));

        let err = read(
            "name,type,approaches,coords,end_names,special_surface\n\
             X,VISUAL,VISUAL-VISUAL,33.68_-117.83_33.69_-117.82,01-19,paved\n",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            InputError::MalformedField { field: "special_surface", .. }
        ));
    }

    #[test]
    fn missing_column_is_a_csv_error() {
        let err = read("name,type\nX,VISUAL\n").unwrap_err();
        assert!(matches!(err, InputError::Csv(_)));
    }

    #[test]
    fn only_csv_files_are_loaded() {
        let err = load_runways(Path::new("runways.txt"), ORIGIN).unwrap_err();
        assert!(matches!(err, InputError::NotCsv(_)));

        let err = load_runways(Path::new("/nonexistent/runways.CSV"), ORIGIN).unwrap_err();
        assert!(matches!(err, InputError::Io { .. }));
    }

    #[test]
    fn endpoints_land_in_local_feet() {
        let runways = read(
            "name,type,approaches,coords,end_names,special_surface\n\
             R,VISUAL,VISUAL-VISUAL,33.6846_-117.8265_33.6946_-117.8265,18-36,false\n",
        )
        .unwrap();
        assert_eq!(runways[0].end1.point, Point2::new(0.0, 0.0));
        // 0.01 degrees of latitude is roughly 3,640 ft here
        assert!((runways[0].end2.point.y - 3640.0).abs() < 20.0);
    }
}
