//! CSV loaders for the hospital roster and the travel-time grid.

use std::collections::HashMap;
use std::path::Path;

use color_eyre::eyre::{Context, bail};
use serde::Deserialize;

use strokesim_core::{CenterId, CenterType, StrokeCenter, TreatmentQuantiles};

/// One row of the hospital roster file.
///
/// Door-to-puncture quantiles are required for comprehensive centers and
/// ignored for primaries; the transfer columns are optional for primaries
/// and ignored for comprehensives.
#[derive(Debug, Deserialize)]
struct CenterRow {
    center_id: u32,
    name: String,
    center_type: String,
    dtn_median: f64,
    dtn_q75: f64,
    dtp_median: Option<f64>,
    dtp_q75: Option<f64>,
    transfer_time: Option<f64>,
    destination_id: Option<u32>,
}

fn parse_center_type(raw: &str) -> color_eyre::Result<CenterType> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "primary" | "psc" => Ok(CenterType::Primary),
        "comprehensive" | "csc" => Ok(CenterType::Comprehensive),
        other => bail!("unknown center type {other:?} (expected primary or comprehensive)"),
    }
}

/// Load the hospital roster. Travel times stay unknown until a travel-time
/// row is applied with `StrokeModel::set_times`.
pub fn read_hospitals(path: &Path) -> color_eyre::Result<Vec<StrokeCenter>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .wrap_err_with(|| format!("reading hospital file {}", path.display()))?;

    let mut centers = Vec::new();
    for row in reader.deserialize() {
        let row: CenterRow = row.wrap_err("malformed hospital row")?;
        let center_id = CenterId(row.center_id);
        let needle = TreatmentQuantiles::new(row.dtn_median, row.dtn_q75);

        let mut center = match parse_center_type(&row.center_type)? {
            CenterType::Comprehensive => {
                let (Some(median), Some(q75)) = (row.dtp_median, row.dtp_q75) else {
                    bail!(
                        "comprehensive center {} is missing door-to-puncture quantiles",
                        row.center_id
                    );
                };
                StrokeCenter::comprehensive(
                    center_id,
                    row.name,
                    needle,
                    TreatmentQuantiles::new(median, q75),
                )
            }
            CenterType::Primary => StrokeCenter::primary(center_id, row.name, needle),
        };

        if let (Some(destination), Some(transfer)) = (row.destination_id, row.transfer_time) {
            center = center.with_transfer(CenterId(destination), transfer);
        }
        centers.push(center);
    }

    if centers.is_empty() {
        bail!("hospital file {} contains no centers", path.display());
    }
    Ok(centers)
}

/// Load the travel-time grid: one labeled row per patient location, one
/// column per center id.
///
/// Cell values stay raw strings; unparseable entries (`N/A`, blanks) turn
/// into unknown times downstream rather than failing the load.
pub fn read_travel_times(path: &Path) -> color_eyre::Result<Vec<(String, HashMap<String, String>)>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .wrap_err_with(|| format!("reading travel-time file {}", path.display()))?;

    let headers = reader.headers().wrap_err("travel-time header")?.clone();
    if headers.len() < 2 {
        bail!("travel-time file needs a location column plus one column per center");
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.wrap_err("malformed travel-time row")?;
        let label = record.get(0).unwrap_or_default().to_string();
        let mut lookup = HashMap::new();
        for (index, center_id) in headers.iter().enumerate().skip(1) {
            if let Some(value) = record.get(index) {
                lookup.insert(center_id.to_string(), value.to_string());
            }
        }
        rows.push((label, lookup));
    }

    if rows.is_empty() {
        bail!("travel-time file {} contains no locations", path.display());
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn reads_mixed_roster() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hospitals.csv");
        fs::write(
            &path,
            "center_id,name,center_type,dtn_median,dtn_q75,dtp_median,dtp_q75,transfer_time,destination_id\n\
             1,Metro Comprehensive,Comprehensive,45,60,90,110,,\n\
             2,County Primary,primary,30,40,,,25,1\n",
        )
        .unwrap();

        let centers = read_hospitals(&path).unwrap();
        assert_eq!(centers.len(), 2);

        assert_eq!(centers[0].center_id, CenterId(1));
        assert_eq!(centers[0].center_type, CenterType::Comprehensive);
        assert!(centers[0].door_to_puncture.is_some());
        assert!(centers[0].time.is_nan());

        assert_eq!(centers[1].center_type, CenterType::Primary);
        assert_eq!(centers[1].destination_id, Some(CenterId(1)));
        assert_eq!(centers[1].transfer_time, Some(25.0));
    }

    #[test]
    fn rejects_comprehensive_without_puncture_quantiles() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hospitals.csv");
        fs::write(
            &path,
            "center_id,name,center_type,dtn_median,dtn_q75,dtp_median,dtp_q75,transfer_time,destination_id\n\
             1,Broken,Comprehensive,45,60,,,,\n",
        )
        .unwrap();

        assert!(read_hospitals(&path).is_err());
    }

    #[test]
    fn reads_travel_grid_with_raw_cells() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("times.csv");
        fs::write(
            &path,
            "location_id,1,2\nR1,12.5,N/A\nR2, 40 ,55\n",
        )
        .unwrap();

        let rows = read_travel_times(&path).unwrap();
        assert_eq!(rows.len(), 2);

        let (label, lookup) = &rows[0];
        assert_eq!(label, "R1");
        assert_eq!(lookup.get("1").map(String::as_str), Some("12.5"));
        assert_eq!(lookup.get("2").map(String::as_str), Some("N/A"));

        let (label, lookup) = &rows[1];
        assert_eq!(label, "R2");
        assert_eq!(lookup.get("1").map(String::as_str), Some("40"));
    }
}
