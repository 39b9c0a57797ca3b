use csv::Writer;
use std::io;
use std::path::Path;
use tracing::info;

use crate::domain::types::SafeZone;
use crate::error::Result;

pub fn write_safe_zones<W: io::Write>(writer: W, zones: &[SafeZone]) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);

    wtr.write_record(["name", "longitude", "latitude", "capacity"])?;
    for zone in zones {
        wtr.write_record([
            zone.name.clone(),
            zone.location.lng().to_string(),
            zone.location.lat().to_string(),
            zone.capacity.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn write_safe_zones_csv(path: &Path, zones: &[SafeZone]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_safe_zones(file, zones)?;
    info!("Wrote {} safe zones to {}", zones.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Coordinate;

    #[test]
    fn writes_header_and_one_row_per_zone() {
        let zones = vec![SafeZone {
            name: "Safe Zone 3".to_string(),
            location: Coordinate::new(88.3639, 22.5726).unwrap(),
            capacity: 42,
        }];
        let mut out = Vec::new();
        write_safe_zones(&mut out, &zones).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "name,longitude,latitude,capacity\nSafe Zone 3,88.3639,22.5726,42\n"
        );
    }

    #[test]
    fn csv_file_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("safe_zones.csv");
        let zones = vec![SafeZone {
            name: "Safe Zone 1".to_string(),
            location: Coordinate::new(-122.4194, 37.7749).unwrap(),
            capacity: 10,
        }];
        write_safe_zones_csv(&path, &zones).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "Safe Zone 1");
        assert_eq!(&rows[0][3], "10");
    }
}
