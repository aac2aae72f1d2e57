use std::io::Write;
use std::path::{Path, PathBuf};

pub const HEADER: &str = "ECTRL ID,ADEP,ADEP Latitude,ADEP Longitude,ADES,ADES Latitude,ADES Longitude,AC Operator,AC Type,ACTUAL OFF BLOCK TIME,ACTUAL ARRIVAL TIME,Actual Distance Flown (nm)";

/// One data row departing `adep` and arriving at `ades`
#[allow(dead_code)]
pub fn flight_row(id: &str, adep: &str, ades: &str) -> String {
    format!(
        "{id},{adep},52.1657,20.9671,{ades},51.4775,-0.461389,LOT,B738,01-03-2018 10:00:00,01-03-2018 11:32:30,800"
    )
}

/// Write a flight file with the standard header into `dir`
#[allow(dead_code)]
pub fn write_flight_file(dir: &Path, name: &str, rows: &[String]) -> PathBuf {
    let path = dir.join(name);
    let mut body = String::from(HEADER);
    for row in rows {
        body.push('\n');
        body.push_str(row);
    }
    body.push('\n');
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(body.as_bytes()).unwrap();
    path
}
