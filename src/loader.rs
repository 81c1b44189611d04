use crate::types::{RawBusinessRow, RawFilmRow};
use csv::ReaderBuilder;
use serde::de::DeserializeOwned;
use std::error::Error;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub total_rows: usize,
    pub parse_errors: usize,
}

// Rows that fail to deserialize are skipped and counted rather than
// aborting the whole run. Only an unreadable file is fatal.
fn load_rows<T, R>(reader: R) -> (Vec<T>, LoadReport)
where
    T: DeserializeOwned,
    R: Read,
{
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut report = LoadReport::default();
    let mut rows: Vec<T> = Vec::new();

    for result in rdr.deserialize::<T>() {
        report.total_rows += 1;
        match result {
            Ok(r) => rows.push(r),
            Err(_) => report.parse_errors += 1,
        }
    }
    (rows, report)
}

pub fn load_films(path: &Path) -> Result<(Vec<RawFilmRow>, LoadReport), Box<dyn Error>> {
    let file = std::fs::File::open(path)
        .map_err(|e| format!("cannot open input file '{}': {}", path.display(), e))?;
    Ok(load_rows(file))
}

pub fn load_films_from_reader<R: Read>(reader: R) -> (Vec<RawFilmRow>, LoadReport) {
    load_rows(reader)
}

pub fn load_businesses(path: &Path) -> Result<(Vec<RawBusinessRow>, LoadReport), Box<dyn Error>> {
    let file = std::fs::File::open(path)
        .map_err(|e| format!("cannot open input file '{}': {}", path.display(), e))?;
    Ok(load_rows(file))
}

pub fn load_businesses_from_reader<R: Read>(reader: R) -> (Vec<RawBusinessRow>, LoadReport) {
    load_rows(reader)
}
