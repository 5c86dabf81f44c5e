//! Reading monthly series from CSV.
//!
//! The expected layout is transposed: the first record holds `YYYY-MM`
//! period labels in temporal order, the second holds the matching
//! observations. This is the layout the source spreadsheets export.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::core::{Month, Series};
use crate::error::{Result, SearchError};

/// Read a series from a transposed two-row CSV file.
pub fn read_series<P: AsRef<Path>>(path: P) -> Result<Series> {
    let file = File::open(path)?;
    read_series_from(file)
}

/// Read a series from any CSV source in the transposed two-row layout.
pub fn read_series_from<R: Read>(reader: R) -> Result<Series> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = reader.records();
    let labels = records
        .next()
        .ok_or(SearchError::EmptyData)??;
    let observations = records
        .next()
        .ok_or_else(|| {
            SearchError::FormatError("expected a second record with observations".to_string())
        })??;

    if labels.len() != observations.len() {
        return Err(SearchError::FormatError(format!(
            "{} period labels but {} observations",
            labels.len(),
            observations.len()
        )));
    }

    let mut months = Vec::with_capacity(labels.len());
    for (i, label) in labels.iter().enumerate() {
        // Spreadsheet exports sometimes prefix the first cell with a BOM.
        let label = if i == 0 {
            label.trim_start_matches('\u{feff}')
        } else {
            label
        };
        months.push(label.parse::<Month>()?);
    }

    // Labels must form one contiguous monthly run.
    for (i, window) in months.windows(2).enumerate() {
        if window[1].months_since(&window[0]) != Some(1) {
            return Err(SearchError::FormatError(format!(
                "period labels not consecutive at {}: {} then {}",
                i, window[0], window[1]
            )));
        }
    }

    let values: Result<Vec<f64>> = observations
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            cell.parse::<f64>().map_err(|_| {
                SearchError::FormatError(format!("bad observation '{cell}' at column {i}"))
            })
        })
        .collect();

    let start = months
        .first()
        .copied()
        .ok_or(SearchError::EmptyData)?;
    Series::new(start, values?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn reads_transposed_layout() {
        let data = "1995-01,1995-02,1995-03,1995-04\n10.5,11.0,12.25,11.75\n";
        let series = read_series_from(data.as_bytes()).unwrap();
        assert_eq!(series.len(), 4);
        assert_eq!(series.start().to_string(), "1995-01");
        assert_eq!(series.values(), &[10.5, 11.0, 12.25, 11.75]);
    }

    #[test]
    fn strips_leading_bom() {
        let data = "\u{feff}2003-11,2003-12\n5.0,6.0\n";
        let series = read_series_from(data.as_bytes()).unwrap();
        assert_eq!(series.start().to_string(), "2003-11");
    }

    #[test]
    fn rejects_mismatched_row_lengths() {
        let data = "1995-01,1995-02,1995-03\n1.0,2.0\n";
        assert!(matches!(
            read_series_from(data.as_bytes()),
            Err(SearchError::FormatError(_))
        ));
    }

    #[test]
    fn rejects_gaps_in_the_calendar() {
        let data = "1995-01,1995-03\n1.0,2.0\n";
        assert!(matches!(
            read_series_from(data.as_bytes()),
            Err(SearchError::FormatError(_))
        ));
    }

    #[test]
    fn rejects_bad_labels_and_values() {
        assert!(read_series_from("not-a-month,1995-02\n1.0,2.0\n".as_bytes()).is_err());
        assert!(matches!(
            read_series_from("1995-01,1995-02\n1.0,abc\n".as_bytes()),
            Err(SearchError::FormatError(_))
        ));
    }

    #[test]
    fn rejects_missing_observation_record() {
        assert!(matches!(
            read_series_from("1995-01,1995-02\n".as_bytes()),
            Err(SearchError::FormatError(_))
        ));
    }

    #[test]
    fn reads_from_a_file_on_disk() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "2004-01,2004-02,2004-03\n100.0,101.5,99.25\n").unwrap();
        let series = read_series(file.path()).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.end().to_string(), "2004-04");
    }

    #[test]
    fn year_rollover_is_contiguous() {
        let data = "1999-11,1999-12,2000-01\n1.0,2.0,3.0\n";
        let series = read_series_from(data.as_bytes()).unwrap();
        assert_eq!(series.month_at(2).to_string(), "2000-01");
    }
}
