//! Persisting and reloading ranked search results.
//!
//! The on-disk form is a two-column CSV, `aicc,model`, one row per
//! surviving candidate in rank order. The model column is the
//! `(p,d,q)(P,D,Q)[s]` rendering, which round-trips through
//! [`SarimaSpec`]'s `FromStr`.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::error::{Result, SearchError};
use crate::models::SarimaSpec;
use crate::search::{RankedTable, ScoredSpec};

/// Write a ranked table to `path`, best candidate first.
pub fn write_ranked_table<P: AsRef<Path>>(path: P, table: &RankedTable) -> Result<()> {
    let file = File::create(path)?;
    write_ranked_table_to(file, table)
}

/// Write a ranked table to any sink.
pub fn write_ranked_table_to<W: Write>(writer: W, table: &RankedTable) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(["aicc", "model"])?;
    for row in table.iter() {
        writer.write_record([row.aicc.to_string(), row.spec.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a ranked table previously written by [`write_ranked_table`].
///
/// Row order is taken as rank order; scores are checked to be finite
/// and ascending so a hand-edited or truncated file fails loudly.
pub fn read_ranked_table<P: AsRef<Path>>(path: P) -> Result<RankedTable> {
    let file = File::open(path)?;
    read_ranked_table_from(file)
}

/// Read a ranked table from any CSV source.
pub fn read_ranked_table_from<R: Read>(reader: R) -> Result<RankedTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let expected = ["aicc", "model"];
    let found: Vec<&str> = headers
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}'))
        .collect();
    if found != expected {
        return Err(SearchError::FormatError(format!(
            "expected header aicc,model, found {}",
            found.join(",")
        )));
    }

    let mut rows = Vec::new();
    let mut previous = f64::NEG_INFINITY;
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let aicc_field = record
            .get(0)
            .ok_or_else(|| SearchError::FormatError(format!("missing aicc in row {i}")))?;
        let aicc: f64 = aicc_field.parse().map_err(|_| {
            SearchError::FormatError(format!("bad aicc '{aicc_field}' in row {i}"))
        })?;
        if !aicc.is_finite() {
            return Err(SearchError::FormatError(format!(
                "non-finite aicc in row {i}"
            )));
        }
        if aicc < previous {
            return Err(SearchError::FormatError(format!(
                "scores not ascending at row {i}"
            )));
        }
        previous = aicc;

        let spec: SarimaSpec = record
            .get(1)
            .ok_or_else(|| SearchError::FormatError(format!("missing model in row {i}")))?
            .parse()?;
        rows.push(ScoredSpec { spec, aicc });
    }

    Ok(RankedTable::from_rows(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn sample_table() -> RankedTable {
        RankedTable::from_rows(vec![
            ScoredSpec {
                spec: SarimaSpec::new(0, 1, 1, 0, 1, 1, 12),
                aicc: 812.375,
            },
            ScoredSpec {
                spec: SarimaSpec::new(1, 1, 0, 0, 1, 1, 12),
                aicc: 815.5,
            },
            ScoredSpec {
                spec: SarimaSpec::new(2, 0, 0, 1, 1, 0, 12),
                aicc: 901.0,
            },
        ])
    }

    #[test]
    fn writes_expected_layout() {
        let mut buffer = Vec::new();
        write_ranked_table_to(&mut buffer, &sample_table()).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("aicc,model"));
        assert_eq!(lines.next(), Some("812.375,\"(0,1,1)(0,1,1)[12]\""));
    }

    #[test]
    fn round_trips_through_disk() {
        let file = NamedTempFile::new().unwrap();
        let table = sample_table();
        write_ranked_table(file.path(), &table).unwrap();
        let reloaded = read_ranked_table(file.path()).unwrap();
        assert_eq!(reloaded, table);
    }

    #[test]
    fn empty_table_round_trips() {
        let mut buffer = Vec::new();
        write_ranked_table_to(&mut buffer, &RankedTable::default()).unwrap();
        let reloaded = read_ranked_table_from(buffer.as_slice()).unwrap();
        assert!(reloaded.is_empty());
    }

    #[test]
    fn rejects_wrong_header() {
        let data = "score,model\n1.0,\"(0,0,0)(0,1,0)[12]\"\n";
        assert!(matches!(
            read_ranked_table_from(data.as_bytes()),
            Err(SearchError::FormatError(_))
        ));
    }

    #[test]
    fn rejects_out_of_order_scores() {
        let data = "aicc,model\n900.0,\"(0,1,1)(0,1,1)[12]\"\n800.0,\"(1,1,0)(0,1,1)[12]\"\n";
        assert!(matches!(
            read_ranked_table_from(data.as_bytes()),
            Err(SearchError::FormatError(_))
        ));
    }

    #[test]
    fn rejects_unparsable_rows() {
        let bad_score = "aicc,model\nxyz,\"(0,1,1)(0,1,1)[12]\"\n";
        assert!(read_ranked_table_from(bad_score.as_bytes()).is_err());
        let bad_model = "aicc,model\n800.0,not-a-model\n";
        assert!(read_ranked_table_from(bad_model.as_bytes()).is_err());
    }
}
