//! Edge-file, pattern-file and metrics-file I/O (spec §6's formats).

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use graphmine_core::model::{Edge, Node};

use crate::error::DriverError;

/// Reads a line-delimited, space-separated edge file: `u u_label v v_label
/// edge_label` per line. Canonicalization (`u < v`) happens in
/// [`graphmine_core::model::Edge::new`] itself, so the reader just parses.
pub fn read_edge_file(path: &Path) -> Result<Vec<Edge>, DriverError> {
    let mut reader = csv::ReaderBuilder::new().delimiter(b' ').has_headers(false).flexible(true).from_path(path)?;

    let mut edges = Vec::new();
    for (lineno, record) in reader.records().enumerate() {
        let record = record?;
        let fields: Vec<&str> = record.iter().collect();
        if fields.len() != 5 {
            return Err(DriverError::InvalidInput(format!(
                "edge file line {}: expected 5 fields, got {}",
                lineno + 1,
                fields.len()
            )));
        }
        let parse_u32 = |s: &str| s.parse::<u32>().map_err(|_| DriverError::InvalidInput(format!("edge file line {}: `{s}` is not an integer", lineno + 1)));
        let parse_u16 = |s: &str| s.parse::<u16>().map_err(|_| DriverError::InvalidInput(format!("edge file line {}: `{s}` is not an integer", lineno + 1)));

        let u = Node::new(parse_u32(fields[0])?, parse_u16(fields[1])?);
        let v = Node::new(parse_u32(fields[2])?, parse_u16(fields[3])?);
        let label = parse_u16(fields[4])?;
        edges.push(Edge::new(u, v, label));
    }
    Ok(edges)
}

/// Writes the pattern file: `canonical_label count_1 ... count_R`, one row
/// per label seen across any run, zero-filled for runs that never touched
/// that label.
pub fn write_pattern_file(path: &Path, runs: &[BTreeMap<String, u64>]) -> Result<(), DriverError> {
    let mut writer = csv::WriterBuilder::new().delimiter(b' ').from_path(path)?;

    let mut header = vec!["canonical_label".to_string()];
    header.extend((1..=runs.len()).map(|i| format!("count_{i}")));
    writer.write_record(&header)?;

    let all_labels: BTreeSet<&str> = runs.iter().flat_map(|r| r.keys().map(String::as_str)).collect();
    for label in all_labels {
        let mut row = vec![label.to_string()];
        row.extend(runs.iter().map(|r| r.get(label).copied().unwrap_or(0).to_string()));
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the metrics file: one sorted column per metric name, one row per
/// edge event.
pub fn write_metrics_file(path: &Path, rows: &[BTreeMap<String, f64>]) -> Result<(), DriverError> {
    let mut writer = csv::WriterBuilder::new().delimiter(b' ').from_path(path)?;

    let columns: BTreeSet<&str> = rows.iter().flat_map(|r| r.keys().map(String::as_str)).collect();
    let header: Vec<&str> = columns.iter().copied().collect();
    writer.write_record(&header)?;

    for row in rows {
        let record: Vec<String> = columns.iter().map(|c| row.get(*c).map(|v| v.to_string()).unwrap_or_else(|| "0".to_string())).collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads a pattern file written by [`write_pattern_file`] back into one
/// `label -> count` map per run column.
pub fn read_pattern_file(path: &Path) -> Result<Vec<BTreeMap<String, u64>>, DriverError> {
    let mut reader = csv::ReaderBuilder::new().delimiter(b' ').has_headers(true).from_path(path)?;
    let n_runs = reader.headers()?.len().saturating_sub(1);
    let mut runs = vec![BTreeMap::new(); n_runs];

    for record in reader.records() {
        let record = record?;
        let mut fields = record.iter();
        let label = fields.next().ok_or_else(|| DriverError::InvalidInput("pattern file row missing label".to_string()))?.to_string();
        for (run, field) in runs.iter_mut().zip(fields) {
            let count: u64 = field.parse().map_err(|_| DriverError::InvalidInput(format!("pattern file: `{field}` is not an integer")))?;
            run.insert(label.clone(), count);
        }
    }
    Ok(runs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_a_well_formed_edge_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "1 0 2 0 5").unwrap();
        writeln!(tmp, "2 0 3 1 7").unwrap();
        let edges = read_edge_file(tmp.path()).unwrap();
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].label, 5);
    }

    #[test]
    fn rejects_a_short_row() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "1 0 2 0").unwrap();
        let err = read_edge_file(tmp.path()).unwrap_err();
        assert!(matches!(err, DriverError::InvalidInput(_)));
    }

    #[test]
    fn pattern_file_zero_fills_missing_runs() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let mut run1 = BTreeMap::new();
        run1.insert("A".to_string(), 3u64);
        let mut run2 = BTreeMap::new();
        run2.insert("B".to_string(), 2u64);
        write_pattern_file(tmp.path(), &[run1, run2]).unwrap();

        let content = std::fs::read_to_string(tmp.path()).unwrap();
        assert!(content.contains("A 3 0"));
        assert!(content.contains("B 0 2"));
    }

    #[test]
    fn pattern_file_round_trips() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let mut run1 = BTreeMap::new();
        run1.insert("A".to_string(), 3u64);
        run1.insert("B".to_string(), 1u64);
        write_pattern_file(tmp.path(), &[run1.clone()]).unwrap();
        let parsed = read_pattern_file(tmp.path()).unwrap();
        assert_eq!(parsed, vec![run1]);
    }
}
