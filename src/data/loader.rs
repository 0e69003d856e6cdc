use crate::data::bar::Bar;
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct CsvRecord {
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
    #[serde(default)]
    open_interest: Option<f64>,
    symbol: String,
    root: String,
    expiry: String,
}

//loads contract bars from a csv file
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Bar>> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .context(format!("Failed to open CSV file: {:?}", path))?;

    let mut bars = Vec::new();

    for (index, result) in reader.deserialize().enumerate() {
        let line = index + 2;
        let record: CsvRecord =
            result.context(format!("Failed to parse CSV record at line {}", line))?;

        let timestamp = DateTime::parse_from_rfc3339(&record.timestamp)
            .context(format!(
                "Failed to parse timestamp '{}' at line {}",
                record.timestamp, line
            ))?
            .with_timezone(&Utc);

        let expiry = NaiveDate::parse_from_str(&record.expiry, "%Y-%m-%d").context(format!(
            "Failed to parse expiry '{}' at line {}",
            record.expiry, line
        ))?;

        let bar = Bar::new(
            timestamp,
            record.open,
            record.high,
            record.low,
            record.close,
            record.volume,
            record.open_interest,
            record.symbol,
            record.root.to_uppercase(),
            expiry,
        )
        .context(format!("Invalid bar at line {}", line))?;

        bars.push(bar);
    }

    //stable sort keeps file order for bars sharing a timestamp
    bars.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

    Ok(bars)
}

//keeps bars whose underlying root is one of the given roots
pub fn filter_by_roots(bars: &[Bar], roots: &[String]) -> Vec<Bar> {
    bars.iter()
        .filter(|bar| roots.iter().any(|r| r.eq_ignore_ascii_case(&bar.root)))
        .cloned()
        .collect()
}

//keeps bars with from <= timestamp <= to
pub fn filter_by_time_range(bars: &[Bar], from: DateTime<Utc>, to: DateTime<Utc>) -> Vec<Bar> {
    bars.iter()
        .filter(|bar| bar.timestamp >= from && bar.timestamp <= to)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "timestamp,open,high,low,close,volume,open_interest,symbol,root,expiry";

    fn write_csv(rows: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }
        file
    }

    #[test]
    fn loads_and_sorts_bars() {
        let file = write_csv(&[
            "2022-12-01T14:31:00Z,4001,4002,4000,4001.5,10,,ESZ22,es,2022-12-16",
            "2022-12-01T14:30:00Z,4000,4001,3999,4000.5,12,100,ESZ22,ES,2022-12-16",
        ]);

        let bars = load_csv(file.path()).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, 4000.5);
        assert_eq!(bars[0].open_interest, Some(100.0));
        assert_eq!(bars[1].root, "ES");
        assert_eq!(
            bars[1].expiry,
            NaiveDate::from_ymd_opt(2022, 12, 16).unwrap()
        );
    }

    #[test]
    fn bad_timestamp_reports_line() {
        let file = write_csv(&["not-a-time,4000,4001,3999,4000.5,12,,ESZ22,ES,2022-12-16"]);
        let err = load_csv(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("line 2"));
    }

    #[test]
    fn invalid_ohlc_is_an_error() {
        let file = write_csv(&["2022-12-01T14:30:00Z,4000,3990,3999,4000.5,12,,ESZ22,ES,2022-12-16"]);
        assert!(load_csv(file.path()).is_err());
    }

    #[test]
    fn nan_close_is_an_error() {
        let file = write_csv(&[
            "2022-12-01T14:30:00Z,4000,4001,3999,4000.5,12,,ESZ22,ES,2022-12-16",
            "2022-12-01T14:31:00Z,4000,4001,3999,NaN,12,,ESZ22,ES,2022-12-16",
        ]);
        let err = load_csv(file.path()).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("line 3"));
        assert!(message.contains("Non-finite close"));
    }

    #[test]
    fn filters_by_root_and_date() {
        let file = write_csv(&[
            "2022-12-01T14:30:00Z,4000,4001,3999,4000.5,12,,ESZ22,ES,2022-12-16",
            "2022-12-01T14:30:00Z,11000,11001,10999,11000,12,,NQZ22,NQ,2022-12-16",
            "2022-12-03T14:30:00Z,11000,11001,10999,11000,12,,NQZ22,NQ,2022-12-16",
            "2022-12-01T14:30:00Z,80,81,79,80,12,,CLF23,CL,2022-12-20",
        ]);
        let bars = load_csv(file.path()).unwrap();

        let roots = vec!["ES".to_string(), "nq".to_string()];
        let subscribed = filter_by_roots(&bars, &roots);
        assert_eq!(subscribed.len(), 3);

        let from = "2022-12-01T00:00:00Z".parse().unwrap();
        let to = "2022-12-01T23:59:59Z".parse().unwrap();
        let first_day = filter_by_time_range(&subscribed, from, to);
        assert_eq!(first_day.len(), 2);
    }
}
