//! Mission dataset files: `{data_dir}/{mission}_data.csv`

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use mq_core::{AbsoluteTime, EventKind, Sample, Series};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Absolute timestamp column
pub const TIME_ABS_COLUMN: &str = "time_abs(%Y-%m-%dT%H:%M:%S.%f)";
/// Relative time column, the analysed channel
pub const TIME_REL_COLUMN: &str = "time_rel(sec)";
/// Optional event category column
pub const EVENT_COLUMN: &str = "mq_type";

/// Mission analysed when none is named
pub const DEFAULT_MISSION: &str = "apollo";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no data for mission '{mission}': {} does not exist", path.display())]
    MissionNotFound { mission: String, path: PathBuf },

    #[error("reading {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{} has no '{column}' column", path.display())]
    MissingColumn { column: &'static str, path: PathBuf },

    #[error("{}, line {line}: {reason}", path.display())]
    BadRow {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    #[error("{} contains no samples", path.display())]
    Empty { path: PathBuf },
}

/// Reads mission datasets from one directory
#[derive(Debug, Clone)]
pub struct MissionLoader {
    data_dir: PathBuf,
}

struct Columns {
    time_abs: usize,
    time_rel: usize,
    event: Option<usize>,
}

impl MissionLoader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Dataset location for `mission`
    pub fn path_for(&self, mission: &str) -> PathBuf {
        self.data_dir.join(format!("{mission}_data.csv"))
    }

    /// Load the series for `mission`
    pub fn load(&self, mission: &str) -> Result<Series, LoadError> {
        let path = self.path_for(mission);
        if !path.is_file() {
            return Err(LoadError::MissionNotFound {
                mission: mission.to_string(),
                path,
            });
        }
        read_series(&path)
    }
}

/// Parse one dataset file, looking columns up by header name
pub fn read_series(path: &Path) -> Result<Series, LoadError> {
    let csv_error = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(csv_error)?;
    let headers = reader.headers().map_err(csv_error)?.clone();
    let columns = locate_columns(&headers, path)?;

    let mut samples = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(csv_error)?;
        // header occupies line 1
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(row as u64 + 2);
        samples.push(parse_row(&record, &columns).map_err(|reason| LoadError::BadRow {
            path: path.to_path_buf(),
            line,
            reason,
        })?);
    }

    if samples.is_empty() {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }

    let series = Series::new(samples);
    if !series.is_time_ordered() {
        tracing::warn!(path = %path.display(), "timestamps are not in ascending order");
    }
    Ok(series)
}

fn locate_columns(headers: &StringRecord, path: &Path) -> Result<Columns, LoadError> {
    let find = |name: &str| headers.iter().position(|h| h.trim() == name);
    let require = |column: &'static str| {
        find(column).ok_or_else(|| LoadError::MissingColumn {
            column,
            path: path.to_path_buf(),
        })
    };

    Ok(Columns {
        time_abs: require(TIME_ABS_COLUMN)?,
        time_rel: require(TIME_REL_COLUMN)?,
        event: find(EVENT_COLUMN),
    })
}

fn parse_row(record: &StringRecord, columns: &Columns) -> Result<Sample, String> {
    let field = |idx: usize, name: &str| {
        record
            .get(idx)
            .map(str::trim)
            .ok_or_else(|| format!("missing '{name}' field"))
    };

    let timestamp = AbsoluteTime::parse(field(columns.time_abs, TIME_ABS_COLUMN)?)
        .map_err(|e| e.to_string())?;
    let raw_value = field(columns.time_rel, TIME_REL_COLUMN)?;
    let value: f64 = raw_value
        .parse()
        .map_err(|e| format!("bad {TIME_REL_COLUMN} value '{raw_value}': {e}"))?;

    let sample = Sample::new(timestamp, value);
    let label = columns
        .event
        .and_then(|idx| record.get(idx))
        .map(str::trim)
        .filter(|label| !label.is_empty());

    Ok(match label {
        Some(label) => sample.with_event(EventKind::from_label(label)),
        None => sample,
    })
}

/// Write `series` in the dataset layout, with a leading index column
pub fn write_series(path: &Path, series: &Series) -> Result<(), LoadError> {
    let csv_error = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = WriterBuilder::new().from_path(path).map_err(csv_error)?;
    let tagged = series.has_event_tags();

    let mut header = vec!["", TIME_ABS_COLUMN, TIME_REL_COLUMN];
    if tagged {
        header.push(EVENT_COLUMN);
    }
    writer.write_record(&header).map_err(csv_error)?;

    for (i, sample) in series.samples().iter().enumerate() {
        let mut row = vec![
            i.to_string(),
            sample.timestamp.to_string(),
            sample.value.to_string(),
        ];
        if tagged {
            row.push(
                sample
                    .event
                    .as_ref()
                    .map(|kind| kind.label().to_string())
                    .unwrap_or_default(),
            );
        }
        writer.write_record(&row).map_err(csv_error)?;
    }

    writer.flush().map_err(|e| csv_error(e.into()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SAMPLE_CSV: &str = "\
,time_abs(%Y-%m-%dT%H:%M:%S.%f),time_rel(sec),mq_type
0,1970-01-19T20:25:00.000000,73500.0,impact_mq
1,1970-03-25T03:32:00.000000,12720.0,deep_mq
2,1970-03-26T20:17:00.000000,73020.0,impact_mq
";

    #[test]
    fn test_load_tagged_dataset() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("apollo_data.csv"), SAMPLE_CSV).unwrap();

        let series = MissionLoader::new(dir.path()).load("apollo").unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.sample(1).unwrap().value, 12720.0);
        assert_eq!(series.sample(0).unwrap().event, Some(EventKind::Impact));
        assert_eq!(
            series.sample(2).unwrap().timestamp,
            AbsoluteTime::parse("1970-03-26T20:17:00.000000").unwrap()
        );
    }

    #[test]
    fn test_event_column_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        let csv = "\
,time_rel(sec),time_abs(%Y-%m-%dT%H:%M:%S.%f)
0,1.5,1970-01-19T00:00:00.000000
1,2.5,1970-01-19T00:00:01.000000
";
        fs::write(dir.path().join("luna_data.csv"), csv).unwrap();

        let series = MissionLoader::new(dir.path()).load("luna").unwrap();
        assert!(!series.has_event_tags());
        assert_eq!(series.values(), vec![1.5, 2.5]);
    }

    #[test]
    fn test_missing_mission() {
        let dir = tempfile::tempdir().unwrap();
        let err = MissionLoader::new(dir.path()).load("artemis").unwrap_err();
        match err {
            LoadError::MissionNotFound { mission, path } => {
                assert_eq!(mission, "artemis");
                assert!(path.ends_with("artemis_data.csv"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        let loader = MissionLoader::new(dir.path());

        fs::write(loader.path_for("nocol"), ",time_rel(sec)\n0,1.0\n").unwrap();
        assert!(matches!(
            loader.load("nocol"),
            Err(LoadError::MissingColumn {
                column: TIME_ABS_COLUMN,
                ..
            })
        ));

        let bad_value = ",time_abs(%Y-%m-%dT%H:%M:%S.%f),time_rel(sec)\n\
                         0,1970-01-19T00:00:00.000000,abc\n";
        fs::write(loader.path_for("badval"), bad_value).unwrap();
        assert!(matches!(
            loader.load("badval"),
            Err(LoadError::BadRow { line: 2, .. })
        ));

        let bad_time = ",time_abs(%Y-%m-%dT%H:%M:%S.%f),time_rel(sec)\n0,yesterday,1.0\n";
        fs::write(loader.path_for("badtime"), bad_time).unwrap();
        assert!(matches!(loader.load("badtime"), Err(LoadError::BadRow { .. })));

        fs::write(
            loader.path_for("empty"),
            ",time_abs(%Y-%m-%dT%H:%M:%S.%f),time_rel(sec)\n",
        )
        .unwrap();
        assert!(matches!(loader.load("empty"), Err(LoadError::Empty { .. })));
    }

    #[test]
    fn test_written_dataset_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let loader = MissionLoader::new(dir.path());
        let original = loader.path_for("apollo");
        fs::write(&original, SAMPLE_CSV).unwrap();
        let series = loader.load("apollo").unwrap();

        write_series(&loader.path_for("copy"), &series).unwrap();
        assert_eq!(loader.load("copy").unwrap(), series);
    }
}
