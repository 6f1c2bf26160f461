//! Predicting a whole CSV of selections at once.
//!
//! Input columns: `primary_skill,secondary_skill,education`. Output repeats
//! them as read and appends `predicted_role` and `error`; a bad row is reported in
//! its `error` column and the rest of the file still gets processed.

use std::io::{Read, Write};

use serde::Serialize;
use tracing::warn;

use crate::artifacts::Artifacts;
use crate::encoder::Selection;
use crate::error::{Error, Result};
use crate::form::{Outcome, predict_role};

const INPUT_COLUMNS: [&str; 3] = ["primary_skill", "secondary_skill", "education"];

#[derive(Debug, Serialize)]
struct PredictionRecord<'a> {
    primary_skill: &'a str,
    secondary_skill: &'a str,
    education: &'a str,
    predicted_role: &'a str,
    error: &'a str,
}

/// Counts from one batch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub predicted: usize,
    pub failed: usize,
}

pub fn predict_csv<R: Read, W: Write>(
    artifacts: &Artifacts,
    input: R,
    output: W,
) -> Result<BatchSummary> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input);
    let mut wtr = csv::Writer::from_writer(output);
    let mut summary = BatchSummary::default();

    let headers = rdr.headers().map_err(csv_error)?.clone();
    let columns = INPUT_COLUMNS.map(|name| headers.iter().position(|h| h == name));

    for (line, result) in rdr.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(csv_error(e)),
            Err(e) => {
                warn!(row = line + 1, error = %e, "skipping unreadable row");
                summary.failed += 1;
                write_row(&mut wtr, [""; 3], "", &e.to_string())?;
                continue;
            }
        };
        let echo = columns.map(|c| c.and_then(|i| record.get(i)).unwrap_or(""));

        let selection: Selection = match record.deserialize(Some(&headers)) {
            Ok(s) => s,
            Err(e) => {
                warn!(row = line + 1, error = %e, "skipping malformed row");
                summary.failed += 1;
                write_row(&mut wtr, echo, "", &e.to_string())?;
                continue;
            }
        };

        match Outcome::from(predict_role(&selection, artifacts)) {
            Outcome::Success(role) => {
                summary.predicted += 1;
                write_row(&mut wtr, echo, &role, "")?;
            }
            failed => {
                summary.failed += 1;
                write_row(&mut wtr, echo, "", &failed.message())?;
            }
        }
    }

    wtr.flush()?;
    Ok(summary)
}

fn write_row<W: Write>(
    wtr: &mut csv::Writer<W>,
    [primary_skill, secondary_skill, education]: [&str; 3],
    role: &str,
    error: &str,
) -> Result<()> {
    wtr.serialize(PredictionRecord {
        primary_skill,
        secondary_skill,
        education,
        predicted_role: role,
        error,
    })
    .map_err(csv_error)
}

fn csv_error(e: csv::Error) -> Error {
    Error::Io(std::io::Error::other(e))
}
