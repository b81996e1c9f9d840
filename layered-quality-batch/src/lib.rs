//! Score JSON Lines corpora in parallel with a shared [`QualityScorer`].
//!
//! Each input line is a JSON object holding the text in a configurable
//! field. Each output line is the flat record of one input line, in input
//! order.

use layered_quality::{QualityError, QualityRecord, QualityScorer};
use rayon::prelude::*;
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum BatchError {
    #[error(transparent)]
    Quality(#[from] QualityError),
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Reading or writing a stream that has no path.
    #[error("stream I/O failed: {0}")]
    Stream(#[from] std::io::Error),
    #[error("line {line}: invalid JSON: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("line {line}: no string field {field:?}")]
    MissingField { line: usize, field: String },
}

pub type BatchResult<T> = Result<T, BatchError>;

/// Counts for one scored corpus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub documents: usize,
    pub passed: usize,
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> BatchError {
    let path = path.to_path_buf();
    move |source| BatchError::Io { path, source }
}

/// Score every text on the rayon pool. Results keep the order of `texts`.
pub fn score_texts<T>(scorer: &QualityScorer, texts: &[T]) -> BatchResult<Vec<QualityRecord>>
where
    T: AsRef<str> + Sync,
{
    let records = texts
        .par_iter()
        .map(|text| scorer.score_text(text.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(documents = records.len(), "scored batch");
    Ok(records)
}

/// Read the string `field` of every non-blank JSON line.
pub fn read_texts<R: BufRead>(reader: R, field: &str) -> BatchResult<Vec<String>> {
    let mut texts = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(&line).map_err(|source| BatchError::Json {
            line: line_number,
            source,
        })?;
        match value.get(field).and_then(Value::as_str) {
            Some(text) => texts.push(text.to_string()),
            None => {
                return Err(BatchError::MissingField {
                    line: line_number,
                    field: field.to_string(),
                })
            }
        }
    }
    Ok(texts)
}

/// Write one flat record per line.
pub fn write_jsonl<W: Write>(mut writer: W, records: &[QualityRecord]) -> BatchResult<()> {
    for record in records {
        serde_json::to_writer(&mut writer, &record.to_flat()).map_err(std::io::Error::from)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Score the `field` of every line of `input` and write the records to
/// `output`.
pub fn score_jsonl(
    scorer: &QualityScorer,
    input: &Path,
    output: &Path,
    field: &str,
) -> BatchResult<BatchSummary> {
    let reader = BufReader::new(File::open(input).map_err(io_error(input))?);
    let texts = read_texts(reader, field)?;
    let records = score_texts(scorer, &texts)?;

    let writer = BufWriter::new(File::create(output).map_err(io_error(output))?);
    write_jsonl(writer, &records)?;

    let summary = BatchSummary {
        documents: records.len(),
        passed: records.iter().filter(|record| record.passed()).count(),
    };
    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        documents = summary.documents,
        passed = summary.passed,
        "scored corpus"
    );
    Ok(summary)
}
