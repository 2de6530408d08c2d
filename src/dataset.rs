//! Corpus ingestion and result output for the dedup driver.
//!
//! Two input formats are supported:
//!
//! - `hash`: TSV with a header line, then `id⟨tab⟩hash` rows where `hash` is
//!   a decimal 64-bit fingerprint computed elsewhere.
//! - `json`: one JSON object per line; the configured text column is
//!   shingled and summarized into a fingerprint here, and the id column
//!   becomes the record identifier.
//!
//! Several records can collapse onto one fingerprint, so ingestion keeps a
//! fingerprint → ids multimap alongside the fingerprint set. Output is TSV
//! with one `id⟨tab⟩hash⟨tab⟩cluster` row per record membership.

use std::collections::BTreeSet;
use std::io::{BufRead, Write};

use clap::ValueEnum;
use fxhash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use fingerprint::{fingerprint_text, FingerprintConfig, FingerprintError};
use matcher::Cluster;

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// TSV of precomputed fingerprints: header, then `id⟨tab⟩hash`.
    Hash,
    /// JSON lines; fingerprints are computed from a text column.
    Json,
}

/// Per-run ingestion options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetOptions {
    pub format: InputFormat,
    /// JSON field holding the text to fingerprint (`json` format only).
    pub text_column: Option<String>,
    /// JSON field holding the record identifier (`json` format only).
    pub id_column: Option<String>,
    /// Cap on ingested data records; 0 means unlimited.
    pub sample: usize,
}

/// The ingested corpus: the fingerprint set plus the id multimap needed to
/// expand clusters back into per-record rows.
#[derive(Debug, Default)]
pub struct Dataset {
    pub hashes: FxHashSet<u64>,
    pub ids: FxHashMap<u64, BTreeSet<String>>,
    /// Number of data records ingested (excluding the TSV header).
    pub records: usize,
}

impl Dataset {
    fn insert(&mut self, id: String, hash: u64) {
        self.ids.entry(hash).or_default().insert(id);
        self.hashes.insert(hash);
        self.records += 1;
    }
}

/// Errors produced while ingesting a corpus.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("line {line}: expected `id\\thash`, got {content:?}")]
    MalformedRow { line: usize, content: String },

    #[error("line {line}: invalid fingerprint {value:?}")]
    InvalidHash { line: usize, value: String },

    #[error("line {line}: invalid JSON: {source}")]
    InvalidJson {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("line {line}: missing or non-text column {column:?}")]
    MissingColumn { line: usize, column: String },

    #[error("json input requires --text-column and --id-column")]
    ColumnsRequired,

    #[error("line {line}: {source}")]
    Fingerprint {
        line: usize,
        #[source]
        source: FingerprintError,
    },
}

/// Read a corpus from `reader` according to `opts`.
///
/// For the `json` format, text is fingerprinted with `fingerprint_cfg`;
/// for the `hash` format the config is unused. The `sample` cap counts data
/// records, so a capped TSV read still consumes the header first.
pub fn read_records<R: BufRead>(
    reader: R,
    opts: &DatasetOptions,
    fingerprint_cfg: &FingerprintConfig,
) -> Result<Dataset, DatasetError> {
    let dataset = match opts.format {
        InputFormat::Hash => read_hash_records(reader, opts.sample)?,
        InputFormat::Json => read_json_records(reader, opts, fingerprint_cfg)?,
    };
    info!(
        records = dataset.records,
        hashes = dataset.hashes.len(),
        "corpus_loaded"
    );
    Ok(dataset)
}

fn read_hash_records<R: BufRead>(reader: R, sample: usize) -> Result<Dataset, DatasetError> {
    let mut dataset = Dataset::default();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        // The first line is the header.
        if index == 0 {
            continue;
        }
        if sample > 0 && dataset.records == sample {
            break;
        }
        if line.is_empty() {
            continue;
        }

        let (id, value) = line
            .split_once('\t')
            .ok_or_else(|| DatasetError::MalformedRow {
                line: index + 1,
                content: line.clone(),
            })?;
        let hash = value
            .trim()
            .parse::<u64>()
            .map_err(|_| DatasetError::InvalidHash {
                line: index + 1,
                value: value.to_string(),
            })?;
        dataset.insert(id.to_string(), hash);
    }
    Ok(dataset)
}

fn read_json_records<R: BufRead>(
    reader: R,
    opts: &DatasetOptions,
    fingerprint_cfg: &FingerprintConfig,
) -> Result<Dataset, DatasetError> {
    let (Some(text_column), Some(id_column)) = (&opts.text_column, &opts.id_column) else {
        return Err(DatasetError::ColumnsRequired);
    };

    let mut dataset = Dataset::default();
    for (index, line) in reader.lines().enumerate() {
        if opts.sample > 0 && dataset.records == opts.sample {
            break;
        }
        let line = line?;
        if line.is_empty() {
            continue;
        }

        let record: serde_json::Value =
            serde_json::from_str(&line).map_err(|source| DatasetError::InvalidJson {
                line: index + 1,
                source,
            })?;
        let text = record
            .get(text_column)
            .and_then(|v| v.as_str())
            .ok_or_else(|| DatasetError::MissingColumn {
                line: index + 1,
                column: text_column.clone(),
            })?;
        let id = match record.get(id_column) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) if !other.is_null() => other.to_string(),
            _ => {
                return Err(DatasetError::MissingColumn {
                    line: index + 1,
                    column: id_column.clone(),
                })
            }
        };

        let hash = fingerprint_text(text, fingerprint_cfg).map_err(|source| {
            DatasetError::Fingerprint {
                line: index + 1,
                source,
            }
        })?;
        dataset.insert(id, hash);
    }
    Ok(dataset)
}

/// Write clusters as TSV: `id⟨tab⟩hash⟨tab⟩cluster`, clusters numbered by
/// their enumeration order.
///
/// Rows within a cluster are ordered by fingerprint, then id, so output for
/// a given clustering is reproducible.
pub fn write_clusters<W: Write>(
    mut writer: W,
    clusters: &[Cluster],
    ids: &FxHashMap<u64, BTreeSet<String>>,
) -> std::io::Result<()> {
    writeln!(writer, "id\thash\tcluster")?;
    for (cluster_id, cluster) in clusters.iter().enumerate() {
        let mut hashes: Vec<u64> = cluster.iter().copied().collect();
        hashes.sort_unstable();
        for hash in hashes {
            if let Some(members) = ids.get(&hash) {
                for id in members {
                    writeln!(writer, "{id}\t{hash}\t{cluster_id}")?;
                }
            }
        }
    }
    writer.flush()
}
