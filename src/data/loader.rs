use std::path::Path;

use crate::error::{PipelineError, Result};

use super::model::Dataset;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a biosignal recording from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` – tabular: one sample per row, numeric columns, an optional
///   column literally named `label`
/// * `.edf` – European Data Format: continuous multichannel recording,
///   transposed to samples × channels with a placeholder label 0
/// * `.mat` – MATLAB v5 container: the first two-dimensional real numeric
///   entry becomes the feature table, with a placeholder label 0
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path)?,
        "edf" => parse_edf(&std::fs::read(path)?)?,
        "mat" => parse_mat(&std::fs::read(path)?)?,
        other => {
            return Err(PipelineError::Format(format!(
                "unsupported file extension: .{other}"
            )))
        }
    };

    log::info!(
        "loaded {} rows x {} features from {}",
        dataset.n_rows(),
        dataset.n_features(),
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, every cell numeric.
/// The column named `label` (if any) becomes the label column; its absence
/// is deliberately not a loader failure; the trainer detects it so the
/// user is told at the moment training is requested.
fn load_csv(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| PipelineError::Parse(format!("reading CSV headers: {e}")))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let label_idx = headers.iter().position(|h| h == "label");
    let feature_names: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != label_idx)
        .map(|(_, h)| h.clone())
        .collect();

    let mut rows = Vec::new();
    let mut labels = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record =
            result.map_err(|e| PipelineError::Parse(format!("CSV row {row_no}: {e}")))?;

        let mut row = Vec::with_capacity(feature_names.len());
        for (col_idx, cell) in record.iter().enumerate() {
            let value: f64 = cell.trim().parse().map_err(|_| {
                PipelineError::Parse(format!(
                    "CSV row {row_no}, column '{}': '{cell}' is not a number",
                    headers.get(col_idx).map(String::as_str).unwrap_or("?")
                ))
            })?;
            if Some(col_idx) == label_idx {
                labels.push(value as i64);
            } else {
                row.push(value);
            }
        }
        rows.push(row);
    }

    Dataset::new(feature_names, rows, label_idx.map(|_| labels))
}

// ---------------------------------------------------------------------------
// EDF loader
// ---------------------------------------------------------------------------

// EDF header layout: 256 ASCII bytes of recording metadata, then 256 bytes
// of per-signal metadata per channel, then data records of interleaved
// 16-bit little-endian samples.

const EDF_HEADER_LEN: usize = 256;
const EDF_SIGNAL_HEADER_LEN: usize = 256;

struct EdfSignal {
    label: String,
    phys_min: f64,
    phys_max: f64,
    dig_min: f64,
    dig_max: f64,
    samples_per_record: usize,
}

/// Parse an EDF recording into a samples × channels table.
///
/// Digital values are scaled to physical units with the per-signal
/// calibration ranges; a flat digital range means the raw value is kept.
/// Every sample index becomes a row, every channel a feature column, and a
/// constant placeholder label 0 is appended; an EDF file carries no
/// supervision signal, so training on it only exercises the degenerate
/// single-class path.
fn parse_edf(buf: &[u8]) -> Result<Dataset> {
    if buf.len() < EDF_HEADER_LEN {
        return Err(PipelineError::Parse("EDF header truncated".into()));
    }

    let n_records_raw: i64 = edf_num(buf, 236, 8, "number of data records")?;
    let n_signals: usize = edf_num(buf, 252, 4, "number of signals")?;
    if n_signals == 0 {
        return Err(PipelineError::Parse("EDF file declares zero signals".into()));
    }

    let header_len = EDF_HEADER_LEN + n_signals * EDF_SIGNAL_HEADER_LEN;
    if buf.len() < header_len {
        return Err(PipelineError::Parse("EDF signal headers truncated".into()));
    }

    // Per-signal metadata is stored field-major: all labels, then all
    // transducers, and so on.
    let base = EDF_HEADER_LEN;
    let mut signals = Vec::with_capacity(n_signals);
    for i in 0..n_signals {
        signals.push(EdfSignal {
            label: edf_field(buf, base + i * 16, 16)?.to_string(),
            phys_min: edf_num(buf, base + n_signals * 104 + i * 8, 8, "physical minimum")?,
            phys_max: edf_num(buf, base + n_signals * 112 + i * 8, 8, "physical maximum")?,
            dig_min: edf_num(buf, base + n_signals * 120 + i * 8, 8, "digital minimum")?,
            dig_max: edf_num(buf, base + n_signals * 128 + i * 8, 8, "digital maximum")?,
            samples_per_record: edf_num(
                buf,
                base + n_signals * 216 + i * 8,
                8,
                "samples per record",
            )?,
        });
    }

    let spr = signals[0].samples_per_record;
    if spr == 0 || signals.iter().any(|s| s.samples_per_record != spr) {
        // Mixed sampling rates would make feature rows ragged.
        return Err(PipelineError::Parse(
            "EDF signals with differing sampling rates are not supported".into(),
        ));
    }

    let record_bytes = n_signals * spr * 2;
    let n_records = if n_records_raw >= 0 {
        n_records_raw as usize
    } else {
        // -1 means "unknown"; derive from the file length.
        (buf.len() - header_len) / record_bytes
    };
    if buf.len() < header_len + n_records * record_bytes {
        return Err(PipelineError::Parse("EDF data records truncated".into()));
    }

    // channels × samples, scaled to physical units
    let n_samples = n_records * spr;
    let mut channels: Vec<Vec<f64>> = vec![Vec::with_capacity(n_samples); n_signals];
    let mut offset = header_len;
    for _ in 0..n_records {
        for (ch, signal) in signals.iter().enumerate() {
            for _ in 0..spr {
                let raw = i16::from_le_bytes([buf[offset], buf[offset + 1]]) as f64;
                channels[ch].push(signal.scale(raw));
                offset += 2;
            }
        }
    }

    // Transpose: sample index → row, channel → feature column.
    let rows: Vec<Vec<f64>> = (0..n_samples)
        .map(|t| channels.iter().map(|c| c[t]).collect())
        .collect();

    let feature_names = signals
        .iter()
        .enumerate()
        .map(|(i, s)| {
            if s.label.is_empty() {
                format!("ch{i}")
            } else {
                s.label.clone()
            }
        })
        .collect();

    Dataset::new(feature_names, rows, Some(vec![0; n_samples]))
}

impl EdfSignal {
    fn scale(&self, digital: f64) -> f64 {
        let dig_range = self.dig_max - self.dig_min;
        if dig_range == 0.0 {
            return digital;
        }
        self.phys_min + (digital - self.dig_min) * (self.phys_max - self.phys_min) / dig_range
    }
}

/// Trimmed ASCII field from the EDF header.
fn edf_field(buf: &[u8], start: usize, len: usize) -> Result<&str> {
    let raw = buf
        .get(start..start + len)
        .ok_or_else(|| PipelineError::Parse("EDF header field out of bounds".into()))?;
    std::str::from_utf8(raw)
        .map(str::trim)
        .map_err(|_| PipelineError::Parse("non-ASCII EDF header field".into()))
}

fn edf_num<T: std::str::FromStr>(buf: &[u8], start: usize, len: usize, what: &str) -> Result<T> {
    let text = edf_field(buf, start, len)?;
    text.parse().map_err(|_| {
        PipelineError::Parse(format!("EDF header: '{text}' is not a valid {what}"))
    })
}

// ---------------------------------------------------------------------------
// MAT loader (MATLAB v5 container)
// ---------------------------------------------------------------------------

// MAT v5 data element types we care about.
const MI_INT8: u32 = 1;
const MI_INT32: u32 = 5;
const MI_UINT32: u32 = 6;
const MI_SINGLE: u32 = 7;
const MI_DOUBLE: u32 = 9;
const MI_MATRIX: u32 = 14;

// Complex-data bit in the array-flags subelement.
const MX_COMPLEX_FLAG: u32 = 0x0800;

/// Parse a MATLAB v5 file, selecting the FIRST top-level entry holding a
/// two-dimensional real numeric array (the container's natural iteration
/// order; scan stops at the first match).
///
/// This heuristic is best-effort: nothing validates that the chosen matrix
/// is actually a biosignal, and unsupported entries (compressed, cell,
/// char, complex) are silently skipped until none qualify.
fn parse_mat(buf: &[u8]) -> Result<Dataset> {
    if buf.len() < 128 {
        return Err(PipelineError::Parse("file too small for a MAT v5 header".into()));
    }
    // Endianness indicator: a big-endian writer stores the two characters
    // "MI" in order, a little-endian writer stores "IM".
    let big_endian = &buf[126..128] == b"MI";

    let mut offset = 128;
    while offset + 8 <= buf.len() {
        let (data_type, data_size, tag_size) = mat_tag(buf, offset, big_endian)?;
        let start = offset + tag_size;
        let end = start + data_size;
        if end > buf.len() {
            break;
        }
        if data_type == MI_MATRIX {
            if let Some((name, n_rows, n_cols, data)) =
                mat_matrix(&buf[start..end], big_endian)
            {
                log::debug!("selected MAT entry '{name}' ({n_rows}x{n_cols})");
                let feature_names = (0..n_cols).map(|j| format!("f{j}")).collect();
                // Column-major storage → row-major rows.
                let rows: Vec<Vec<f64>> = (0..n_rows)
                    .map(|r| (0..n_cols).map(|c| data[c * n_rows + r]).collect())
                    .collect();
                return Dataset::new(feature_names, rows, Some(vec![0; n_rows]));
            }
        }
        // Elements are padded to 8-byte boundaries.
        offset = (end + 7) & !7;
    }

    Err(PipelineError::Format(
        "MAT container has no usable 2-D numeric entry".into(),
    ))
}

/// Read a data-element tag: `(type, size, tag_bytes)`.
/// Small elements pack the size into the upper half of the first word.
fn mat_tag(buf: &[u8], offset: usize, be: bool) -> Result<(u32, usize, usize)> {
    if offset + 4 > buf.len() {
        return Err(PipelineError::Parse("truncated MAT element tag".into()));
    }
    let word = mat_u32(buf, offset, be);
    let small_size = (word >> 16) & 0xFFFF;
    if small_size != 0 && small_size <= 4 {
        return Ok((word & 0xFFFF, small_size as usize, 4));
    }
    if offset + 8 > buf.len() {
        return Err(PipelineError::Parse("truncated MAT element tag".into()));
    }
    Ok((word, mat_u32(buf, offset + 4, be) as usize, 8))
}

/// Decode one miMATRIX element. Returns `None` for anything that is not a
/// plain 2-D real numeric matrix; the caller keeps scanning.
fn mat_matrix(buf: &[u8], be: bool) -> Option<(String, usize, usize, Vec<f64>)> {
    let mut name = String::new();
    let mut dims: Vec<usize> = Vec::new();
    let mut data: Vec<f64> = Vec::new();
    let mut complex = false;
    let mut seen_flags = false;

    let mut offset = 0;
    while offset + 4 <= buf.len() {
        let (sub_type, sub_size, tag_size) = mat_tag(buf, offset, be).ok()?;
        let start = offset + tag_size;
        let end = (start + sub_size).min(buf.len());
        match sub_type {
            // Array flags: first word carries class and flag bits.
            MI_UINT32 if !seen_flags && sub_size == 8 => {
                seen_flags = true;
                if start + 4 <= buf.len() {
                    complex = mat_u32(buf, start, be) & MX_COMPLEX_FLAG != 0;
                }
            }
            MI_INT32 if dims.is_empty() => {
                for i in 0..sub_size / 4 {
                    dims.push(mat_u32(buf, start + i * 4, be) as usize);
                }
            }
            MI_INT8 if name.is_empty() => {
                name = String::from_utf8_lossy(&buf[start..end])
                    .trim_end_matches('\0')
                    .to_string();
            }
            MI_DOUBLE if data.is_empty() => {
                for i in 0..sub_size / 8 {
                    let p = start + i * 8;
                    if p + 8 <= buf.len() {
                        data.push(mat_f64(buf, p, be));
                    }
                }
            }
            MI_SINGLE if data.is_empty() => {
                for i in 0..sub_size / 4 {
                    let p = start + i * 4;
                    if p + 4 <= buf.len() {
                        data.push(mat_f32(buf, p, be) as f64);
                    }
                }
            }
            _ => {}
        }
        offset = (end + 7) & !7;
    }

    // Only a real 2-D matrix with a consistent element count qualifies.
    if complex || dims.len() != 2 {
        return None;
    }
    let (n_rows, n_cols) = (dims[0], dims[1]);
    if n_rows == 0 || n_cols == 0 || data.len() != n_rows * n_cols {
        return None;
    }
    Some((name, n_rows, n_cols, data))
}

fn mat_u32(buf: &[u8], offset: usize, be: bool) -> u32 {
    let bytes = [buf[offset], buf[offset + 1], buf[offset + 2], buf[offset + 3]];
    if be {
        u32::from_be_bytes(bytes)
    } else {
        u32::from_le_bytes(bytes)
    }
}

fn mat_f32(buf: &[u8], offset: usize, be: bool) -> f32 {
    let bytes = [buf[offset], buf[offset + 1], buf[offset + 2], buf[offset + 3]];
    if be {
        f32::from_be_bytes(bytes)
    } else {
        f32::from_le_bytes(bytes)
    }
}

fn mat_f64(buf: &[u8], offset: usize, be: bool) -> f64 {
    let bytes: [u8; 8] = buf[offset..offset + 8].try_into().unwrap_or([0; 8]);
    if be {
        f64::from_be_bytes(bytes)
    } else {
        f64::from_le_bytes(bytes)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
