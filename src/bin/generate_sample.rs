//! Writes a set of deterministic demo recordings, one per supported
//! format, so the pipeline can be exercised without clinical data:
//!
//! * `sample_eeg.csv`          – 4 features, labels 0–3 (full report path)
//! * `sample_single_class.csv` – all label 1 (degenerate warning path)
//! * `sample_recording.edf`    – 2-channel recording (placeholder labels)
//! * `sample_signals.mat`      – one 2-D double matrix (placeholder labels)

use std::io::Write;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use wavemind::pipeline::balance::gauss;

fn main() -> anyhow::Result<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    write_csv("sample_eeg.csv", 30, &mut rng, |i| (i % 4) as i64)?;
    write_csv("sample_single_class.csv", 10, &mut rng, |_| 1)?;
    write_edf("sample_recording.edf", &mut rng)?;
    write_mat("sample_signals.mat", &mut rng)?;

    println!("Wrote sample_eeg.csv, sample_single_class.csv, sample_recording.edf, sample_signals.mat");
    Ok(())
}

/// Synthetic epoch: class-dependent oscillation amplitude plus noise, so
/// the classes are actually separable.
fn epoch(label: i64, t: usize, rng: &mut ChaCha8Rng) -> Vec<f64> {
    let amplitude = 10.0 * (label + 1) as f64;
    (0..4)
        .map(|ch| {
            let phase = (t * 4 + ch) as f64 * 0.35;
            amplitude * phase.sin() + gauss(rng, 0.0, 0.2)
        })
        .collect()
}

fn write_csv(
    name: &str,
    n_rows: usize,
    rng: &mut ChaCha8Rng,
    label_of: impl Fn(usize) -> i64,
) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(name)?;
    writer.write_record(["f0", "f1", "f2", "f3", "label"])?;
    for i in 0..n_rows {
        let label = label_of(i);
        let mut record: Vec<String> = epoch(label, i, rng)
            .iter()
            .map(|v| format!("{v:.4}"))
            .collect();
        record.push(label.to_string());
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

// -- EDF writer --

fn ascii_field(out: &mut Vec<u8>, text: &str, len: usize) {
    let mut bytes = text.as_bytes().to_vec();
    bytes.resize(len, b' ');
    out.extend_from_slice(&bytes);
}

fn write_edf(name: &str, rng: &mut ChaCha8Rng) -> anyhow::Result<()> {
    let channels = ["Fp1", "Fp2"];
    let spr = 16;
    let n_records = 4;
    let ns = channels.len();

    let mut buf = Vec::new();
    ascii_field(&mut buf, "0", 8);
    ascii_field(&mut buf, "demo patient", 80);
    ascii_field(&mut buf, "wavemind demo recording", 80);
    ascii_field(&mut buf, "01.01.24", 8);
    ascii_field(&mut buf, "00.00.00", 8);
    ascii_field(&mut buf, &(256 + ns * 256).to_string(), 8);
    ascii_field(&mut buf, "", 44);
    ascii_field(&mut buf, &n_records.to_string(), 8);
    ascii_field(&mut buf, "1", 8);
    ascii_field(&mut buf, &ns.to_string(), 4);

    for label in channels {
        ascii_field(&mut buf, label, 16);
    }
    for _ in channels {
        ascii_field(&mut buf, "AgAgCl electrode", 80);
    }
    for _ in channels {
        ascii_field(&mut buf, "uV", 8);
    }
    for _ in channels {
        ascii_field(&mut buf, "-250", 8);
    }
    for _ in channels {
        ascii_field(&mut buf, "250", 8);
    }
    for _ in channels {
        ascii_field(&mut buf, "-32768", 8);
    }
    for _ in channels {
        ascii_field(&mut buf, "32767", 8);
    }
    for _ in channels {
        ascii_field(&mut buf, "", 80);
    }
    for _ in channels {
        ascii_field(&mut buf, &spr.to_string(), 8);
    }
    for _ in channels {
        ascii_field(&mut buf, "", 32);
    }

    for r in 0..n_records {
        for ch in 0..ns {
            for s in 0..spr {
                let t = (r * spr + s) as f64 * 0.2 + ch as f64;
                let sample = (8000.0 * t.sin() + gauss(rng, 0.0, 100.0)) as i16;
                buf.extend_from_slice(&sample.to_le_bytes());
            }
        }
    }

    std::fs::File::create(name)?.write_all(&buf)?;
    Ok(())
}

// -- MAT v5 writer --

fn mat_element(data_type: u32, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&data_type.to_le_bytes());
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(payload);
    while out.len() % 8 != 0 {
        out.push(0);
    }
    out
}

fn write_mat(name: &str, rng: &mut ChaCha8Rng) -> anyhow::Result<()> {
    let (n_rows, n_cols) = (16usize, 4usize);
    // Column-major, as MATLAB stores it.
    let mut column_major = Vec::with_capacity(n_rows * n_cols);
    for c in 0..n_cols {
        for r in 0..n_rows {
            let t = (r * n_cols + c) as f64 * 0.3;
            column_major.push(25.0 * t.sin() + gauss(rng, 0.0, 0.5));
        }
    }

    let mut body = Vec::new();
    // Array flags: mxDOUBLE_CLASS = 6, no complex bit.
    let mut flags = 6u32.to_le_bytes().to_vec();
    flags.extend_from_slice(&0u32.to_le_bytes());
    body.extend(mat_element(6, &flags)); // miUINT32
    let dims: Vec<u8> = [n_rows as u32, n_cols as u32]
        .iter()
        .flat_map(|d| d.to_le_bytes())
        .collect();
    body.extend(mat_element(5, &dims)); // miINT32
    body.extend(mat_element(1, b"eeg_signals")); // miINT8 name
    let data: Vec<u8> = column_major.iter().flat_map(|v| v.to_le_bytes()).collect();
    body.extend(mat_element(9, &data)); // miDOUBLE

    let mut buf = Vec::new();
    let mut header = b"MATLAB 5.0 MAT-file, wavemind demo fixture".to_vec();
    header.resize(124, b' ');
    buf.extend_from_slice(&header);
    buf.extend_from_slice(&0x0100u16.to_le_bytes());
    buf.extend_from_slice(b"IM");
    buf.extend(mat_element(14, &body)); // miMATRIX

    std::fs::File::create(name)?.write_all(&buf)?;
    Ok(())
}
