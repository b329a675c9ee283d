//! Executes one configured run against the file system.
//!
//! Output files are staged in a temporary file next to the destination and
//! renamed into place only once the bytes are complete and (for decode)
//! verified, so a failed run never leaves a partial output behind.

use crate::config::{Config, Mode};
use crate::input_gen::generate_sample_data;
use hecodec_core::stats::CodecStats;
use hecodec_core::{decode, encode, Digest, Error, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Exit status for usage and I/O errors.
pub const EXIT_FAILURE: i32 = 1;

/// Exit status for corrupt or unparseable streams.
pub const EXIT_INVALID_STREAM: i32 = 2;

/// What a successful run produced.
#[derive(Debug)]
pub enum Outcome {
    Encoded {
        output: PathBuf,
        digest: Digest,
        stats: CodecStats,
    },
    Decoded {
        output: PathBuf,
        digest: Digest,
        stats: CodecStats,
    },
    Generated {
        output: PathBuf,
        bytes: usize,
    },
}

/// Run the configured operation.
pub fn run(config: &Config) -> Result<Outcome> {
    let output = config.output_path();
    if output == config.input {
        return Err(Error::Config(format!(
            "output path {} is the input path",
            output.display()
        )));
    }

    match &config.mode {
        Mode::Encode => {
            let raw = fs::read(&config.input)?;
            log::info!("encoding {} ({} bytes)", config.input.display(), raw.len());
            let encoded = encode(&raw)?;
            write_atomic(&output, &encoded.bytes, config.force)?;
            Ok(Outcome::Encoded {
                output,
                digest: encoded.digest,
                stats: encoded.stats,
            })
        }
        Mode::Decode => {
            let stream = fs::read(&config.input)?;
            log::info!("decoding {} ({} bytes)", config.input.display(), stream.len());
            let decoded = decode(&stream)?;
            write_atomic(&output, &decoded.bytes, config.force)?;
            Ok(Outcome::Decoded {
                output,
                digest: decoded.digest,
                stats: decoded.stats,
            })
        }
        Mode::Generate { size, seed } => {
            let data = generate_sample_data(*seed, *size);
            write_atomic(&output, &data, config.force)?;
            log::info!("generated {} bytes with seed {}", data.len(), seed);
            Ok(Outcome::Generated {
                output,
                bytes: data.len(),
            })
        }
    }
}

/// Exit status to report for a failed run.
pub fn exit_code(err: &Error) -> i32 {
    if err.is_integrity_failure() || err.is_malformed() {
        EXIT_INVALID_STREAM
    } else {
        EXIT_FAILURE
    }
}

/// Write `bytes` to `path` through a temporary file in the same directory.
fn write_atomic(path: &Path, bytes: &[u8], force: bool) -> Result<()> {
    if !force && path.exists() {
        return Err(Error::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(bytes)?;
    staged.as_file().sync_all()?;

    let persisted = if force {
        staged.persist(path)
    } else {
        staged.persist_noclobber(path)
    };
    persisted.map_err(|e| e.error)?;

    log::debug!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
