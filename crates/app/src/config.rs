//! Configuration for the hecodec command.
//!
//! Handles parsing command-line arguments and deriving the output path from
//! the input path. The operation is chosen by the input's extension: a `.he`
//! file is decoded, anything else is encoded.

use hecodec_core::EXTENSION;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Default size of a generated sample file.
const DEFAULT_SAMPLE_BYTES: usize = 1 << 20;

/// What a run does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Compress `input` into `input.he`
    Encode,
    /// Restore `input.he` into `input`
    Decode,
    /// Write a deterministic sample file
    Generate { size: usize, seed: u64 },
}

/// Complete configuration for a run.
#[derive(Debug, Clone)]
pub struct Config {
    // === Files ===
    /// File to encode, decode, or generate
    pub input: PathBuf,

    /// Explicit output path (None = derive from input)
    pub output: Option<PathBuf>,

    pub mode: Mode,

    // === Behavior ===
    /// Replace an existing output file
    pub force: bool,

    /// Print the codec statistics summary
    pub print_stats: bool,

    /// Log at debug level
    pub verbose: bool,

    /// Print usage and exit
    pub help: bool,
}

impl Config {
    /// Parse configuration from command-line arguments (program name excluded).
    pub fn from_args(args: &[String]) -> Result<Self, String> {
        let mut input: Option<PathBuf> = None;
        let mut output: Option<PathBuf> = None;
        let mut generate: Option<PathBuf> = None;
        let mut size: Option<usize> = None;
        let mut seed: Option<u64> = None;
        let mut force = false;
        let mut print_stats = false;
        let mut verbose = false;

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--out" | "-o" => {
                    i += 1;
                    let value = args.get(i).ok_or("--out requires a path")?;
                    output = Some(PathBuf::from(value));
                }
                "--generate" => {
                    i += 1;
                    let value = args.get(i).ok_or("--generate requires a path")?;
                    generate = Some(PathBuf::from(value));
                }
                "--size" => {
                    i += 1;
                    let value = args.get(i).ok_or("--size requires a number")?;
                    size = Some(value.parse().map_err(|_| "invalid size")?);
                }
                "--seed" => {
                    i += 1;
                    let value = args.get(i).ok_or("--seed requires a number")?;
                    seed = Some(value.parse().map_err(|_| "invalid seed")?);
                }
                "--force" | "-f" => force = true,
                "--stats" => print_stats = true,
                "--verbose" | "-v" => verbose = true,
                "--help" | "-h" => {
                    return Ok(Self {
                        input: PathBuf::new(),
                        output: None,
                        mode: Mode::Encode,
                        force,
                        print_stats,
                        verbose,
                        help: true,
                    });
                }
                other if other.starts_with('-') && other.len() > 1 => {
                    return Err(format!("unknown argument: {other}"));
                }
                other => {
                    if input.is_some() {
                        return Err(format!("unexpected extra file: {other}"));
                    }
                    input = Some(PathBuf::from(other));
                }
            }
            i += 1;
        }

        let (input, mode) = match (generate, input) {
            (Some(_), Some(file)) => {
                return Err(format!(
                    "--generate cannot be combined with a file to code ({})",
                    file.display()
                ));
            }
            (Some(path), None) => {
                let seed = seed.unwrap_or_else(time_seed);
                let size = size.unwrap_or(DEFAULT_SAMPLE_BYTES);
                (path, Mode::Generate { size, seed })
            }
            (None, Some(file)) => {
                if size.is_some() || seed.is_some() {
                    return Err("--size and --seed only apply to --generate".to_string());
                }
                let mode = if has_codec_extension(&file) {
                    Mode::Decode
                } else {
                    Mode::Encode
                };
                (file, mode)
            }
            (None, None) => return Err("missing file argument".to_string()),
        };

        Ok(Self {
            input,
            output,
            mode,
            force,
            print_stats,
            verbose,
            help: false,
        })
    }

    /// Where the result is written.
    pub fn output_path(&self) -> PathBuf {
        if let Some(path) = &self.output {
            return path.clone();
        }
        match self.mode {
            Mode::Encode => encoded_path(&self.input),
            Mode::Decode => self.input.with_extension(""),
            Mode::Generate { .. } => self.input.clone(),
        }
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        println!("Input:  {}", self.input.display());
        println!("Output: {}", self.output_path().display());
        match &self.mode {
            Mode::Encode => println!("Mode: encode"),
            Mode::Decode => println!("Mode: decode"),
            Mode::Generate { size, seed } => {
                println!("Mode: generate {size} bytes (seed {seed})")
            }
        }
        println!("Overwrite: {}", self.force);
        println!();
    }
}

/// True if `path` ends in the reserved `.he` extension.
pub fn has_codec_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == EXTENSION)
}

/// `path` with `.he` appended (not substituted).
pub fn encoded_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(EXTENSION);
    PathBuf::from(name)
}

fn time_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

pub fn print_help() {
    println!("hecodec: static Huffman compression with digest verification");
    println!();
    println!("USAGE:");
    println!("    hecodec [OPTIONS] <FILE>");
    println!("    hecodec --generate <PATH> [--size <N>] [--seed <N>]");
    println!();
    println!("    A FILE ending in .{EXTENSION} is decoded to the same path without the");
    println!("    extension; any other FILE is encoded to FILE.{EXTENSION}. The MD5 digest");
    println!("    of the raw data is printed on success.");
    println!();
    println!("OPTIONS:");
    println!("    -o, --out <PATH>        Write to PATH instead of the derived name");
    println!("    -f, --force             Overwrite an existing output file");
    println!("        --stats             Print codec statistics");
    println!("    -v, --verbose           Debug logging (RUST_LOG overrides)");
    println!("        --generate <PATH>   Write a sample input file instead of coding");
    println!("        --size <N>          Sample size in bytes (default: {DEFAULT_SAMPLE_BYTES})");
    println!("        --seed <N>          Sample seed (default: time-based)");
    println!("    -h, --help              Print this help");
    println!();
    println!("EXIT STATUS:");
    println!("    0 success, 1 usage or I/O error, 2 corrupt or invalid stream");
    println!();
}
