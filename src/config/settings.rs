//! Configuration settings for hashpipe
//!
//! Defines the CLI arguments, the runtime configuration derived from them,
//! and the hash algorithm selection shared with the library.

use crate::error::HashPipeError;
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Largest accepted read buffer (1 GiB)
pub const MAX_BUFFER_SIZE: usize = 1024 * 1024 * 1024;

/// hashpipe - copy a stream while hashing it
#[derive(Parser, Debug, Clone)]
#[command(name = "hashpipe")]
#[command(author = "SmartCopy Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Copy a stream and compute its digest in a single pass")]
#[command(long_about = r#"
hashpipe streams INPUT to OUTPUT and hashes every byte on the way through,
without holding the payload in memory.

Examples:
  hashpipe big.iso -o /mnt/backup/big.iso           # Copy and print XXHash3
  cat body.json | hashpipe -a sha256                 # Hash stdin, discard data
  hashpipe in.bin -o - -a blake3 | gzip > in.bin.gz  # Hash while piping on
  hashpipe in.bin -o out.bin --expect sha256:9f86d0...  # Verify while copying
"#)]
pub struct CliArgs {
    /// Input path ('-' or omitted for stdin)
    #[arg(value_name = "INPUT")]
    pub input: Option<String>,

    /// Output path ('-' for stdout, omitted to discard the data)
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output: Option<String>,

    /// Hash algorithm [default: xxhash3]
    #[arg(short = 'a', long, value_enum, value_name = "ALGO", env = "HASHPIPE_ALGORITHM")]
    pub algorithm: Option<HashAlgorithm>,

    /// Buffer size for each read (e.g., 64K, 1M)
    #[arg(short = 'b', long, default_value = "64K", value_name = "SIZE")]
    pub buffer_size: String,

    /// Expected digest as hex, optionally prefixed with 'ALGO:'
    #[arg(long, value_name = "DIGEST")]
    pub expect: Option<String>,

    /// Output format for the report
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress the report)
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

/// Hash algorithm used by an accumulator
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// XXHash3 - Ultra fast, non-cryptographic (128-bit)
    #[default]
    #[value(name = "xxhash3")]
    XXHash3,
    /// XXHash64 - Fast, non-cryptographic (64-bit)
    #[value(name = "xxhash64")]
    XXHash64,
    /// BLAKE3 - Fast and cryptographically secure
    #[value(name = "blake3")]
    Blake3,
    /// SHA-256 - Standard cryptographic hash
    #[value(name = "sha256")]
    Sha256,
    /// SHA-512 - Standard cryptographic hash, wider output
    #[value(name = "sha512")]
    Sha512,
}

impl HashAlgorithm {
    /// All supported algorithms, fastest first
    pub const ALL: [HashAlgorithm; 5] = [
        Self::XXHash3,
        Self::XXHash64,
        Self::Blake3,
        Self::Sha256,
        Self::Sha512,
    ];

    /// Get the output size in bytes
    pub fn output_size(&self) -> usize {
        match self {
            Self::XXHash3 => 16,
            Self::XXHash64 => 8,
            Self::Blake3 => 32,
            Self::Sha256 => 32,
            Self::Sha512 => 64,
        }
    }

    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::XXHash3 => "XXHash3",
            Self::XXHash64 => "XXHash64",
            Self::Blake3 => "BLAKE3",
            Self::Sha256 => "SHA-256",
            Self::Sha512 => "SHA-512",
        }
    }

    /// Short identifier, as accepted on the command line
    pub fn id(&self) -> &'static str {
        match self {
            Self::XXHash3 => "xxhash3",
            Self::XXHash64 => "xxhash64",
            Self::Blake3 => "blake3",
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = HashPipeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "");
        Self::ALL
            .into_iter()
            .find(|algo| algo.id() == wanted)
            .ok_or_else(|| HashPipeError::UnsupportedHashAlgorithm(s.to_string()))
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Output format for reports
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON format
    Json,
}

/// Where the payload comes from or goes to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamTarget {
    /// Standard input or output
    Stdio,
    /// A file on disk
    File(PathBuf),
    /// Data is dropped after hashing
    Discard,
}

impl StreamTarget {
    fn from_arg(arg: Option<&str>, missing: StreamTarget) -> Self {
        match arg {
            None => missing,
            Some("-") => StreamTarget::Stdio,
            Some(path) => StreamTarget::File(PathBuf::from(path)),
        }
    }

    /// Label used in logs and reports
    pub fn label(&self) -> String {
        match self {
            Self::Stdio => "-".to_string(),
            Self::File(path) => path.display().to_string(),
            Self::Discard => "(discard)".to_string(),
        }
    }
}

/// Expected digest given on the command line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedDigest {
    /// Algorithm named in an 'ALGO:' prefix, if any
    pub algorithm: Option<HashAlgorithm>,
    /// Lowercase hex digest
    pub hex: String,
}

impl FromStr for ExpectedDigest {
    type Err = HashPipeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (algorithm, hex_part) = match s.split_once(':') {
            Some((algo, rest)) => (Some(algo.parse::<HashAlgorithm>()?), rest),
            None => (None, s),
        };

        let hex_part = hex_part.trim().to_ascii_lowercase();
        if hex_part.is_empty() || hex::decode(&hex_part).is_err() {
            return Err(HashPipeError::config(format!(
                "Expected digest is not valid hex: {}",
                s
            )));
        }

        Ok(Self {
            algorithm,
            hex: hex_part,
        })
    }
}

/// Runtime configuration derived from CLI args
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipeConfig {
    /// Source of the payload
    pub input: StreamTarget,
    /// Destination of the payload
    pub output: StreamTarget,
    /// Hash algorithm
    pub algorithm: HashAlgorithm,
    /// Buffer size in bytes
    pub buffer_size: usize,
    /// Digest the payload must hash to
    pub expect: Option<ExpectedDigest>,
    /// Report format
    pub format: OutputFormat,
    /// Suppress the report
    pub quiet: bool,
}

impl Default for PipeConfig {
    fn default() -> Self {
        Self {
            input: StreamTarget::Stdio,
            output: StreamTarget::Discard,
            algorithm: HashAlgorithm::XXHash3,
            buffer_size: 64 * 1024, // 64KB
            expect: None,
            format: OutputFormat::Text,
            quiet: false,
        }
    }
}

impl PipeConfig {
    /// Create config from CLI arguments
    pub fn from_cli(args: &CliArgs) -> Result<Self, String> {
        let mut config = Self::default();

        config.input = StreamTarget::from_arg(args.input.as_deref(), StreamTarget::Stdio);
        config.output = StreamTarget::from_arg(args.output.as_deref(), StreamTarget::Discard);
        config.algorithm = args.algorithm.unwrap_or_default();
        let buffer_size = parse_size(&args.buffer_size)
            .map_err(|e| format!("Invalid buffer size: {}", e))?;
        if buffer_size == 0 {
            return Err("Invalid buffer size: must be greater than zero".to_string());
        }
        if buffer_size > MAX_BUFFER_SIZE as u64 {
            return Err(format!(
                "Invalid buffer size: {} exceeds the limit of {}",
                args.buffer_size,
                humansize::format_size(MAX_BUFFER_SIZE as u64, humansize::BINARY)
            ));
        }
        config.buffer_size = buffer_size as usize;
        config.format = args.format;
        config.quiet = args.quiet;

        if let Some(expect) = &args.expect {
            let expected: ExpectedDigest = expect.parse().map_err(|e: HashPipeError| e.to_string())?;
            match (args.algorithm, expected.algorithm) {
                (Some(chosen), Some(prefixed)) if chosen != prefixed => {
                    return Err(format!(
                        "Expected digest is {} but --algorithm is {}",
                        prefixed.name(),
                        chosen.name()
                    ));
                }
                (None, Some(prefixed)) => config.algorithm = prefixed,
                _ => {}
            }
            if expected.hex.len() != config.algorithm.output_size() * 2 {
                return Err(format!(
                    "Expected digest has {} hex digits, {} produces {}",
                    expected.hex.len(),
                    config.algorithm.name(),
                    config.algorithm.output_size() * 2
                ));
            }
            config.expect = Some(expected);
        }

        Ok(config)
    }
}

/// Parse human-readable size string to bytes
pub fn parse_size(size: &str) -> Result<u64, String> {
    let size = size.trim().to_uppercase();

    if size.is_empty() {
        return Err("Empty size string".to_string());
    }

    let (num_str, multiplier) = if size.ends_with("GB") || size.ends_with('G') {
        let num = size.trim_end_matches(|c| c == 'G' || c == 'B');
        (num, 1024u64 * 1024 * 1024)
    } else if size.ends_with("MB") || size.ends_with('M') {
        let num = size.trim_end_matches(|c| c == 'M' || c == 'B');
        (num, 1024u64 * 1024)
    } else if size.ends_with("KB") || size.ends_with('K') {
        let num = size.trim_end_matches(|c| c == 'K' || c == 'B');
        (num, 1024u64)
    } else if size.ends_with('B') {
        let num = size.trim_end_matches('B');
        (num, 1u64)
    } else {
        // Assume bytes if no suffix
        (size.as_str(), 1u64)
    };

    let num: f64 = num_str
        .trim()
        .parse()
        .map_err(|_| format!("Invalid number: {}", num_str))?;

    if !num.is_finite() {
        return Err(format!("Size is not a finite number: {}", num_str));
    }

    if num < 0.0 {
        return Err(format!("Negative size: {}", num_str));
    }

    let bytes = num * multiplier as f64;
    if bytes >= u64::MAX as f64 {
        return Err(format!("Size too large: {}", size));
    }

    Ok(bytes as u64)
}
