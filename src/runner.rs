//! Runs a configured pipe: open the streams, copy while hashing, report

use crate::config::{OutputFormat, PipeConfig, StreamTarget};
use crate::error::{HashPipeError, IoResultExt, Result};
use crate::pipe::{check_digest, copy_hashed, CopyOutcome};
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};

/// Stream the report is printed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStream {
    /// Standard output
    Stdout,
    /// Standard error, used when stdout carries the payload
    Stderr,
}

impl PipeConfig {
    /// Where the report goes for this configuration
    pub fn report_stream(&self) -> ReportStream {
        if self.output == StreamTarget::Stdio {
            ReportStream::Stderr
        } else {
            ReportStream::Stdout
        }
    }
}

fn open_input(target: &StreamTarget) -> Result<Box<dyn Read>> {
    match target {
        StreamTarget::File(path) => Ok(Box::new(File::open(path).with_path(path)?)),
        StreamTarget::Stdio | StreamTarget::Discard => Ok(Box::new(io::stdin().lock())),
    }
}

fn open_output(target: &StreamTarget) -> Result<Box<dyn Write>> {
    match target {
        StreamTarget::File(path) => Ok(Box::new(BufWriter::new(
            File::create(path).with_path(path)?,
        ))),
        StreamTarget::Stdio => Ok(Box::new(io::stdout().lock())),
        StreamTarget::Discard => Ok(Box::new(io::sink())),
    }
}

/// Copy the configured input to the configured output while hashing it
pub fn execute(config: &PipeConfig) -> Result<CopyOutcome> {
    tracing::info!(
        input = %config.input.label(),
        output = %config.output.label(),
        algorithm = config.algorithm.name(),
        buffer_size = config.buffer_size,
        "starting"
    );

    let reader = open_input(&config.input)?;
    let writer = open_output(&config.output)?;

    copy_hashed(reader, writer, config.algorithm, config.buffer_size).map_err(|e| {
        match &config.input {
            StreamTarget::File(path) => e.with_context(path.display().to_string()),
            _ => e,
        }
    })
}

/// Print the report (unless quiet) and check the expected digest
///
/// The report is written even when the digest does not match, so the
/// actual value is visible next to the error.
pub fn finish(config: &PipeConfig, outcome: &CopyOutcome, out: &mut dyn Write) -> Result<()> {
    if !config.quiet {
        write_report(out, config, outcome)?;
    }

    if let Some(expected) = &config.expect {
        check_digest(&outcome.digest, &expected.hex)?;
        tracing::info!("digest matches");
    }

    Ok(())
}

fn write_report(out: &mut dyn Write, config: &PipeConfig, outcome: &CopyOutcome) -> Result<()> {
    match config.format {
        OutputFormat::Text => {
            writeln!(out, "{}  {}", outcome.digest.hash, config.input.label())?;
            tracing::info!(
                "{} {} in {:.2?} ({:.1} MB/s)",
                config.algorithm.name(),
                humansize::format_size(outcome.bytes_copied, humansize::BINARY),
                outcome.duration,
                outcome.throughput
            );
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(outcome).map_err(HashPipeError::from)?;
            writeln!(out, "{}", json)?;
        }
    }
    out.flush()?;
    Ok(())
}
