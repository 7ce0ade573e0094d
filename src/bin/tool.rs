//! cachebuf Tool Binary
//!
//! Writes, reads back and verifies files of fixed-size records
//! `[small-int sequence][payload]`.

use std::path::{Path, PathBuf};

use cachebuf::codec::SMALL_INT_SIZE;
use cachebuf::config::{DEFAULT_READ_BUFFER_SIZE, DEFAULT_WRITE_BUFFER_SIZE};
use cachebuf::{checksum_file, CacheIoError, ReadBufferPartial, Result, WriteBuffer};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

/// cachebuf Tool
#[derive(Parser, Debug)]
#[command(name = "cachebuf-tool")]
#[command(about = "Write, read and verify buffered cache record files")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a file of numbered records
    Write {
        /// Output file (its directory must exist)
        #[arg(short, long)]
        path: PathBuf,

        /// Number of records
        #[arg(short, long, default_value = "1000")]
        count: usize,

        /// Payload bytes per record
        #[arg(short = 's', long, default_value = "101")]
        payload_size: usize,

        /// Write buffer capacity in bytes
        #[arg(short, long, default_value_t = DEFAULT_WRITE_BUFFER_SIZE)]
        buffer_size: usize,
    },

    /// Seek to one record and print it
    Read {
        #[arg(short, long)]
        path: PathBuf,

        /// Payload bytes per record
        #[arg(short = 's', long, default_value = "101")]
        payload_size: usize,

        /// Record index
        #[arg(short, long)]
        index: usize,

        /// Read window capacity in bytes
        #[arg(short, long, default_value_t = DEFAULT_READ_BUFFER_SIZE)]
        buffer_size: usize,
    },

    /// Read every record back and check it
    Verify {
        #[arg(short, long)]
        path: PathBuf,

        /// Expected number of records
        #[arg(short, long, default_value = "1000")]
        count: usize,

        /// Payload bytes per record
        #[arg(short = 's', long, default_value = "101")]
        payload_size: usize,

        /// Read window capacity in bytes
        #[arg(short, long, default_value_t = DEFAULT_READ_BUFFER_SIZE)]
        buffer_size: usize,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cachebuf=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();
    tracing::info!("cachebuf tool v{}", cachebuf::VERSION);

    let outcome = match args.command {
        Commands::Write {
            path,
            count,
            payload_size,
            buffer_size,
        } => write_records(&path, count, payload_size, buffer_size).map(|_| true),
        Commands::Read {
            path,
            payload_size,
            index,
            buffer_size,
        } => read_record(&path, payload_size, index, buffer_size).map(|_| true),
        Commands::Verify {
            path,
            count,
            payload_size,
            buffer_size,
        } => verify_records(&path, count, payload_size, buffer_size),
    };

    match outcome {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    }
}

/// Deterministic payload for record `index`
fn payload(index: usize, size: usize) -> Vec<u8> {
    (0..size)
        .map(|j| index.wrapping_mul(31).wrapping_add(j) as u8)
        .collect()
}

/// Byte offset of record `index`, or None when it does not fit an i64
fn record_offset(index: usize, payload_size: usize) -> Option<i64> {
    let record_size = payload_size.checked_add(SMALL_INT_SIZE)?;
    let offset = index.checked_mul(record_size)?;
    i64::try_from(offset).ok()
}

fn write_records(path: &Path, count: usize, payload_size: usize, buffer_size: usize) -> Result<()> {
    let mut writer = WriteBuffer::create(path, buffer_size)?;
    for index in 0..count {
        writer.write_small_int(index as u32)?;
        writer.write_bytes(&payload(index, payload_size))?;
    }

    let (written, crc) = (writer.bytes_written(), writer.checksum());
    writer.close()?;

    println!("wrote {} records, {} bytes, crc32 {:08x}", count, written, crc);
    Ok(())
}

fn read_record(path: &Path, payload_size: usize, index: usize, buffer_size: usize) -> Result<()> {
    let mut reader = ReadBufferPartial::open(path, buffer_size)?;
    let offset = record_offset(index, payload_size).ok_or_else(|| CacheIoError::Range {
        path: reader.label().to_string(),
        position: i64::MAX,
        length: reader.len(),
    });

    let result = offset.and_then(|offset| reader.seek(offset)).and_then(|_| {
        let sequence = reader.read_small_int()?;
        let bytes = reader.read_vec(payload_size)?;
        Ok((sequence, bytes))
    });
    reader.close();

    let (sequence, bytes) = result?;
    let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    println!("record {} (seq {}): {}", index, sequence, hex);
    Ok(())
}

fn verify_records(path: &Path, count: usize, payload_size: usize, buffer_size: usize) -> Result<bool> {
    let mut reader = ReadBufferPartial::open(path, buffer_size)?;
    let result = check_all(&mut reader, count, payload_size);
    reader.close();

    let mismatches = result?;
    if mismatches > 0 {
        tracing::error!("{} of {} records did not match", mismatches, count);
        return Ok(false);
    }

    let crc = checksum_file(path, buffer_size)?;
    println!("verified {} records, crc32 {:08x}", count, crc);
    Ok(true)
}

fn check_all(
    reader: &mut ReadBufferPartial<std::fs::File>,
    count: usize,
    payload_size: usize,
) -> Result<usize> {
    let mut mismatches = 0;
    for index in 0..count {
        let sequence = reader.read_small_int()?;
        let bytes = reader.read_vec(payload_size)?;

        if sequence != (index as u32 & 0xFFFF) || bytes != payload(index, payload_size) {
            tracing::warn!("Record {} mismatch (seq {})", index, sequence);
            mismatches += 1;
        }
    }

    match reader.read_byte() {
        Err(e) if e.is_eof() => Ok(mismatches),
        Err(e) => Err(e),
        Ok(_) => {
            tracing::warn!("Trailing data after {} records", count);
            Ok(mismatches + 1)
        }
    }
}
