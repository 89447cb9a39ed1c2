//! Streaming sorted-block scan.
//!
//! # How it works
//!
//! The scanner reads the source forward once in `block_size` chunks and
//! keeps three aggregates as it goes: the sortedness verdict (every
//! consecutive block pair compared byte-wise lexicographic), an incremental
//! BLAKE3 hash over the raw byte stream, and a CRC32-keyed occurrence
//! histogram.  Per-block work is constant; nothing is buffered beyond the
//! current and previous block.
//!
//! The verdict latches: once an out-of-order pair is found the scan records
//! that first pair and never reports a later one.  With
//! `continue_on_disorder` the loop keeps going so both digests still cover
//! the whole file; without it the scan stops at the offending block and the
//! digests cover exactly the blocks read up to and including it.
//!
//! A shorter trailing block is read as-is and still participates in the
//! comparison (a shorter block with a matching prefix sorts less-than) and
//! in both digests.
//!
//! ## Progress
//!
//! `scan()` accepts an optional callback called after every block with
//! `(bytes_scanned, total_bytes_estimate)`.  Pass `None` to disable
//! progress reporting.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::histogram::{block_checksum, ChecksumHistogram};
use crate::report::{hex_preview, Disorder, RepeatedChecksum, ScanReport};

/// Default comparison/checksum unit: 16 bytes.
pub const DEFAULT_BLOCK_SIZE: usize = 16;

/// Read buffer for file-backed scans.
const READ_BUFFER_SIZE: usize = 256 * 1024;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("block size must be a positive integer, got {0}")]
    InvalidBlockSize(usize),
    #[error("cannot read {path}: {source}")]
    FileAccess {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Configuration for [`scan`].
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Size in bytes of each comparison/checksum unit.
    pub block_size:           usize,
    /// Keep scanning past the first out-of-order pair so the digests
    /// cover the whole file.
    pub continue_on_disorder: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            block_size:           DEFAULT_BLOCK_SIZE,
            continue_on_disorder: false,
        }
    }
}

pub type ProgressFn<'a> = dyn FnMut(u64 /*scanned*/, u64 /*total_estimate*/) + 'a;

/// Scan a byte source for sorted fixed-size blocks.
///
/// # Arguments
/// * `reader`         - source consumed from its current position to EOF.
/// * `file_size_hint` - source size (for progress estimation). Pass 0 to skip.
/// * `opts`           - block size and disorder policy.
/// * `progress`       - optional progress callback; called after each block.
///
/// # Returns
/// A [`ScanReport`] for every readable source.  An out-of-order pair is a
/// reported outcome, not an error; only a zero `block_size` or a genuine
/// I/O failure returns `Err`.
pub fn scan<R, F>(
    reader:         &mut R,
    file_size_hint: u64,
    opts:           &ScanOptions,
    mut progress:   Option<&mut F>,
) -> Result<ScanReport, ScanError>
where
    R: Read,
    F: FnMut(u64, u64),
{
    if opts.block_size == 0 {
        return Err(ScanError::InvalidBlockSize(0));
    }
    let block_size = opts.block_size;

    let mut file_hasher = blake3::Hasher::new();
    let mut histogram   = ChecksumHistogram::new();

    let mut prev: Vec<u8> = Vec::with_capacity(block_size);
    let mut cur:  Vec<u8> = Vec::with_capacity(block_size);

    let mut sorted                 = true;
    let mut disorder: Option<Disorder> = None;

    let mut blocks_scanned = 0u64;
    let mut bytes_scanned  = 0u64;
    let mut prev_offset    = 0u64;

    loop {
        let n = read_block(reader, &mut cur, block_size)?;
        if n == 0 {
            break;
        }

        let offset = bytes_scanned;

        // Every block read feeds both aggregates, whatever the verdict.
        file_hasher.update(&cur);
        histogram.record(block_checksum(&cur));
        blocks_scanned += 1;
        bytes_scanned += cur.len() as u64;

        if blocks_scanned > 1 && cur.as_slice() < prev.as_slice() {
            if sorted {
                // First disorder event; later ones are absorbed silently.
                sorted = false;
                disorder = Some(Disorder {
                    prev_offset,
                    offset,
                    prev_preview: hex_preview(&prev),
                    preview:      hex_preview(&cur),
                });
            }
            if !opts.continue_on_disorder {
                break;
            }
        }

        if let Some(ref mut cb) = progress {
            let estimate = if file_size_hint > 0 {
                file_size_hint
            } else {
                bytes_scanned * 2
            };
            cb(bytes_scanned, estimate);
        }

        std::mem::swap(&mut prev, &mut cur);
        prev_offset = offset;
    }

    let partition = histogram.partition();
    Ok(ScanReport {
        block_size,
        blocks_scanned,
        bytes_scanned,
        sorted,
        disorder,
        file_digest: file_hasher.finalize().into(),
        histogram_digest: histogram.digest(),
        singletons: partition.singletons,
        pairs: partition.pairs,
        repeated: partition
            .repeated
            .into_iter()
            .map(|(checksum, count)| RepeatedChecksum { checksum, count })
            .collect(),
    })
}

/// Convenience: scan the file at `path` and return the report.
pub fn scan_file(path: &Path, opts: &ScanOptions) -> Result<ScanReport, ScanError> {
    let file = File::open(path).map_err(|source| ScanError::FileAccess {
        path: path.to_owned(),
        source,
    })?;
    let size = file
        .metadata()
        .map_err(|source| ScanError::FileAccess {
            path: path.to_owned(),
            source,
        })?
        .len();
    let mut reader = BufReader::with_capacity(READ_BUFFER_SIZE, file);
    scan::<_, fn(u64, u64)>(&mut reader, size, opts, None)
}

/// Fill `block` with up to `block_size` bytes, retrying partial reads.
/// Returns the byte count; 0 means end of stream.
fn read_block<R: Read>(reader: &mut R, block: &mut Vec<u8>, block_size: usize) -> io::Result<usize> {
    block.resize(block_size, 0);
    let mut filled = 0usize;
    while filled < block_size {
        let n = reader.read(&mut block[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    block.truncate(filled);
    Ok(filled)
}
