//! Scan output model.
//!
//! [`ScanReport`] is everything a scan produces: the sortedness verdict,
//! the first out-of-order pair (if any), both digests, and the checksum
//! histogram partitioned by occurrence count.  The struct is plain data
//! with no side effects behind it, so callers can assert on it directly
//! or serialize it with serde.

use serde::Serialize;

/// Number of leading block bytes shown in disorder previews.
pub const PREVIEW_BYTES: usize = 5;

/// Character budget for the checksum-bucket previews.
pub const PREVIEW_BUDGET: usize = 60;

/// The first out-of-order block pair found during a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Disorder {
    /// Absolute byte offset of the earlier (greater) block.
    pub prev_offset:  u64,
    /// Absolute byte offset of the out-of-order block.
    pub offset:       u64,
    /// Leading bytes of the earlier block, uppercase hex.
    pub prev_preview: String,
    /// Leading bytes of the out-of-order block, uppercase hex.
    pub preview:      String,
}

/// A checksum observed three or more times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepeatedChecksum {
    pub checksum: u32,
    pub count:    u64,
}

/// Complete report produced by [`scan`](crate::scanner::scan).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    /// Size in bytes of each comparison/checksum unit.
    pub block_size:       usize,
    /// Blocks read (the trailing block may be short).
    pub blocks_scanned:   u64,
    /// Bytes read.
    pub bytes_scanned:    u64,
    /// True iff every consecutive block pair read was non-decreasing.
    pub sorted:           bool,
    /// The first out-of-order pair; `None` when `sorted`.
    pub disorder:         Option<Disorder>,
    /// BLAKE3 over the exact concatenation of all blocks read, in order.
    pub file_digest:      [u8; 32],
    /// BLAKE3 over the canonicalized checksum histogram.
    pub histogram_digest: [u8; 32],
    /// Checksums seen exactly once, ascending.
    pub singletons:       Vec<u32>,
    /// Checksums seen exactly twice, ascending.
    pub pairs:            Vec<u32>,
    /// Checksums seen three or more times, ascending.
    pub repeated:         Vec<RepeatedChecksum>,
}

impl ScanReport {
    pub fn file_digest_hex(&self) -> String {
        hex::encode(self.file_digest)
    }

    pub fn histogram_digest_hex(&self) -> String {
        hex::encode(self.histogram_digest)
    }

    /// Distinct checksum values across all buckets.
    pub fn distinct_checksums(&self) -> usize {
        self.singletons.len() + self.pairs.len() + self.repeated.len()
    }

    /// Summary line for display.
    pub fn summary(&self) -> String {
        format!(
            "{} in blocks of {} B: {} block(s) scanned ({:.2} MiB), {} distinct checksum(s)",
            if self.sorted { "Sorted" } else { "Not sorted" },
            self.block_size,
            self.blocks_scanned,
            self.bytes_scanned as f64 / 1024.0 / 1024.0,
            self.distinct_checksums(),
        )
    }
}

/// Uppercase hex rendering of the first [`PREVIEW_BYTES`] of a block,
/// one value per byte, space separated, no zero padding (`0 A 1F FF`).
pub fn hex_preview(block: &[u8]) -> String {
    block
        .iter()
        .take(PREVIEW_BYTES)
        .map(|b| format!("{b:X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Preview of a checksum list, whole entries only, cut at
/// [`PREVIEW_BUDGET`] characters with a trailing `...`.
pub fn checksum_preview(checksums: &[u32]) -> String {
    preview_entries(checksums.iter().map(|c| format!("{c:08X}")))
}

/// Preview of the repeated bucket as `checksum x count` entries.
pub fn repeated_preview(repeated: &[RepeatedChecksum]) -> String {
    preview_entries(
        repeated
            .iter()
            .map(|r| format!("{:08X} x{}", r.checksum, r.count)),
    )
}

fn preview_entries<I>(entries: I) -> String
where
    I: Iterator<Item = String>,
{
    let mut out = String::new();
    for entry in entries {
        let sep = usize::from(!out.is_empty());
        if out.len() + sep + entry.len() > PREVIEW_BUDGET {
            out.push_str(" ...");
            return out;
        }
        if sep == 1 {
            out.push(' ');
        }
        out.push_str(&entry);
    }
    out
}
