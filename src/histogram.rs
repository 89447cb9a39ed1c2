//! Per-block checksum accounting.
//!
//! Every scanned block is reduced to a fast 32-bit CRC; the histogram maps
//! each distinct checksum value to its occurrence count.  Storage order is
//! a `HashMap` and therefore unspecified; every output derived from the
//! histogram goes through [`ChecksumHistogram::canonical_bytes`], which
//! fixes ascending checksum order so digests reproduce across runs.

use crc32fast::Hasher;
use std::collections::HashMap;

/// CRC32 of one block, the fast checksum the histogram is keyed on.
pub fn block_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Occurrence counts per distinct block checksum.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChecksumHistogram {
    counts: HashMap<u32, u64>,
}

/// The histogram split by occurrence count.  All lists ascend by checksum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistogramPartition {
    /// Checksums seen exactly once.
    pub singletons: Vec<u32>,
    /// Checksums seen exactly twice.
    pub pairs:      Vec<u32>,
    /// Checksums seen three or more times, with their counts.
    pub repeated:   Vec<(u32, u64)>,
}

impl ChecksumHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one block with the given checksum.
    pub fn record(&mut self, checksum: u32) {
        *self.counts.entry(checksum).or_insert(0) += 1;
    }

    /// Number of distinct checksum values observed.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Occurrence count for `checksum`; 0 if never observed.
    pub fn count(&self, checksum: u32) -> u64 {
        self.counts.get(&checksum).copied().unwrap_or(0)
    }

    /// Deterministic byte encoding of the histogram: entries in ascending
    /// checksum order, each as little-endian u32 checksum followed by
    /// little-endian u64 count, no delimiters.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut keys: Vec<u32> = self.counts.keys().copied().collect();
        keys.sort_unstable();

        let mut out = Vec::with_capacity(keys.len() * 12);
        for key in keys {
            out.extend_from_slice(&key.to_le_bytes());
            out.extend_from_slice(&self.counts[&key].to_le_bytes());
        }
        out
    }

    /// BLAKE3 over [`canonical_bytes`](Self::canonical_bytes).  Identical
    /// for any block arrival order that yields the same multiset of blocks.
    pub fn digest(&self) -> [u8; 32] {
        blake3::hash(&self.canonical_bytes()).into()
    }

    /// Split into singleton / pair / repeated buckets.
    pub fn partition(&self) -> HistogramPartition {
        let mut singletons = Vec::new();
        let mut pairs      = Vec::new();
        let mut repeated   = Vec::new();

        for (&checksum, &count) in &self.counts {
            match count {
                1 => singletons.push(checksum),
                2 => pairs.push(checksum),
                _ => repeated.push((checksum, count)),
            }
        }
        singletons.sort_unstable();
        pairs.sort_unstable();
        repeated.sort_unstable_by_key(|&(checksum, _)| checksum);

        HistogramPartition { singletons, pairs, repeated }
    }
}
