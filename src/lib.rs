pub mod histogram;
pub mod report;
pub mod scanner;

pub use histogram::{block_checksum, ChecksumHistogram, HistogramPartition};
pub use report::{Disorder, RepeatedChecksum, ScanReport};
pub use scanner::{scan, scan_file, ScanError, ScanOptions, DEFAULT_BLOCK_SIZE};
