use blockscan::report::{checksum_preview, repeated_preview, ScanReport};
use blockscan::scanner::{scan_file, ScanOptions, DEFAULT_BLOCK_SIZE};
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "blockscan", about = "Check that a binary file's fixed-size blocks are sorted")]
struct Cli {
    /// File to check
    input: PathBuf,
    /// Size in bytes of each data block
    #[arg(short, long, default_value_t = DEFAULT_BLOCK_SIZE)]
    block_size: usize,
    /// Keep scanning past the first out-of-order block so the digests cover the whole file
    #[arg(short, long)]
    keep_going: bool,
    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let opts = ScanOptions {
        block_size:           cli.block_size,
        continue_on_disorder: cli.keep_going,
    };
    let report = scan_file(&cli.input, &opts)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&cli.input, &report);
    Ok(())
}

fn print_report(input: &Path, report: &ScanReport) {
    println!("── Block scan ──────────────────────────────────────────");
    println!("  Path             {}", input.display());
    println!("  Block size       {} B", report.block_size);
    println!("  Blocks           {} ({} B)", report.blocks_scanned, report.bytes_scanned);
    println!("  Sorted           {}", if report.sorted { "yes" } else { "no" });
    if let Some(d) = &report.disorder {
        println!("  Block at {} is less than previous one:", d.offset);
        println!("  {:7}: {} ...", d.prev_offset, d.prev_preview);
        println!("  {:7}: {} ...", d.offset, d.preview);
    }
    println!("  File digest      {}", report.file_digest_hex());
    println!("  Histogram digest {}", report.histogram_digest_hex());
    println!("  Singletons ({})   {}", report.singletons.len(), checksum_preview(&report.singletons));
    println!("  Pairs ({})        {}", report.pairs.len(), checksum_preview(&report.pairs));
    println!("  Repeated ({})     {}", report.repeated.len(), repeated_preview(&report.repeated));
    println!();
    println!("{}", report.summary());
}
