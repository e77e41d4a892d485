//! Main entry point for the scanzip CLI application.
//!
//! Every archive named on the command line is scanned front to back. A
//! failure in one entry is logged and the scan moves on; a failure in one
//! archive is logged and the next archive is processed.

mod logger;

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use logger::Logger;
use scanzip::cli::is_http_url;
use scanzip::zip::{Extracted, Extractor, SkipReason};
use scanzip::{Archive, Cli, Entry, HttpRangeReader, LocalFileReader, ReadAt};

/// Running totals for the verbose listing.
#[derive(Default)]
struct Totals {
    uncompressed: u64,
    compressed: u64,
    files: usize,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    Logger::init(cli.log_level())?;

    let mut failed = false;
    for name in &cli.archives {
        match process_archive(name, &cli) {
            Ok(ok) => failed |= !ok,
            Err(e) => {
                log::error!("{name}: {e:#}");
                failed = true;
            }
        }
    }

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Open one archive and process it. Returns `Ok(false)` if some entries
/// failed.
fn process_archive(name: &str, cli: &Cli) -> Result<bool> {
    if is_http_url(name) {
        let reader = Arc::new(HttpRangeReader::new(name.to_string()).with_context(|| name.to_string())?);
        let before = reader.transferred_bytes();
        let ok = process_zip(name, reader.clone(), cli)?;

        // Display network transfer statistics for HTTP sources
        if !cli.is_quiet() {
            let transferred = reader.transferred_bytes() - before;
            eprintln!("\nTotal bytes transferred: {}", format_size(transferred));
        }
        Ok(ok)
    } else {
        let reader = Arc::new(LocalFileReader::new(Path::new(name)).with_context(|| name.to_string())?);
        process_zip(name, reader, cli)
    }
}

fn process_zip<R: ReadAt + 'static>(name: &str, reader: Arc<R>, cli: &Cli) -> Result<bool> {
    if !cli.is_quiet() && !(cli.list || cli.verbose) {
        println!("Archive:  {name}");
    }

    let extractor = Extractor::new(cli.extract_options());
    let mut archive = Archive::new(reader);
    let mut totals = Totals::default();
    let mut ok = true;

    if cli.verbose {
        println!(
            "{:>10}  {:>7}  {:>10}  {:>5}  {:>10}  {:>5}  Name",
            "Length", "Method", "Size", "Cmpr", "Date", "Time"
        );
        println!("{}", "-".repeat(79));
    }

    loop {
        let entry = match archive.next_entry() {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e @ scanzip::Error::Io(_)) => {
                // The source itself failed; nothing more can be read from it.
                log::error!("{name}: {e}");
                ok = false;
                break;
            }
            Err(e) => {
                log::error!("{name}: skipping damaged entry: {e}");
                ok = false;
                continue;
            }
        };

        if cli.is_excluded(entry.name()) {
            continue;
        }

        if cli.verbose {
            list_verbose(&entry, &mut totals);
            continue;
        }
        if cli.list {
            println!("{}", entry.name());
            continue;
        }

        if let Err(e) = extract_entry(&extractor, &entry, cli) {
            log::error!("{}: {e}", entry.name());
            ok = false;
        }
    }

    if cli.verbose {
        print_totals(&totals);
    }

    Ok(ok)
}

fn extract_entry<R: ReadAt + 'static>(
    extractor: &Extractor,
    entry: &Entry<R>,
    cli: &Cli,
) -> scanzip::Result<()> {
    // Pipe mode: write file contents directly to stdout
    if cli.pipe {
        if entry.is_file() {
            let stdout = std::io::stdout();
            let mut stdout = stdout.lock();
            entry.write_to(&mut stdout)?;
            stdout.flush()?;
        }
        return Ok(());
    }

    match extractor.extract(entry)? {
        Extracted::Directory(path) => {
            if !cli.is_quiet() {
                println!("   creating: {}", path.display());
            }
        }
        Extracted::File { path, .. } => {
            if !cli.is_quiet() {
                println!("  extracting: {}", path.display());
            }
        }
        Extracted::Skipped {
            reason: SkipReason::JunkedDirectory,
            ..
        } => {}
        Extracted::Skipped { path, reason } => {
            log::warn!("Skipping: {} ({reason})", path.display());
        }
    }
    Ok(())
}

fn list_verbose<R: ReadAt + 'static>(entry: &Entry<R>, totals: &mut Totals) {
    let header = &entry.header;
    let (year, month, day) = header.mod_date();
    let (hour, minute, _second) = header.mod_time();
    let uncompressed = header.uncompressed_size as u64;
    let compressed = header.compressed_size as u64;

    println!(
        "{:>10}  {:>7}  {:>10}  {}  {:04}-{:02}-{:02}  {:02}:{:02}  {}",
        uncompressed,
        header.method().name(),
        compressed,
        ratio(compressed, uncompressed),
        year,
        month,
        day,
        hour,
        minute,
        header.file_name
    );

    if entry.is_file() {
        totals.uncompressed += uncompressed;
        totals.compressed += compressed;
        totals.files += 1;
    }
}

fn print_totals(totals: &Totals) {
    println!("{}", "-".repeat(79));
    println!(
        "{:>10}  {:>7}  {:>10}  {}  {:>18}  {} files",
        totals.uncompressed,
        "",
        totals.compressed,
        ratio(totals.compressed, totals.uncompressed),
        "",
        totals.files
    );
}

/// Space saved by compression, as a percentage.
fn ratio(compressed: u64, uncompressed: u64) -> String {
    if uncompressed > 0 && compressed <= uncompressed {
        format!("{:>4}%", 100 - (compressed * 100 / uncompressed))
    } else {
        format!("{:>4}%", 0)
    }
}

/// Format a byte size into a human-readable string.
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
