use crate::error::CliError;
use crate::util::{
    entry_name, existing_cli_path, find_all_files, handle_process_entry_error, with_mapped_file,
    DecodeOptions, Throughput,
};
use argh::FromArgs;
use bytesize::ByteSize;
use std::{
    path::{Path, PathBuf},
    sync::atomic::{AtomicU64, Ordering},
    time::Instant,
};
use texture_preview_formats::FormatRegistry;
use texture_preview_pixels::descriptor::PackedLayout;

#[derive(FromArgs, Debug)]
/// Print the detected format of every file
#[argh(subcommand, name = "identify")]
pub struct IdentifyCmd {
    /// input file or directory path
    #[argh(option, from_str_fn(existing_cli_path))]
    pub input: PathBuf,

    /// container type the files were extracted from, e.g. afs
    #[argh(option)]
    pub container: Option<String>,

    /// list every matching format with its score, not just the best
    #[argh(switch)]
    pub all: bool,
}

pub fn handle_identify_command(cmd: IdentifyCmd) -> Result<(), Box<dyn std::error::Error>> {
    let mut entries = Vec::new();
    find_all_files(&cmd.input, &mut entries)?;
    if entries.is_empty() {
        println!("No files found in input path.");
        return Ok(());
    }
    println!("Found {} files to identify\n", entries.len());

    let registry = FormatRegistry::with_builtin_formats();
    let options = DecodeOptions {
        container: cmd.container.clone(),
        max_dimension: None,
        palette: None,
        palette_layout: PackedLayout::RGBA8888,
    };

    let start = Instant::now();
    let bytes_processed = AtomicU64::new(0);
    let identified = AtomicU64::new(0);
    let process = |path: &PathBuf| {
        let result = identify_file(path, &cmd, &registry, &options).map(|bytes| {
            bytes_processed.fetch_add(bytes, Ordering::Relaxed);
            identified.fetch_add(1, Ordering::Relaxed);
        });
        handle_process_entry_error(result);
    };

    #[cfg(feature = "multithreaded")]
    {
        use rayon::prelude::*;
        entries.par_iter().for_each(process);
    }
    #[cfg(not(feature = "multithreaded"))]
    entries.iter().for_each(process);

    let elapsed = start.elapsed();
    let total_bytes = bytes_processed.load(Ordering::Relaxed);
    println!("\n=== Identify Complete ===");
    println!(
        "Identified: {} of {}",
        identified.load(Ordering::Relaxed),
        entries.len()
    );
    println!("Time taken: {elapsed:.2?}");
    println!("Data scanned: {}", ByteSize(total_bytes));
    println!("Throughput: {}", Throughput::from_elapsed(total_bytes, elapsed));
    Ok(())
}

/// Identifies one file and returns its size.
fn identify_file(
    path: &Path,
    cmd: &IdentifyCmd,
    registry: &FormatRegistry,
    options: &DecodeOptions,
) -> Result<u64, CliError> {
    let name = entry_name(path, &cmd.input);
    let container = options.container_context(&name);

    with_mapped_file(path, |data| {
        if cmd.all {
            let candidates = registry.identify_all(data, &container);
            if candidates.is_empty() {
                return Err(CliError::Unrecognised(name.clone()));
            }
            let listed: Vec<String> = candidates
                .iter()
                .map(|candidate| format!("{} ({})", candidate.id, candidate.score))
                .collect();
            println!("{name}: {}", listed.join(", "));
        } else {
            let best = registry
                .identify(data, &container)
                .ok_or_else(|| CliError::Unrecognised(name.clone()))?;
            println!("{name}: {} (score {})", best.id, best.score);
        }
        Ok(data.len() as u64)
    })
}
