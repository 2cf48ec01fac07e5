use crate::error::CliError;
use crate::util::{
    canonicalize_cli_path, entry_name, existing_cli_path, find_all_files,
    handle_process_entry_error, parse_packed_layout, with_mapped_file, DecodeOptions, Throughput,
};
use argh::FromArgs;
use bytesize::ByteSize;
use std::{
    path::{Path, PathBuf},
    str::FromStr,
    sync::atomic::{AtomicU64, Ordering},
    time::Instant,
};
use texture_preview_common::raster::RasterImage;
use texture_preview_formats::{preview, FormatRegistry};
use texture_preview_pixels::{
    descriptor::PackedLayout,
    transform::{premultiply_or_strip_alpha, strip_alpha_if_fully_opaque, AlphaMode},
};
use tracing::debug;

#[derive(FromArgs, Debug)]
/// Decode every recognised file and write its frames as PNG
#[argh(subcommand, name = "preview")]
pub struct PreviewCmd {
    /// input file or directory path
    #[argh(option, from_str_fn(existing_cli_path))]
    pub input: PathBuf,

    /// output directory path
    #[argh(option, from_str_fn(canonicalize_cli_path))]
    pub output: PathBuf,

    /// container type the files were extracted from, e.g. afs
    #[argh(option)]
    pub container: Option<String>,

    /// largest accepted width or height [default: 16384]
    #[argh(option)]
    pub max_dimension: Option<u32>,

    /// palette table file consulted when an image needs an external palette
    #[argh(option, from_str_fn(existing_cli_path))]
    pub palette: Option<PathBuf>,

    /// pixel layout of the palette file entries [default: RGBA8888]
    #[argh(option, from_str_fn(parse_packed_layout), default = "PackedLayout::RGBA8888")]
    pub palette_layout: PackedLayout,

    /// alpha handling: keep, premultiply, strip or auto [default: auto]
    #[argh(option, default = "AlphaOption::Auto")]
    pub alpha: AlphaOption,

    /// write every frame (mip level or picture), not just the first
    #[argh(switch)]
    pub all_frames: bool,
}

/// What to do with alpha before writing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlphaOption {
    /// Apply an [`AlphaMode`]
    Mode(AlphaMode),
    /// Force opaque when alpha is constant
    Auto,
}

impl FromStr for AlphaOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "keep" => Ok(Self::Mode(AlphaMode::Keep)),
            "premultiply" => Ok(Self::Mode(AlphaMode::Premultiply)),
            "strip" => Ok(Self::Mode(AlphaMode::Strip)),
            "auto" => Ok(Self::Auto),
            _ => Err(format!(
                "Unknown alpha mode: {s}. Valid options: keep, premultiply, strip, auto"
            )),
        }
    }
}

pub fn handle_preview_command(cmd: PreviewCmd) -> Result<(), Box<dyn std::error::Error>> {
    let mut entries = Vec::new();
    find_all_files(&cmd.input, &mut entries)?;
    if entries.is_empty() {
        println!("No files found in input path.");
        return Ok(());
    }
    println!("Found {} files to preview\n", entries.len());

    let registry = FormatRegistry::with_builtin_formats();
    let options = DecodeOptions {
        container: cmd.container.clone(),
        max_dimension: cmd.max_dimension,
        palette: cmd.palette.clone(),
        palette_layout: cmd.palette_layout,
    };

    let start = Instant::now();
    let bytes_processed = AtomicU64::new(0);
    let written = AtomicU64::new(0);
    let process = |path: &PathBuf| {
        let result = preview_file(path, &cmd, &registry, &options).map(|(bytes, frames)| {
            bytes_processed.fetch_add(bytes, Ordering::Relaxed);
            written.fetch_add(frames, Ordering::Relaxed);
        });
        handle_process_entry_error(result);
    };

    #[cfg(feature = "multithreaded")]
    {
        use rayon::prelude::*;
        // Files vary wildly in size, so hand out one at a time.
        entries.par_iter().with_max_len(1).for_each(process);
    }
    #[cfg(not(feature = "multithreaded"))]
    entries.iter().for_each(process);

    let elapsed = start.elapsed();
    let total_bytes = bytes_processed.load(Ordering::Relaxed);
    println!("\n=== Preview Complete ===");
    println!("Frames written: {}", written.load(Ordering::Relaxed));
    println!("Time taken: {elapsed:.2?}");
    println!("Data processed: {}", ByteSize(total_bytes));
    println!("Throughput: {}", Throughput::from_elapsed(total_bytes, elapsed));
    Ok(())
}

/// Decodes one file and writes its frames. Returns the file size and frame count.
fn preview_file(
    path: &Path,
    cmd: &PreviewCmd,
    registry: &FormatRegistry,
    options: &DecodeOptions,
) -> Result<(u64, u64), CliError> {
    let name = entry_name(path, &cmd.input);
    let container = options.container_context(&name);
    // One context per file; palettes never leak between files.
    let mut ctx = options.decode_context();

    let (format, frames, size) = with_mapped_file(path, |data| {
        let decoded = preview(registry, data, &container, &mut ctx)
            .ok_or_else(|| CliError::Unrecognised(name.clone()))?;
        Ok((decoded.format, decoded.frames, data.len() as u64))
    })?;
    debug!(name = %name, format, frames = frames.len(), "Decoded file");

    let target = cmd.output.join(&name);
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let count = if cmd.all_frames { frames.len() } else { frames.len().min(1) };
    for (index, mut frame) in frames.into_frames().into_iter().take(count).enumerate() {
        apply_alpha(&mut frame, cmd.alpha);
        let file_name = match index {
            0 => format!("{}.png", target.display()),
            _ => format!("{}.{index}.png", target.display()),
        };
        write_png(frame, &file_name)?;
    }
    println!("{name}: {format}");
    Ok((size, count as u64))
}

fn apply_alpha(frame: &mut RasterImage, alpha: AlphaOption) {
    match alpha {
        AlphaOption::Mode(mode) => premultiply_or_strip_alpha(frame, mode),
        AlphaOption::Auto => {
            strip_alpha_if_fully_opaque(frame);
        }
    }
}

fn write_png(frame: RasterImage, path: &str) -> Result<(), CliError> {
    let (width, height) = (frame.width(), frame.height());
    image::save_buffer(
        path,
        &frame.into_rgba_bytes(),
        width,
        height,
        image::ColorType::Rgba8,
    )
    .map_err(|source| CliError::Image {
        path: path.to_string(),
        source,
    })
}
