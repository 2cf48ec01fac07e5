#![cfg(not(tarpaulin_include))]

use crate::error::CliError;
use bytesize::ByteSize;
use core::fmt;
use lightweight_mmap::handles::*;
use lightweight_mmap::mmap::*;
use std::fs;
use std::path::*;
use texture_preview_common::{validate::DecodeLimits, DecodeError, DecodeResult};
use texture_preview_formats::ContainerContext;
use texture_preview_pixels::{
    descriptor::PackedLayout,
    palette::{Palette, PaletteStore, MAX_PALETTE_ENTRIES},
    DecodeContext, PaletteSource,
};

/// Recursively visits directories and collects entries.
///
/// Directories or entries that cannot be read are skipped. A file passed as `dir` is
/// collected on its own.
pub fn find_all_files(dir: &Path, entries: &mut Vec<PathBuf>) -> std::io::Result<()> {
    if dir.is_file() {
        entries.push(dir.to_path_buf());
        return Ok(());
    }

    // Gracefully handle cases where the directory cannot be read
    let dir_entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Ok(()),
    };

    for entry in dir_entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(_) => continue, // Skip problematic entries, e.g. those without access.
        };

        let path = entry.path();
        if path.is_dir() {
            find_all_files(&path, entries)?;
        } else {
            entries.push(path);
        }
    }
    Ok(())
}

/// Canonicalizes a CLI path argument, creating the directory if it doesn't exist.
pub fn canonicalize_cli_path(value: &str) -> Result<PathBuf, String> {
    let path = Path::new(value);
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| format!("Failed to create directory: {e}"))?;
    }
    fs::canonicalize(path).map_err(|e| format!("Invalid path: {e}"))
}

/// Canonicalizes a CLI path argument that must already exist.
pub fn existing_cli_path(value: &str) -> Result<PathBuf, String> {
    fs::canonicalize(value).map_err(|e| format!("Invalid path {value}: {e}"))
}

/// Parses a packed layout name such as `RGBA8888`.
pub fn parse_packed_layout(value: &str) -> Result<PackedLayout, String> {
    PackedLayout::by_name(value).ok_or_else(|| {
        let names: Vec<_> = PackedLayout::ALL.iter().map(|layout| layout.name).collect();
        format!("Unknown layout: {value}. Valid layouts: {}", names.join(", "))
    })
}

/// Memory maps `path` read-only and runs `f` over its contents.
pub fn with_mapped_file<T>(
    path: &Path,
    f: impl FnOnce(&[u8]) -> Result<T, CliError>,
) -> Result<T, CliError> {
    let mmap_error = |message: String| CliError::Mmap {
        path: path.display().to_string(),
        message,
    };

    let path_str = path
        .to_str()
        .ok_or_else(|| mmap_error("path is not valid UTF-8".into()))?;
    let handle = ReadOnlyFileHandle::open(path_str).map_err(|e| mmap_error(e.to_string()))?;
    let size = handle.size().map_err(|e| mmap_error(e.to_string()))? as usize;
    if size == 0 {
        return f(&[]);
    }
    let mapping = ReadOnlyMmap::new(&handle, 0, size).map_err(|e| mmap_error(e.to_string()))?;
    f(mapping.as_slice())
}

/// The entry name a file is known by inside the scanned tree, with `/` separators.
pub fn entry_name(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let relative = if relative.as_os_str().is_empty() {
        path.file_name().map(Path::new).unwrap_or(path)
    } else {
        relative
    };
    relative.to_string_lossy().replace('\\', "/")
}

/// Handles errors from processing a single file by printing to stderr.
pub fn handle_process_entry_error(result: Result<(), CliError>) {
    if let Err(e) = result {
        eprintln!("{e}");
    }
}

/// Options shared by every command that decodes.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    pub container: Option<String>,
    pub max_dimension: Option<u32>,
    pub palette: Option<PathBuf>,
    pub palette_layout: PackedLayout,
}

impl DecodeOptions {
    /// The container context for a file named `name` within the scanned tree.
    pub fn container_context(&self, name: &str) -> ContainerContext {
        let ctx = ContainerContext::from_name(name);
        match &self.container {
            Some(container) => ctx.with_container(container),
            None => ctx,
        }
    }

    /// A fresh decode context for one file.
    pub fn decode_context(&self) -> DecodeContext {
        let mut limits = DecodeLimits::default();
        if let Some(max_dimension) = self.max_dimension {
            limits = limits.with_max_dimension(max_dimension);
        }

        let ctx = DecodeContext::new().with_limits(limits);
        match &self.palette {
            Some(path) => ctx.with_palette_source(PaletteFile {
                path: path.clone(),
                layout: self.palette_layout,
            }),
            None => ctx,
        }
    }
}

/// A file holding back to back 256 entry palette tables.
///
/// Read only when a paletted image needs a palette the image itself does not carry.
pub struct PaletteFile {
    path: PathBuf,
    layout: PackedLayout,
}

impl PaletteSource for PaletteFile {
    fn load_palettes(&mut self, store: &mut PaletteStore) -> DecodeResult<()> {
        let layout = self.layout;
        let loaded = with_mapped_file(&self.path, |data| {
            let table_size = MAX_PALETTE_ENTRIES * layout.bytes_per_pixel as usize;
            let mut palettes = Vec::new();
            for table in data.chunks(table_size) {
                let count = table.len() / layout.bytes_per_pixel as usize;
                if count == 0 {
                    break;
                }
                palettes.push(Palette::from_packed(table, layout, count));
            }
            Ok(palettes)
        });

        let palettes = loaded.map_err(|e| DecodeError::Codec {
            format: "palette file",
            detail: e.to_string(),
        })?;
        for palette in palettes {
            store.add_palette(palette?);
        }
        Ok(())
    }
}

/// Bytes per second, printed human readable.
#[derive(Debug, Clone, Copy)]
pub struct Throughput(u64);

impl Throughput {
    pub fn from_elapsed(bytes: u64, elapsed: std::time::Duration) -> Self {
        let seconds = elapsed.as_secs_f64();
        if seconds > 0.0 {
            Self((bytes as f64 / seconds) as u64)
        } else {
            Self(0)
        }
    }
}

impl fmt::Display for Throughput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/s", ByteSize(self.0))
    }
}
