use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::color::{Color, Palette};
use crate::error::FormatError;
use crate::recolor::TransparentPolicy;

/// Recolor sprites by swapping palette colors slot by slot.
#[derive(Parser, Debug)]
#[command(name = "sprite-recolor", version, about)]
pub struct Args {
    /// Input image: a file path, file:// URL or base64 data: URI
    pub input: String,

    /// Write the recolored PNG here instead of printing a data URL
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Source palette as comma-separated hex colors (repeatable)
    #[arg(long = "from", value_name = "PALETTE", value_parser = parse_palette)]
    pub from: Vec<Palette>,

    /// Destination palette as comma-separated hex colors (repeatable)
    #[arg(long = "to", value_name = "PALETTE", value_parser = parse_palette)]
    pub to: Vec<Palette>,

    /// JSON file with `source` and `target` palette lists
    #[arg(long, value_name = "FILE", conflicts_with_all = ["from", "to"])]
    pub palettes: Option<PathBuf>,

    /// How fully transparent pixels are written
    #[arg(long, value_enum, default_value_t = TransparentMode::ZeroFill)]
    pub transparent: TransparentMode,

    /// Print a colored terminal preview of the palette mapping
    #[arg(long)]
    pub preview: bool,

    /// Copy the input into a read-optimized surface before recoloring
    #[arg(long)]
    pub read_optimized: bool,

    /// Enable debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Disable all logging
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TransparentMode {
    /// Write fully transparent pixels as transparent black
    ZeroFill,
    /// Copy fully transparent pixels unchanged
    Passthrough,
}

impl From<TransparentMode> for TransparentPolicy {
    fn from(mode: TransparentMode) -> Self {
        match mode {
            TransparentMode::ZeroFill => TransparentPolicy::ZeroFill,
            TransparentMode::Passthrough => TransparentPolicy::Passthrough,
        }
    }
}

impl Args {
    /// Resolve the source and target palette lists from flags or `--palettes`.
    pub fn palette_set(&self) -> Result<PaletteSet> {
        let set = match &self.palettes {
            Some(path) => PaletteSet::load(path)?,
            None => PaletteSet {
                source: self.from.clone(),
                target: self.to.clone(),
            },
        };
        set.validate()?;
        Ok(set)
    }
}

/// Source and destination palettes, as stored in a palette file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteSet {
    pub source: Vec<Palette>,
    pub target: Vec<Palette>,
}

impl PaletteSet {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read palette file: {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("invalid palette file: {}", path.display()))
    }

    /// Reject mappings that can never substitute anything.
    fn validate(&self) -> Result<()> {
        let source_len: usize = self.source.iter().map(Vec::len).sum();
        let target_len: usize = self.target.iter().map(Vec::len).sum();
        if source_len != target_len {
            log::warn!(
                "source palettes have {source_len} colors but target palettes have {target_len}; \
                 extra slots are ignored"
            );
        }
        if source_len > 0 && target_len == 0 {
            bail!("source palettes given without any target palette");
        }
        Ok(())
    }
}

/// Parse a comma-separated list of hex colors such as `ff0000,00ff0080`.
pub fn parse_palette(s: &str) -> Result<Palette, FormatError> {
    s.split(',')
        .map(str::trim)
        .filter(|hex| !hex.is_empty())
        .map(Color::from_hex)
        .collect()
}
