//! Palette catalog for the raster legend.
//!
//! Every palette has exactly five colour stops, displayed with the labels
//! `Low`, three blanks and `High`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ClimateError;

/// Number of colour stops in every palette.
pub const PALETTE_LEN: usize = 5;

/// Labels shown under the legend swatches.
pub const LEGEND_LABELS: [&str; PALETTE_LEN] = ["Low", "", "", "", "High"];

/// RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `RRGGBB` or `#RRGGBB`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

        Some(Self::new(r, g, b, 255))
    }

    /// Lowercase `rrggbb`, the form the renderer expects.
    pub fn to_hex(&self) -> String {
        format!("{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Named colour scheme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaletteName {
    BlackToRed,
    #[default]
    BlueToGreen,
    Cividis,
    Viridis,
    Blues,
    Reds,
    Turbo,
}

impl PaletteName {
    /// All variants in catalog order.
    pub const ALL: [PaletteName; 7] = [
        PaletteName::BlackToRed,
        PaletteName::BlueToGreen,
        PaletteName::Cividis,
        PaletteName::Viridis,
        PaletteName::Blues,
        PaletteName::Reds,
        PaletteName::Turbo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaletteName::BlackToRed => "black_to_red",
            PaletteName::BlueToGreen => "blue_to_green",
            PaletteName::Cividis => "cividis",
            PaletteName::Viridis => "viridis",
            PaletteName::Blues => "blues",
            PaletteName::Reds => "reds",
            PaletteName::Turbo => "turbo",
        }
    }

    fn hex_stops(&self) -> [&'static str; PALETTE_LEN] {
        match self {
            PaletteName::BlackToRed => ["000000", "005aff", "43c8c8", "fff700", "ff0000"],
            PaletteName::BlueToGreen => ["440154", "414287", "218e8d", "5ac864", "fde725"],
            PaletteName::Cividis => ["00204d", "414d6b", "7c7b78", "b9ac70", "ffea46"],
            PaletteName::Viridis => ["440154", "355e8d", "20928c", "70cf57", "fde725"],
            PaletteName::Blues => ["f7fbff", "c6dbef", "6baed6", "2171b5", "08306b"],
            PaletteName::Reds => ["fff5f0", "fcbba1", "fb6a4a", "cb181d", "67000d"],
            PaletteName::Turbo => ["321543", "2eb4f2", "affa37", "f66c19", "7a0403"],
        }
    }
}

impl fmt::Display for PaletteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaletteName {
    type Err = ClimateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaletteName::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s.to_lowercase())
            .ok_or_else(|| ClimateError::Config(format!("Unknown palette: {}", s)))
    }
}

/// A resolved five-stop palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub name: PaletteName,
    pub colors: [Color; PALETTE_LEN],
}

impl Palette {
    pub fn from_name(name: PaletteName) -> Self {
        let stops = name.hex_stops();
        let mut colors = [Color::new(0, 0, 0, 255); PALETTE_LEN];
        for (slot, hex) in colors.iter_mut().zip(stops) {
            // catalog literals are all well-formed six-digit hex
            if let Some(color) = Color::from_hex(hex) {
                *slot = color;
            }
        }
        Self { name, colors }
    }

    /// Hex strings in stop order.
    pub fn hex_colors(&self) -> Vec<String> {
        self.colors.iter().map(Color::to_hex).collect()
    }

    /// Swatch rows for the legend panel.
    pub fn legend(&self) -> [LegendEntry; PALETTE_LEN] {
        let mut rows = [LegendEntry {
            color: self.colors[0],
            label: "",
        }; PALETTE_LEN];
        for (i, row) in rows.iter_mut().enumerate() {
            row.color = self.colors[i];
            row.label = LEGEND_LABELS[i];
        }
        rows
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_name(PaletteName::default())
    }
}

/// One swatch of the legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub color: Color,
    pub label: &'static str,
}
