//! Display colors for block-type overlays
//!
//! The color table and the [`BlockType`] enumeration are kept apart on
//! purpose: the table has a synthetic `default` entry that is not a block
//! type, and lookups here are case-insensitive while [`is_known_type`] is
//! not.
//!
//! [`is_known_type`]: crate::block::is_known_type

use crate::block::BlockType;
use crate::error::{EditorError, Result};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// Color used for unknown or missing block types.
pub const DEFAULT_COLOR: &str = "#64748B";

/// Hex color per lowercase type tag, including the `default` fallback.
pub const BLOCK_TYPE_COLORS: &[(&str, &str)] = &[
    ("text", "#3B82F6"),
    ("title", "#8B5CF6"),
    ("heading", "#6366F1"),
    ("paragraph", "#3B82F6"),
    ("list", "#10B981"),
    ("table", "#F59E0B"),
    ("figure", "#EC4899"),
    ("caption", "#14B8A6"),
    ("formula", "#F97316"),
    ("footnote", "#6B7280"),
    ("page_header", "#84CC16"),
    ("page_footer", "#06B6D4"),
    ("code", "#EF4444"),
    ("default", DEFAULT_COLOR),
];

static COLOR_LOOKUP: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| BLOCK_TYPE_COLORS.iter().copied().collect());

/// Returns the hex color for a block type tag, ignoring case.
///
/// Unknown tags get [`DEFAULT_COLOR`]. Since the table contains `default`,
/// the tag `"Default"` resolves to the same color.
#[must_use = "returns the display color of the block type"]
pub fn color_for(block_type: &str) -> &'static str {
    COLOR_LOOKUP
        .get(block_type.to_lowercase().as_str())
        .copied()
        .unwrap_or(DEFAULT_COLOR)
}

/// Legend entry: a block type with its color and display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BlockTypeColor {
    /// Block type
    #[serde(rename = "type")]
    pub block_type: BlockType,
    /// Hex color (`#RRGGBB`)
    pub color: &'static str,
    /// Human-readable label
    pub label: &'static str,
}

/// Returns one legend entry per block type, in [`BlockType::ALL`] order.
#[must_use = "returns the color legend"]
pub fn legend() -> Vec<BlockTypeColor> {
    BlockType::ALL
        .into_iter()
        .map(|block_type| BlockTypeColor {
            block_type,
            color: color_for(block_type.as_str()),
            label: block_type.label(),
        })
        .collect()
}

/// Opaque RGB color, for renderers that need channels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RgbColor {
    /// Red channel (0-255).
    pub r: u8,
    /// Green channel (0-255).
    pub g: u8,
    /// Blue channel (0-255).
    pub b: u8,
}

impl RgbColor {
    /// Create a new color
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses a `#RRGGBB` string (the leading `#` is optional).
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidColor`] if the string is not six hex digits.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(EditorError::InvalidColor(hex.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| EditorError::InvalidColor(hex.to_string()))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Color for a block type tag; see [`color_for`].
    #[must_use = "returns the RGB color of the block type"]
    pub fn for_block_type(block_type: &str) -> Self {
        // Every table entry is well-formed hex.
        Self::from_hex(color_for(block_type)).unwrap_or_default()
    }

    /// Formats as `#RRGGBB` (uppercase).
    #[must_use = "returns the hex representation of the color"]
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}
