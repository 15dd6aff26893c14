//! # Docling Editor Core - Page Annotation Helpers
//!
//! Types and pure helpers behind the Docling page editor: the block model,
//! the block-type color table, bounding-box geometry, and the lookup that
//! finds a page's effective annotation payload.
//!
//! ## Quick Start
//!
//! ```rust
//! use docling_editor_core::{color_for, resolve, PageMetadata};
//! use serde_json::json;
//!
//! let page = json!({
//!     "docling_json": {"blocks": [{"type": "table", "bbox": {"l": 0, "t": 0, "r": 50, "b": 20}}]},
//!     "metadata": {"docling_json_override": {"blocks": []}}
//! });
//!
//! // Raw JSON: the top-level original beats the nested override.
//! let data = resolve(Some(&page)).unwrap();
//! assert_eq!(data["blocks"][0]["type"], "table");
//!
//! // Typed: same precedence, with blocks decoded.
//! let page = PageMetadata::from_value(page).unwrap();
//! let block = &page.effective_blocks()[0];
//! assert!(block.has_valid_bbox());
//! assert_eq!(color_for(&block.block_type), "#F59E0B");
//! ```
//!
//! ## Editing
//!
//! The machine-produced `docling_json` is never edited in place. Edits go
//! through [`PageMetadata::override_mut`], which creates the
//! `docling_json_override` from a copy of the resolved payload on first use:
//!
//! ```rust
//! use docling_editor_core::{Block, BlockType, DoclingData, PageMetadata};
//!
//! let mut page = PageMetadata {
//!     docling_json: Some(DoclingData::with_blocks(vec![Block::empty(BlockType::Text)])),
//!     ..PageMetadata::default()
//! };
//!
//! page.override_mut().blocks_mut()[0].set_type(BlockType::Heading);
//!
//! assert_eq!(page.docling_json.as_ref().unwrap().blocks()[0].block_type, "text");
//! assert_eq!(page.effective_blocks()[0].block_type, "heading");
//! ```
//!
//! ## Module Organization
//!
//! - [`block`] - `Block`, `BlockType`, `DoclingData`, block factory
//! - [`colors`] - color table, legend, RGB parsing
//! - [`geometry`] - `BBox` validation, dimensions, hit testing
//! - [`metadata`] - payload resolution and override editing
//! - [`error`] - error types for the parsing edges
//!
//! ## Error Handling
//!
//! Lookups, validation and geometry never fail: absence is `None` or
//! `false`, and unknown block types are accepted. Only parsing returns
//! [`Result<T, EditorError>`](error::EditorError).

pub mod block;
pub mod colors;
pub mod error;
pub mod geometry;
pub mod metadata;

// Re-exports for convenience
pub use block::*;
pub use colors::*;
pub use error::*;
pub use geometry::*;
pub use metadata::*;
