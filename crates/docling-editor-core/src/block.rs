//! Content blocks and the annotation payload that holds them
//!
//! A [`Block`] keeps its `type` as the raw string found in the data. The
//! closed [`BlockType`] classification is derived on demand through
//! [`Block::kind`], so blocks with tags this crate does not know about load,
//! edit and save without loss.
//!
//! Both [`Block`] and [`DoclingData`] carry a flattened `extra` map. Keys the
//! editor does not model are kept there verbatim and written back out on save.

use crate::error::EditorError;
use crate::geometry::BBox;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Block types the editor offers type-specific treatment for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    /// Generic text (default)
    #[default]
    Text,
    /// Document or section title
    Title,
    /// Heading
    Heading,
    /// Paragraph
    Paragraph,
    /// List
    List,
    /// Table
    Table,
    /// Figure/image
    Figure,
    /// Caption (for tables, figures)
    Caption,
    /// Formula/equation
    Formula,
    /// Footnote
    Footnote,
    /// Page header
    PageHeader,
    /// Page footer
    PageFooter,
    /// Code block
    Code,
}

impl BlockType {
    /// All block types, in the order the editor lists them.
    pub const ALL: [Self; 13] = [
        Self::Text,
        Self::Title,
        Self::Heading,
        Self::Paragraph,
        Self::List,
        Self::Table,
        Self::Figure,
        Self::Caption,
        Self::Formula,
        Self::Footnote,
        Self::PageHeader,
        Self::PageFooter,
        Self::Code,
    ];

    /// Returns the tag used for this type in block JSON.
    #[inline]
    #[must_use = "returns the JSON tag of the block type"]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Title => "title",
            Self::Heading => "heading",
            Self::Paragraph => "paragraph",
            Self::List => "list",
            Self::Table => "table",
            Self::Figure => "figure",
            Self::Caption => "caption",
            Self::Formula => "formula",
            Self::Footnote => "footnote",
            Self::PageHeader => "page_header",
            Self::PageFooter => "page_footer",
            Self::Code => "code",
        }
    }

    /// Returns the human-readable label shown in the legend.
    #[inline]
    #[must_use = "returns the display label of the block type"]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Title => "Title",
            Self::Heading => "Heading",
            Self::Paragraph => "Paragraph",
            Self::List => "List",
            Self::Table => "Table",
            Self::Figure => "Figure",
            Self::Caption => "Caption",
            Self::Formula => "Formula",
            Self::Footnote => "Footnote",
            Self::PageHeader => "Page Header",
            Self::PageFooter => "Page Footer",
            Self::Code => "Code",
        }
    }

    /// Returns the type whose tag equals `tag` exactly.
    ///
    /// Matching is case-sensitive: `"Table"` is not a known type.
    #[must_use = "returns the matching block type, if any"]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }
}

impl std::fmt::Display for BlockType {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BlockType {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| EditorError::UnknownBlockType(s.to_string()))
    }
}

/// Returns true if `candidate` is exactly one of the [`BlockType`] tags.
///
/// Blocks failing this check are still valid blocks; they just do not get
/// type-specific UI.
#[inline]
#[must_use = "returns whether the string is a known block type"]
pub fn is_known_type(candidate: &str) -> bool {
    BlockType::from_tag(candidate).is_some()
}

/// Classification of a block's raw `type` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind<'a> {
    /// The tag is one of the fixed block types
    Known(BlockType),
    /// Any other tag, as found in the data
    Unrecognized(&'a str),
}

impl BlockKind<'_> {
    /// Returns the known type, if any.
    #[inline]
    #[must_use = "returns the known block type, if any"]
    pub const fn known(self) -> Option<BlockType> {
        match self {
            Self::Known(kind) => Some(kind),
            Self::Unrecognized(_) => None,
        }
    }
}

/// A single content block on a page (paragraph, heading, table, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Raw type tag; see [`Block::kind`] for the classified form
    #[serde(rename = "type")]
    pub block_type: String,
    /// Text content of the block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Bounding box on the page image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BBox>,
    /// Additional properties, preserved verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Block {
    /// Creates a block of the given type with empty text and
    /// [`BBox::default_block`].
    #[must_use = "creates a new empty Block"]
    pub fn empty(block_type: BlockType) -> Self {
        Self {
            block_type: block_type.as_str().to_string(),
            text: Some(String::new()),
            bbox: Some(BBox::default_block()),
            extra: Map::new(),
        }
    }

    /// Classifies the raw type tag.
    #[must_use = "returns the classification of the block type"]
    pub fn kind(&self) -> BlockKind<'_> {
        BlockType::from_tag(&self.block_type)
            .map_or(BlockKind::Unrecognized(self.block_type.as_str()), BlockKind::Known)
    }

    /// Changes the block's type, leaving every other field untouched.
    pub fn set_type(&mut self, block_type: BlockType) {
        self.block_type = block_type.as_str().to_string();
    }

    /// Returns the block text, or `""` when absent.
    #[inline]
    #[must_use = "returns the text of the block"]
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    /// Returns true if the block has a bounding box that passes
    /// [`BBox::is_valid`].
    #[inline]
    #[must_use = "returns whether the block has a valid bounding box"]
    pub fn has_valid_bbox(&self) -> bool {
        self.bbox.as_ref().is_some_and(BBox::is_valid)
    }
}

/// Creates an empty `text` block; see [`Block::empty`].
#[inline]
#[must_use = "creates a new empty Block"]
pub fn empty_block() -> Block {
    Block::empty(BlockType::default())
}

/// Annotation payload of a page: ordered blocks plus open metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DoclingData {
    /// Content blocks in reading/draw order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Vec<Block>>,
    /// Additional Docling metadata, preserved verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DoclingData {
    /// Creates a payload holding `blocks`.
    #[must_use = "creates a new DoclingData with blocks"]
    pub fn with_blocks(blocks: Vec<Block>) -> Self {
        Self {
            blocks: Some(blocks),
            extra: Map::new(),
        }
    }

    /// Returns the blocks, or an empty slice when the payload has none.
    #[inline]
    #[must_use = "returns the blocks of the payload"]
    pub fn blocks(&self) -> &[Block] {
        self.blocks.as_deref().unwrap_or_default()
    }

    /// Returns the block list for editing, creating it if absent.
    pub fn blocks_mut(&mut self) -> &mut Vec<Block> {
        self.blocks.get_or_insert_with(Vec::new)
    }
}
