//! Per-block report for the `check` command

use docling_editor_core::{color_for, BBox, Block, BlockKind, DoclingData};
use serde::Serialize;

/// One row of the check report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockReport {
    /// Position in the payload's block list
    pub index: usize,
    /// Raw type tag as found in the data
    #[serde(rename = "type")]
    pub block_type: String,
    /// Whether the tag is one of the fixed block types
    pub known_type: bool,
    /// Overlay color for the tag
    pub color: &'static str,
    /// Bounding box, if the block has one
    pub bbox: Option<BBox>,
    /// Whether the bounding box passes [`BBox::is_valid`]
    pub valid_bbox: bool,
    /// Box width, when the block has a box
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Box height, when the block has a box
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl BlockReport {
    fn new(index: usize, block: &Block) -> Self {
        let dims = block.bbox.as_ref().map(BBox::dimensions);
        Self {
            index,
            block_type: block.block_type.clone(),
            known_type: matches!(block.kind(), BlockKind::Known(_)),
            color: color_for(&block.block_type),
            bbox: block.bbox.clone(),
            valid_bbox: block.has_valid_bbox(),
            width: dims.map(|d| d.width),
            height: dims.map(|d| d.height),
        }
    }
}

/// Block counts for the whole payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Number of blocks
    pub total: usize,
    /// Blocks with one of the fixed type tags
    pub known_types: usize,
    /// Blocks with any other type tag
    pub unrecognized_types: usize,
    /// Blocks without a bounding box
    pub missing_bbox: usize,
    /// Blocks whose bounding box fails validation
    pub invalid_bbox: usize,
}

/// Result of the `check` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckReport {
    /// Field the payload was resolved from, e.g. `metadata.docling_json`
    pub source: String,
    /// One row per block, in payload order
    pub blocks: Vec<BlockReport>,
    /// Counts over `blocks`
    pub summary: Summary,
}

impl CheckReport {
    /// Builds the report for a resolved payload.
    pub fn build(source: String, data: &DoclingData) -> Self {
        let blocks: Vec<BlockReport> = data
            .blocks()
            .iter()
            .enumerate()
            .map(|(index, block)| BlockReport::new(index, block))
            .collect();

        let mut summary = Summary {
            total: blocks.len(),
            ..Summary::default()
        };
        for row in &blocks {
            if row.known_type {
                summary.known_types += 1;
            } else {
                summary.unrecognized_types += 1;
            }
            match &row.bbox {
                None => summary.missing_bbox += 1,
                Some(_) if !row.valid_bbox => summary.invalid_bbox += 1,
                Some(_) => {}
            }
        }

        Self {
            source,
            blocks,
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_report() {
        let data: DoclingData = serde_json::from_value(json!({
            "blocks": [
                {"type": "title", "bbox": {"l": 0, "t": 0, "r": 100, "b": 50}},
                {"type": "Sidebar", "bbox": {"l": 10, "t": 0, "r": 10, "b": 50}},
                {"type": "text"}
            ]
        }))
        .unwrap();

        let report = CheckReport::build("docling_json".to_string(), &data);

        assert_eq!(report.blocks.len(), 3);
        assert_eq!(report.blocks[0].width, Some(100.0));
        assert_eq!(report.blocks[0].height, Some(50.0));
        assert!(report.blocks[0].valid_bbox);
        assert!(!report.blocks[1].known_type);
        assert!(!report.blocks[1].valid_bbox);
        assert_eq!(report.blocks[1].width, Some(0.0));
        assert_eq!(report.blocks[2].width, None);
        assert_eq!(
            report.summary,
            Summary {
                total: 3,
                known_types: 2,
                unrecognized_types: 1,
                missing_bbox: 1,
                invalid_bbox: 1,
            }
        );
    }

    #[test]
    fn test_non_numeric_coordinates_count_as_invalid() {
        let data: DoclingData = serde_json::from_value(json!({
            "blocks": [
                {"type": "text", "bbox": {"l": null, "t": 0, "r": 10, "b": 10}},
                {"type": "table", "bbox": {"l": 0, "t": 0, "r": 10, "b": 10, "coord_origin": "TOPLEFT"}}
            ]
        }))
        .unwrap();

        let report = CheckReport::build("docling_json".to_string(), &data);

        assert!(!report.blocks[0].valid_bbox);
        assert!(report.blocks[1].valid_bbox);
        assert_eq!(report.summary.invalid_bbox, 1);
        assert_eq!(report.summary.missing_bbox, 0);
    }
}
