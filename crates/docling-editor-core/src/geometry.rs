//! Bounding-box geometry for block overlays
//!
//! Boxes are axis-aligned and stored as left/top/right/bottom in image-pixel
//! (or normalized) coordinates with a top-left origin, so `t < b` for any
//! box with positive height.
//!
//! Nothing here clamps or repairs coordinates. Degenerate, inverted and
//! non-finite boxes are reported by [`BBox::is_valid`]; callers check before
//! relying on [`BBox::dimensions`] or [`BBox::area`].

use crate::block::Block;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

/// JSON keys of the four coordinates, in `l, t, r, b` order.
pub const BBOX_KEYS: [&str; 4] = ["l", "t", "r", "b"];

/// Bounding box in `{l, t, r, b}` form, matching the page metadata JSON.
///
/// Loading never fails. A coordinate that is missing or not a number loads
/// as `NaN`, and a `bbox` that is not an object loads with all four as
/// `NaN`, so [`BBox::is_valid`] reports the box instead of the page failing
/// to parse. While a loaded box is left unchanged it is written back exactly
/// as it was read.
#[derive(Debug, Clone, Default)]
pub struct BBox {
    /// Left edge X coordinate
    pub l: f64,
    /// Top edge Y coordinate
    pub t: f64,
    /// Right edge X coordinate
    pub r: f64,
    /// Bottom edge Y coordinate
    pub b: f64,
    /// Other keys on the box (e.g. `coord_origin`), preserved verbatim
    pub extra: Map<String, Value>,
    /// JSON this box was loaded from
    loaded: Option<Value>,
}

/// Width and height of a [`BBox`].
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BBoxDimensions {
    /// Right minus left
    pub width: f64,
    /// Bottom minus top
    pub height: f64,
}

impl BBox {
    /// Creates a new `BBox` from left, top, right and bottom.
    #[inline]
    #[must_use = "creates a new BBox with coordinates"]
    pub fn new(l: f64, t: f64, r: f64, b: f64) -> Self {
        Self {
            l,
            t,
            r,
            b,
            extra: Map::new(),
            loaded: None,
        }
    }

    /// Box given to newly created blocks: 100 × 100 at the origin.
    #[inline]
    #[must_use = "creates the default box for new blocks"]
    pub fn default_block() -> Self {
        Self::new(0.0, 0.0, 100.0, 100.0)
    }

    /// Builds a box from any JSON value without failing.
    #[must_use = "creates a new BBox from JSON"]
    pub fn from_json(value: Value) -> Self {
        let mut bbox = Self::decode(&value);
        bbox.loaded = Some(value);
        bbox
    }

    fn decode(value: &Value) -> Self {
        let Value::Object(fields) = value else {
            return Self::new(f64::NAN, f64::NAN, f64::NAN, f64::NAN);
        };
        let coord = |key: &str| fields.get(key).and_then(Value::as_f64).unwrap_or(f64::NAN);
        let mut bbox = Self::new(coord("l"), coord("t"), coord("r"), coord("b"));
        bbox.extra = fields
            .iter()
            .filter(|(key, _)| !BBOX_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        bbox
    }

    fn coords(&self) -> [f64; 4] {
        [self.l, self.t, self.r, self.b]
    }

    /// Same coordinates (bitwise, so `NaN` matches `NaN`) and extra keys.
    fn same_as(&self, other: &Self) -> bool {
        self.coords()
            .iter()
            .zip(other.coords())
            .all(|(a, b)| a.to_bits() == b.to_bits())
            && self.extra == other.extra
    }

    /// Returns true if all four coordinates are finite, `l < r` and `t < b`.
    ///
    /// A box with zero width or height is invalid, as is one containing
    /// `NaN` or an infinity.
    #[inline]
    #[must_use = "returns whether the bounding box is valid"]
    pub fn is_valid(&self) -> bool {
        self.l.is_finite()
            && self.t.is_finite()
            && self.r.is_finite()
            && self.b.is_finite()
            && self.l < self.r
            && self.t < self.b
    }

    /// Returns width (`r - l`) and height (`b - t`).
    ///
    /// Defined for any box; an invalid box yields zero, negative or `NaN` values.
    #[inline]
    #[must_use = "returns the dimensions of the bounding box"]
    pub fn dimensions(&self) -> BBoxDimensions {
        BBoxDimensions {
            width: self.r - self.l,
            height: self.b - self.t,
        }
    }

    /// Returns width × height without clamping.
    #[inline]
    #[must_use = "returns the area of the bounding box"]
    pub fn area(&self) -> f64 {
        let BBoxDimensions { width, height } = self.dimensions();
        width * height
    }

    /// Returns true if `(x, y)` lies inside the box, edges included.
    #[inline]
    #[must_use = "returns whether the point lies inside the bounding box"]
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.l && x <= self.r && y >= self.t && y <= self.b
    }
}

impl PartialEq for BBox {
    fn eq(&self, other: &Self) -> bool {
        self.coords() == other.coords() && self.extra == other.extra
    }
}

impl<'de> Deserialize<'de> for BBox {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::from_json)
    }
}

impl Serialize for BBox {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if let Some(loaded) = &self.loaded {
            if self.same_as(&Self::decode(loaded)) {
                return loaded.serialize(serializer);
            }
        }
        // Non-finite coordinates have no JSON form and are left out.
        let mut map = serializer.serialize_map(None)?;
        for (key, coord) in BBOX_KEYS.into_iter().zip(self.coords()) {
            if coord.is_finite() {
                map.serialize_entry(key, &coord)?;
            }
        }
        for (key, value) in &self.extra {
            if !BBOX_KEYS.contains(&key.as_str()) {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

/// Returns the index of the topmost block whose box contains `(x, y)`.
///
/// Blocks are drawn in slice order, so later blocks sit on top and win.
/// Blocks without a box or with an invalid box are never hit.
#[must_use = "returns the index of the block under the point"]
pub fn hit_test(blocks: &[Block], x: f64, y: f64) -> Option<usize> {
    blocks.iter().enumerate().rev().find_map(|(index, block)| {
        let bbox = block.bbox.as_ref()?;
        if !bbox.is_valid() {
            log::trace!("hit test skipping block {index}: invalid bbox {bbox:?}");
            return None;
        }
        bbox.contains_point(x, y).then_some(index)
    })
}
