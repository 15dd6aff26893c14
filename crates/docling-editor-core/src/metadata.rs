//! Locating the annotation payload on a page object
//!
//! A page can carry Docling data in two shapes: flat (`docling_json` and
//! `docling_json_override` on the page itself) or nested under a `metadata`
//! object. Each shape may hold the machine-produced original, the
//! human-edited override, or both.
//!
//! [`resolve`] picks exactly one payload following [`RESOLUTION_ORDER`]:
//!
//! 1. `docling_json_override`
//! 2. `docling_json`
//! 3. `metadata.docling_json_override`
//! 4. `metadata.docling_json`
//!
//! The first present field wins. Payloads are never merged.
//!
//! The order is walked by one generic function over [`AnnotationSource`],
//! which is implemented for raw [`serde_json::Value`] page objects and for
//! the typed [`PageMetadata`].

use crate::block::{Block, DoclingData};
use crate::error::Result;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Field holding the page metadata object in the nested shape.
pub const METADATA_FIELD: &str = "metadata";

/// Where a field sits on the page object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nesting {
    /// Directly on the page object
    TopLevel,
    /// Inside the page's `metadata` object
    Metadata,
}

/// Which of the two payloads a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Human-edited correction (`docling_json_override`)
    Override,
    /// Machine-produced output (`docling_json`)
    Original,
}

impl Variant {
    /// Returns the JSON field name for this variant.
    #[inline]
    #[must_use = "returns the field name of the variant"]
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::Override => "docling_json_override",
            Self::Original => "docling_json",
        }
    }
}

/// One candidate location for the annotation payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DataSource {
    /// Top level or nested under `metadata`
    pub nesting: Nesting,
    /// Override or original
    pub variant: Variant,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.nesting {
            Nesting::TopLevel => f.write_str(self.variant.field_name()),
            Nesting::Metadata => write!(f, "{METADATA_FIELD}.{}", self.variant.field_name()),
        }
    }
}

/// Lookup order used by [`resolve`]. Override beats original at the same
/// nesting level; the top level beats `metadata`.
pub const RESOLUTION_ORDER: [DataSource; 4] = [
    DataSource {
        nesting: Nesting::TopLevel,
        variant: Variant::Override,
    },
    DataSource {
        nesting: Nesting::TopLevel,
        variant: Variant::Original,
    },
    DataSource {
        nesting: Nesting::Metadata,
        variant: Variant::Override,
    },
    DataSource {
        nesting: Nesting::Metadata,
        variant: Variant::Original,
    },
];

/// A page-like object that may hold annotation payloads.
pub trait AnnotationSource {
    /// Payload type returned by the lookup
    type Data;

    /// Returns the payload at `source`, or `None` if that field is absent.
    fn lookup(&self, source: DataSource) -> Option<&Self::Data>;
}

/// Returns the first present payload in [`RESOLUTION_ORDER`], together with
/// where it was found.
#[must_use = "returns the resolved annotation payload and its location"]
pub fn resolve_with_source<P>(page: Option<&P>) -> Option<(DataSource, &P::Data)>
where
    P: AnnotationSource + ?Sized,
{
    let page = page?;
    let found = RESOLUTION_ORDER
        .into_iter()
        .find_map(|source| page.lookup(source).map(|data| (source, data)));
    match &found {
        Some((source, _)) => log::debug!("resolved docling data from {source}"),
        None => log::trace!("page has no docling data"),
    }
    found
}

/// Returns the effective annotation payload of a page, or `None`.
#[inline]
#[must_use = "returns the resolved annotation payload"]
pub fn resolve<P>(page: Option<&P>) -> Option<&P::Data>
where
    P: AnnotationSource + ?Sized,
{
    resolve_with_source(page).map(|(_, data)| data)
}

/// Returns true if [`resolve`] finds a payload.
#[inline]
#[must_use = "returns whether the page has annotation data"]
pub fn has_docling_data<P>(page: Option<&P>) -> bool
where
    P: AnnotationSource + ?Sized,
{
    resolve(page).is_some()
}

/// A JSON field counts as present unless it is `null`, `false`, `0` or `""`.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl AnnotationSource for Value {
    type Data = Value;

    fn lookup(&self, source: DataSource) -> Option<&Value> {
        let container = match source.nesting {
            Nesting::TopLevel => self,
            Nesting::Metadata => self.get(METADATA_FIELD)?,
        };
        container
            .get(source.variant.field_name())
            .filter(|value| is_present(value))
    }
}

/// Typed page object.
///
/// Only the fields the resolver reads are modelled; everything else on the
/// page is kept in `extra`. Loading follows the same presence rule as raw
/// resolution: a payload field holding `null`, `false`, `0` or `""`, and a
/// `metadata` field that is not an object, load as `None` and stay in
/// `extra` with their original value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct PageMetadata {
    /// Original Docling processing output (read-only)
    pub docling_json: Option<DoclingData>,
    /// User edits and overrides (saved by editor)
    pub docling_json_override: Option<DoclingData>,
    /// Nested metadata object (older storage shape)
    pub metadata: Option<Box<PageMetadata>>,
    /// Other page fields, preserved verbatim
    pub extra: Map<String, Value>,
}

/// Moves a present payload out of `fields`. Absent-valued fields stay put.
fn take_payload(
    fields: &mut Map<String, Value>,
    variant: Variant,
) -> serde_json::Result<Option<DoclingData>> {
    let key = variant.field_name();
    if !fields.get(key).is_some_and(is_present) {
        return Ok(None);
    }
    fields
        .remove(key)
        .map(serde_json::from_value::<DoclingData>)
        .transpose()
}

impl TryFrom<Map<String, Value>> for PageMetadata {
    type Error = serde_json::Error;

    fn try_from(mut extra: Map<String, Value>) -> serde_json::Result<Self> {
        let docling_json = take_payload(&mut extra, Variant::Original)?;
        let docling_json_override = take_payload(&mut extra, Variant::Override)?;
        let metadata = match extra.remove(METADATA_FIELD) {
            Some(Value::Object(nested)) => Some(Box::new(Self::try_from(nested)?)),
            Some(other) => {
                extra.insert(METADATA_FIELD.to_string(), other);
                None
            }
            None => None,
        };
        Ok(Self {
            docling_json,
            docling_json_override,
            metadata,
            extra,
        })
    }
}

impl Serialize for PageMetadata {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        if let Some(data) = &self.docling_json {
            map.serialize_entry(Variant::Original.field_name(), data)?;
        }
        if let Some(data) = &self.docling_json_override {
            map.serialize_entry(Variant::Override.field_name(), data)?;
        }
        if let Some(nested) = &self.metadata {
            map.serialize_entry(METADATA_FIELD, nested)?;
        }
        for (key, value) in &self.extra {
            if !self.is_modelled(key) {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

impl AnnotationSource for PageMetadata {
    type Data = DoclingData;

    fn lookup(&self, source: DataSource) -> Option<&DoclingData> {
        let container = match source.nesting {
            Nesting::TopLevel => self,
            Nesting::Metadata => self.metadata.as_deref()?,
        };
        match source.variant {
            Variant::Override => container.docling_json_override.as_ref(),
            Variant::Original => container.docling_json.as_ref(),
        }
    }
}

impl PageMetadata {
    /// True if `key` is written from a typed field rather than from `extra`.
    fn is_modelled(&self, key: &str) -> bool {
        match key {
            k if k == Variant::Original.field_name() => self.docling_json.is_some(),
            k if k == Variant::Override.field_name() => self.docling_json_override.is_some(),
            METADATA_FIELD => self.metadata.is_some(),
            _ => false,
        }
    }

    /// Parses a page object from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a JSON object, or a present
    /// payload field does not have the Docling data shape.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses a page object from an already-decoded JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not an object, or a present payload
    /// field does not have the Docling data shape.
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Returns the effective payload; see [`resolve`].
    #[inline]
    #[must_use = "returns the resolved annotation payload"]
    pub fn docling_data(&self) -> Option<&DoclingData> {
        resolve(Some(self))
    }

    /// Returns true if the page has any annotation payload.
    #[inline]
    #[must_use = "returns whether the page has annotation data"]
    pub fn has_docling_data(&self) -> bool {
        has_docling_data(Some(self))
    }

    /// Returns the blocks of the effective payload, or an empty slice.
    #[must_use = "returns the effective blocks of the page"]
    pub fn effective_blocks(&self) -> &[Block] {
        self.docling_data()
            .map(DoclingData::blocks)
            .unwrap_or_default()
    }

    /// Returns the top-level override for editing.
    ///
    /// If the page has no top-level override yet, one is created from a copy
    /// of the currently resolved payload (or an empty payload). Originals at
    /// either nesting level are left untouched.
    pub fn override_mut(&mut self) -> &mut DoclingData {
        if self.docling_json_override.is_none() {
            let seed = match resolve_with_source(Some(&*self)) {
                Some((source, data)) => {
                    log::debug!("seeding docling_json_override from {source}");
                    data.clone()
                }
                None => {
                    log::debug!("seeding empty docling_json_override");
                    DoclingData::default()
                }
            };
            self.docling_json_override = Some(seed);
        }
        self.docling_json_override.get_or_insert_with(DoclingData::default)
    }

    /// Removes and returns the top-level override, reverting the page to
    /// whatever payload resolves next.
    pub fn discard_override(&mut self) -> Option<DoclingData> {
        self.docling_json_override.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockType;
    use serde_json::json;

    #[test]
    fn test_resolution_order_display() {
        let names: Vec<String> = RESOLUTION_ORDER.iter().map(ToString::to_string).collect();
        assert_eq!(
            names,
            [
                "docling_json_override",
                "docling_json",
                "metadata.docling_json_override",
                "metadata.docling_json"
            ]
        );
    }

    #[test]
    fn test_is_present() {
        assert!(!is_present(&json!(null)));
        assert!(!is_present(&json!(false)));
        assert!(!is_present(&json!(0)));
        assert!(!is_present(&json!(0.0)));
        assert!(!is_present(&json!("")));
        assert!(is_present(&json!({})));
        assert!(is_present(&json!([])));
        assert!(is_present(&json!("x")));
        assert!(is_present(&json!(1)));
        assert!(is_present(&json!(true)));
    }

    #[test]
    fn test_value_resolution_precedence() {
        let page = json!({
            "docling_json_override": "A",
            "docling_json": "B",
            "metadata": {"docling_json_override": "C", "docling_json": "D"}
        });
        assert_eq!(resolve(Some(&page)), Some(&json!("A")));

        let page = json!({"docling_json": "B", "metadata": {"docling_json_override": "C"}});
        assert_eq!(resolve(Some(&page)), Some(&json!("B")));

        let page = json!({"metadata": {"docling_json_override": "C", "docling_json": "D"}});
        assert_eq!(resolve(Some(&page)), Some(&json!("C")));

        let page = json!({"metadata": {"docling_json": "D"}});
        assert_eq!(resolve(Some(&page)), Some(&json!("D")));

        assert_eq!(resolve(Some(&json!({}))), None);
        assert_eq!(resolve::<Value>(None), None);
    }

    #[test]
    fn test_value_resolution_skips_empty_fields() {
        let page = json!({
            "docling_json_override": null,
            "docling_json": "",
            "metadata": {"docling_json_override": false, "docling_json": {"blocks": []}}
        });
        let (source, data) = resolve_with_source(Some(&page)).unwrap();
        assert_eq!(source.to_string(), "metadata.docling_json");
        assert_eq!(data, &json!({"blocks": []}));
    }

    #[test]
    fn test_value_non_object_pages() {
        assert!(!has_docling_data(Some(&json!(null))));
        assert!(!has_docling_data(Some(&json!("page"))));
        assert!(!has_docling_data(Some(&json!([1, 2]))));
        assert!(!has_docling_data(Some(&json!({"metadata": "legacy"}))));
    }

    #[test]
    fn test_typed_resolution() {
        let mut page = PageMetadata::default();
        assert!(!page.has_docling_data());
        assert!(page.effective_blocks().is_empty());

        page.metadata = Some(Box::new(PageMetadata {
            docling_json: Some(DoclingData::with_blocks(vec![Block::empty(BlockType::Code)])),
            ..PageMetadata::default()
        }));
        assert!(page.has_docling_data());
        assert_eq!(page.effective_blocks()[0].block_type, "code");

        page.docling_json = Some(DoclingData::with_blocks(vec![]));
        assert!(page.effective_blocks().is_empty());
    }

    #[test]
    fn test_typed_page_keeps_absent_valued_fields_in_extra() {
        let raw = json!({
            "docling_json_override": false,
            "docling_json": {"blocks": []},
            "metadata": "legacy"
        });
        let page = PageMetadata::from_value(raw.clone()).unwrap();

        assert!(page.docling_json_override.is_none());
        assert!(page.metadata.is_none());
        assert_eq!(page.extra.get("docling_json_override"), Some(&json!(false)));
        assert_eq!(page.extra.get("metadata"), Some(&json!("legacy")));
        assert_eq!(
            resolve_with_source(Some(&page)).map(|(source, _)| source.to_string()),
            Some("docling_json".to_string())
        );
        assert_eq!(serde_json::to_value(&page).unwrap(), raw);
    }

    #[test]
    fn test_typed_field_shadows_stashed_value() {
        let mut page = PageMetadata::from_value(json!({
            "docling_json_override": "",
            "docling_json": {"blocks": []}
        }))
        .unwrap();

        page.override_mut().blocks_mut().push(Block::empty(BlockType::Text));
        let out = serde_json::to_value(&page).unwrap();
        assert_eq!(out["docling_json_override"]["blocks"][0]["type"], "text");

        page.discard_override();
        let out = serde_json::to_value(&page).unwrap();
        assert_eq!(out["docling_json_override"], "");
    }

    #[test]
    fn test_override_mut_seeds_from_resolved() {
        let mut page = PageMetadata {
            docling_json: Some(DoclingData::with_blocks(vec![Block::empty(BlockType::Title)])),
            ..PageMetadata::default()
        };

        page.override_mut().blocks_mut()[0].text = Some("Edited".to_string());

        let original = page.docling_json.as_ref().unwrap();
        assert_eq!(original.blocks()[0].text(), "");
        assert_eq!(page.effective_blocks()[0].text(), "Edited");
        assert_eq!(page.effective_blocks()[0].block_type, "title");
    }

    #[test]
    fn test_override_mut_reuses_existing_override() {
        let mut page = PageMetadata {
            docling_json_override: Some(DoclingData::with_blocks(vec![])),
            docling_json: Some(DoclingData::with_blocks(vec![Block::empty(BlockType::Text)])),
            ..PageMetadata::default()
        };

        assert!(page.override_mut().blocks().is_empty());
    }

    #[test]
    fn test_override_mut_on_empty_page() {
        let mut page = PageMetadata::default();
        page.override_mut().blocks_mut().push(Block::empty(BlockType::Text));
        assert_eq!(page.effective_blocks().len(), 1);
        assert!(page.docling_json.is_none());
    }

    #[test]
    fn test_discard_override() {
        let mut page = PageMetadata {
            docling_json: Some(DoclingData::with_blocks(vec![Block::empty(BlockType::Text)])),
            ..PageMetadata::default()
        };
        page.override_mut().blocks_mut().clear();
        assert!(page.effective_blocks().is_empty());

        let discarded = page.discard_override();
        assert!(discarded.is_some());
        assert_eq!(page.effective_blocks().len(), 1);
    }
}
