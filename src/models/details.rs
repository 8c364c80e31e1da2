//! Marketing details carried inside a collection's metadata mapping.
//!
//! The platform keeps all custom collection data in one untyped JSON object.
//! Five of its keys form a typed view:
//!
//! | key                       | type                 |
//! |---------------------------|----------------------|
//! | `image`                   | `{ id, url }`        |
//! | `description`             | string               |
//! | `collection_page_image`   | `{ id, url }`        |
//! | `collection_page_heading` | string               |
//! | `collection_page_content` | string               |
//!
//! Every field is optional. A missing key means "not set", which is not the
//! same as an empty string. Keys outside this set belong to other writers and
//! are never touched here.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use url::Url;

pub const IMAGE: &str = "image";
pub const DESCRIPTION: &str = "description";
pub const COLLECTION_PAGE_IMAGE: &str = "collection_page_image";
pub const COLLECTION_PAGE_HEADING: &str = "collection_page_heading";
pub const COLLECTION_PAGE_CONTENT: &str = "collection_page_content";

/// An uploaded image as produced by the admin upload flow.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ImageRef {
    /// Upload identifier assigned by the file service.
    pub id: String,

    /// Public URL of the uploaded file. Always an absolute URL.
    pub url: String,
}

/// Typed view over the marketing keys of a collection's metadata.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct CollectionMarketingDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_page_image: Option<ImageRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_page_heading: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_page_content: Option<String>,
}

/// Body of `GET .../details`. Every field is always present.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct DetailsResponse {
    pub image: Option<ImageRef>,
    pub description: String,
    pub collection_page_image: Option<ImageRef>,
    pub collection_page_heading: String,
    pub collection_page_content: String,
}

/// One failed check, addressed by a dotted path such as `image.url`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ValidationIssue {
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    fn expected(path: impl Into<String>, expected: &str, received: &Value) -> Self {
        Self::new(
            path,
            format!("expected {}, received {}", expected, json_type(received)),
        )
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid collection details: {}", summarize(.issues))]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

fn summarize(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|issue| {
            if issue.path.is_empty() {
                issue.message.clone()
            } else {
                format!("{}: {}", issue.path, issue.message)
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Check a raw metadata value against the marketing details shape.
///
/// Unknown keys are ignored and do not appear in the result. All issues are
/// collected before returning, so callers can report every bad field at once.
pub fn validate(raw: &Value) -> Result<CollectionMarketingDetails, ValidationError> {
    let Some(object) = raw.as_object() else {
        return Err(ValidationError {
            issues: vec![ValidationIssue::expected("", "object", raw)],
        });
    };

    let mut issues = Vec::new();
    let details = CollectionMarketingDetails {
        image: image_field(object, IMAGE, &mut issues),
        description: text_field(object, DESCRIPTION, &mut issues),
        collection_page_image: image_field(object, COLLECTION_PAGE_IMAGE, &mut issues),
        collection_page_heading: text_field(object, COLLECTION_PAGE_HEADING, &mut issues),
        collection_page_content: text_field(object, COLLECTION_PAGE_CONTENT, &mut issues),
    };

    if issues.is_empty() {
        Ok(details)
    } else {
        Err(ValidationError { issues })
    }
}

fn text_field(
    object: &Map<String, Value>,
    key: &str,
    issues: &mut Vec<ValidationIssue>,
) -> Option<String> {
    match object.get(key)? {
        Value::String(text) => Some(text.clone()),
        other => {
            issues.push(ValidationIssue::expected(key, "string", other));
            None
        }
    }
}

fn image_field(
    object: &Map<String, Value>,
    key: &str,
    issues: &mut Vec<ValidationIssue>,
) -> Option<ImageRef> {
    let value = object.get(key)?;
    let Some(image) = value.as_object() else {
        issues.push(ValidationIssue::expected(key, "object", value));
        return None;
    };

    let id = required_string(image, key, "id", issues);
    let url = required_string(image, key, "url", issues).and_then(|url| {
        if Url::parse(&url).is_ok() {
            Some(url)
        } else {
            issues.push(ValidationIssue::new(format!("{}.url", key), "invalid url"));
            None
        }
    });

    Some(ImageRef { id: id?, url: url? })
}

fn required_string(
    object: &Map<String, Value>,
    parent: &str,
    key: &str,
    issues: &mut Vec<ValidationIssue>,
) -> Option<String> {
    let path = format!("{}.{}", parent, key);
    match object.get(key) {
        Some(Value::String(text)) => Some(text.clone()),
        Some(other) => {
            issues.push(ValidationIssue::expected(path, "string", other));
            None
        }
        None => {
            issues.push(ValidationIssue::new(path, "required"));
            None
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl CollectionMarketingDetails {
    /// The fields that are set, as metadata entries.
    pub fn to_metadata(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        if let Some(image) = &self.image {
            fields.insert(IMAGE.into(), image_value(image));
        }
        if let Some(description) = &self.description {
            fields.insert(DESCRIPTION.into(), Value::String(description.clone()));
        }
        if let Some(image) = &self.collection_page_image {
            fields.insert(COLLECTION_PAGE_IMAGE.into(), image_value(image));
        }
        if let Some(heading) = &self.collection_page_heading {
            fields.insert(COLLECTION_PAGE_HEADING.into(), Value::String(heading.clone()));
        }
        if let Some(content) = &self.collection_page_content {
            fields.insert(COLLECTION_PAGE_CONTENT.into(), Value::String(content.clone()));
        }
        fields
    }

    /// Shallow-merge the set fields over `existing`.
    ///
    /// Keys present in `self` overwrite; every other key in `existing` is kept
    /// as is, including marketing keys this payload leaves out.
    pub fn merge_into(&self, existing: Option<&Map<String, Value>>) -> Map<String, Value> {
        let mut merged = existing.cloned().unwrap_or_default();
        merged.extend(self.to_metadata());
        merged
    }
}

fn image_value(image: &ImageRef) -> Value {
    let mut object = Map::new();
    object.insert("id".into(), Value::String(image.id.clone()));
    object.insert("url".into(), Value::String(image.url.clone()));
    Value::Object(object)
}

impl From<CollectionMarketingDetails> for DetailsResponse {
    /// Empty strings and missing fields collapse to the same defaults.
    fn from(details: CollectionMarketingDetails) -> Self {
        Self {
            image: details.image,
            description: details.description.unwrap_or_default(),
            collection_page_image: details.collection_page_image,
            collection_page_heading: details.collection_page_heading.unwrap_or_default(),
            collection_page_content: details.collection_page_content.unwrap_or_default(),
        }
    }
}

impl From<DetailsResponse> for CollectionMarketingDetails {
    /// Starting values for an edit form: images stay unset when absent, text
    /// fields start as empty strings.
    fn from(response: DetailsResponse) -> Self {
        Self {
            image: response.image,
            description: Some(response.description),
            collection_page_image: response.collection_page_image,
            collection_page_heading: Some(response.collection_page_heading),
            collection_page_content: Some(response.collection_page_content),
        }
    }
}
