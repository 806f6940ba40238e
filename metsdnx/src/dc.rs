//! Dublin Core descriptive record for the IE.

use serde_json::{Map, Value};

use crate::error::{BuildError, BuildResult};
use crate::xml::Element;

pub const DC_NS: &str = "http://purl.org/dc/elements/1.1/";
pub const DCTERMS_NS: &str = "http://purl.org/dc/terms/";
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Build a `<dc:record>` from a descriptive dictionary.
///
/// Accepts an object, or a list holding exactly one object. Keys are element
/// names (`dc:title`, `dcterms:isPartOf`); a bare key gets the `dc:` prefix.
/// Arrays produce one element per item. Keys are emitted in lexical order.
pub fn build_dc_record(descriptive: Option<&Value>) -> BuildResult<Element> {
    let mut record = Element::new("dc:record")
        .with_attr("xmlns:dc", DC_NS)
        .with_attr("xmlns:dcterms", DCTERMS_NS)
        .with_attr("xmlns:xsi", XSI_NS);

    let Some(object) = descriptive.map(unwrap_single).transpose()?.flatten() else {
        return Ok(record);
    };

    let mut keys: Vec<&String> = object.keys().collect();
    keys.sort();
    for key in keys {
        let name = element_name(key);
        match &object[key.as_str()] {
            Value::Array(items) => {
                for item in items {
                    if let Some(text) = text_of(item) {
                        record.push(Element::new(name.clone()).with_text(text));
                    }
                }
            }
            value => {
                if let Some(text) = text_of(value) {
                    record.push(Element::new(name).with_text(text));
                }
            }
        }
    }
    Ok(record)
}

fn unwrap_single(value: &Value) -> BuildResult<Option<&Map<String, Value>>> {
    match value {
        Value::Object(object) => Ok(Some(object)),
        Value::Array(items) if items.len() == 1 => unwrap_single(&items[0]),
        Value::Array(items) if items.is_empty() => Ok(None),
        Value::Null => Ok(None),
        other => Err(BuildError::InvalidJson(format!(
            "descriptive metadata must be an object or a list with one object, got {}",
            other
        ))),
    }
}

fn element_name(key: &str) -> String {
    if key.contains(':') {
        key.to_string()
    } else {
        format!("dc:{}", key)
    }
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
