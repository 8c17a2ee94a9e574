//! YAML → JSON conversion for translation documents.
//!
//! Translation tables upstream are hand-edited YAML (comments, nested mappings,
//! block strings). Locally they are stored as plain JSON: 4-space indentation,
//! non-ASCII kept literal, mapping keys in document order.

use std::fmt;

use serde::de::{
    self, Deserialize, Deserializer, EnumAccess, MapAccess, SeqAccess, VariantAccess, Visitor,
};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Number, Value as JsonValue};
use serde_yaml::{Mapping, Value as YamlValue};
use tracing::debug;

const JSON_INDENT: &[u8] = b"    ";
const MERGE_KEY: &str = "<<";

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("mapping key {0} cannot be represented as a JSON object key")]
    UnsupportedKey(String),

    #[error("number {0} cannot be represented in JSON")]
    NonFiniteNumber(String),

    #[error("merge key `<<` must refer to a mapping or a list of mappings, found {0}")]
    InvalidMerge(String),

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("encoded JSON was not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Parses a YAML document and re-serializes it as pretty JSON.
pub fn yaml_to_json(text: &str) -> Result<String, ConvertError> {
    let value = yaml_to_value(text)?;
    let json = to_pretty_json(&value)?;
    debug!(
        yaml_bytes = text.len(),
        json_bytes = json.len(),
        "Converted YAML document to JSON"
    );
    Ok(json)
}

/// Parses a YAML document into a JSON value tree.
///
/// Repeated mapping keys are accepted and the last value wins. Merge keys
/// (`<<: *anchor`) are expanded, with the mapping's own entries taking precedence.
pub fn yaml_to_value(text: &str) -> Result<JsonValue, ConvertError> {
    let Node(yaml) = serde_yaml::from_str(text)?;
    convert_value(yaml)
}

/// A YAML value tree built without serde_yaml's duplicate-key check.
struct Node(YamlValue);

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(NodeVisitor)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a YAML document")
    }

    fn visit_bool<E: de::Error>(self, b: bool) -> Result<Node, E> {
        Ok(Node(YamlValue::Bool(b)))
    }

    fn visit_i64<E: de::Error>(self, i: i64) -> Result<Node, E> {
        Ok(Node(YamlValue::Number(i.into())))
    }

    fn visit_u64<E: de::Error>(self, u: u64) -> Result<Node, E> {
        Ok(Node(YamlValue::Number(u.into())))
    }

    fn visit_f64<E: de::Error>(self, f: f64) -> Result<Node, E> {
        Ok(Node(YamlValue::Number(f.into())))
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<Node, E> {
        Ok(Node(YamlValue::String(s.to_owned())))
    }

    fn visit_string<E: de::Error>(self, s: String) -> Result<Node, E> {
        Ok(Node(YamlValue::String(s)))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Node, E> {
        Ok(Node(YamlValue::Null))
    }

    fn visit_none<E: de::Error>(self) -> Result<Node, E> {
        Ok(Node(YamlValue::Null))
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Node, D::Error>
    where
        D: Deserializer<'de>,
    {
        Node::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Node, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(Node(item)) = seq.next_element()? {
            items.push(item);
        }
        Ok(Node(YamlValue::Sequence(items)))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Node, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut mapping = Mapping::new();
        while let Some((Node(key), Node(value))) = map.next_entry()? {
            // A repeated key keeps its first position and takes the later value.
            mapping.insert(key, value);
        }
        Ok(Node(YamlValue::Mapping(mapping)))
    }

    // Tagged nodes arrive as enums; the tag is dropped and the value kept.
    fn visit_enum<A>(self, data: A) -> Result<Node, A::Error>
    where
        A: EnumAccess<'de>,
    {
        let (_tag, contents): (String, _) = data.variant()?;
        contents.newtype_variant()
    }
}

/// Serializes with 4-space indentation; non-ASCII is written as-is.
pub fn to_pretty_json(value: &JsonValue) -> Result<String, ConvertError> {
    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(JSON_INDENT);
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8(out)?)
}

fn convert_value(value: YamlValue) -> Result<JsonValue, ConvertError> {
    Ok(match value {
        YamlValue::Null => JsonValue::Null,
        YamlValue::Bool(b) => JsonValue::Bool(b),
        YamlValue::Number(n) => JsonValue::Number(convert_number(&n)?),
        YamlValue::String(s) => JsonValue::String(s),
        YamlValue::Sequence(items) => JsonValue::Array(
            items
                .into_iter()
                .map(convert_value)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        YamlValue::Mapping(mut mapping) => {
            let mut object = Map::with_capacity(mapping.len());
            if let Some(merge) = mapping.shift_remove(MERGE_KEY) {
                for source in merge_sources(merge)? {
                    if let JsonValue::Object(entries) = convert_value(source)? {
                        object.extend(entries);
                    }
                }
            }
            for (key, value) in mapping {
                object.insert(convert_key(key)?, convert_value(value)?);
            }
            JsonValue::Object(object)
        }
        // Tags carry no meaning in the JSON output.
        YamlValue::Tagged(tagged) => convert_value(tagged.value)?,
    })
}

/// Mappings to merge, lowest precedence first: in `<<: [*a, *b]` the entries of `a` win.
fn merge_sources(merge: YamlValue) -> Result<Vec<YamlValue>, ConvertError> {
    match merge {
        YamlValue::Mapping(_) => Ok(vec![merge]),
        YamlValue::Sequence(items) => {
            let mut sources = items
                .into_iter()
                .map(|item| match item {
                    YamlValue::Mapping(_) => Ok(item),
                    other => Err(ConvertError::InvalidMerge(format!("{other:?}"))),
                })
                .collect::<Result<Vec<_>, _>>()?;
            sources.reverse();
            Ok(sources)
        }
        other => Err(ConvertError::InvalidMerge(format!("{other:?}"))),
    }
}

fn convert_number(n: &serde_yaml::Number) -> Result<Number, ConvertError> {
    if let Some(i) = n.as_i64() {
        Ok(Number::from(i))
    } else if let Some(u) = n.as_u64() {
        Ok(Number::from(u))
    } else {
        n.as_f64()
            .and_then(Number::from_f64)
            .ok_or_else(|| ConvertError::NonFiniteNumber(n.to_string()))
    }
}

/// JSON object keys are strings; scalar YAML keys are stringified, compound keys are rejected.
fn convert_key(key: YamlValue) -> Result<String, ConvertError> {
    match key {
        YamlValue::String(s) => Ok(s),
        YamlValue::Bool(b) => Ok(b.to_string()),
        YamlValue::Null => Ok("null".to_string()),
        YamlValue::Number(n) => Ok(n.to_string()),
        YamlValue::Tagged(tagged) => convert_key(tagged.value),
        other => Err(ConvertError::UnsupportedKey(format!("{other:?}"))),
    }
}
