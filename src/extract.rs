//! Design tree normalization
//!
//! Reduces the raw recursive node tree returned by the Figma file API to
//! the flat, typed document consumed by the prompt and rendering steps.
//!
//! The pass is pure and deterministic and never fails: absent or
//! malformed raw fields degrade to documented defaults. Two presence
//! rules matter downstream and must not be collapsed:
//!
//! - a nested node without children gets NO `children` key at all, while
//!   a frame always serializes an `elements` array (possibly empty);
//! - optional scalars (`name`, `id`, `component_id`, `font_size`) are
//!   omitted when missing, never serialized as null.

use serde::Serialize;
use serde_json::Value;

/// Node tags that carry fill/stroke paint data
const SHAPE_TYPES: [&str; 3] = ["RECTANGLE", "ELLIPSE", "POLYGON"];

/// Root-child tag selected as a page
const CANVAS_TYPE: &str = "CANVAS";

/// One normalized design element.
///
/// `detail` is a closed variant set keyed by the raw node's `type` tag;
/// it flattens into the serialized record so each element carries exactly
/// the fields its tag dictates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    pub visible: bool,
    #[serde(flatten)]
    pub detail: ElementDetail,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interactive: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interactions: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Element>>,
}

/// Type-specific element fields
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ElementDetail {
    Text {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        font_size: Option<f64>,
    },
    Shape {
        /// Raw paint data, passed through uninterpreted
        fills: Value,
        strokes: Value,
    },
    ComponentRef {
        #[serde(skip_serializing_if = "Option::is_none")]
        component_id: Option<String>,
    },
    Generic {},
}

/// A direct child container of a canvas
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    /// Always present, unlike nested `children`
    pub elements: Vec<Element>,
}

/// One page (CANVAS root-child) of a design file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub frames: Vec<Frame>,
}

/// The flattened design document handed to the prompt and render steps.
///
/// `components`, `text_elements` and `interactive_elements` are reserved:
/// declared in the output shape but never populated by the traversal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DesignDocument {
    pub file_name: String,
    pub pages: Vec<Page>,
    pub components: Vec<Value>,
    pub text_elements: Vec<Value>,
    pub interactive_elements: Vec<Value>,
}

/// Normalize one raw node, recursing into its children.
///
/// The optional result is part of the contract (callers drop `None`
/// children), though the current logic always yields a record.
pub fn normalize_element(raw: &Value) -> Option<Element> {
    let node_type = string_field(raw, "type");

    let detail = match node_type.as_deref() {
        Some("TEXT") => ElementDetail::Text {
            text: raw
                .get("characters")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            // Present only when both `style` and `style.fontSize` exist
            font_size: raw
                .get("style")
                .and_then(|style| style.get("fontSize"))
                .and_then(Value::as_f64),
        },
        Some(tag) if SHAPE_TYPES.contains(&tag) => ElementDetail::Shape {
            fills: paint_field(raw, "fills"),
            strokes: paint_field(raw, "strokes"),
        },
        Some("COMPONENT") | Some("INSTANCE") => ElementDetail::ComponentRef {
            component_id: string_field(raw, "componentId"),
        },
        _ => ElementDetail::Generic {},
    };

    let interactions = raw.get("interactions").filter(|v| is_non_empty(v)).cloned();

    let children = raw
        .get("children")
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
        .map(|items| items.iter().filter_map(normalize_element).collect());

    Some(Element {
        name: string_field(raw, "name"),
        id: string_field(raw, "id"),
        node_type,
        visible: raw.get("visible").and_then(Value::as_bool).unwrap_or(true),
        detail,
        interactive: interactions.is_some().then_some(true),
        interactions,
        children,
    })
}

/// Normalize a frame node: header fields plus its direct children, in
/// input order. A frame with no children yields an empty `elements` list.
pub fn normalize_frame(raw: &Value) -> Frame {
    Frame {
        name: string_field(raw, "name"),
        id: string_field(raw, "id"),
        node_type: string_field(raw, "type"),
        elements: raw
            .get("children")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(normalize_element).collect())
            .unwrap_or_default(),
    }
}

/// Normalize a raw design file into the flattened document.
///
/// Only root-children tagged CANVAS become pages; everything else at that
/// level is skipped. Absent or malformed structure degrades to an empty
/// `pages` list.
pub fn normalize_document(raw: &Value) -> DesignDocument {
    let file_name = raw
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("Unknown")
        .to_string();

    let mut pages = Vec::new();
    if let Some(children) = raw
        .get("document")
        .and_then(|doc| doc.get("children"))
        .and_then(Value::as_array)
    {
        for child in children {
            if child.get("type").and_then(Value::as_str) != Some(CANVAS_TYPE) {
                continue;
            }
            let frames = child
                .get("children")
                .and_then(Value::as_array)
                .map(|items| items.iter().map(normalize_frame).collect())
                .unwrap_or_default();
            pages.push(Page {
                name: string_field(child, "name"),
                id: string_field(child, "id"),
                frames,
            });
        }
    }

    DesignDocument {
        file_name,
        pages,
        components: Vec::new(),
        text_elements: Vec::new(),
        interactive_elements: Vec::new(),
    }
}

fn string_field(raw: &Value, key: &str) -> Option<String> {
    raw.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Paint passthrough: the raw value verbatim, or an empty array when the
/// key is absent
fn paint_field(raw: &Value, key: &str) -> Value {
    raw.get(key)
        .cloned()
        .unwrap_or_else(|| Value::Array(Vec::new()))
}

/// Presence check for optional raw fields: empty containers, empty
/// strings, zero and null all count as absent
fn is_non_empty(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn to_map(element: &Element) -> serde_json::Map<String, Value> {
        match serde_json::to_value(element).unwrap() {
            Value::Object(map) => map,
            other => panic!("element serialized to non-object: {other}"),
        }
    }

    // ── visible ────────────────────────────────────────────────────────

    #[test]
    fn test_visible_defaults_true() {
        let element = normalize_element(&json!({"type": "FRAME"})).unwrap();
        assert!(element.visible);
    }

    #[test]
    fn test_visible_false_preserved() {
        let element = normalize_element(&json!({"type": "FRAME", "visible": false})).unwrap();
        assert!(!element.visible);
    }

    #[test]
    fn test_visible_always_serialized() {
        let element = normalize_element(&json!({})).unwrap();
        let map = to_map(&element);
        assert_eq!(map.get("visible"), Some(&Value::Bool(true)));
    }

    // ── TEXT ───────────────────────────────────────────────────────────

    #[test]
    fn test_text_defaults() {
        let element = normalize_element(&json!({"type": "TEXT"})).unwrap();
        let map = to_map(&element);
        assert_eq!(map.get("text"), Some(&Value::String(String::new())));
        assert!(!map.contains_key("font_size"));
    }

    #[test]
    fn test_text_with_characters_and_font_size() {
        let element = normalize_element(&json!({
            "type": "TEXT",
            "characters": "Hi",
            "style": {"fontSize": 14}
        }))
        .unwrap();
        let map = to_map(&element);
        assert_eq!(map.get("text"), Some(&json!("Hi")));
        assert_eq!(map.get("font_size"), Some(&json!(14.0)));
    }

    #[test]
    fn test_text_style_without_font_size() {
        let element = normalize_element(&json!({
            "type": "TEXT",
            "characters": "Hi",
            "style": {"fontWeight": 700}
        }))
        .unwrap();
        let map = to_map(&element);
        assert!(!map.contains_key("font_size"));
    }

    // ── shapes ─────────────────────────────────────────────────────────

    #[test]
    fn test_shape_fills_and_strokes_passthrough() {
        let fills = json!([{"type": "SOLID", "color": {"r": 1.0, "g": 0.0, "b": 0.0}}]);
        let element = normalize_element(&json!({
            "type": "RECTANGLE",
            "fills": fills.clone(),
        }))
        .unwrap();
        let map = to_map(&element);
        assert_eq!(map.get("fills"), Some(&fills));
        assert_eq!(map.get("strokes"), Some(&json!([])));
    }

    #[test]
    fn test_all_shape_tags_get_paint_fields() {
        for tag in ["RECTANGLE", "ELLIPSE", "POLYGON"] {
            let element = normalize_element(&json!({"type": tag})).unwrap();
            let map = to_map(&element);
            assert!(map.contains_key("fills"), "missing fills for {tag}");
            assert!(map.contains_key("strokes"), "missing strokes for {tag}");
        }
    }

    // ── components ────────────────────────────────────────────────────

    #[test]
    fn test_component_without_id_omits_field() {
        let element = normalize_element(&json!({"type": "COMPONENT"})).unwrap();
        let map = to_map(&element);
        assert!(!map.contains_key("component_id"));
    }

    #[test]
    fn test_instance_component_id() {
        let element =
            normalize_element(&json!({"type": "INSTANCE", "componentId": "1:23"})).unwrap();
        let map = to_map(&element);
        assert_eq!(map.get("component_id"), Some(&json!("1:23")));
    }

    // ── generic tags ───────────────────────────────────────────────────

    #[test]
    fn test_unknown_tag_has_only_base_fields() {
        let element =
            normalize_element(&json!({"type": "GROUP", "name": "g", "id": "1:1"})).unwrap();
        let map = to_map(&element);
        let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["id", "name", "type", "visible"]);
    }

    #[test]
    fn test_missing_name_omitted_not_null() {
        let element = normalize_element(&json!({"type": "GROUP"})).unwrap();
        let map = to_map(&element);
        assert!(!map.contains_key("name"));
        assert!(!map.contains_key("id"));
    }

    // ── interactions ───────────────────────────────────────────────────

    #[test]
    fn test_empty_interactions_not_interactive() {
        let element =
            normalize_element(&json!({"type": "FRAME", "interactions": {}})).unwrap();
        let map = to_map(&element);
        assert!(!map.contains_key("interactive"));
        assert!(!map.contains_key("interactions"));
    }

    #[test]
    fn test_empty_interactions_array_not_interactive() {
        let element =
            normalize_element(&json!({"type": "FRAME", "interactions": []})).unwrap();
        assert!(element.interactive.is_none());
    }

    #[test]
    fn test_interactions_copied_verbatim() {
        let interactions = json!({"ON_CLICK": [{"action": "NAVIGATE"}]});
        let element = normalize_element(&json!({
            "type": "FRAME",
            "interactions": interactions.clone(),
        }))
        .unwrap();
        let map = to_map(&element);
        assert_eq!(map.get("interactive"), Some(&Value::Bool(true)));
        assert_eq!(map.get("interactions"), Some(&interactions));
    }

    // ── children ───────────────────────────────────────────────────────

    #[test]
    fn test_no_children_key_when_absent() {
        let element = normalize_element(&json!({"type": "FRAME"})).unwrap();
        let map = to_map(&element);
        assert!(!map.contains_key("children"));
    }

    #[test]
    fn test_no_children_key_when_empty() {
        let element = normalize_element(&json!({"type": "FRAME", "children": []})).unwrap();
        let map = to_map(&element);
        assert!(!map.contains_key("children"));
    }

    #[test]
    fn test_children_recursion() {
        let element = normalize_element(&json!({
            "type": "FRAME",
            "children": [
                {"type": "TEXT", "characters": "inner"},
                {"type": "GROUP", "children": [{"type": "ELLIPSE"}]}
            ]
        }))
        .unwrap();
        let children = element.children.unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(
            children[0].detail,
            ElementDetail::Text {
                text: "inner".to_string(),
                font_size: None
            }
        );
        let nested = children[1].children.as_ref().unwrap();
        assert_eq!(nested[0].node_type.as_deref(), Some("ELLIPSE"));
    }

    #[test]
    fn test_child_order_preserved() {
        let raw: Vec<Value> = (0..8)
            .map(|i| json!({"type": "TEXT", "id": format!("n{i}")}))
            .collect();
        let element =
            normalize_element(&json!({"type": "FRAME", "children": raw})).unwrap();
        let ids: Vec<String> = element
            .children
            .unwrap()
            .into_iter()
            .filter_map(|c| c.id)
            .collect();
        let expected: Vec<String> = (0..8).map(|i| format!("n{i}")).collect();
        assert_eq!(ids, expected);
    }

    // ── frames ─────────────────────────────────────────────────────────

    #[test]
    fn test_frame_elements_always_present() {
        let frame = normalize_frame(&json!({"type": "FRAME", "name": "Login"}));
        assert!(frame.elements.is_empty());
        let serialized = serde_json::to_value(&frame).unwrap();
        assert_eq!(serialized.get("elements"), Some(&json!([])));
    }

    #[test]
    fn test_frame_element_order_matches_input() {
        let frame = normalize_frame(&json!({
            "type": "FRAME",
            "children": [
                {"type": "TEXT", "id": "a"},
                {"type": "RECTANGLE", "id": "b"},
                {"type": "TEXT", "id": "c"}
            ]
        }));
        let ids: Vec<Option<String>> = frame.elements.into_iter().map(|e| e.id).collect();
        assert_eq!(
            ids,
            vec![
                Some("a".to_string()),
                Some("b".to_string()),
                Some("c".to_string())
            ]
        );
    }

    // ── documents ──────────────────────────────────────────────────────

    #[test]
    fn test_empty_document_shape() {
        let document = normalize_document(&json!({}));
        assert_eq!(
            serde_json::to_value(&document).unwrap(),
            json!({
                "file_name": "Unknown",
                "pages": [],
                "components": [],
                "text_elements": [],
                "interactive_elements": []
            })
        );
    }

    #[test]
    fn test_non_canvas_root_children_skipped() {
        let document = normalize_document(&json!({
            "name": "My App",
            "document": {
                "children": [
                    {
                        "type": "CANVAS",
                        "name": "Page 1",
                        "id": "0:1",
                        "children": [
                            {"type": "FRAME", "name": "Login"},
                            {"type": "FRAME", "name": "Home"}
                        ]
                    },
                    {"type": "SECTION", "name": "Not a page"}
                ]
            }
        }));
        assert_eq!(document.file_name, "My App");
        assert_eq!(document.pages.len(), 1);
        assert_eq!(document.pages[0].frames.len(), 2);
        assert_eq!(document.pages[0].name.as_deref(), Some("Page 1"));
    }

    #[test]
    fn test_page_order_preserved() {
        let document = normalize_document(&json!({
            "document": {
                "children": [
                    {"type": "CANVAS", "id": "p1"},
                    {"type": "CANVAS", "id": "p2"},
                    {"type": "CANVAS", "id": "p3"}
                ]
            }
        }));
        let ids: Vec<Option<String>> = document.pages.into_iter().map(|p| p.id).collect();
        assert_eq!(
            ids,
            vec![
                Some("p1".to_string()),
                Some("p2".to_string()),
                Some("p3".to_string())
            ]
        );
    }

    #[test]
    fn test_document_without_root_node() {
        let document = normalize_document(&json!({"name": "No document key"}));
        assert!(document.pages.is_empty());
    }

    #[test]
    fn test_determinism() {
        let raw = json!({
            "name": "App",
            "document": {
                "children": [
                    {"type": "CANVAS", "children": [
                        {"type": "FRAME", "children": [
                            {"type": "TEXT", "characters": "x", "interactions": [{"t": 1}]}
                        ]}
                    ]}
                ]
            }
        });
        assert_eq!(normalize_document(&raw), normalize_document(&raw));
    }

    // ── helpers ────────────────────────────────────────────────────────

    #[test]
    fn test_is_non_empty() {
        assert!(!is_non_empty(&json!(null)));
        assert!(!is_non_empty(&json!({})));
        assert!(!is_non_empty(&json!([])));
        assert!(!is_non_empty(&json!("")));
        assert!(!is_non_empty(&json!(0)));
        assert!(!is_non_empty(&json!(false)));
        assert!(is_non_empty(&json!({"k": 1})));
        assert!(is_non_empty(&json!([1])));
        assert!(is_non_empty(&json!("x")));
    }
}
