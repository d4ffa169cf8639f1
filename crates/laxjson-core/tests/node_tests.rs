//! Integration tests for the document tree: surgery, cloning, coercions,
//! naming, and serialization.

use laxjson_core::{parse, Document, NodeId, NodeType};

/// Walks the tree and checks that every child's parent link points at the
/// container that holds it, exactly once.
fn check_links(doc: &Document, id: NodeId) {
    match doc.node_type(id) {
        NodeType::Object => {
            for (_, child) in doc.attributes(id) {
                assert_eq!(doc.parent(child), Some(id));
                check_links(doc, child);
            }
        }
        NodeType::Array => {
            for child in doc.elements(id) {
                assert_eq!(doc.parent(child), Some(id));
                assert_eq!(
                    doc.elements(id).filter(|c| *c == child).count(),
                    1,
                    "child appears once in its parent"
                );
                check_links(doc, child);
            }
        }
        _ => {}
    }
}

// ===== building =====

#[test]
fn build_a_document_by_hand() {
    let mut doc = Document::new();
    let root = doc.root();

    doc.add_string(root, "name", "demo");
    doc.add_number(root, "count", 3.0);
    doc.add_boolean(root, "ok", true);
    let tags = doc.add_array(root, "tags");
    doc.push_string(tags, "a");
    doc.push_string(tags, "b");
    let meta = doc.add_object(root, "meta");
    doc.add_null(meta, "unset");

    assert_eq!(doc.attribute_count(root), 5);
    assert_eq!(doc.len(tags), 2);
    assert_eq!(
        doc.node_type(doc.get(meta, "unset").unwrap()),
        NodeType::Null
    );
    check_links(&doc, root);
}

#[test]
fn document_debug_formats() {
    let mut doc = Document::new();
    let root = doc.root();
    doc.add_number(root, "a", 1.0);

    let rendered = format!("{doc:?}");
    assert!(rendered.contains("Number"));
}

#[test]
fn add_with_same_name_replaces() {
    let mut doc = Document::new();
    let root = doc.root();

    doc.add_number(root, "a", 1.0);
    doc.add_number(root, "a", 2.0);

    assert_eq!(doc.attribute_count(root), 1);
    let a = doc.get(root, "a").unwrap();
    assert_eq!(doc.number_value(a), Some(2.0));
}

#[test]
fn insert_without_replace_folds_into_array() {
    let mut doc = Document::new();
    let root = doc.root();

    let first = doc.new_number(1.0);
    doc.insert_attribute(root, "a", first, false);
    let second = doc.new_number(2.0);
    doc.insert_attribute(root, "a", second, false);

    let a = doc.get(root, "a").unwrap();
    assert_eq!(doc.node_type(a), NodeType::Array);
    assert_eq!(doc.len(a), 2);

    // a third insert appends to the existing fold
    let third = doc.new_number(3.0);
    doc.insert_attribute(root, "a", third, false);
    assert_eq!(doc.len(a), 3);
    check_links(&doc, root);
}

#[test]
fn reinserting_a_child_of_the_same_object_is_a_noop() {
    let mut doc = Document::new();
    let root = doc.root();

    let node = doc.add_number(root, "a", 1.0);
    doc.insert_attribute(root, "a", node, false);

    assert_eq!(doc.attribute_count(root), 1);
    assert_eq!(doc.node_type(doc.get(root, "a").unwrap()), NodeType::Number);
}

#[test]
fn inserting_an_attached_node_moves_it() {
    let mut doc = Document::new();
    let root = doc.root();

    let here = doc.add_object(root, "here");
    let there = doc.add_object(root, "there");
    let node = doc.add_number(here, "x", 7.0);

    doc.insert_attribute(there, "y", node, true);

    assert_eq!(doc.attribute_count(here), 0);
    assert_eq!(doc.parent(node), Some(there));
    assert_eq!(doc.number_value(doc.get(there, "y").unwrap()), Some(7.0));
    check_links(&doc, root);
}

// ===== detachment =====

#[test]
fn take_from_parent_removes_exactly_one_entry() {
    let mut doc = Document::new();
    let root = doc.root();
    let arr = doc.add_array(root, "a");
    doc.push_number(arr, 1.0);
    let middle = doc.push_number(arr, 2.0);
    doc.push_number(arr, 3.0);

    doc.take_from_parent(middle);

    assert_eq!(doc.len(arr), 3 - 1);
    assert_eq!(doc.parent(middle), None);
    assert_eq!(doc.index_of(arr, middle), None);
    assert_eq!(doc.number_value(doc.at(arr, 1).unwrap()), Some(3.0));

    // second call is a no-op
    doc.take_from_parent(middle);
    assert_eq!(doc.len(arr), 2);
    check_links(&doc, root);
}

#[test]
fn take_from_parent_detaches_object_attributes() {
    let mut doc = Document::new();
    let root = doc.root();
    let node = doc.add_string(root, "a", "x");

    doc.take_from_parent(node);

    assert_eq!(doc.attribute_count(root), 0);
    assert_eq!(doc.parent(node), None);
    // the node itself stays alive
    assert_eq!(doc.string_value(node), Some("x"));
}

#[test]
fn remove_attribute_reports_presence() {
    let mut doc = Document::new();
    let root = doc.root();
    doc.add_number(root, "a", 1.0);

    assert!(doc.remove_attribute(root, "a"));
    assert!(!doc.remove_attribute(root, "a"));
    assert_eq!(doc.attribute_count(root), 0);
}

#[test]
fn clear_empties_a_container() {
    let mut doc = Document::new();
    let root = doc.root();
    doc.add_number(root, "a", 1.0);
    let arr = doc.add_array(root, "b");
    doc.push_number(arr, 2.0);

    doc.clear(root);
    assert_eq!(doc.attribute_count(root), 0);
}

// ===== cloning =====

#[test]
fn clone_is_deep_detached_and_independent() {
    let mut doc = Document::new();
    let root = doc.root();
    let obj = doc.add_object(root, "o");
    doc.add_string(obj, "s", "v");
    let arr = doc.add_array(obj, "items");
    doc.push_number(arr, 1.0);
    doc.push_number(arr, 2.0);

    let copy = doc.clone_node(obj);

    assert_eq!(doc.parent(copy), None);
    assert!(doc.deep_eq(obj, &doc, copy));

    // mutating the original leaves the copy alone
    doc.add_string(obj, "extra", "x");
    doc.push_number(arr, 3.0);
    assert!(!doc.deep_eq(obj, &doc, copy));

    let copy_items = doc.get(copy, "items").unwrap();
    assert_eq!(doc.len(copy_items), 2);
    check_links(&doc, copy);
}

// ===== naming =====

#[test]
fn names_reflect_attachment() {
    let mut doc = Document::new();
    let root = doc.root();

    assert_eq!(doc.name(root), "root");

    let a = doc.add_number(root, "a", 1.0);
    assert_eq!(doc.name(a), "a");

    let arr = doc.add_array(root, "items");
    doc.push_string(arr, "x");
    let second = doc.push_string(arr, "y");
    assert_eq!(doc.name(second), "[1]");

    let detached = doc.new_number(5.0);
    assert_eq!(doc.name(detached), "");

    let detached_obj = doc.new_object();
    assert_eq!(doc.name(detached_obj), "root");
}

// ===== coercions =====

#[test]
fn string_coercions() {
    let mut doc = Document::new();
    let n = doc.new_string("123");
    assert_eq!(doc.to_i32(n), Some(123));
    assert_eq!(doc.to_f64(n), Some(123.0));

    let hex = doc.new_string("0xFF");
    assert_eq!(doc.to_u32(hex), Some(255));
    let color = doc.new_string("#ff00aa");
    assert_eq!(doc.to_u32(color), Some(0xFF00AA));

    let t = doc.new_string("TRUE");
    assert_eq!(doc.to_bool(t), Some(true));
    let junk = doc.new_string("value");
    assert_eq!(doc.to_bool(junk), None);
    assert_eq!(doc.to_text(junk), Some("value".to_string()));
}

#[test]
fn number_coercions() {
    let mut doc = Document::new();

    let n = doc.new_number(2.7);
    assert_eq!(doc.to_i32(n), Some(2));
    assert_eq!(doc.to_bool(n), Some(true));

    let zero = doc.new_number(0.0);
    assert_eq!(doc.to_bool(zero), Some(false));
    assert_eq!(doc.to_u32(zero), Some(0));

    let negative = doc.new_number(-1.0);
    assert_eq!(doc.to_u32(negative), None);
    assert_eq!(doc.to_i32(negative), Some(-1));

    let huge = doc.new_number(1e20);
    assert_eq!(doc.to_i32(huge), None);
    assert_eq!(doc.to_u32(huge), None);
    assert_eq!(doc.to_f64(huge), Some(1e20));

    assert_eq!(doc.to_text(n), Some("2.7".to_string()));
}

#[test]
fn boolean_coercions() {
    let mut doc = Document::new();
    let t = doc.new_boolean(true);
    assert_eq!(doc.to_i32(t), Some(1));
    assert_eq!(doc.to_u32(t), Some(1));
    assert_eq!(doc.to_f64(t), Some(1.0));
    assert_eq!(doc.to_text(t), Some("true".to_string()));
}

#[test]
fn containers_do_not_coerce() {
    let mut doc = Document::new();
    let obj = doc.new_object();
    assert_eq!(doc.to_i32(obj), None);
    assert_eq!(doc.to_bool(obj), None);
    assert_eq!(doc.to_text(obj), None);

    let null = doc.new_null();
    assert_eq!(doc.to_text(null), None);
    assert_eq!(doc.to_f64(null), None);
}

#[test]
fn single_element_array_answers_for_its_element() {
    let mut doc = Document::new();
    let arr = doc.new_array();
    doc.push_number(arr, 42.0);
    assert_eq!(doc.to_i32(arr), Some(42));
    assert_eq!(doc.to_bool(arr), Some(true));

    doc.push_number(arr, 7.0);
    assert_eq!(doc.to_i32(arr), None);
}

// ===== serialization =====

#[test]
fn minimal_json_output() {
    let mut doc = Document::new();
    let root = doc.root();
    doc.add_string(root, "name", "demo");
    doc.add_number(root, "count", 5.0);
    doc.add_boolean(root, "ok", false);

    assert_eq!(
        doc.to_json(root),
        r#"{"name":"demo","count":5,"ok":false}"#
    );
}

#[test]
fn empty_array_renders_empty_and_is_skipped_by_objects() {
    let mut doc = Document::new();
    let root = doc.root();
    let arr = doc.add_array(root, "a");
    doc.add_number(root, "b", 1.0);

    assert_eq!(doc.to_json(arr), "");
    assert_eq!(doc.to_json(root), r#"{"b":1}"#);
}

#[test]
fn nested_empty_arrays_are_skipped_by_arrays() {
    let mut doc = Document::new();
    let root = doc.root();
    let arr = doc.add_array(root, "a");
    doc.push_number(arr, 1.0);
    doc.push_array(arr);

    assert_eq!(doc.to_json(arr), "[1]");
}

#[test]
fn strings_escape_on_output() {
    let mut doc = Document::new();
    let s = doc.new_string("a\"b\\c\nd\te\u{1}");
    assert_eq!(doc.to_json(s), r#""a\"b\\c\nd\te\u0001""#);
}

#[test]
fn null_and_nonfinite_render_as_null() {
    let mut doc = Document::new();
    let null = doc.new_null();
    assert_eq!(doc.to_json(null), "null");
    let nan = doc.new_number(f64::NAN);
    assert_eq!(doc.to_json(nan), "null");
}

#[test]
fn hand_built_document_round_trips() {
    let mut doc = Document::new();
    let root = doc.root();
    doc.add_string(root, "name", "Привет");
    let sizes = doc.add_array(root, "sizes");
    doc.push_number(sizes, 1.5);
    doc.push_number(sizes, -2.0);
    let meta = doc.add_object(root, "meta");
    doc.add_boolean(meta, "ok", true);

    let json = doc.to_json(root);
    let reparsed = parse(&json).unwrap();
    assert!(doc.deep_eq(root, &reparsed, reparsed.root()));
}
