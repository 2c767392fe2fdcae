//! Integration tests for path expressions over untyped value trees.

use fieldpath::path::{Path, PathError};
use fieldpath::value::Value;

/// Helper to create a sample bookstore document.
fn create_bookstore() -> Value {
    serde_json::from_str(
        r#"{
            "store": {
                "book": [
                    {
                        "category": "reference",
                        "author": "Nigel Rees",
                        "title": "Sayings of the Century",
                        "price": 8.95
                    },
                    {
                        "category": "fiction",
                        "author": "Herman Melville",
                        "title": "Moby Dick",
                        "price": 8.99
                    }
                ],
                "bicycle": {
                    "color": "red",
                    "price": 19.95
                }
            }
        }"#,
    )
    .unwrap()
}

/// Test that a dotted field chain resolves a single leaf.
#[test]
fn test_get_single_field() {
    let doc = create_bookstore();
    let path = Path::compile(".store.bicycle.color").unwrap();
    assert_eq!(path.get(&doc).unwrap().as_str(), Some("red"));
}

/// Test that a fixed index selects one element of a sequence.
#[test]
fn test_get_indexed_element() {
    let doc = create_bookstore();
    let path = Path::compile(".store.book[1].title").unwrap();
    assert_eq!(path.get(&doc).unwrap().as_str(), Some("Moby Dick"));
}

/// Test that projection collects one result per element, in order.
#[test]
fn test_projection_collects_all_authors() {
    let doc = create_bookstore();
    let path = Path::compile(".store.book[].author").unwrap();
    assert_eq!(
        path.get(&doc).unwrap().to_value(),
        Some(Value::Sequence(vec![
            Value::from("Nigel Rees"),
            Value::from("Herman Melville"),
        ]))
    );
}

/// Test that projection over an empty sequence is empty, not an error.
#[test]
fn test_projection_over_empty_sequence() {
    let doc: Value = serde_json::from_str(r#"{"store": {"book": []}}"#).unwrap();
    let path = Path::compile(".store.book[].author").unwrap();
    let values = path.values(&doc).unwrap();
    assert!(values.is_empty());
}

/// Test that elements missing the projected field are skipped rather than
/// failing the whole projection.
#[test]
fn test_projection_skips_absent_leaves() {
    let doc: Value =
        serde_json::from_str(r#"{"book": [{"isbn": "a"}, {"title": "b"}, {"isbn": "c"}]}"#)
            .unwrap();
    let path = Path::compile(".book[].isbn").unwrap();
    assert_eq!(
        path.get(&doc).unwrap().to_value(),
        Some(Value::Sequence(vec![Value::from("a"), Value::from("c")]))
    );
}

/// Test that predicate select picks the first matching element.
#[test]
fn test_select_by_field_value() {
    let doc = create_bookstore();
    let path = Path::compile(".store.book[.category=\"fiction\"].title").unwrap();
    assert_eq!(path.get(&doc).unwrap().as_str(), Some("Moby Dick"));
}

/// Test that slicing clamps to the sequence bounds.
#[test]
fn test_slice_is_clamped() {
    let doc = create_bookstore();
    let path = Path::compile(".store.book[0:10][].title").unwrap();
    let values = path.values(&doc).unwrap();
    assert_eq!(values.len(), 2);
}

/// Test the read-after-write property for a fresh location.
#[test]
fn test_set_then_get_round_trip() {
    let mut doc = create_bookstore();
    let path = Path::compile(".store.bicycle.owner").unwrap();
    path.set(&mut doc, "pat".to_string()).unwrap();
    assert_eq!(path.get(&doc).unwrap().as_str(), Some("pat"));
}

/// Test that writing deep into an empty document creates every
/// intermediate container.
#[test]
fn test_set_vivifies_from_scratch() {
    let mut doc = Value::Null;
    let path = Path::compile(".spec.template.containers[0].name").unwrap();
    path.set(&mut doc, "web".to_string()).unwrap();
    assert_eq!(path.get(&doc).unwrap().as_str(), Some("web"));
}

/// Test that select-on-write appends exactly one element and leaves the
/// others untouched.
#[test]
fn test_select_write_appends_once() {
    let mut doc: Value =
        serde_json::from_str(r#"{"book": [{"category": "reference"}, {"category": "fiction"}]}"#)
            .unwrap();
    let path = Path::compile(".book[.category=\"poetry\"].title").unwrap();
    path.set(&mut doc, "Leaves of Grass".to_string()).unwrap();

    let books = doc.get("book").unwrap();
    assert_eq!(Value::len(books), Some(3));
    assert_eq!(
        books.at(0).and_then(|b| b.get("category")).and_then(Value::as_str),
        Some("reference")
    );
    assert_eq!(
        books.at(2).and_then(|b| b.get("category")).and_then(Value::as_str),
        Some("poetry")
    );
    assert_eq!(
        books.at(2).and_then(|b| b.get("title")).and_then(Value::as_str),
        Some("Leaves of Grass")
    );
}

/// Test that compiled paths are reusable across documents.
#[test]
fn test_compiled_path_reuse() {
    let path = Path::compile(".name").unwrap();
    for name in ["a", "b", "c"] {
        let doc: Value = serde_json::from_str(&format!(r#"{{"name": "{}"}}"#, name)).unwrap();
        assert_eq!(path.get(&doc).unwrap().as_str(), Some(name));
    }
}

/// Test that compiled paths can be shared across threads.
#[test]
fn test_concurrent_get_on_shared_path() {
    let path = std::sync::Arc::new(Path::compile(".store.book[].price").unwrap());
    let doc = std::sync::Arc::new(create_bookstore());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let path = path.clone();
            let doc = doc.clone();
            std::thread::spawn(move || path.values(doc.as_ref()).unwrap().len())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 2);
    }
}

/// Test that YAML documents work the same as JSON documents.
#[test]
fn test_yaml_document() {
    let doc = Value::from_yaml("servers:\n- host: a\n  port: 1\n- host: b\n  port: 2").unwrap();
    let path = Path::compile(".servers[.host=\"b\"].port").unwrap();
    assert_eq!(
        path.get(&doc).unwrap().to_value(),
        Some(Value::from(2i64))
    );
}

/// Test that a failed deep write reports the prefix that rejected it.
#[test]
fn test_set_error_is_located() {
    let mut doc = create_bookstore();
    let path = Path::compile(".store.bicycle.color.shade").unwrap();
    match path.get(&doc) {
        Ok(resolved) => assert!(resolved.is_unknown()),
        Err(other) => panic!("expected unknown, got {:?}", other),
    }
    match path.set(&mut doc, "dark".to_string()) {
        Err(PathError::TypeMismatch { prefix, .. }) => {
            assert_eq!(prefix, "<object>.store.bicycle.color");
        }
        other => panic!("expected TypeMismatch, got {:?}", other),
    }
}
