#![allow(clippy::panic_in_result_fn)]
#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::indexing_slicing)]

use serde_json::json;
use tagreader::xml::{self, attributes_of, enter, StringifyOptions, XmlValue};

const SAMPLE: &str = include_str!("input/sample.xml");

#[test]
fn test_parse_sample_document() -> Result<(), Box<dyn std::error::Error>> {
    let tree = xml::parse(SAMPLE)?;

    assert_eq!(
        serde_json::to_value(&tree)?,
        json!({
            "@version": "1.0",
            "@encoding": "utf-8",
            "data": {
                "title": { "@lang": "en", "&text": "Weekly report" },
                "created": "2024-03-01",
                "entries": {
                    "entry": [
                        {
                            "@id": "1",
                            "name": "Lamp",
                            "price": { "@currency": "EUR", "&text": "12.50" },
                            "tags": { "tag": ["light", "home"] }
                        },
                        {
                            "@id": "2",
                            "name": "Chair",
                            "price": { "@currency": "EUR", "&text": "48.00" },
                            "tags": { "tag": "furniture" },
                            "discontinued": {}
                        }
                    ]
                },
                "notes": null
            }
        })
    );
    Ok(())
}

#[test]
fn test_navigate_parsed_tree() -> Result<(), Box<dyn std::error::Error>> {
    let tree = xml::parse(SAMPLE)?;

    let title = enter(&tree, "data title").and_then(XmlValue::as_node).unwrap();
    assert_eq!(attributes_of(title).get("lang").map(String::as_str), Some("en"));
    assert_eq!(title.text(), Some("Weekly report"));

    let entries = enter(&tree, "data entries entry")
        .and_then(XmlValue::as_list)
        .unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(
        entries[1].as_node().and_then(|n| n.attribute("id")),
        Some("2")
    );

    // Lists are not entered
    assert!(enter(&tree, "data entries entry name").is_none());
    assert!(enter(&tree, "data notes").is_some_and(XmlValue::is_null));
    Ok(())
}

#[test]
fn test_round_trip_sample() -> Result<(), Box<dyn std::error::Error>> {
    let tree = xml::parse(SAMPLE)?;
    let text = xml::stringify(&tree, &StringifyOptions::default());

    assert!(text.starts_with(r#"<?xml version="1.0" encoding="utf-8"?>"#));
    assert!(text.contains("\n  <notes></notes>"));
    assert!(text.contains("<discontinued />"));
    assert_eq!(xml::parse(&text)?, tree);
    Ok(())
}

#[test]
fn test_round_trip_compact() -> Result<(), Box<dyn std::error::Error>> {
    let tree = xml::parse(SAMPLE)?;
    let text = xml::stringify(&tree, &StringifyOptions::compact());

    assert!(!text.contains('\n'));
    assert_eq!(xml::parse(&text)?, tree);
    Ok(())
}

#[test]
fn test_round_trip_without_prolog() -> Result<(), Box<dyn std::error::Error>> {
    let tree = xml::parse("<root><item>1</item><item>2</item></root>")?;
    assert!(tree.attributes.is_empty());

    let text = xml::stringify(&tree, &StringifyOptions::compact());
    assert_eq!(
        text,
        r#"<?xml version="1.0" encoding="UTF-8"?><root><item>1</item><item>2</item></root>"#
    );

    // Only the prolog attributes are new
    let reparsed = xml::parse(&text)?;
    assert_eq!(reparsed.children, tree.children);
    assert_eq!(
        serde_json::to_value(&reparsed)?,
        json!({ "@version": "1.0", "@encoding": "utf-8", "root": { "item": ["1", "2"] } })
    );

    let body = xml::stringify_body(&tree, &StringifyOptions::compact());
    assert_eq!(xml::parse(&body)?, tree);
    Ok(())
}

#[test]
fn test_json_boundary_matches_tree()-> Result<(), Box<dyn std::error::Error>> {
    let tree = xml::parse(SAMPLE)?;
    let options = StringifyOptions::default();

    let keyed = serde_json::to_value(&tree)?;
    assert_eq!(xml::node_from_json(&keyed)?, tree);
    assert_eq!(
        xml::stringify_value(&keyed, &options)?,
        xml::stringify(&tree, &options)
    );
    Ok(())
}

#[test]
fn test_stringify_body_has_no_prolog() -> Result<(), Box<dyn std::error::Error>> {
    let tree = xml::parse("<a><b>1</b><b>2</b></a>")?;
    assert_eq!(
        xml::stringify_body(&tree, &StringifyOptions::default()),
        "<a>\n  <b>1</b>\n  <b>2</b>\n</a>"
    );
    Ok(())
}

#[test]
fn test_mixed_content_is_lossy() -> Result<(), Box<dyn std::error::Error>> {
    let tree = xml::parse("<p>a<b>x</b>c</p>")?;
    let p = tree.child("p").and_then(XmlValue::as_node).unwrap();
    assert_eq!(p.text, vec!["a".to_string(), "c".to_string()]);
    assert_eq!(p.inner_text.as_deref(), Some("a<b>x</b>c"));

    // Raw captures are never written back
    let text = xml::stringify_body(&tree, &StringifyOptions::compact());
    assert_eq!(text, "<p>ac<b>x</b></p>");
    Ok(())
}
