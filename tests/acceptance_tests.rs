#![allow(clippy::panic_in_result_fn)]
#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::indexing_slicing)]

use serde_json::json;
use tagreader::{
    digits::credit_card_mask_n16,
    xml::{self, XmlNode, XmlValue},
    Found, HtmlReader,
};

fn keyed(node: &XmlNode) -> serde_json::Value {
    node.to_json()
}

#[test]
fn test_selector_returns_requested_attributes() {
    let html = r#"<div class="box"><a><img src="x.png" alt="pic"></a></div>"#;
    let mut reader = HtmlReader::from(html);

    let data = reader.find_one("div.box a img[src|alt]").data(None);
    assert_eq!(
        serde_json::to_value(&data).unwrap(),
        json!({ "src": "x.png", "alt": "pic" })
    );
}

#[test]
fn test_first_tag_with_id() {
    let html = r#"<p id="a">1</p><p id="b">2</p><div id="b">3</div>"#;
    let mut reader = HtmlReader::from(html);
    assert_eq!(reader.find_one("#b").inner_data(None), "2");

    reader.flush_results();
    assert!(reader.find_one("#c").results().is_none());
}

#[test]
fn test_positions_of_paired_and_void_tags() {
    let html = "<p>ab</p><br>";
    let mut reader = HtmlReader::from(html);

    let data = reader.find_all("p").data(None);
    assert_eq!(serde_json::to_value(&data).unwrap()[0]["positions"], json!([3, 5, 0, 9]));

    reader.flush_results();
    let data = reader.find_one("br").data(None);
    assert_eq!(
        data.as_ref().and_then(Found::as_tag).map(|t| t.positions.to_vec()),
        Some(vec![9, 13])
    );
}

#[test]
fn test_xml_boundaries() -> Result<(), Box<dyn std::error::Error>> {
    assert_eq!(keyed(&xml::parse("<a></a>")?), json!({ "a": null }));
    assert_eq!(keyed(&xml::parse("<a/>")?), json!({ "a": {} }));
    assert_eq!(
        keyed(&xml::parse(r#"<a x="1"></a>"#)?),
        json!({ "a": { "@x": "1" } })
    );
    Ok(())
}

#[test]
fn test_repeated_items_become_a_list() -> Result<(), Box<dyn std::error::Error>> {
    let tree = xml::parse("<root><item>1</item><item>2</item></root>")?;
    assert_eq!(keyed(&tree), json!({ "root": { "item": ["1", "2"] } }));
    assert!(matches!(
        tree.child("root")
            .and_then(XmlValue::as_node)
            .and_then(|n| n.child("item")),
        Some(XmlValue::List(_))
    ));
    Ok(())
}

#[test]
fn test_credit_card_mask() {
    assert_eq!(credit_card_mask_n16("1234567890123456"), "1234 5678 9012 3456");
}
