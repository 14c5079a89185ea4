//! Integration tests for paragraph key resolution.

use std::borrow::Cow;

use floatcol_layout::layout::{paragraph_keys, resolve_keys};
use floatcol_layout::{BlockBox, BoxId, Item, ParagraphKey, WrappableText};

#[test]
fn test_second_duplicate_is_synthesized() {
    let items: Vec<Item> = vec![
        WrappableText::plain("first").key("a").into(),
        WrappableText::plain("second").key("a").into(),
    ];
    let keys = paragraph_keys(&items);
    assert_eq!(keys[0], ParagraphKey::from("a"));
    assert_ne!(keys[1], ParagraphKey::from("a"));
    assert!(matches!(keys[1], ParagraphKey::Int(value) if value < 0));
}

#[test]
fn test_caller_sequence_is_not_modified() {
    let items: Vec<Item> = vec![
        WrappableText::plain("first").into(),
        WrappableText::plain("second").into(),
    ];
    let resolved = resolve_keys(&items);
    assert!(matches!(resolved, Cow::Owned(_)));
    assert_eq!(items[1].as_text().map(|text| &text.key), Some(&ParagraphKey::Anonymous));
}

#[test]
fn test_boxes_are_left_alone() {
    let items: Vec<Item> = vec![
        BlockBox::new(BoxId(1)).into(),
        WrappableText::plain("x").into(),
        BlockBox::new(BoxId(2)).into(),
    ];
    let resolved = resolve_keys(&items);
    assert!(matches!(resolved, Cow::Borrowed(_)));
    assert_eq!(paragraph_keys(&items), vec![ParagraphKey::Anonymous]);
}

#[test]
fn test_keys_parse_from_json() {
    let items: Vec<Item> = serde_json::from_str(
        r#"[
            {"type": "text", "key": "intro", "text": {"type": "text", "text": "a"}},
            {"type": "text", "key": 7, "text": {"type": "text", "text": "b"}},
            {"type": "text", "text": {"type": "text", "text": "c"}}
        ]"#,
    )
    .unwrap();
    assert_eq!(
        paragraph_keys(&items),
        vec![
            ParagraphKey::from("intro"),
            ParagraphKey::Int(7),
            ParagraphKey::Anonymous,
        ]
    );
}
