use serde_json::json;

use super::*;

#[test]
fn lenient_fields_and_id_aliases() {
    let bag: Bag = serde_json::from_value(json!({
        "_id": "abc",
        "name": "Spicy",
        "colour": 42,
        "textColour": "BLACK",
        "font": ["classic"],
        "bagImage": null
    }))
    .unwrap();
    assert_eq!(bag.id.as_deref(), Some("abc"));
    assert_eq!(bag.name.as_deref(), Some("Spicy"));
    assert_eq!(bag.colour, None);
    assert_eq!(bag.font, None);
    assert_eq!(bag.bag_image, None);
    assert_eq!(bag.text_fill(), TextFill::Black);

    let bag = Bag::from_value(&json!({"id": 7})).unwrap();
    assert_eq!(bag.id.as_deref(), Some("7"));

    let bag = Bag::from_value(&json!({"_id": "a", "id": "b"})).unwrap();
    assert_eq!(bag.id.as_deref(), Some("a"));

    assert!(Bag::from_value(&json!("nope")).is_none());
}

#[test]
fn serialization_uses_wire_names_and_skips_absent() {
    let bag = Bag {
        name: Some("Classic".to_string()),
        text_colour: Some("black".to_string()),
        bag_image: Some("/assets/x.png".to_string()),
        ..Bag::default()
    };
    let v = serde_json::to_value(&bag).unwrap();
    assert_eq!(
        v,
        json!({"name": "Classic", "textColour": "black", "bagImage": "/assets/x.png"})
    );
}

#[test]
fn unknown_enum_values_fall_back() {
    assert_eq!(FontAlias::parse_lenient(None), FontAlias::Standard);
    assert_eq!(FontAlias::parse_lenient(Some("gothic")), FontAlias::Standard);
    assert_eq!(FontAlias::parse_lenient(Some("Classic")), FontAlias::Classic);
    assert_eq!(
        FontAlias::parse_lenient(Some(" decorative ")),
        FontAlias::Decorative
    );

    assert_eq!(TextFill::parse_lenient(None), TextFill::White);
    assert_eq!(TextFill::parse_lenient(Some("purple")), TextFill::White);
    assert_eq!(TextFill::parse_lenient(Some("Black")), TextFill::Black);
}

#[test]
fn card_labels_fall_back() {
    let bag = Bag::default();
    assert_eq!(bag.card_title(), UNNAMED_TITLE);
    assert_eq!(bag.card_description(), DEFAULT_DESCRIPTION);

    let bag = Bag {
        name: Some("Paprika".to_string()),
        flavor: Some("Smoky".to_string()),
        ..Bag::default()
    };
    assert_eq!(bag.card_title(), "Paprika");
    assert_eq!(bag.card_description(), "Smoky");
}

#[test]
fn bag_list_shapes() {
    let one = json!({"name": "A"});
    assert_eq!(parse_bag_list(&json!([one.clone()])).len(), 1);
    assert_eq!(parse_bag_list(&json!({"bags": [one.clone(), one.clone()]})).len(), 2);
    assert_eq!(
        parse_bag_list(&json!({"data": {"bags": [one.clone(), 3, one.clone()]}})).len(),
        2
    );
    assert!(parse_bag_list(&json!({"items": [one.clone()]})).is_empty());
    assert!(parse_bag_list(&json!("x")).is_empty());
}

#[test]
fn bag_record_shapes() {
    let rec = json!({"_id": "1", "name": "A"});
    for v in [
        rec.clone(),
        json!({"bag": rec.clone()}),
        json!({"data": rec.clone()}),
        json!({"data": {"bag": rec.clone()}}),
    ] {
        let bag = parse_bag_record(&v).unwrap();
        assert_eq!(bag.id.as_deref(), Some("1"));
    }
}
