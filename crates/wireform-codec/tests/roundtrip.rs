//! Integration tests: the engine's contract properties.
//!
//! Each test pins one documented behavior — round-trips per wire,
//! deterministic set encoding, union and literal tie-breaks, path
//! composition — so a change in any codec family that shifts observable
//! semantics fails here, not in a consumer.

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;
use wireform_codec::{Binary, Engine, Json, Text, engine};
use wireform_schema::{
    Bindings, Field, PathSegment, RecordType, TypeDescriptor, Value,
};

fn root() -> Bindings<'static> {
    Bindings::root()
}

fn scalar_cases() -> Vec<(TypeDescriptor, Value)> {
    vec![
        (TypeDescriptor::str(), Value::from("hello")),
        (TypeDescriptor::bytes(), Value::bytes(*b"\x00\x01wire")),
        (TypeDescriptor::int(), Value::Int(-42)),
        (TypeDescriptor::float(), Value::Float(2.5)),
        (
            TypeDescriptor::decimal(),
            Value::Decimal(Decimal::from_str("123.456").unwrap()),
        ),
        (TypeDescriptor::bool(), Value::Bool(true)),
        (TypeDescriptor::null(), Value::Null),
        (
            TypeDescriptor::date(),
            Value::Date(chrono::NaiveDate::from_ymd_opt(2018, 6, 16).unwrap()),
        ),
        (
            TypeDescriptor::datetime(),
            Value::DateTime(Utc.with_ymd_and_hms(2018, 6, 16, 12, 34, 56).unwrap()),
        ),
        (
            TypeDescriptor::uuid(),
            Value::Uuid(Uuid::from_str("035af02b-7ad7-4016-a101-96f8fc5ae6ec").unwrap()),
        ),
    ]
}

#[test]
fn scalars_round_trip_on_every_wire() {
    let engine = engine();
    for (descriptor, value) in scalar_cases() {
        let text = engine.text_codec(&descriptor).unwrap();
        let encoded = text.encode(&value, &root()).unwrap();
        assert_eq!(text.decode(encoded, &root()).unwrap(), value);

        let binary = engine.binary_codec(&descriptor).unwrap();
        let encoded = binary.encode(&value, &root()).unwrap();
        assert_eq!(binary.decode(encoded, &root()).unwrap(), value);

        let json = engine.json_codec(&descriptor).unwrap();
        let encoded = json.encode(&value, &root()).unwrap();
        assert_eq!(json.decode(encoded, &root()).unwrap(), value);
    }
}

#[test]
fn containers_round_trip_on_every_wire() {
    let engine = engine();
    let cases = vec![
        (
            TypeDescriptor::sequence(TypeDescriptor::int()),
            Value::list([Value::Int(3), Value::Int(1), Value::Int(2)]),
        ),
        (
            TypeDescriptor::set(TypeDescriptor::str()),
            Value::set([Value::from("b"), Value::from("a")]),
        ),
        (
            TypeDescriptor::tuple([TypeDescriptor::str(), TypeDescriptor::int()]),
            Value::tuple([Value::from("k"), Value::Int(9)]),
        ),
        (
            TypeDescriptor::mapping(TypeDescriptor::int(), TypeDescriptor::bool()),
            Value::map([(Value::Int(1), Value::Bool(true))]),
        ),
        (
            TypeDescriptor::union([TypeDescriptor::int(), TypeDescriptor::str()]),
            Value::Int(7),
        ),
        (
            TypeDescriptor::literal([Value::Int(1), Value::from("a")]),
            Value::from("a"),
        ),
    ];
    for (descriptor, value) in cases {
        let text = engine.text_codec(&descriptor).unwrap();
        let encoded = text.encode(&value, &root()).unwrap();
        assert_eq!(text.decode(encoded, &root()).unwrap(), value, "text wire");

        let binary = engine.binary_codec(&descriptor).unwrap();
        let encoded = binary.encode(&value, &root()).unwrap();
        assert_eq!(
            binary.decode(encoded, &root()).unwrap(),
            value,
            "binary wire"
        );

        let json = engine.json_codec(&descriptor).unwrap();
        let encoded = json.encode(&value, &root()).unwrap();
        assert_eq!(json.decode(encoded, &root()).unwrap(), value, "json wire");
    }
}

#[test]
fn set_encoding_is_byte_identical_and_sorted() {
    let descriptor = TypeDescriptor::set(TypeDescriptor::int());
    let value = Value::set([Value::Int(3), Value::Int(1), Value::Int(2)]);
    let first = wireform_codec::encode::<Text>(&descriptor, &value).unwrap();
    let second = wireform_codec::encode::<Text>(&descriptor, &value).unwrap();
    assert_eq!(first, "1,2,3");
    assert_eq!(first, second);
    let bytes = wireform_codec::encode::<Binary>(&descriptor, &value).unwrap();
    assert_eq!(bytes, b"[1,2,3]");
}

#[test]
fn required_field_omission() {
    let engine = engine();
    let record = RecordType::new(
        "Profile",
        vec![
            Field::new("name", TypeDescriptor::str()),
            Field::new("nick", TypeDescriptor::optional(TypeDescriptor::str())),
        ],
    );
    let codec = engine.json_codec(&TypeDescriptor::record(record)).unwrap();

    let err = codec
        .decode(serde_json::json!({"nick": "w"}), &root())
        .unwrap_err();
    assert_eq!(err.path(), &[PathSegment::Field("name".to_string())]);

    let decoded = codec
        .decode(serde_json::json!({"name": "w"}), &root())
        .unwrap();
    assert_eq!(
        decoded,
        Value::record([("name", Value::from("w")), ("nick", Value::Null)])
    );
}

#[test]
fn union_decode_is_first_match() {
    // `int | str` against the JSON string "5": the integer decoder
    // rejects a JSON string, so the string alternative wins and the
    // result is the string "5", not the integer 5.
    let descriptor = TypeDescriptor::union([TypeDescriptor::int(), TypeDescriptor::str()]);
    let decoded = wireform_codec::decode::<Json>(&descriptor, serde_json::json!("5")).unwrap();
    assert_eq!(decoded, Value::from("5"));
    // The JSON number 5 conversely resolves to the integer alternative.
    let decoded = wireform_codec::decode::<Json>(&descriptor, serde_json::json!(5)).unwrap();
    assert_eq!(decoded, Value::Int(5));
}

#[test]
fn literal_members_keep_their_kinds() {
    let descriptor = TypeDescriptor::literal([Value::Int(1), Value::Bool(true)]);
    let encoded =
        wireform_codec::encode::<Json>(&descriptor, &Value::Bool(true)).unwrap();
    assert_eq!(encoded, serde_json::json!(true));
    let encoded = wireform_codec::encode::<Json>(&descriptor, &Value::Int(1)).unwrap();
    assert_eq!(encoded, serde_json::json!(1));
}

#[test]
fn csv_quoting_round_trips() {
    let descriptor = TypeDescriptor::sequence(TypeDescriptor::str());
    let value = Value::list([
        Value::from("a"),
        Value::from("b,c"),
        Value::from("d"),
        Value::from("\"e\""),
    ]);
    let encoded = wireform_codec::encode::<Text>(&descriptor, &value).unwrap();
    assert_eq!(
        wireform_codec::decode::<Text>(&descriptor, encoded).unwrap(),
        value
    );
}

#[test]
fn nested_decode_paths_compose_root_to_leaf() {
    let engine = engine();
    let address = RecordType::new(
        "RoundTripAddress",
        vec![Field::new("zip", TypeDescriptor::str())],
    );
    let person = RecordType::new(
        "RoundTripPerson",
        vec![Field::new("addr", TypeDescriptor::record(address))],
    );
    let codec = engine.json_codec(&TypeDescriptor::record(person)).unwrap();
    let err = codec
        .decode(serde_json::json!({"addr": {}}), &root())
        .unwrap_err();
    assert_eq!(
        err.path(),
        &[
            PathSegment::Field("addr".to_string()),
            PathSegment::Field("zip".to_string()),
        ]
    );
}

#[test]
fn concurrent_resolution_is_behaviorally_identical() {
    let engine = Arc::new(Engine::new());
    let descriptor = TypeDescriptor::mapping(
        TypeDescriptor::int(),
        TypeDescriptor::sequence(TypeDescriptor::str()),
    );
    let value = Value::map([(
        Value::Int(1),
        Value::list([Value::from("a"), Value::from("b")]),
    )]);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = Arc::clone(&engine);
            let descriptor = descriptor.clone();
            let value = value.clone();
            std::thread::spawn(move || {
                let codec = engine.json_codec(&descriptor).unwrap();
                codec.encode(&value, &Bindings::root()).unwrap()
            })
        })
        .collect();

    let mut outputs = Vec::new();
    for handle in handles {
        outputs.push(handle.join().unwrap());
    }
    for output in &outputs {
        assert_eq!(output, &outputs[0]);
    }
}

#[test]
fn binary_composites_are_json_documents() {
    let engine = engine();
    let record = RecordType::new(
        "Reading",
        vec![
            Field::new("sensor", TypeDescriptor::str()),
            Field::new("value", TypeDescriptor::decimal()),
        ],
    );
    let descriptor = TypeDescriptor::record(record);
    let codec = engine.binary_codec(&descriptor).unwrap();
    let value = Value::record([
        ("sensor", Value::from("t1")),
        (
            "value",
            Value::Decimal(Decimal::from_str("21.5").unwrap()),
        ),
    ]);
    let encoded = codec.encode(&value, &root()).unwrap();
    assert_eq!(encoded, br#"{"sensor":"t1","value":"21.5"}"#);
    assert_eq!(codec.decode(encoded, &root()).unwrap(), value);
    assert_eq!(codec.content_type(), "application/json");
}

#[test]
fn generic_round_trips_on_the_text_wire() {
    let engine = engine();
    let page = RecordType::new_generic(
        "RoundTripPage",
        ["T"],
        vec![Field::new(
            "items",
            TypeDescriptor::sequence(TypeDescriptor::type_var("T")),
        )],
    );
    let descriptor = TypeDescriptor::generic(page, [TypeDescriptor::int()]);
    let codec = engine.text_codec(&descriptor).unwrap();
    let value = Value::record([("items", Value::list([Value::Int(1), Value::Int(2)]))]);
    let encoded = codec.encode(&value, &root()).unwrap();
    assert_eq!(encoded, r#"{"items":[1,2]}"#);
    assert_eq!(codec.decode(encoded, &root()).unwrap(), value);
}
