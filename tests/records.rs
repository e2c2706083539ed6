//! End-to-end record scenarios through the public API.

use recordkit::list::List;
use recordkit::range::parse_duration;
use recordkit::types::{Boolean, Coerce, Integer, IsoDateTime, OneOf};
use recordkit::{
    read_only, record_type, serialize, Args, Error, Marker, Range, RecordType, RecordTypeRef,
    SchemaRegistry, Shape, Value,
};
use serde_json::json;

fn account() -> RecordTypeRef {
    record_type! {
        Account {
            owner: Shape::Str,
            balance: Integer::new().min(0) => 0,
            currency: OneOf::new(["EUR", "USD"]) => "EUR",
            opened: IsoDateTime::with_default_offset("Z") => Marker::Optional,
            number: Shape::Int => read_only(1),
            kind: Shape::Constant => "checking",
            tags: List::new(Shape::Str).max_length(2).unique() => Marker::Optional,
        }
    }
    .unwrap()
}

#[test]
fn serialize_then_construct_round_trips() {
    let ty = account();
    let record = ty
        .construct(
            Args::new()
                .arg("ada")
                .kw("balance", "250")
                .kw("opened", "2024-01-20T12:00:00")
                .kw("tags", vec!["gold"]),
        )
        .unwrap();

    let data = serialize(&Value::from(record.clone())).unwrap();
    assert_eq!(
        data,
        json!({
            "owner": "ada",
            "balance": 250,
            "currency": "EUR",
            "opened": "2024-01-20T12:00:00+00:00",
            "number": 1,
            "kind": "checking",
            "tags": ["gold"]
        })
    );

    let mut keywords = data.as_object().unwrap().clone();
    keywords.remove("kind");
    let rebuilt = ty.from_json(&serde_json::Value::Object(keywords)).unwrap();
    assert_eq!(rebuilt, record);
}

#[test]
fn json_text_arguments_construct_records() {
    let ty = account();
    let record = ty.construct(r#"{"owner": "bo", "balance": 3}"#).unwrap();
    assert_eq!(record.get("balance"), Some(&Value::Int(3)));

    let positional = ty.construct(r#"["cy", 4]"#).unwrap();
    assert_eq!(positional.get("owner"), Some(&Value::from("cy")));
}

#[test]
fn required_fields_must_be_supplied() {
    let err = account().construct(Args::new()).unwrap_err();
    assert_eq!(
        err,
        Error::RequiredAttribute {
            name: "owner".to_string()
        }
    );
    assert!(account().construct(Args::new().kw("owner", "ada")).is_ok());
}

#[test]
fn read_only_fields_are_set_at_construction_only() {
    let ty = account();
    let mut record = ty
        .construct(Args::new().kw("owner", "ada").kw("number", 7))
        .unwrap();
    assert_eq!(record.get("number"), Some(&Value::Int(7)));

    let err = record.set("number", 8).unwrap_err();
    assert_eq!(
        err,
        Error::ReadOnlyField {
            name: "number".to_string()
        }
    );
    assert!(record.delete("number").is_err());
    assert_eq!(record.get("number"), Some(&Value::Int(7)));
}

#[test]
fn constants_reject_any_construction_value() {
    let ty = account();
    for value in ["checking", "savings"] {
        let err = ty
            .construct(Args::new().kw("owner", "ada").kw("kind", value))
            .unwrap_err();
        assert_eq!(
            err,
            Error::ReadOnlyField {
                name: "kind".to_string()
            }
        );
    }

    let mut record = ty.construct(Args::new().kw("owner", "ada")).unwrap();
    assert!(record.set("kind", "checking").is_err());
}

#[test]
fn coercion_failures_name_field_and_label() {
    let err = account()
        .construct(Args::new().kw("owner", "ada").kw("balance", -5))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid <Integer> value (-5) for field 'balance': not >= 0"
    );
    assert!(matches!(err.root_cause(), Error::Invalid(_)));
}

#[test]
fn mutation_coerces_and_null_unsets() {
    let ty = account();
    let mut record = ty.construct(Args::new().kw("owner", "ada")).unwrap();

    record.set("currency", "USD").unwrap();
    assert!(record.set("currency", "GBP").is_err());
    assert_eq!(record.get("currency"), Some(&Value::from("USD")));

    record.set("opened", "2024-03-01T08:00:00+02:00").unwrap();
    record.set("opened", Value::Null).unwrap();
    assert!(!record.contains("opened"));

    let err = record.set("missing", 1).unwrap_err();
    assert!(matches!(err, Error::UndefinedAttribute { .. }));
}

#[test]
fn bounded_list_fields_keep_their_invariants() {
    let ty = account();
    let mut record = ty
        .construct(Args::new().kw("owner", "ada").kw("tags", vec!["gold"]))
        .unwrap();

    let tags = record.list_mut("tags").unwrap();
    assert_eq!(
        tags.push(Value::from("gold")).unwrap_err(),
        Error::ListDuplicate {
            value: "gold".to_string()
        }
    );
    tags.push(Value::from("silver")).unwrap();
    assert_eq!(
        tags.push(Value::from("bronze")).unwrap_err(),
        Error::ListTooLong { max: 2 }
    );

    assert_eq!(
        record.serialize()["tags"],
        json!(["gold", "silver"])
    );
}

#[test]
fn bounded_list_removal_respects_minimum() {
    let list = List::new(Shape::Int).min_length(2);
    let coerced = list.coerce(Value::from(vec![1, 2, 3])).unwrap();
    let mut items = coerced.as_items().unwrap().clone();

    assert_eq!(items.remove(0).unwrap(), Value::Int(1));
    assert_eq!(items.remove(0).unwrap_err(), Error::ListTooShort { min: 2 });
    assert_eq!(items, vec![Value::Int(2), Value::Int(3)]);
}

#[test]
fn subclass_overrides_leave_base_untouched() {
    let base = record_type! {
        Vehicle {
            wheels: Shape::Int => 4,
            color: Shape::Str => "white",
        }
    }
    .unwrap();
    let bike = record_type! {
        Bike extends [base] {
            wheels: Shape::Int => 2,
            bell: Shape::Bool => true,
        }
    }
    .unwrap();

    let vehicle = base.construct(Args::new()).unwrap();
    let cycle = bike.construct(Args::new()).unwrap();

    assert_eq!(vehicle.get("wheels"), Some(&Value::Int(4)));
    assert_eq!(cycle.get("wheels"), Some(&Value::Int(2)));
    assert_eq!(cycle.get("color"), Some(&Value::from("white")));
    assert!(vehicle.try_get("bell").is_err());

    let names: Vec<&str> = cycle.fields().into_iter().map(|(name, _)| name).collect();
    assert_eq!(names, ["wheels", "color", "bell"]);
}

#[test]
fn nested_records_construct_from_primitive_data() {
    let point = record_type! { Point { x: Shape::Int, y: Shape::Int } }.unwrap();
    let segment = RecordType::builder("Segment")
        .required("start", &point)
        .required("end", &point)
        .build()
        .unwrap();

    let record = segment
        .from_json(&json!({"start": {"x": 0, "y": 0}, "end": [3, "4"]}))
        .unwrap();
    assert_eq!(
        record.serialize(),
        json!({"start": {"x": 0, "y": 0}, "end": {"x": 3, "y": 4}})
    );
}

#[test]
fn added_fields_reach_existing_instances() {
    let ty = record_type! { Note { text: Shape::Str } }.unwrap();
    let mut note = ty.construct("hello").unwrap();

    SchemaRegistry::global()
        .add_field(&ty, "pinned", Shape::Bool, false)
        .unwrap();

    note.set("pinned", "true").unwrap();
    assert_eq!(note.serialize(), json!({"text": "hello", "pinned": 1}));

    let fresh = ty.construct(Args::new().kw("text", "bye")).unwrap();
    assert_eq!(fresh.get("pinned"), Some(&Value::Bool(false)));
}

#[test]
fn forced_integers_clamp_and_booleans_parse() {
    let clamped = Integer::new().min(5).max(15).force();
    assert_eq!(clamped.coerce(Value::from(20)).unwrap(), Value::Int(15));
    assert_eq!(clamped.coerce(Value::from(0)).unwrap(), Value::Int(5));

    let flag = Boolean::new();
    assert_eq!(flag.coerce(Value::from("TrUe")).unwrap(), Value::Bool(true));
    assert!(flag.coerce(Value::from("2")).is_err());
}

#[test]
fn durations_and_ranges() {
    let duration = parse_duration("P1Y2M3DT4H5M6S").unwrap();
    assert_eq!(
        (
            duration.years,
            duration.months,
            duration.weeks,
            duration.days,
            duration.hours,
            duration.minutes,
            duration.seconds
        ),
        (1, 2, 0, 3, 4, 5, 6.0)
    );
    assert!(parse_duration("ABC").is_none());

    let hour = Range::datetimes("20240120T12--PT1H").unwrap();
    assert_eq!(
        hour.lower_bound().map(Value::to_string).as_deref(),
        Some("2024-01-20T12:00:00+00:00")
    );
    assert_eq!(
        hour.upper_bound().map(Value::to_string).as_deref(),
        Some("2024-01-20T13:00:00+00:00")
    );

    let exclusive = Range::new(Args::new().arg(1).arg(10).kw("is_lower_exclusive", true)).unwrap();
    assert!(!exclusive.contains(&Value::from(1)).unwrap());
    let inclusive = Range::new(Args::new().arg(1).arg(10)).unwrap();
    assert!(inclusive.contains(&Value::from(10)).unwrap());
}

#[test]
fn records_serialize_with_serde() {
    let ty = record_type! { Tag { name: Shape::Str, weight: Shape::Float => 1.0 } }.unwrap();
    let record = ty.construct("[\"urgent\"]").unwrap();
    assert_eq!(
        serde_json::to_string(&record).unwrap(),
        r#"{"name":"urgent","weight":1.0}"#
    );
    assert_eq!(serialize(&Value::from(3)).unwrap_err(), Error::NotARecord);
}
