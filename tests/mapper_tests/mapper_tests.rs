//! Mapper Tests
//!
//! Tests for native value conversion and projection.

use std::collections::{BTreeMap, HashMap};

use bytes::Bytes;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use xmlrpc_codec::mapper::project;
use xmlrpc_codec::{record, Fault, FaultCode, FromValue, Member, ToValue, Value};

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Person {
        pub name: String => "Name",
        pub age: i32 => "Age",
        pub email: String,
        pub tags: Vec<String>,
    }
}

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    struct Team {
        lead: Person,
        members: Vec<Person>,
        budget: Option<f64>,
    }
}

fn alice() -> Person {
    Person {
        name: "Alice".to_string(),
        age: 30,
        email: "alice@example.com".to_string(),
        tags: vec!["admin".to_string()],
    }
}

fn round_trip<T>(native: &T) -> T
where
    T: ToValue + FromValue + Default,
{
    let mut out = T::default();
    project(&native.to_value(), &mut out).unwrap();
    out
}

fn assert_internal_error<T: FromValue>(value: &Value, dest: &mut T) -> String {
    let err = project(value, dest).unwrap_err();
    let fault = err.fault().expect("fault error");
    assert!(fault.is(FaultCode::InternalError), "unexpected fault {}", fault);
    fault.message.clone()
}

// =============================================================================
// Primitive Tests
// =============================================================================

#[test]
fn test_primitive_kinds() {
    assert_eq!(true.to_value(), Value::Boolean(true));
    assert_eq!(7u8.to_value(), Value::Int(7));
    assert_eq!((-3i64).to_value(), Value::Int(-3));
    assert_eq!(2.5f32.to_value(), Value::Double(2.5));
    assert_eq!("hi".to_value(), Value::String("hi".into()));
    assert_eq!(().to_value(), Value::Nil);
    assert_eq!(Bytes::from_static(b"\x00\x01").to_value(), Value::Base64(vec![0, 1]));
}

#[test]
fn test_primitive_round_trips() {
    assert!(round_trip(&true));
    assert_eq!(round_trip(&-17i32), -17);
    assert_eq!(round_trip(&u16::MAX), u16::MAX);
    assert_eq!(round_trip(&3.25f64), 3.25);
    assert_eq!(round_trip(&"text".to_string()), "text");
    assert_eq!(round_trip(&Bytes::from_static(b"raw")), Bytes::from_static(b"raw"));
}

#[test]
fn test_date_time_round_trips() {
    let utc: DateTime<Utc> = Utc.with_ymd_and_hms(2020, 5, 17, 10, 0, 0).unwrap();
    assert_eq!(round_trip(&utc), utc);

    let naive: NaiveDateTime = NaiveDate::from_ymd_opt(1999, 12, 31)
        .unwrap()
        .and_hms_opt(23, 59, 59)
        .unwrap();
    assert_eq!(round_trip(&naive), naive);
}

#[test]
fn test_unsigned_beyond_int_range_is_nil() {
    assert_eq!(u64::MAX.to_value(), Value::Nil);
    assert_eq!((i64::MAX as u64).to_value(), Value::Int(i64::MAX));
}

#[test]
fn test_int_projection_range_checked() {
    let mut small = 0u8;
    let message = assert_internal_error(&Value::Int(300), &mut small);
    assert!(message.contains("u8"), "{}", message);
    assert_eq!(small, 0);

    let mut negative = 0u32;
    assert_internal_error(&Value::Int(-1), &mut negative);
}

#[test]
fn test_scalar_kind_mismatch() {
    let mut flag = false;
    let message = assert_internal_error(&Value::String("true".into()), &mut flag);
    assert!(message.contains("string"), "{}", message);

    let mut count = 0i32;
    assert_internal_error(&Value::Double(1.0), &mut count);
}

// =============================================================================
// Sequence & Map Tests
// =============================================================================

#[test]
fn test_sequence_round_trip() {
    let numbers = vec![1i64, -2, 3];
    assert_eq!(numbers.to_value(), Value::Array(vec![Value::Int(1), Value::Int(-2), Value::Int(3)]));
    assert_eq!(round_trip(&numbers), numbers);

    let fixed = [true, false];
    assert_eq!(fixed.to_value(), Value::Array(vec![Value::Boolean(true), Value::Boolean(false)]));
}

#[test]
fn test_sequence_projection_appends() {
    let mut seen: Vec<i32> = vec![1];
    project(&Value::Array(vec![Value::Int(2), Value::Int(3)]), &mut seen).unwrap();
    project(&Value::Array(vec![Value::Int(4)]), &mut seen).unwrap();
    assert_eq!(seen, vec![1, 2, 3, 4]);
}

#[test]
fn test_sequence_projection_failure_appends_nothing() {
    let mut seen: Vec<i32> = Vec::new();
    let bad = Value::Array(vec![Value::Int(1), Value::String("two".into())]);
    assert_internal_error(&bad, &mut seen);
    assert!(seen.is_empty());
}

#[test]
fn test_map_round_trip() {
    let mut scores = BTreeMap::new();
    scores.insert("a".to_string(), 1i32);
    scores.insert("b".to_string(), 2i32);

    assert_eq!(
        scores.to_value(),
        Value::Struct(vec![Member::new("a", Value::Int(1)), Member::new("b", Value::Int(2))])
    );
    assert_eq!(round_trip(&scores), scores);

    let mut hashed: HashMap<String, String> = HashMap::new();
    hashed.insert("k".to_string(), "v".to_string());
    assert_eq!(round_trip(&hashed), hashed);
}

#[test]
fn test_map_projection_failure_inserts_nothing() {
    let mut scores: BTreeMap<String, i32> = BTreeMap::new();
    let bad = Value::Struct(vec![
        Member::new("a", Value::Int(1)),
        Member::new("b", Value::String("two".into())),
    ]);
    assert_internal_error(&bad, &mut scores);
    assert!(scores.is_empty());

    let mut hashed: HashMap<String, i32> = HashMap::new();
    assert_internal_error(&bad, &mut hashed);
    assert!(hashed.is_empty());
}

#[test]
fn test_byte_vectors_are_int_arrays_unless_wrapped() {
    let raw = vec![1u8, 2];
    assert_eq!(raw.to_value(), Value::Array(vec![Value::Int(1), Value::Int(2)]));
    assert_eq!(Bytes::from(raw).to_value(), Value::Base64(vec![1, 2]));
}

#[test]
fn test_map_accepts_record_struct() {
    let mut loose: BTreeMap<String, Value> = BTreeMap::new();
    project(&alice().to_value(), &mut loose).unwrap();

    assert_eq!(loose["Name"], Value::String("Alice".into()));
    assert_eq!(loose["Age"], Value::Int(30));
    assert!(loose.contains_key("email"));
}

#[test]
fn test_struct_into_sequence_is_mismatch() {
    let mut list: Vec<String> = Vec::new();
    let message = assert_internal_error(&alice().to_value(), &mut list);
    assert!(message.contains("struct"), "{}", message);
}

// =============================================================================
// Optional & Dynamic Tests
// =============================================================================

#[test]
fn test_option_mapping() {
    let none: Option<i32> = None;
    assert_eq!(none.to_value(), Value::Nil);
    assert_eq!(Some(5i32).to_value(), Value::Int(5));

    let mut slot: Option<i32> = None;
    project(&Value::Int(8), &mut slot).unwrap();
    assert_eq!(slot, Some(8));

    project(&Value::Nil, &mut slot).unwrap();
    assert_eq!(slot, Some(8));
}

#[test]
fn test_boxed_value_dereferenced_once() {
    let boxed: Box<i32> = Box::new(11);
    assert_eq!(boxed.to_value(), Value::Int(11));

    let mut target: Box<String> = Box::default();
    project(&Value::String("in box".into()), &mut target).unwrap();
    assert_eq!(*target, "in box");
}

#[test]
fn test_empty_values_leave_destination_untouched() {
    let mut text = "keep".to_string();
    project(&Value::Nil, &mut text).unwrap();
    project(&Value::Array(Vec::new()), &mut text).unwrap();
    project(&Value::Struct(Vec::new()), &mut text).unwrap();
    assert_eq!(text, "keep");
}

#[test]
fn test_value_destination_receives_raw_payload() {
    let payload = Value::Array(vec![Value::Int(1), Value::Struct(vec![Member::new("x", Value::Nil)])]);
    let mut raw = Value::Nil;
    project(&payload, &mut raw).unwrap();
    assert_eq!(raw, payload);
}

// =============================================================================
// Record Tests
// =============================================================================

#[test]
fn test_record_uses_wire_names_in_declaration_order() {
    let value = alice().to_value();
    let names: Vec<&str> = match &value {
        Value::Struct(members) => members.iter().map(|m| m.name.as_str()).collect(),
        other => panic!("expected struct, got {:?}", other),
    };
    assert_eq!(names, vec!["Name", "Age", "email", "tags"]);
}

#[test]
fn test_record_round_trip() {
    assert_eq!(round_trip(&alice()), alice());

    let team = Team {
        lead: alice(),
        members: vec![alice(), Person::default()],
        budget: Some(1250.5),
    };
    assert_eq!(round_trip(&team), team);
}

#[test]
fn test_record_members_in_any_order() {
    let value = Value::Struct(vec![
        Member::new("Age", Value::Int(41)),
        Member::new("Name", Value::String("Bob".into())),
    ]);
    let mut bob = Person {
        email: "unchanged@example.com".to_string(),
        ..Person::default()
    };
    project(&value, &mut bob).unwrap();

    assert_eq!(bob.name, "Bob");
    assert_eq!(bob.age, 41);
    assert_eq!(bob.email, "unchanged@example.com");
}

#[test]
fn test_record_unknown_member() {
    let value = Value::Struct(vec![
        Member::new("Name", Value::String("Eve".into())),
        Member::new("nickname", Value::String("e".into())),
    ]);
    let mut person = Person::default();
    let message = assert_internal_error(&value, &mut person);
    assert!(message.contains("nickname"), "{}", message);
    assert!(message.contains("Person"), "{}", message);
}

#[test]
fn test_record_field_name_is_not_an_alias() {
    // once overridden, only the wire name is accepted
    let value = Value::Struct(vec![Member::new("name", Value::String("x".into()))]);
    let mut person = Person::default();
    assert_internal_error(&value, &mut person);
}

#[test]
fn test_scalar_into_record_is_mismatch() {
    let mut person = Person::default();
    assert_internal_error(&Value::Int(1), &mut person);
}

#[test]
fn test_fault_maps_to_struct() {
    let fault = FaultCode::InvalidParams.fault("");
    assert_eq!(
        fault.to_value(),
        Value::Struct(vec![
            Member::new("faultCode", Value::Int(-32602)),
            Member::new("faultString", Value::String("invalid method parameters".into())),
        ])
    );
    assert_eq!(round_trip(&fault), fault);
    assert_eq!(round_trip(&Fault::new(7, "custom")), Fault::new(7, "custom"));
}
