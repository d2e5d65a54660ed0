//! End-to-end behavior of the composed pipeline.

use vson::prelude::*;

#[test]
fn nil_is_the_empty_transport_string() {
    let (transport, omitted) = encode_value(&Value::Nil, &[], None, false).unwrap();
    assert_eq!(transport, "");
    assert_eq!(omitted, 0);
    assert_eq!(decode_value("", &[], None).unwrap(), Value::Nil);
}

#[test]
fn booleans() {
    let (transport, _) = encode_value(&Value::from(true), &[], None, false).unwrap();
    assert_eq!(transport.len(), 2);
    assert_eq!(decode_value(&transport, &[], None).unwrap(), Value::Bool(true));

    let (transport, _) = encode_value(&Value::from(false), &[], None, false).unwrap();
    assert_eq!(decode_value(&transport, &[], None).unwrap(), Value::Bool(false));
}

#[test]
fn small_integers() {
    let (transport, _) = encode_value(&Value::from(42), &[], None, false).unwrap();
    assert_eq!(decode_value(&transport, &[], None).unwrap(), Value::Int(42));
}

#[test]
fn integer_boundaries() {
    for i in [-4_311_744_511i64, 0, 4_311_744_511] {
        let (transport, _) = encode_value(&Value::from(i), &[], None, false).unwrap();
        assert_eq!(decode_value(&transport, &[], None).unwrap(), Value::Int(i));
    }
    for i in [-4_311_744_512i64, 4_311_744_512] {
        let v = Value::from(i);
        assert!(matches!(v, Value::Float(_)));
        let (transport, _) = encode_value(&v, &[], None, false).unwrap();
        assert!(decode_value(&transport, &[], None).unwrap().deep_eq(&v));
    }
}

#[test]
fn nan_comes_back_as_nan() {
    let (transport, _) = encode_value(&Value::from(f64::NAN), &[], None, false).unwrap();
    let n = decode_value(&transport, &[], None).unwrap().as_f64().unwrap();
    assert!(n.is_nan());
}

#[test]
fn zero_signs_survive() {
    let (transport, _) = encode_value(&Value::from(-0.0), &[], None, false).unwrap();
    let n = decode_value(&transport, &[], None).unwrap().as_f64().unwrap();
    assert!(n.is_sign_negative());

    let (transport, _) = encode_value(&Value::from(0.0), &[], None, false).unwrap();
    let n = decode_value(&transport, &[], None).unwrap().as_f64().unwrap();
    assert!(!n.is_sign_negative());
}

#[test]
fn empty_containers() {
    for v in [
        Value::from(""),
        Value::from(Table::new()),
        Value::from(Vec::<Value>::new()),
    ] {
        let (transport, _) = encode_value(&v, &[], None, false).unwrap();
        assert!(decode_value(&transport, &[], None).unwrap().deep_eq(&v));
    }
}

#[test]
fn arrays_of_integers() {
    let v = Value::from(vec![Value::from(1), Value::from(2), Value::from(3)]);
    let (transport, _) = encode_value(&v, &[], None, false).unwrap();
    let back = decode_value(&transport, &[], None).unwrap();
    assert!(back.deep_eq(&v));
}

#[test]
fn self_referential_tables() {
    let t = Table::new();
    t.set(Value::from("self"), Value::Table(t.clone()));

    let (transport, _) = encode_value(&Value::Table(t), &[], None, false).unwrap();
    let back = decode_value(&transport, &[], None).unwrap().to_table().unwrap();
    assert!(back.get(&Value::from("self")).to_table().unwrap().ptr_eq(&back));
}

#[test]
fn shared_subtables_stay_shared() {
    let shared = Table::from(vec![Value::from("payload")]);
    let outer = Table::new();
    outer.set(Value::from("a"), Value::Table(shared.clone()));
    outer.set(Value::from("b"), Value::Table(shared));

    let (transport, _) = encode_value(&Value::Table(outer), &[], None, false).unwrap();
    let back = decode_value(&transport, &[], None).unwrap().to_table().unwrap();
    let a = back.get(&Value::from("a")).to_table().unwrap();
    let b = back.get(&Value::from("b")).to_table().unwrap();
    assert!(a.ptr_eq(&b));
}

#[test]
fn opaque_values_cross_via_externals() {
    let handle = Value::from(Opaque::new("connection"));
    let graph = Table::new();
    graph.set(Value::from("conn"), handle.clone());

    let externals = [handle.clone()];
    let (transport, omitted) =
        encode_value(&Value::Table(graph), &externals, None, false).unwrap();
    assert_eq!(omitted, 0);

    let back = decode_value(&transport, &externals, None).unwrap().to_table().unwrap();
    assert_eq!(back.get(&Value::from("conn")), handle);
}

#[test]
fn nil_placeholders_reserve_external_slots() {
    let handle = Value::from(Opaque::new(7u32));
    let externals = [Value::Nil, handle.clone()];
    let graph = Value::from(vec![handle.clone()]);

    let (transport, _) = encode_value(&graph, &externals, None, false).unwrap();
    let back = decode_value(&transport, &externals, None).unwrap().to_table().unwrap();
    assert_eq!(back.get(&Value::Int(1)), handle);
}

#[test]
fn encrypted_pipeline() {
    let v = Value::from("attack at dawn");
    let (transport, _) = encode_value(&v, &[], Some(b"k"), false).unwrap();
    assert_eq!(decode_value(&transport, &[], Some(b"k")).unwrap(), v);
}

#[test]
fn raw_cipher_length_contract() {
    let mut buffer = b"hello".to_vec();
    encrypt_bytes(&mut buffer, b"k").unwrap();
    assert_eq!(buffer.len(), 5);
    decrypt_bytes(&mut buffer, b"k").unwrap();
    assert_eq!(buffer, b"hello");
}
