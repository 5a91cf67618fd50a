use super::*;

#[test]
fn numbers_print_like_javascript() {
    assert_eq!(number_to_string(1.0), "1");
    assert_eq!(number_to_string(-0.0), "0");
    assert_eq!(number_to_string(0.1 + 0.2), "0.30000000000000004");
    assert_eq!(number_to_string(1e21), "1e+21");
    assert_eq!(number_to_string(1.5e-7), "1.5e-7");
    assert_eq!(number_to_string(f64::NAN), "NaN");
    assert_eq!(number_to_string(f64::NEG_INFINITY), "-Infinity");
}

#[test]
fn strings_convert_to_numbers() {
    assert_eq!(string_to_number("  42  "), 42.0);
    assert_eq!(string_to_number(""), 0.0);
    assert_eq!(string_to_number("0x1F"), 31.0);
    assert_eq!(string_to_number("1e3"), 1000.0);
    assert_eq!(string_to_number("-Infinity"), f64::NEG_INFINITY);
    assert!(string_to_number("12px").is_nan());
    assert!(string_to_number("inf").is_nan());
}

#[test]
fn truthiness_and_typeof() {
    assert!(!Value::Number(f64::NAN).truthy());
    assert!(!Value::str("").truthy());
    assert!(Value::array(Vec::new()).truthy());
    assert_eq!(Value::Null.type_of(), "object");
    assert_eq!(Value::Primitive(Primitive::Sequence).type_of(), "function");
}

#[test]
fn loose_equality_coerces() {
    assert!(Value::Null.loose_eq(&Value::Undefined));
    assert!(!Value::Null.loose_eq(&Value::Number(0.0)));
    assert!(Value::Number(1.0).loose_eq(&Value::str("1")));
    assert!(Value::Bool(true).loose_eq(&Value::Number(1.0)));
    assert!(Value::array(vec![Value::Number(2.0)]).loose_eq(&Value::str("2")));
    assert!(!Value::Number(f64::NAN).loose_eq(&Value::Number(f64::NAN)));
}

#[test]
fn compound_values_compare_by_identity() {
    let a = Value::array(Vec::new());
    assert!(a.strict_eq(&a.clone()));
    assert!(!a.strict_eq(&Value::array(Vec::new())));
}

#[test]
fn json_view_omits_functions_and_undefined() {
    let mut props = PropMap::new();
    props.insert("n".into(), Value::Number(3.0));
    props.insert("f".into(), Value::Undefined);
    props.insert(
        "list".into(),
        Value::array(vec![Value::Undefined, Value::Number(0.5)]),
    );
    let json = Value::object(props).to_json().unwrap();
    assert_eq!(json, serde_json::json!({ "n": 3, "list": [null, 0.5] }));
    assert_eq!(Value::Number(f64::INFINITY).to_json(), Some(Json::Null));
}

#[test]
fn relative_indices_clamp_to_bounds() {
    assert_eq!(relative_index(Some(&Value::Number(-2.0)), 5, 0), 3);
    assert_eq!(relative_index(Some(&Value::Number(-9.0)), 5, 0), 0);
    assert_eq!(relative_index(Some(&Value::Number(9.0)), 5, 0), 5);
    assert_eq!(relative_index(None, 5, 4), 4);
    assert_eq!(array_index("2"), Some(2));
    assert_eq!(array_index("02"), None);
}
