use crate::asset::{Value, parse_json};

#[test]
fn accessors_match_tags() {
	assert_eq!(Value::I64(7).as_i64(), Some(7));
	assert_eq!(Value::I64(7).as_usize(), Some(7));
	assert_eq!(Value::I64(-1).as_usize(), None);
	assert_eq!(Value::I64(2).as_f64(), Some(2.0));
	assert_eq!(Value::F64(0.5).as_i64(), None);
	assert_eq!(Value::Bool(true).as_bool(), Some(true));
	assert_eq!(Value::Null.as_str(), None);
	assert!(Value::Null.is_null());
	assert!(Value::List(Vec::new()).is_empty());
	assert_eq!(Value::String("x".into()).kind_name(), "string");
}

#[test]
fn lookups_return_none_on_wrong_shape() {
	let root = parse_json(br#"{"list":[1,2],"n":3}"#).expect("parse");
	assert_eq!(root.get("list").and_then(|list| list.at(1)), Some(&Value::I64(2)));
	assert_eq!(root.get("n").and_then(|n| n.get("x")), None);
	assert_eq!(root.get("list").and_then(|list| list.at(2)), None);
	assert_eq!(root.at(0), None);
}

#[test]
fn serializes_sorted_and_unescaped() {
	let root = parse_json("{\"z\":[1,2.5,null],\"a\":\"caf\u{e9} \\\"q\\\"\",\"m\":{\"t\":true}}".as_bytes()).expect("parse");
	let text = serde_json::to_string(&root).expect("serialize");
	assert_eq!(text, r#"{"a":"café \"q\"","m":{"t":true},"z":[1,2.5,null]}"#);
}

#[test]
fn serialization_agrees_with_serde_json() {
	let source = r#"{"name":"mesh","count":3,"scale":[1.5,-2.0,1e-3],"nested":{"ok":false}}"#;
	let ours = serde_json::to_value(parse_json(source.as_bytes()).expect("parse")).expect("to_value");
	let theirs: serde_json::Value = serde_json::from_str(source).expect("serde_json parse");
	assert_eq!(ours, theirs);
}
