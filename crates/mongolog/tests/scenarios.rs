use mongolog::parser::extjson::to_json_string;
use mongolog::{
    parse_document, parse_log_line, parse_object, Document, DocumentParser, InputFormat,
    LineParser, LogLineParser, ParseError, Value,
};
use serde_json::json;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const TTL_LINE: &str = "Mon Feb 23 03:20:19.670 [TTLMonitor] query local.system.indexes query: { expireAfterSeconds: { $exists: true } } ntoreturn:0 ntoskip:0 nscanned:0 keyUpdates:0 locks(micros) r:86 nreturned:0 reslen:20 0ms";

fn as_json(value: &Value) -> serde_json::Value {
    let text = to_json_string(value, false).unwrap();
    serde_json::from_str(&text).unwrap()
}

#[test]
fn list_document_to_extended_json() {
    let value = parse_document("{ foo: [ 42, 43, 44 ] }").unwrap();
    assert_eq!(as_json(&value), json!({"foo": [42, 43, 44]}));
}

#[test]
fn object_id_and_bin_data_to_extended_json() {
    let value = parse_document(
        r#"{ _id: ObjectId("54e792daf1845f045f4c000e"), data: BinData(0,"aGVsbG8K") }"#,
    )
    .unwrap();
    assert_eq!(
        as_json(&value),
        json!({
            "_id": {"$oid": "54e792daf1845f045f4c000e"},
            "data": {"$binary": "aGVsbG8K", "$type": "00"}
        })
    );
}

#[test]
fn timestamp_number_long_and_regex() {
    let value = parse_document(
        "{ t: Timestamp(1420000000, 1), n: NumberLong(-9223372036854775808), some_text: /ese/i }",
    )
    .unwrap();
    assert_eq!(
        as_json(&value),
        json!({
            "t": {"$timestamp": {"t": 1420000000, "i": 1}},
            "n": {"$numberLong": "-9223372036854775808"},
            "some_text": {"$regex": "ese", "$options": "i"}
        })
    );
}

#[test]
fn ttl_monitor_log_line() {
    let doc = parse_log_line(TTL_LINE).unwrap();

    assert_eq!(doc.get("thread").and_then(Value::as_str), Some("TTLMonitor"));
    assert_eq!(doc.get("op").and_then(Value::as_str), Some("query"));
    assert_eq!(doc.get("ns").and_then(Value::as_str), Some("local.system.indexes"));
    assert_eq!(doc.get("duration_ms").and_then(Value::as_str), Some("0"));
    assert_eq!(doc.get("reslen").and_then(Value::as_i64), Some(20));

    let json = as_json(&Value::Document(doc));
    assert_eq!(json["query"], json!({"expireAfterSeconds": {"$exists": true}}));
    assert_eq!(json["timestamp"], "Mon Feb 23 03:20:19.670");
}

#[test]
fn command_line_carries_command_type() {
    let doc = parse_log_line(
        "2015-02-23T03:20:19.670Z [conn5] command test.$cmd command: count { count: \"foo\", query: { _id: { $gt: 5 } } } keyUpdates:0 reslen:48 1ms",
    )
    .unwrap();

    assert_eq!(doc.get("commandType").and_then(Value::as_str), Some("count"));
    let command = doc.get("command").and_then(Value::as_document).unwrap();
    assert_eq!(command.get("count"), Some(&Value::String("foo".into())));
    assert!(command.get("query").and_then(Value::as_document).is_some());
}

#[test]
fn parsers_through_the_trait() {
    let parsers: Vec<Box<dyn LineParser>> =
        vec![Box::new(LogLineParser::new()), Box::new(DocumentParser::new())];

    let first = parsers[0].parse(format!("{}\n", TTL_LINE).as_bytes()).unwrap();
    assert_eq!(first.format, InputFormat::LogLine);

    let second = parsers[1].parse(b"{ k: MaxKey }").unwrap();
    assert_eq!(second.format, InputFormat::Document);
    let expected: Document = vec![("k", Value::MaxKey)].into_iter().collect();
    assert_eq!(second.value, Value::Document(expected));
}

#[test]
fn failures_name_position_and_rule() {
    let err = parse_document("{ a: [ 1, 2 }").unwrap_err();
    match err {
        ParseError::GrammarMismatch { line, column, .. } => {
            assert_eq!(line, 1);
            assert!(column > 1);
        }
        other => panic!("unexpected error: {:?}", other),
    }

    assert!(matches!(
        parse_object("[ 1 ]"),
        Err(ParseError::UnexpectedRootType { expected: "document", found: "list" })
    ));
}

#[test]
fn wide_document_parses_in_linear_time() {
    let fields: Vec<String> = (0..50_000).map(|i| format!("f{}: {}", i, i)).collect();
    let text = format!("{{ {} }}", fields.join(", "));

    let started = Instant::now();
    let doc = parse_object(&text).unwrap();
    let elapsed = started.elapsed();

    assert_eq!(doc.len(), 50_000);
    assert_eq!(doc.get("f49999").and_then(Value::as_i64), Some(49_999));
    assert_eq!(doc.keys().next(), Some("f0"));
    assert!(elapsed < Duration::from_secs(5), "took {:?}", elapsed);
}

#[test]
fn parsers_shared_across_threads() {
    let log_lines: Vec<String> = (0..8)
        .map(|i| {
            format!(
                "Mon Feb 23 03:20:19.670 [conn{}] query test.c{} query: {{ a: {} }} nreturned:{} {}ms",
                i, i, i, i, i
            )
        })
        .collect();
    let documents: Vec<String> = (0..8)
        .map(|i| format!("{{ n: NumberLong({}), tags: [ \"t{}\" ] }}", i, i))
        .collect();

    let log_parser = Arc::new(LogLineParser::new());
    let doc_parser = Arc::new(DocumentParser::new());
    let expected: Vec<_> = log_lines
        .iter()
        .zip(&documents)
        .map(|(line, doc)| {
            (
                log_parser.parse(line.as_bytes()).unwrap(),
                doc_parser.parse(doc.as_bytes()).unwrap(),
            )
        })
        .collect();

    let workers: Vec<_> = log_lines
        .into_iter()
        .zip(documents)
        .map(|(line, doc)| {
            let log_parser = Arc::clone(&log_parser);
            let doc_parser = Arc::clone(&doc_parser);
            thread::spawn(move || {
                let mut results = Vec::new();
                for _ in 0..50 {
                    results.push((
                        log_parser.parse(line.as_bytes()).unwrap(),
                        doc_parser.parse(doc.as_bytes()).unwrap(),
                    ));
                }
                results
            })
        })
        .collect();

    for (worker, expected) in workers.into_iter().zip(expected) {
        for result in worker.join().unwrap() {
            assert_eq!(result, expected);
        }
    }
}
