use line_etl::{CsvInputHandler, CsvOutputHandler, InputHandler, OutputHandler, Pipeline, Row};
use serde_json::{json, Value};
use tempfile::TempDir;

fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {}", other),
    }
}

#[test]
fn test_rows_survive_write_then_read() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("people.csv");

    let originals = vec![
        row(json!({"id": 1, "name": "Ada Lovelace", "score": 99.5, "active": true})),
        row(json!({"id": 2, "name": "Grace, Hopper", "score": 87.25, "active": false})),
        row(json!({"id": 3, "name": "Quote \"Q\"", "score": null, "active": true})),
    ];

    let mut output = CsvOutputHandler::new(&path);
    for original in &originals[..2] {
        output.save_to_buffer(original.clone());
    }
    output.write_output();
    output.save_to_buffer(originals[2].clone());
    output.write_output();

    let mut input = CsvInputHandler::new(&path);
    let read_back = input.get_all_input().unwrap();

    assert_eq!(read_back, originals);

    let content = std::fs::read_to_string(&path).unwrap();
    let header_count = content
        .lines()
        .filter(|line| *line == "id,name,score,active")
        .count();
    assert_eq!(header_count, 1);
}

#[test]
fn test_second_empty_flush_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("x.csv");

    let mut output = CsvOutputHandler::new(&path);
    output.save_to_buffer(row(json!({"x": 1})));
    output.save_to_buffer(row(json!({"x": 2})));
    output.write_output();
    output.write_output();

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().collect::<Vec<_>>(), vec!["x", "1", "2"]);
}

#[test]
fn test_csv_to_csv_pipeline() {
    let temp_dir = TempDir::new().unwrap();
    let input_path = temp_dir.path().join("in.csv");
    let output_path = temp_dir.path().join("out.csv");
    std::fs::write(&input_path, "city,population\nOslo,709037\nBergen,291940\n").unwrap();

    let mut pipeline = Pipeline::new(
        CsvInputHandler::new(&input_path),
        CsvOutputHandler::new(&output_path),
    );
    assert_eq!(pipeline.run().unwrap(), 2);

    let mut reread = CsvInputHandler::new(&output_path);
    let rows = reread.get_all_input().unwrap();
    assert_eq!(rows[0], row(json!({"city": "Oslo", "population": 709037})));
    assert_eq!(rows[1], row(json!({"city": "Bergen", "population": 291940})));
}

#[test]
fn test_malformed_csv_aborts_pipeline() {
    let temp_dir = TempDir::new().unwrap();
    let input_path = temp_dir.path().join("in.csv");
    let output_path = temp_dir.path().join("out.csv");
    std::fs::write(&input_path, "a,b\n1,2\n3,4,5\n").unwrap();

    let mut pipeline = Pipeline::new(
        CsvInputHandler::new(&input_path),
        CsvOutputHandler::new(&output_path),
    );

    assert!(pipeline.run().is_err());
    assert!(!output_path.exists());
}

#[test]
fn test_iter_input_is_lazy_and_restartable() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("in.csv");
    std::fs::write(&path, "n\n1\n2\n3\n").unwrap();

    let mut input = CsvInputHandler::new(&path);
    let first = input.iter_input().unwrap().next().unwrap().unwrap();
    assert_eq!(first, row(json!({"n": 1})));

    let all: Vec<Row> = input.iter_input().unwrap().map(Result::unwrap).collect();
    assert_eq!(all.len(), 3);
}
