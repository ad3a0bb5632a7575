// tests/sinks.rs
use books_scraper::sink::sqlite::load_books;
use books_scraper::sink::{CsvSink, JsonSink, SqliteSink};
use books_scraper::{Book, RecordSink};
use serde_json::Value as Json;

fn sample() -> Vec<Book> {
    vec![
        Book::new("A Light in the Attic", "51.77"),
        Book::new("Tipping the Velvet", "53.74"),
    ]
}

#[tokio::test]
async fn csv_rows_match_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("books.csv");
    CsvSink::new(&path).write(&sample()).await.unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Название,Цена",
            "A Light in the Attic,51.77",
            "Tipping the Velvet,53.74",
        ]
    );
}

#[tokio::test]
async fn json_document_uses_localized_keys_and_raw_utf8() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("books.json");
    JsonSink::new(&path).write(&sample()).await.unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"Название\""), "keys must not be \\u-escaped: {text}");
    assert!(text.contains("\n  {"), "expected two-space indentation: {text}");

    let v: Json = serde_json::from_str(&text).unwrap();
    let arr = v.as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["Название"], "A Light in the Attic");
    assert_eq!(arr[0]["Цена"], "51.77");
    assert_eq!(arr[1]["Название"], "Tipping the Velvet");
    assert_eq!(arr[1]["Цена"], "53.74");
}

#[tokio::test]
async fn file_sinks_are_overwrite_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let csv_p = dir.path().join("books.csv");
    let json_p = dir.path().join("books.json");
    let csv = CsvSink::new(&csv_p);
    let json = JsonSink::new(&json_p);

    csv.write(&sample()).await.unwrap();
    json.write(&sample()).await.unwrap();
    let (csv_1, json_1) = (std::fs::read(&csv_p).unwrap(), std::fs::read(&json_p).unwrap());

    csv.write(&sample()).await.unwrap();
    json.write(&sample()).await.unwrap();
    assert_eq!(std::fs::read(&csv_p).unwrap(), csv_1);
    assert_eq!(std::fs::read(&json_p).unwrap(), json_1);
}

#[tokio::test]
async fn shorter_run_fully_replaces_file_contents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("books.csv");
    let csv = CsvSink::new(&path);

    csv.write(&sample()).await.unwrap();
    csv.write(&sample()[..1]).await.unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 2);
    assert!(!text.contains("Tipping"));
}

#[tokio::test]
async fn sqlite_sink_twice_keeps_one_copy() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("books.db");
    let sink = SqliteSink::new(&db);

    sink.write(&sample()).await.unwrap();
    sink.write(&sample()).await.unwrap();

    assert_eq!(load_books(&db).unwrap(), sample());
}

#[tokio::test]
async fn unwritable_destination_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    // A directory where the file should be.
    let target = dir.path().join("books.json");
    std::fs::create_dir(&target).unwrap();

    let err = JsonSink::new(&target).write(&sample()).await;
    assert!(err.is_err());
}

#[tokio::test]
async fn sinks_create_missing_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let csv_p = dir.path().join("out/nested/books.csv");
    let json_p = dir.path().join("out/nested/books.json");
    let db_p = dir.path().join("out/nested/db/books.db");

    CsvSink::new(&csv_p).write(&sample()).await.unwrap();
    JsonSink::new(&json_p).write(&sample()).await.unwrap();
    SqliteSink::new(&db_p).write(&sample()).await.unwrap();

    assert!(csv_p.exists());
    assert!(json_p.exists());
    assert_eq!(load_books(&db_p).unwrap(), sample());
}
