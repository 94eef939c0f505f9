use std::io::Write;

use clap::Parser;
use serde_json::{json, Value as Json};
use sift_cli::{filter_and_render, input, session, Args, OutputFormat, Settings};
use tempfile::NamedTempFile;

const CONTACTS: &str = r#"[
  {"name": "Ann Lee", "email": "ann@example.com", "age": 31, "labels": ["Family"]},
  {"name": "Bob Stone", "email": "bob@work.io", "age": 45, "labels": ["work", "urgent"]},
  {"name": "Cleo Park", "email": "cleo@example.com", "age": null, "labels": []},
  "loose note 45",
  [1, 2, 3],
  null
]"#;

fn contacts_file() -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(CONTACTS.as_bytes()).unwrap();
    file
}

fn setup(argv: &[&str]) -> (Args, Settings, Vec<Json>) {
    let args = Args::parse_from(std::iter::once("sift").chain(argv.iter().copied()));
    let settings = Settings::resolve(&args).unwrap();
    let items = input::load(args.file.as_deref()).unwrap();
    (args, settings, items)
}

fn one_shot(argv: &[&str]) -> String {
    let (args, settings, items) = setup(argv);
    filter_and_render(&items, &args.query, &settings, args.output).unwrap()
}

#[test]
fn empty_query_keeps_everything() {
    let file = contacts_file();
    let path = file.path().to_str().unwrap();
    assert_eq!(one_shot(&["-f", path, "-o", "count"]), "6\n");
}

#[test]
fn loose_search_covers_numbers_in_all_properties() {
    let file = contacts_file();
    let path = file.path().to_str().unwrap();
    let text = one_shot(&["45", "-f", path, "-o", "lines"]);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("Bob Stone"));
    assert_eq!(lines[1], "\"loose note 45\"");
}

#[test]
fn strict_search_skips_numbers() {
    let file = contacts_file();
    let path = file.path().to_str().unwrap();
    let text = one_shot(&["45", "-f", path, "-s", "-o", "lines"]);
    assert_eq!(text, "\"loose note 45\"\n");
}

#[test]
fn by_restricts_properties() {
    let file = contacts_file();
    let path = file.path().to_str().unwrap();
    // "example" only appears in emails
    assert_eq!(one_shot(&["EXAMPLE", "-f", path, "-o", "count"]), "2\n");
    assert_eq!(
        one_shot(&["EXAMPLE", "-f", path, "--by", "name", "-o", "count"]),
        "0\n"
    );
    assert_eq!(
        one_shot(&["EXAMPLE", "-f", path, "--by", "name,email", "-o", "count"]),
        "2\n"
    );
}

#[test]
fn tags_search_array_elements() {
    let file = contacts_file();
    let path = file.path().to_str().unwrap();
    // arrays are never matched by the built-in property test
    assert_eq!(one_shot(&["urg", "-f", path, "-o", "count"]), "0\n");

    let text = one_shot(&["urg", "-f", path, "--tag", "labels", "-o", "json"]);
    let parsed: Json = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 1);
    assert_eq!(parsed[0]["name"], json!("Bob Stone"));
}

#[test]
fn config_file_supplies_defaults() {
    let file = contacts_file();
    let path = file.path().to_str().unwrap();

    let mut config = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
    writeln!(config, "by: [name]\ntags: [labels]\nstrict: true").unwrap();
    let config_path = config.path().to_str().unwrap();

    // "family" is only a label; "45" is a number (strict) and a loose note
    assert_eq!(
        one_shot(&["family", "-f", path, "-c", config_path, "-o", "count"]),
        "1\n"
    );
    assert_eq!(
        one_shot(&["45", "-f", path, "-c", config_path, "-o", "lines"]),
        "\"loose note 45\"\n"
    );
}

#[test]
fn csv_output_flattens_objects() {
    let file = contacts_file();
    let path = file.path().to_str().unwrap();
    let text = one_shot(&["cleo", "-f", path, "--by", "name", "-o", "csv"]);
    let lines: Vec<&str> = text.lines().collect();
    // object keys come out sorted
    assert_eq!(lines[0], "age,email,labels,name");
    assert_eq!(lines[1], ",cleo@example.com,[],Cleo Park");
}

#[test]
fn jsonl_input() {
    let mut file = tempfile::Builder::new().suffix(".jsonl").tempfile().unwrap();
    writeln!(file, "{{\"title\": \"Rust\"}}\n\n{{\"title\": \"Go\"}}\n\"rusty\"").unwrap();
    let path = file.path().to_str().unwrap();
    assert_eq!(one_shot(&["rust", "-f", path, "-o", "count"]), "2\n");
}

#[test]
fn interactive_session_reprints_on_change() {
    let file = contacts_file();
    let path = file.path().to_str().unwrap();
    let (args, settings, items) = setup(&["-f", path, "-i", "-o", "count"]);

    let script = "ann\n:by email\nexample\n:strict on\n45\n:quit\nbob\n";
    let mut out = Vec::new();
    session::run(
        items,
        settings,
        &args.query,
        args.output,
        script.as_bytes(),
        &mut out,
    )
    .unwrap();

    let text = String::from_utf8(out).unwrap();
    let counts: Vec<&str> = text.lines().collect();
    // initial, "ann", by email (ann@), "example", strict, "45" (loose note only)
    assert_eq!(counts, vec!["6", "1", "1", "2", "2", "1"]);
}

#[test]
fn bad_property_list_is_reported() {
    let args = Args::parse_from(["sift", "--by", "name,,email"]);
    let err = Settings::resolve(&args).unwrap_err();
    assert!(format!("{err:#}").contains("empty property name"));
}

#[test]
fn output_formats_parse() {
    let args = Args::parse_from(["sift", "-o", "yaml"]);
    assert_eq!(args.output, OutputFormat::Yaml);
    assert!(Args::try_parse_from(["sift", "-o", "xml"]).is_err());
}
