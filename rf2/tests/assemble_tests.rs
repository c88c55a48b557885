//! Integration tests for content file assembly.
//!
//! Covers:
//! - Full: first occurrence wins, conflicts warned, byte-identical reruns
//! - Snapshot: one row per id, greatest time wins, empty time dominates
//! - Delta: only rows at the release date
//! - Relationship routing by characteristic type
//! - Description routing by description type
//! - Destination already present, invalid release date

use std::fs;
use std::path::{Path, PathBuf};

use rf2::{
    ContentFile, ContentType, CreateContext, FsRowSource, FsSourceConfig, IssueCollector,
    MemoryRowSource, MergeRequest, ReleaseType, Rf2Error, Row, Severity, assemble, new_line,
};
use tempfile::TempDir;

const MODULE: &str = "900000000000207008";
const PRIMITIVE: &str = "900000000000074008";
const IS_A: &str = "116680003";
const INFERRED: &str = "900000000000011006";
const STATED: &str = "900000000000010007";
const EXISTENTIAL: &str = "900000000000451002";
const SYNONYM: &str = "900000000000013009";
const DEFINITION: &str = "900000000000550004";
const CASE_INSENSITIVE: &str = "900000000000448009";

fn concept(id: &str, time: &str, active: &str) -> [String; 5] {
    [id, time, active, MODULE, PRIMITIVE].map(str::to_owned)
}

fn relationship(id: &str, time: &str, characteristic: &str) -> Vec<String> {
    [
        id,
        time,
        "1",
        MODULE,
        "100005",
        "200001",
        "0",
        IS_A,
        characteristic,
        EXISTENTIAL,
    ]
    .map(str::to_owned)
    .to_vec()
}

fn description(id: &str, type_id: &str, term: &str) -> Vec<String> {
    [
        id,
        "20200201",
        "1",
        MODULE,
        "100005",
        "en",
        type_id,
        term,
        CASE_INSENSITIVE,
    ]
    .map(str::to_owned)
    .to_vec()
}

fn write_release_file(path: &Path, content_type: ContentType, rows: &[Vec<String>]) {
    let mut text = new_line(&content_type.header());
    for row in rows {
        text.push_str(&new_line(row));
    }
    fs::write(path, text).unwrap();
}

fn create(
    source_dir: &Path,
    output: PathBuf,
    content_type: ContentType,
    release_type: ReleaseType,
    release_date: &str,
) -> (Result<usize, Rf2Error>, IssueCollector) {
    let source =
        FsRowSource::discover(&FsSourceConfig::new(vec![source_dir.to_path_buf()])).unwrap();
    let collector = IssueCollector::new();
    let result = CreateContext::new(release_date, &source, &collector).and_then(|context| {
        ContentFile::new(output, content_type, release_type)
            .create(&context)
            .map(|summary| summary.rows_written)
    });
    (result, collector)
}

fn ids_and_times(rows: &[Row]) -> Vec<(&str, &str)> {
    rows.iter().map(|r| (r[0].as_str(), r[1].as_str())).collect()
}

// ─── In-memory policies ─────────────────────────────────────────────────────

fn assemble_concepts(
    release_type: ReleaseType,
    release_date: &str,
    rows: Vec<[String; 5]>,
) -> (Vec<Row>, IssueCollector) {
    let header = ContentType::Concept.header();
    let source = MemoryRowSource::new().with_rows(ContentType::Concept, rows);
    let filter = |row: &[String]| ContentType::Concept.filter(row);
    let request = MergeRequest {
        content_type: ContentType::Concept,
        header: &header,
        release_type,
        release_date,
        filter: &filter,
    };
    let collector = IssueCollector::new();
    let rows = assemble(&request, &source, &collector).unwrap();
    (rows, collector)
}

#[test]
fn test_full_keeps_first_occurrence_and_warns_on_conflict() {
    let (rows, issues) = assemble_concepts(
        ReleaseType::Full,
        "20200201",
        vec![
            concept("100005", "20200101", "1"),
            concept("100005", "20200101", "0"),
            concept("100005", "20200201", "1"),
        ],
    );
    assert_eq!(
        ids_and_times(&rows),
        [("100005", "20200101"), ("100005", "20200201")]
    );
    assert_eq!(rows[0][2], "1", "first occurrence must win");

    let issues = issues.into_issues();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].severity, Severity::Warn);
    assert!(issues[0].message.contains("100005"), "got: {}", issues[0].message);
    assert!(issues[0].message.contains("20200101"), "got: {}", issues[0].message);
}

#[test]
fn test_full_verbatim_duplicate_is_not_a_conflict() {
    let (rows, issues) = assemble_concepts(
        ReleaseType::Full,
        "20200201",
        vec![
            concept("100005", "20200101", "1"),
            concept("100005", "20200101", "1"),
        ],
    );
    assert_eq!(rows.len(), 1);
    assert!(issues.into_issues().is_empty());
}

#[test]
fn test_snapshot_empty_time_dominates() {
    let (rows, _) = assemble_concepts(
        ReleaseType::Snapshot,
        "20200201",
        vec![
            concept("100005", "20200101", "1"),
            concept("100005", "20200201", "0"),
            concept("100005", "", "1"),
        ],
    );
    assert_eq!(rows, vec![concept("100005", "", "1").to_vec()]);
}

#[test]
fn test_snapshot_single_winner_per_id_with_greatest_time() {
    let mut rows = Vec::new();
    for (i, time) in ["20190131", "20210131", "20200131", "20170731"].iter().enumerate() {
        rows.push(concept("100005", time, if i % 2 == 0 { "1" } else { "0" }));
        rows.push(concept("200001", time, "1"));
    }
    let (out, _) = assemble_concepts(ReleaseType::Snapshot, "20210131", rows);
    assert_eq!(
        ids_and_times(&out),
        [("100005", "20210131"), ("200001", "20210131")]
    );
}

#[test]
fn test_snapshot_winner_emitted_once_when_repeated() {
    let (rows, issues) = assemble_concepts(
        ReleaseType::Snapshot,
        "20200201",
        vec![
            concept("100005", "20200201", "1"),
            concept("100005", "20200101", "1"),
            concept("100005", "20200201", "1"),
        ],
    );
    assert_eq!(ids_and_times(&rows), [("100005", "20200201")]);
    assert!(issues.into_issues().is_empty());
}

#[test]
fn test_delta_keeps_only_release_date() {
    let (rows, _) = assemble_concepts(
        ReleaseType::Delta,
        "20200201",
        vec![
            concept("100005", "20200101", "1"),
            concept("200001", "20200201", "1"),
            concept("300004", "", "1"),
            concept("400003", "20200202", "1"),
        ],
    );
    assert_eq!(ids_and_times(&rows), [("200001", "20200201")]);
}

// ─── On-disk creation ───────────────────────────────────────────────────────

#[test]
fn test_create_full_is_byte_identical_across_runs() {
    let src = TempDir::new().unwrap();
    write_release_file(
        &src.path().join("sct2_Concept_Full_INT_20200201.txt"),
        ContentType::Concept,
        &[
            concept("200001", "20200201", "1").to_vec(),
            concept("100005", "20200101", "1").to_vec(),
            concept("100005", "20200201", "0").to_vec(),
        ],
    );
    let out = TempDir::new().unwrap();
    let first = out.path().join("first.txt");
    let second = out.path().join("second.txt");

    let (result, _) = create(
        src.path(),
        first.clone(),
        ContentType::Concept,
        ReleaseType::Full,
        "20200201",
    );
    assert_eq!(result.unwrap(), 3);
    let (result, _) = create(
        src.path(),
        second.clone(),
        ContentType::Concept,
        ReleaseType::Full,
        "20200201",
    );
    assert_eq!(result.unwrap(), 3);

    let bytes = fs::read(&first).unwrap();
    assert_eq!(bytes, fs::read(&second).unwrap());
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.starts_with("id\teffectiveTime\tactive\tmoduleId\tdefinitionStatusId\r\n"));
    assert_eq!(text.matches("\r\n").count(), 4);
}

#[test]
fn test_create_reads_rows_back() {
    let src = TempDir::new().unwrap();
    write_release_file(
        &src.path().join("sct2_Concept_Full_INT_20200201.txt"),
        ContentType::Concept,
        &[
            concept("100005", "20200101", "1").to_vec(),
            concept("100005", "20200201", "0").to_vec(),
        ],
    );
    let out = TempDir::new().unwrap();
    let path = out.path().join("sct2_Concept_Snapshot_INT_20200201.txt");
    let file = ContentFile::from_path(&path).unwrap();
    let source =
        FsRowSource::discover(&FsSourceConfig::new(vec![src.path().to_path_buf()])).unwrap();
    let collector = IssueCollector::new();
    let context = CreateContext::new("20200201", &source, &collector).unwrap();
    file.create(&context).unwrap();

    assert_eq!(file.header().unwrap(), ContentType::Concept.header());
    let rows: Vec<Row> = file.rows().unwrap().collect::<Result<_, _>>().unwrap();
    assert_eq!(rows, vec![concept("100005", "20200201", "0").to_vec()]);
}

#[test]
fn test_create_routes_relationships_by_characteristic_type() {
    let src = TempDir::new().unwrap();
    write_release_file(
        &src.path().join("sct2_Relationship_Full_INT_20200201.txt"),
        ContentType::Relationship,
        &[
            relationship("1000027", "20200201", INFERRED),
            relationship("2000029", "20200201", STATED),
        ],
    );
    let out = TempDir::new().unwrap();

    let inferred = out.path().join("inferred.txt");
    let (result, _) = create(
        src.path(),
        inferred.clone(),
        ContentType::Relationship,
        ReleaseType::Full,
        "20200201",
    );
    assert_eq!(result.unwrap(), 1);
    let stated = out.path().join("stated.txt");
    let (result, _) = create(
        src.path(),
        stated.clone(),
        ContentType::StatedRelationship,
        ReleaseType::Full,
        "20200201",
    );
    assert_eq!(result.unwrap(), 1);

    assert!(fs::read_to_string(&inferred).unwrap().contains("1000027\t"));
    assert!(fs::read_to_string(&stated).unwrap().contains("2000029\t"));
}

#[test]
fn test_create_routes_descriptions_by_description_type() {
    let src = TempDir::new().unwrap();
    write_release_file(
        &src.path().join("sct2_Description_Snapshot-en_INT_20200201.txt"),
        ContentType::Description,
        &[description("1000015", SYNONYM, "a synonym")],
    );
    write_release_file(
        &src.path().join("sct2_TextDefinition_Snapshot-en_INT_20200201.txt"),
        ContentType::TextDefinition,
        &[description("2000017", DEFINITION, "a definition")],
    );
    let out = TempDir::new().unwrap();

    let descriptions = out.path().join("descriptions.txt");
    let (result, _) = create(
        src.path(),
        descriptions.clone(),
        ContentType::Description,
        ReleaseType::Full,
        "20200201",
    );
    assert_eq!(result.unwrap(), 1);
    let definitions = out.path().join("definitions.txt");
    let (result, _) = create(
        src.path(),
        definitions.clone(),
        ContentType::TextDefinition,
        ReleaseType::Full,
        "20200201",
    );
    assert_eq!(result.unwrap(), 1);

    let text = fs::read_to_string(&descriptions).unwrap();
    assert!(text.contains("a synonym"));
    assert!(!text.contains("a definition"));
    let text = fs::read_to_string(&definitions).unwrap();
    assert!(text.contains("a definition"));
    assert!(!text.contains("a synonym"));
}

#[test]
fn test_create_ignores_files_with_other_headers() {
    let src = TempDir::new().unwrap();
    write_release_file(
        &src.path().join("sct2_Concept_Full_INT_20200201.txt"),
        ContentType::Concept,
        &[concept("100005", "20200201", "1").to_vec()],
    );
    fs::write(src.path().join("notes.txt"), "free text\r\n").unwrap();
    let out = TempDir::new().unwrap();
    let (result, _) = create(
        src.path(),
        out.path().join("c.txt"),
        ContentType::Concept,
        ReleaseType::Delta,
        "20200201",
    );
    assert_eq!(result.unwrap(), 1);
}

#[test]
fn test_create_refuses_existing_destination() {
    let src = TempDir::new().unwrap();
    write_release_file(
        &src.path().join("sct2_Concept_Full_INT_20200201.txt"),
        ContentType::Concept,
        &[concept("100005", "20200201", "1").to_vec()],
    );
    let out = TempDir::new().unwrap();
    let existing = out.path().join("c.txt");
    fs::write(&existing, "keep me").unwrap();

    let (result, _) = create(
        src.path(),
        existing.clone(),
        ContentType::Concept,
        ReleaseType::Full,
        "20200201",
    );
    assert!(matches!(result, Err(Rf2Error::DestinationExists(_))));
    assert_eq!(fs::read_to_string(&existing).unwrap(), "keep me");
}

#[test]
fn test_create_rejects_invalid_release_date() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let output = out.path().join("c.txt");
    let (result, _) = create(
        src.path(),
        output.clone(),
        ContentType::Concept,
        ReleaseType::Delta,
        "2020-02-01",
    );
    assert!(matches!(result, Err(Rf2Error::InvalidReleaseDate(_))));
    assert!(!output.exists());
}
