//! Regression harness: discovery, filtering and the shipped case files.

use std::fs;

use tempfile::TempDir;
use termcolor::ColorChoice;
use textmath::harness::{
    collect_results, discover_yaml_files, load_test_cases, partition_results, HarnessConfig,
    TestResult,
};
use textmath::Engine;

fn config(root: &std::path::Path) -> HarnessConfig {
    HarnessConfig {
        case_root: root.to_path_buf(),
        color: ColorChoice::Never,
    }
}

fn write_cases(dir: &TempDir, name: &str, yaml: &str) {
    fs::write(dir.path().join(name), yaml).unwrap();
}

#[test]
fn shipped_cases_all_pass() {
    let results = collect_results(&Engine::new(), None, &config("tests/cases".as_ref()));
    let (passed, failed, _) = partition_results(&results);
    let failures: Vec<_> = results
        .iter()
        .filter(|r| matches!(r, TestResult::Fail { .. }))
        .collect();
    assert_eq!(failed, 0, "{failures:#?}");
    assert!(passed >= 10);
}

#[test]
fn discovery_is_recursive_and_sorted() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    write_cases(&dir, "b.yaml", "[]");
    write_cases(&dir, "a.yml", "[]");
    write_cases(&dir, "notes.txt", "not a case file");
    fs::write(dir.path().join("nested/c.yaml"), "[]").unwrap();

    let names: Vec<String> = discover_yaml_files(dir.path())
        .iter()
        .map(|p| p.strip_prefix(dir.path()).unwrap().display().to_string())
        .collect();
    assert_eq!(names, vec!["a.yml", "b.yaml", "nested/c.yaml"]);
}

#[test]
fn only_cases_shadow_the_rest() {
    let dir = TempDir::new().unwrap();
    write_cases(
        &dir,
        "cases.yaml",
        r#"
- name: focused
  input: add 3 and 4
  expected: [[{add: ["3", "4"]}]]
  only: true
- name: ignored
  input: add 3 and 4
  expected: [[{add: ["9"]}]]
"#,
    );
    let results = collect_results(&Engine::new(), None, &config(dir.path()));
    assert_eq!(partition_results(&results), (1, 0, 1));
}

#[test]
fn filter_skips_non_matching_names() {
    let dir = TempDir::new().unwrap();
    write_cases(
        &dir,
        "cases.yaml",
        r#"
- name: Alpha sum
  input: find the sum of 3 and 4
  expected: [[{sum: [3, 4]}]]
- name: Beta product
  input: find the product of 3 and 4
  expected: [[{product: [3, 4]}]]
"#,
    );
    let results = collect_results(&Engine::new(), Some("alpha"), &config(dir.path()));
    assert_eq!(partition_results(&results), (1, 0, 1));
}

#[test]
fn broken_case_files_fail_without_stopping_the_run() {
    let dir = TempDir::new().unwrap();
    write_cases(&dir, "bad.yaml", "- name: [unclosed\n");
    write_cases(
        &dir,
        "good.yaml",
        "- name: ok\n  input: add 3 and 4\n  expected: [[{add: [3, 4]}]]\n",
    );
    assert!(load_test_cases(&dir.path().join("bad.yaml")).is_err());
    let results = collect_results(&Engine::new(), None, &config(dir.path()));
    assert_eq!(partition_results(&results), (1, 1, 0));
}
