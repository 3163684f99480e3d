// Copyright 2025 Chisomo Makombo Sakala
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
use assert_cmd::cargo;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;
use tempfile::tempdir;

use fs_extra::dir::CopyOptions;
use fs_extra::dir::copy;
use std::fs;

use serde_json::Value;
use serde_json::json;

/// Copies ./tests/fixtures into a fresh temp dir, as `<temp>/fixtures`.
fn setup_fixtures() -> TempDir {
  let temp = tempdir().unwrap();
  let options = CopyOptions::new();
  copy("tests/fixtures", temp.path(), &options).unwrap();
  temp
}

/// The launcher, installed in the fixture tree and run from `working_dir`.
fn anchor(working_dir: &Path) -> Command {
  let mut cmd = Command::new(cargo::cargo_bin!("anchor"));
  cmd
    .current_dir(working_dir)
    .env("ANCHOR_HOME", working_dir.join("fixtures/install"))
    .env("ANCHOR_USER_DIR", working_dir.join("user"))
    .env_remove("ANCHOR_PROPERTIES")
    .env_remove("ANCHOR_LOG_FILE")
    .env("RUST_LOG", "info")
    .env("CLICOLOR", "0")
    .env("NO_COLOR", "1");
  cmd
}

fn run_for_plan(cmd: &mut Command) -> Value {
  let output = cmd.output().unwrap();
  assert!(
    output.status.success(),
    "launcher failed: {}",
    String::from_utf8_lossy(&output.stderr)
  );
  serde_json::from_slice(&output.stdout).expect("stdout should be the JSON plan")
}

#[test]
fn test_default_everything() {
  let temp = setup_fixtures();

  anchor(temp.path())
    .assert()
    .success()
    .stderr(predicate::str::contains("Searching recursively for image files"));

  let report = run_for_plan(&mut anchor(temp.path()));
  let experiment = report["plan"]["experiment"]["path"].as_str().unwrap();
  assert!(experiment.ends_with("defaultExperiment.xml"));
  assert_eq!(report["plan"]["input"], Value::Null);
  assert_eq!(report["plan"]["task"], Value::Null);
  assert_eq!(
    report["plan"]["overrides"]["default_instances"]
      .as_array()
      .unwrap()
      .len(),
    1
  );
  assert!(
    report["plan"]["overrides"]["input_extensions"]
      .as_array()
      .unwrap()
      .is_empty()
  );

  let models = report["context"]["model_directory"].as_str().unwrap();
  assert!(Path::new(models).ends_with("install/models"));
}

#[test]
fn test_input_glob() {
  let temp = setup_fixtures();

  let report = run_for_plan(anchor(temp.path()).arg("-i").arg("small_*.png"));
  let input = &report["context"]["input"];
  assert_eq!(input["glob"], json!("small_*.png"));
  assert_eq!(input["extensions"], json!([]));
  assert_eq!(input["directory"], Value::Null);
}

#[test]
fn test_input_glob_ignores_working_directory() {
  let temp = setup_fixtures();
  let nested = temp.path().join("fixtures");

  let mut from_root = anchor(temp.path());
  let mut from_nested = anchor(temp.path());
  from_nested.current_dir(&nested);

  let first = run_for_plan(from_root.args(["-i", "small_*.png"]));
  let second = run_for_plan(from_nested.args(["-i", "small_*.png"]));

  for report in [&first, &second] {
    assert_eq!(report["context"]["input"]["glob"], json!("small_*.png"));
    assert_eq!(report["context"]["input"]["extensions"], json!([]));
  }
  assert_eq!(first["context"]["input"], second["context"]["input"]);
}

#[test]
fn test_input_glob_with_directory() {
  let temp = setup_fixtures();

  let report = run_for_plan(anchor(temp.path()).arg("-i").arg("fixtures/inputs/small_*.png"));
  let input = &report["context"]["input"];
  assert_eq!(input["glob"], json!("small_*.png"));
  assert_eq!(input["directory"], json!("fixtures/inputs"));
}

#[test]
fn test_input_extensions() {
  let temp = setup_fixtures();

  let report = run_for_plan(anchor(temp.path()).args(["-i", ".PNG,.jpg", ".tif"]));
  assert_eq!(
    report["context"]["input"]["extensions"],
    json!(["jpg", "png", "tif"])
  );
}

#[test]
fn test_input_directory_is_recursive() {
  let temp = setup_fixtures();

  let report = run_for_plan(anchor(temp.path()).args(["-i", "fixtures/inputs"]));
  let input = &report["context"]["input"];
  assert_eq!(input["recursive"], json!(true));
  assert!(Path::new(input["directory"].as_str().unwrap()).ends_with("fixtures/inputs"));
}

#[test]
fn test_input_files_keep_order() {
  let temp = setup_fixtures();

  let report = run_for_plan(anchor(temp.path()).args([
    "-i",
    "fixtures/inputs/small_2.png",
    "fixtures/inputs/small_1.png",
  ]));
  let paths = report["context"]["input"]["paths"].as_array().unwrap();
  assert_eq!(paths.len(), 2);
  assert!(paths[0].as_str().unwrap().ends_with("small_2.png"));
  assert!(paths[1].as_str().unwrap().ends_with("small_1.png"));
}

#[test]
fn test_input_missing_file() {
  let temp = setup_fixtures();

  anchor(temp.path())
    .args(["-i", "fixtures/inputs/absent.png"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("No input file exists at path"));
}

#[test]
fn test_input_limit_and_shuffle() {
  let temp = setup_fixtures();

  let report = run_for_plan(anchor(temp.path()).args(["-il", "0.5", "-is"]));
  let input = &report["context"]["input"];
  assert_eq!(input["limit"], json!({ "ratio": 0.5 }));
  assert_eq!(input["shuffle"], json!(true));

  let report = run_for_plan(anchor(temp.path()).args(["-ir", "3"]));
  let input = &report["context"]["input"];
  assert_eq!(input["limit"], json!({ "fixed": 3 }));
  assert_eq!(input["shuffle"], json!(true));
}

#[test]
fn test_input_limit_invalid() {
  let temp = setup_fixtures();

  anchor(temp.path())
    .args(["-il", "0"])
    .assert()
    .failure()
    .stderr(predicate::str::contains(
      "The -il option must be either a positive integer",
    ));
}

#[test]
fn test_output_directory_created() {
  let temp = setup_fixtures();

  let report = run_for_plan(anchor(temp.path()).args(["-o", "results/"]));
  assert!(temp.path().join("results").is_dir());
  let directory = report["context"]["output"]["directory"].as_str().unwrap();
  assert!(Path::new(directory).ends_with("results"));
  assert_eq!(
    report["context"]["output"]["omit_experiment_identifier"],
    json!(false)
  );
}

#[test]
fn test_output_into_root() {
  let temp = setup_fixtures();

  let report = run_for_plan(anchor(temp.path()).args(["-oo", "fresh"]));
  assert!(!temp.path().join("fresh").exists());
  assert_eq!(
    report["context"]["output"]["omit_experiment_identifier"],
    json!(true)
  );

  anchor(temp.path())
    .args(["-oo", "fixtures"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("output-directory already exists"));
}

#[test]
fn test_output_options_conflict() {
  let temp = setup_fixtures();

  anchor(temp.path())
    .args(["-o", "a/", "-oo", "b"])
    .assert()
    .failure()
    .stderr(predicate::str::contains(
      "Only one of command-line options -o and -oo may be present",
    ));
}

#[test]
fn test_output_unrecognized() {
  let temp = setup_fixtures();

  anchor(temp.path())
    .args(["-o", "nowhere"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("The argument 'nowhere' for -o"));
}

#[test]
fn test_list_tasks() {
  let temp = setup_fixtures();

  for flag in ["-t", "-st"] {
    anchor(temp.path())
      .arg(flag)
      .assert()
      .success()
      .stdout(predicate::str::contains("There are 2 predefined tasks:"))
      .stdout(predicate::str::contains("segment/{text}"))
      .stdout(predicate::str::contains("include").not());
  }
}

#[test]
fn test_task_by_name() {
  let temp = setup_fixtures();

  anchor(temp.path())
    .args(["-t", "resize", "-sa"])
    .assert()
    .success()
    .stderr(predicate::str::contains("Executing default experiment"))
    .stderr(predicate::str::contains("with task resize"))
    .stderr(predicate::str::contains("Searching recursively").not());

  let report = run_for_plan(anchor(temp.path()).args(["-t", "segment/text"]));
  assert_eq!(report["context"]["task_name"], json!("segment/text"));
  let task = report["plan"]["task"]["path"].as_str().unwrap();
  assert!(task.ends_with("text.xml"));
}

#[test]
fn test_unknown_task() {
  let temp = setup_fixtures();

  anchor(temp.path())
    .args(["-t", "doesNotExist"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("The task 'doesNotExist' is not known."));
}

#[test]
fn test_task_path_must_exist_when_loaded() {
  let temp = setup_fixtures();

  anchor(temp.path())
    .args(["-t", "../missing.xml"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Error: a file does not exist at"));
}

#[test]
fn test_custom_experiment() {
  let temp = setup_fixtures();

  let report = run_for_plan(anchor(temp.path()).arg("fixtures/install/config/tasks/resize.xml"));
  let experiment = report["plan"]["experiment"]["path"].as_str().unwrap();
  assert!(experiment.ends_with("resize.xml"));

  anchor(temp.path())
    .arg("fixtures/inputs")
    .assert()
    .failure()
    .stderr(predicate::str::contains("not a folder"));

  anchor(temp.path())
    .args(["one.xml", "two.xml"])
    .assert()
    .failure()
    .stderr(predicate::str::contains(
      "Please only pass a single experiment-file as an argument",
    ));
}

#[test]
fn test_missing_properties() {
  let temp = tempdir().unwrap();

  anchor(temp.path())
    .env("ANCHOR_HOME", temp.path())
    .assert()
    .failure()
    .stderr(predicate::str::contains("Cannot find properties file at"));
}

#[test]
fn test_error_log() {
  let temp = setup_fixtures();
  let log = temp.path().join("error.log");

  anchor(temp.path())
    .args(["-t", "doesNotExist", "-l"])
    .arg(&log)
    .assert()
    .failure();

  let contents = fs::read_to_string(&log).unwrap();
  assert!(contents.contains("doesNotExist"));
}

#[test]
fn test_output_and_task_options() {
  let temp = setup_fixtures();

  let report = run_for_plan(anchor(temp.path()).args([
    "-oe",
    "csv,stacks:background",
    "-of",
    "png",
    "-os",
    "-tp",
    "2",
    "-ps",
    "0.5",
    "-ii",
    "3:-2",
    "-ic",
  ]));
  let context = &report["context"];
  assert_eq!(
    context["output"]["enabled"],
    json!({ "first": ["csv"], "second": { "stacks": ["background"] } })
  );
  assert_eq!(context["output"]["image_format"], json!("png"));
  assert_eq!(context["output"]["suppress_directories"], json!(true));
  assert_eq!(context["task"]["max_processors"], json!(2));
  assert_eq!(context["task"]["size"], json!({ "scale": 0.5 }));
  assert_eq!(
    context["input"]["identifier_subrange"],
    json!({ "start": 3, "end": -2 })
  );
  assert_eq!(context["input"]["copy_non_inputs"], json!(true));
  assert_eq!(context["debug"], Value::Null);
}

#[test]
fn test_invalid_output_options() {
  let temp = setup_fixtures();

  anchor(temp.path())
    .args(["-oe", ":csv"])
    .assert()
    .failure()
    .stderr(predicate::str::contains(
      "An output-name may not start or end with a colon.",
    ));

  anchor(temp.path())
    .args(["-of", "xyz"])
    .assert()
    .failure()
    .stderr(predicate::str::contains(
      "No file format identified by xyz is supported.",
    ));
}
