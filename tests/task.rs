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
use anchor_launcher::error::ClassifyError;
use anchor_launcher::error::LauncherError;
use anchor_launcher::selection::PathSelection;
use anchor_launcher::task::classify_task;
use anchor_launcher::task::is_task_name;
use anchor_launcher::task::path_for_task;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use tempfile::tempdir;

fn tasks_directory() -> TempDir {
  let temp = tempdir().unwrap();
  fs::create_dir_all(temp.path().join("segment")).unwrap();
  fs::write(temp.path().join("resize.xml"), "<config/>").unwrap();
  fs::write(temp.path().join("segment").join("text.xml"), "<config/>").unwrap();
  temp
}

fn task(name: &str, directory: &Path) -> Result<PathSelection, LauncherError> {
  classify_task(&[name.to_string()], directory)
}

#[test]
fn test_task_names() {
  assert!(is_task_name("resize"));
  assert!(is_task_name("segment/text"));
  assert!(is_task_name("summarize-images_2"));
  assert!(!is_task_name("tasks.xml"));
  assert!(!is_task_name("../resize"));
  assert!(!is_task_name(""));
}

#[test]
fn test_known_task() {
  let temp = tasks_directory();

  let selection = task("resize", temp.path()).unwrap();
  assert_eq!(
    selection,
    PathSelection::TaskName {
      name: "resize".to_string(),
      path: temp.path().join("resize.xml"),
    }
  );

  let selection = task("segment/text", temp.path()).unwrap();
  assert_eq!(
    selection,
    PathSelection::TaskName {
      name: "segment/text".to_string(),
      path: path_for_task("segment/text", temp.path()),
    }
  );
}

#[test]
fn test_unknown_task() {
  let temp = tasks_directory();

  let err = task("doesNotExist", temp.path()).unwrap_err();
  assert_eq!(err.to_string(), "The task 'doesNotExist' is not known.");
}

#[test]
fn test_path_is_not_checked() {
  let temp = tasks_directory();

  match task("../no-such-task-file.xml", temp.path()).unwrap() {
    PathSelection::ConfigFile(path) => {
      assert!(path.is_absolute());
      assert!(!path.exists());
    }
    other => panic!("expected a config file, got {other:?}"),
  }
}

#[test]
fn test_argument_count() {
  let temp = tasks_directory();

  let err = classify_task(&[], temp.path()).unwrap_err();
  assert!(matches!(
    err,
    LauncherError::Classify(ClassifyError::TaskMissing)
  ));

  let err = classify_task(&["resize".to_string(), "resize".to_string()], temp.path()).unwrap_err();
  assert!(matches!(
    err,
    LauncherError::Classify(ClassifyError::TaskMultiple)
  ));
}
