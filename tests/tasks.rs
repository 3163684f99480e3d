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
use anchor_launcher::tasks::TaskIndex;
use anchor_launcher::tasks::describe_task_names;
use anchor_launcher::tasks::find_task_names;
use anchor_launcher::tasks::index_by_subdirectory;
use anchor_launcher::tasks::print_tasks;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_find_task_names() {
  let temp = tempdir().unwrap();
  let tasks = temp.path();
  fs::create_dir_all(tasks.join("segment")).unwrap();
  fs::create_dir_all(tasks.join("include")).unwrap();
  fs::write(tasks.join("resize.xml"), "").unwrap();
  fs::write(tasks.join("notes.txt"), "").unwrap();
  fs::write(tasks.join("segment/text.XML"), "").unwrap();
  fs::write(tasks.join("segment/cells.xml"), "").unwrap();
  fs::write(tasks.join("include/common.xml"), "").unwrap();

  let names = find_task_names(tasks).unwrap();
  assert_eq!(names, vec!["resize", "segment/cells", "segment/text"]);
}

#[test]
fn test_missing_directory_has_no_tasks() {
  let temp = tempdir().unwrap();

  let names = find_task_names(&temp.path().join("absent")).unwrap();
  assert!(names.is_empty());
}

#[test]
fn test_index_by_subdirectory() {
  let index = index_by_subdirectory(["resize", "segment/text", "segment/cells", "a/b/c"]);

  let mut expected = TaskIndex::new();
  expected.entry(String::new()).or_default().insert("resize".to_string());
  expected.entry("segment".to_string()).or_default().insert("cells".to_string());
  expected.entry("segment".to_string()).or_default().insert("text".to_string());
  expected.entry("a/b".to_string()).or_default().insert("c".to_string());
  assert_eq!(index, expected);
}

#[test]
fn test_describe_task_names() {
  let index = index_by_subdirectory(["montage", "resize", "montage/reorder", "segment/text", "segment/cells"]);

  let description = describe_task_names(&index);
  assert_eq!(
    description,
    "There are 5 predefined tasks:\n\nresize\n\nmontage -or- montage/{reorder}\nsegment/{cells | text}"
  );
}

#[test]
fn test_print_tasks() {
  let temp = tempdir().unwrap();
  fs::write(temp.path().join("resize.xml"), "").unwrap();

  let mut out = Vec::new();
  print_tasks(temp.path(), &mut out).unwrap();
  let printed = String::from_utf8(out).unwrap();

  assert!(printed.starts_with("There are 1 predefined tasks:\n\nresize\n"));
  assert!(printed.contains("Run a predefined task with the -t <taskName> command line option."));
}

#[test]
fn test_print_no_tasks() {
  let temp = tempdir().unwrap();

  let mut out = Vec::new();
  print_tasks(temp.path(), &mut out).unwrap();
  let printed = String::from_utf8(out).unwrap();

  assert!(printed.starts_with("No predefined tasks exist (in "));
}
