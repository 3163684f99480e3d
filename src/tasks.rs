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
use crate::error::Result;
use crate::input::CONFIG_EXTENSION;
use crate::pretty::completely_normalize;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// Tasks below this subdirectory are fragments included by other tasks.
const IGNORE_SUBDIRECTORY: &str = "include/";

/// Task names, grouped by subdirectory (`""` for the root).
pub type TaskIndex = BTreeMap<String, BTreeSet<String>>;

/// Finds the names of all tasks below `tasks_directory`.
pub fn find_task_names(tasks_directory: &Path) -> Result<Vec<String>> {
  let directory = completely_normalize(tasks_directory);

  let mut names: Vec<String> = xml_files(&directory)?
    .iter()
    .filter_map(|path| task_identifier(&directory, path))
    .filter(|name| !name.starts_with(IGNORE_SUBDIRECTORY))
    .collect();
  names.sort();
  Ok(names)
}

/// Groups task names by their directory component.
pub fn index_by_subdirectory<I, S>(names: I) -> TaskIndex
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
{
  let mut index = TaskIndex::new();
  for name in names {
    let (directory, file_name) = match name.as_ref().rsplit_once('/') {
      Some((directory, file_name)) => (directory.to_string(), file_name.to_string()),
      None => (String::new(), name.as_ref().to_string()),
    };
    index.entry(directory).or_default().insert(file_name);
  }
  index
}

/// Describes the index: a count, the root tasks, then one line per subdirectory.
pub fn describe_task_names(index: &TaskIndex) -> String {
  let total: usize = index.values().map(BTreeSet::len).sum();
  let mut lines = vec![format!("There are {total} predefined tasks:"), String::new()];

  let root_tasks = index.get("").cloned().unwrap_or_default();

  // A root task sharing its name with a subdirectory is shown with that subdirectory
  let root_only: Vec<&str> = root_tasks
    .iter()
    .filter(|task| !index.contains_key(task.as_str()))
    .map(String::as_str)
    .collect();
  lines.push(root_only.join(", "));

  if index.len() > 1 {
    lines.push(String::new());
  }

  for (directory, tasks) in index.iter().filter(|(directory, _)| !directory.is_empty()) {
    let tasks: Vec<&str> = tasks.iter().map(String::as_str).collect();
    let mut line = String::new();
    if root_tasks.contains(directory) {
      line.push_str(&format!("{directory} -or- "));
    }
    line.push_str(&format!("{directory}/{{{}}}", tasks.join(" | ")));
    lines.push(line);
  }

  lines.join("\n")
}

/// Writes the predefined tasks, and how to run them, to `out`.
pub fn print_tasks<W: Write>(tasks_directory: &Path, out: &mut W) -> Result<()> {
  let index = index_by_subdirectory(find_task_names(tasks_directory)?);

  if index.is_empty() {
    writeln!(
      out,
      "No predefined tasks exist (in {}).",
      tasks_directory.display()
    )?;
    return Ok(());
  }

  writeln!(out, "{}", describe_task_names(&index))?;
  writeln!(out)?;
  writeln!(out, "Run a predefined task with the -t <taskName> command line option.")?;
  writeln!(out, "e.g. anchor -t resize")?;
  writeln!(out, "e.g. anchor -t montage/reorder")?;
  writeln!(out, "e.g. anchor -t segment/text")?;
  Ok(())
}

fn xml_files(directory: &Path) -> Result<Vec<PathBuf>> {
  let mut files = Vec::new();

  if directory.is_dir() {
    for entry in fs::read_dir(directory)? {
      let path = entry?.path();
      if path.is_dir() {
        files.extend(xml_files(&path)?);
      } else if path
        .extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case(CONFIG_EXTENSION))
      {
        files.push(path);
      }
    }
  }

  Ok(files)
}

/// `path` relative to `directory`, with unix separators and no extension.
fn task_identifier(directory: &Path, path: &Path) -> Option<String> {
  let relative = path.strip_prefix(directory).ok()?.with_extension("");
  let parts: Vec<String> = relative
    .components()
    .filter_map(|component| match component {
      Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
      _ => None,
    })
    .collect();

  if parts.is_empty() {
    None
  } else {
    Some(parts.join("/"))
  }
}
