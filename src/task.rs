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
use crate::error::ClassifyError;
use crate::error::Result;
use crate::input::CONFIG_EXTENSION;
use crate::input::path_from_argument;
use crate::selection::PathSelection;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use std::path::PathBuf;

static TASK_NAME: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"^[a-zA-Z0-9_\-/]+$").expect("task-name pattern is a valid regex")
});

/// Classifies the argument to `-t` as either a task name or a path to BeanXML.
///
/// A name such as `resize` or `segment/text` is looked up as
/// `<tasks_directory>/<name>.xml` and must exist. Anything else is a literal
/// path whose existence is only checked when it is loaded.
pub fn classify_task(arguments: &[String], tasks_directory: &Path) -> Result<PathSelection> {
  let argument = match arguments {
    [] => return Err(ClassifyError::TaskMissing.into()),
    [argument] => argument,
    _ => return Err(ClassifyError::TaskMultiple.into()),
  };

  if is_task_name(argument) {
    let path = path_for_task(argument, tasks_directory);
    if !path.exists() {
      return Err(ClassifyError::UnknownTask(argument.clone()).into());
    }
    Ok(PathSelection::TaskName {
      name: argument.clone(),
      path,
    })
  } else {
    Ok(PathSelection::ConfigFile(path_from_argument(argument)?))
  }
}

/// True if `argument` contains only letters, digits, `_`, `-` and `/`.
pub fn is_task_name(argument: &str) -> bool {
  TASK_NAME.is_match(argument)
}

/// The file that defines the task called `name`.
pub fn path_for_task(name: &str, tasks_directory: &Path) -> PathBuf {
  tasks_directory.join(format!("{name}.{CONFIG_EXTENSION}"))
}
