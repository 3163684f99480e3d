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
use crate::error::ResolveError;
use crate::error::Result;
use std::env;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// Above this many `..` steps, the absolute form is shown instead.
const MAX_PARENT_STEPS: usize = 3;

/// Renders `path` relative to the current working directory, or absolutely.
pub fn pretty_path(path: &Path) -> Result<String> {
  let working_dir = env::current_dir().map_err(ResolveError::WorkingDirectory)?;
  Ok(pretty_path_from(path, &working_dir))
}

/// Renders `path` relative to `working_dir`, or absolutely.
///
/// Both paths are first made absolute and lexically normalized. Identical
/// paths render as `"."`. Paths on different roots (e.g. different drives)
/// always render absolutely.
pub fn pretty_path_from(path: &Path, working_dir: &Path) -> String {
  let path = completely_normalize(path);
  let working_dir = completely_normalize(working_dir);

  if path == working_dir {
    return ".".to_string();
  }

  if root_of(&path) != root_of(&working_dir) {
    return path.display().to_string();
  }

  match pathdiff::diff_paths(&path, &working_dir) {
    Some(relative) if count_parent_steps(&relative) <= MAX_PARENT_STEPS => {
      relative.display().to_string()
    }
    _ => path.display().to_string(),
  }
}

/// Makes `path` absolute (against the current directory) and resolves `.`/`..` lexically.
pub fn completely_normalize(path: &Path) -> PathBuf {
  let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
  normalize(&absolute)
}

/// Lexically removes `.` and resolves `..` without touching the filesystem.
///
/// `..` at the root is dropped, as the root is its own parent.
pub fn normalize(path: &Path) -> PathBuf {
  let mut normalized = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => match normalized.components().next_back() {
        Some(Component::Normal(_)) => {
          normalized.pop();
        }
        Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
        _ => normalized.push(".."),
      },
      other => normalized.push(other.as_os_str()),
    }
  }
  normalized
}

fn root_of(path: &Path) -> PathBuf {
  path
    .components()
    .take_while(|c| matches!(c, Component::Prefix(_) | Component::RootDir))
    .collect()
}

fn count_parent_steps(path: &Path) -> usize {
  path
    .components()
    .filter(|c| matches!(c, Component::ParentDir))
    .count()
}
