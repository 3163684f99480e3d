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
use crate::context::ExecutionContext;
use crate::error::ResolveError;
use crate::error::Result;
use crate::pretty::pretty_path;
use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;

/// A deferred value that is resolved against an [`ExecutionContext`].
///
/// A classifier builds the selection from raw arguments at parse time; the
/// executor calls [`Select::select`] on it exactly once.
pub trait Select {
  type Output;

  /// Resolves the value, possibly writing into `context`.
  fn select(&self, context: &mut ExecutionContext) -> Result<Self::Output>;

  /// True if no explicit user argument produced this selection.
  fn is_default(&self) -> bool;

  /// A short description for the user. Only meaningful for non-default selections.
  fn describe(&self) -> Result<String>;
}

/// Whether a directory selection replaces the input or the output location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryRole {
  Input,
  Output,
}

/// The outcome of classifying the input, output or task arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum PathSelection {
  /// No argument was given; whatever the experiment defines is used.
  Default,

  /// A wildcard string, split into directory and glob when selected.
  Glob(String),

  /// Normalized extensions (lower-case, no leading period).
  Extensions(BTreeSet<String>),

  /// A structured-config file to be parsed by the external loader.
  ConfigFile(PathBuf),

  /// A directory to read from or write into.
  Directory { path: PathBuf, role: DirectoryRole },

  /// Existing, non-directory files, in the order given.
  Files(Vec<PathBuf>),

  /// A structured-config file found from a symbolic task name.
  TaskName { name: String, path: PathBuf },
}

impl Select for PathSelection {
  type Output = Option<PathBuf>;

  fn select(&self, context: &mut ExecutionContext) -> Result<Option<PathBuf>> {
    match self {
      PathSelection::Default => Ok(None),
      PathSelection::Glob(wildcard) => {
        let (directory, glob) = split_glob(wildcard);
        let input = &mut context.input;
        input.assign_directory(directory);
        input.assign_glob(glob);
        // An empty set disables any extension filter
        input.assign_extensions(BTreeSet::new());
        Ok(None)
      }
      PathSelection::Extensions(extensions) => {
        context.input.assign_extensions(extensions.clone());
        Ok(None)
      }
      PathSelection::ConfigFile(path) => Ok(Some(path.clone())),
      PathSelection::Directory { path, role } => {
        match role {
          DirectoryRole::Input => {
            context.input.assign_directory(Some(path.clone()));
            context.input.recursive = true;
          }
          DirectoryRole::Output => context.output.directory = Some(path.clone()),
        }
        Ok(None)
      }
      PathSelection::Files(paths) => {
        context.input.assign_paths(paths.clone());
        Ok(None)
      }
      PathSelection::TaskName { name, path } => {
        context.task_name = Some(name.clone());
        Ok(Some(path.clone()))
      }
    }
  }

  fn is_default(&self) -> bool {
    matches!(self, PathSelection::Default)
  }

  fn describe(&self) -> Result<String> {
    match self {
      PathSelection::Default => Ok("default".to_string()),
      PathSelection::Glob(wildcard) => Ok(wildcard.clone()),
      PathSelection::Extensions(extensions) => {
        Ok(extensions.iter().cloned().collect::<Vec<_>>().join(", "))
      }
      PathSelection::ConfigFile(path) => Ok(format!("from {}", pretty_path(path)?)),
      PathSelection::Directory { path, .. } => pretty_path(path),
      PathSelection::Files(paths) => Ok(
        paths
          .iter()
          .map(|path| pretty_path(path))
          .collect::<Result<Vec<_>>>()?
          .join(", "),
      ),
      PathSelection::TaskName { name, .. } => Ok(name.clone()),
    }
  }
}

/// The outcome of classifying the positional experiment argument.
#[derive(Debug, Clone, PartialEq)]
pub enum ExperimentSelection {
  /// The experiment configured for the installation.
  Default(PathBuf),

  /// A path passed explicitly by the user.
  Custom(PathBuf),
}

impl ExperimentSelection {
  pub fn path(&self) -> &Path {
    match self {
      ExperimentSelection::Default(path) | ExperimentSelection::Custom(path) => path,
    }
  }
}

impl Select for ExperimentSelection {
  type Output = PathBuf;

  fn select(&self, _context: &mut ExecutionContext) -> Result<PathBuf> {
    let path = self.path();
    if path.is_dir() {
      return Err(ResolveError::ExperimentIsDirectory(path.to_path_buf()).into());
    }
    Ok(path.to_path_buf())
  }

  fn is_default(&self) -> bool {
    matches!(self, ExperimentSelection::Default(_))
  }

  fn describe(&self) -> Result<String> {
    match self {
      ExperimentSelection::Default(path) => Ok(format!("default experiment {}", pretty_path(path)?)),
      ExperimentSelection::Custom(path) => Ok(format!("experiment {}", pretty_path(path)?)),
    }
  }
}

/// Splits a wildcard string into a directory prefix and the remaining glob.
///
/// The split happens at the last separator before the first `*`, so
/// `images/2024/small_*.png` yields `(Some("images/2024"), "small_*.png")`.
pub fn split_glob(wildcard: &str) -> (Option<PathBuf>, String) {
  let first_wildcard = wildcard.find('*').unwrap_or(wildcard.len());
  let prefix = &wildcard[..first_wildcard];

  match prefix.rfind(is_separator) {
    Some(0) => (Some(PathBuf::from("/")), wildcard[1..].to_string()),
    Some(index) => (
      Some(PathBuf::from(&wildcard[..index])),
      wildcard[index + 1..].to_string(),
    ),
    None => (None, wildcard.to_string()),
  }
}

fn is_separator(c: char) -> bool {
  c == '/' || std::path::is_separator(c)
}
