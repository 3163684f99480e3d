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
use crate::selection::DirectoryRole;
use crate::selection::PathSelection;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Extension (without period) of structured-config files.
pub const CONFIG_EXTENSION: &str = "xml";

/// Classifies the raw strings passed to `-i`.
///
/// The checks run in a fixed order and the first that applies wins: a wildcard
/// (`small_*.png`), a path to BeanXML (`inputs.xml`), file extensions
/// (`.png`, `.jpg,.tif`), a single existing directory, and finally a list of
/// existing files.
pub fn classify_input(arguments: &[String]) -> Result<PathSelection> {
  if let Some(selection) = check_wildcard(arguments)? {
    return Ok(selection);
  }
  if let Some(selection) = check_config_extension(arguments)? {
    return Ok(selection);
  }
  if let Some(selection) = check_file_extension(arguments)? {
    return Ok(selection);
  }

  let paths = paths_from_arguments(arguments)?;
  if let Some(selection) = check_directory(&paths)? {
    return Ok(selection);
  }

  check_files(&paths)?;
  Ok(PathSelection::Files(paths))
}

/// Returns a selection when `applies`, provided `permitted` also holds, else fails with `error`.
fn check(
  applies: bool,
  permitted: bool,
  selection: impl FnOnce() -> Result<PathSelection>,
  error: ClassifyError,
) -> Result<Option<PathSelection>> {
  if !applies {
    return Ok(None);
  }
  if !permitted {
    return Err(error.into());
  }
  selection().map(Some)
}

fn check_wildcard(arguments: &[String]) -> Result<Option<PathSelection>> {
  check(
    arguments.iter().any(|argument| argument.contains('*')),
    arguments.len() == 1,
    || Ok(PathSelection::Glob(arguments[0].clone())),
    ClassifyError::MultipleWildcards,
  )
}

fn check_config_extension(arguments: &[String]) -> Result<Option<PathSelection>> {
  check(
    arguments.iter().any(|argument| has_config_extension(argument)),
    arguments.len() == 1,
    || Ok(PathSelection::ConfigFile(path_from_argument(&arguments[0])?)),
    ClassifyError::MultipleConfigFiles,
  )
}

fn check_file_extension(arguments: &[String]) -> Result<Option<PathSelection>> {
  check(
    arguments.iter().any(|argument| is_file_extension(argument)),
    arguments.iter().all(|argument| is_file_extension(argument)),
    || Ok(PathSelection::Extensions(split_and_normalize(arguments))),
    ClassifyError::MixedExtensions,
  )
}

fn check_directory(paths: &[PathBuf]) -> Result<Option<PathSelection>> {
  check(
    paths.iter().any(|path| path.is_dir()),
    paths.len() == 1,
    || {
      Ok(PathSelection::Directory {
        path: paths[0].clone(),
        role: DirectoryRole::Input,
      })
    },
    ClassifyError::MultipleDirectories,
  )
}

fn check_files(paths: &[PathBuf]) -> Result<()> {
  for path in paths {
    if !path.exists() {
      return Err(ClassifyError::InputMissing(path.clone()).into());
    }
    if path.is_dir() {
      return Err(ClassifyError::InputIsDirectory(path.clone()).into());
    }
  }
  Ok(())
}

/// True if `path` ends with the structured-config extension, ignoring case.
pub fn has_config_extension(path: &str) -> bool {
  path
    .to_lowercase()
    .ends_with(&format!(".{CONFIG_EXTENSION}"))
}

/// True if `argument` looks like `.png` rather than a path such as `./a` or `..`.
pub fn is_file_extension(argument: &str) -> bool {
  argument.starts_with('.')
    && !argument.contains('/')
    && !argument.contains('\\')
    && argument != "."
    && argument != ".."
}

/// Splits comma-separated extensions, dropping leading periods and lower-casing.
pub fn split_and_normalize(arguments: &[String]) -> BTreeSet<String> {
  arguments
    .iter()
    .flat_map(|argument| argument.split(','))
    .map(|extension| extension.trim().trim_start_matches('.').to_lowercase())
    .filter(|extension| !extension.is_empty())
    .collect()
}

/// Converts a command-line argument to an absolute path.
pub fn path_from_argument(argument: &str) -> Result<PathBuf> {
  std::path::absolute(argument).map_err(|source| {
    ClassifyError::InvalidPath {
      argument: argument.to_string(),
      source,
    }
    .into()
  })
}

fn paths_from_arguments(arguments: &[String]) -> Result<Vec<PathBuf>> {
  arguments
    .iter()
    .map(|argument| path_from_argument(argument))
    .collect()
}
