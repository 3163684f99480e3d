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
use crate::input::path_from_argument;
use crate::selection::DirectoryRole;
use crate::selection::PathSelection;
use std::fs;

/// Where the output options are documented.
pub const OUTPUT_OPTIONS_URL: &str =
  "https://www.anchoranalysis.org/user_guide_command_line.html#output-options";

/// Chooses between `-o` and `-oo`, classifying whichever is present.
pub fn classify_output_options(
  output: Option<&[String]>,
  output_into_root: Option<&[String]>,
) -> Result<PathSelection> {
  match (output, output_into_root) {
    (Some(_), Some(_)) => Err(ClassifyError::OutputOptionsConflict.into()),
    (None, Some(arguments)) => classify_output(arguments, true),
    (Some(arguments), None) => classify_output(arguments, false),
    (None, None) => Ok(PathSelection::Default),
  }
}

/// Classifies the argument to `-o` (or `-oo` when `write_into_root`).
///
/// An existing directory is written into. An existing file is read as BeanXML
/// describing the output. A missing path is created as a directory if it ends
/// with a separator. With `write_into_root`, the directory must not already
/// exist and is left for the execution engine to create.
pub fn classify_output(arguments: &[String], write_into_root: bool) -> Result<PathSelection> {
  let option = if write_into_root { "oo" } else { "o" };
  let [argument] = arguments else {
    return Err(ClassifyError::OutputMultipleArguments { option }.into());
  };

  let path = path_from_argument(argument)?;

  if path.is_dir() {
    if write_into_root {
      return Err(ClassifyError::OutputDirectoryExists.into());
    }
    return Ok(PathSelection::Directory {
      path,
      role: DirectoryRole::Output,
    });
  }

  if path.exists() {
    if write_into_root {
      return Err(ClassifyError::OutputDirectoryRequired.into());
    }
    return Ok(PathSelection::ConfigFile(path));
  }

  if looks_like_directory(argument) || write_into_root {
    if !write_into_root {
      tracing::debug!(path = %path.display(), "Creating output directory");
      fs::create_dir_all(&path)?;
    }
    return Ok(PathSelection::Directory {
      path,
      role: DirectoryRole::Output,
    });
  }

  Err(
    ClassifyError::OutputUnrecognized {
      argument: argument.clone(),
      link: OUTPUT_OPTIONS_URL,
    }
    .into(),
  )
}

fn looks_like_directory(argument: &str) -> bool {
  argument.ends_with('/') || argument.ends_with('\\')
}
