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
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// The mutable state handed to the execution engine.
///
/// Selections write into specific fields during their single `select` call;
/// the engine reads the result afterwards.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ExecutionContext {
  pub input: InputContext,
  pub output: OutputContext,

  /// Symbolic name of the task, when one was chosen by name.
  pub task_name: Option<String>,

  /// Directory where models used by tasks are found.
  pub model_directory: Option<PathBuf>,

  pub task: TaskContext,

  /// Set by `-d`: run only the first matching input.
  pub debug: Option<DebugMode>,
}

/// Parameters controlling how inputs are searched for.
#[derive(Debug, Default, Clone, Serialize)]
pub struct InputContext {
  pub directory: Option<PathBuf>,
  pub glob: Option<String>,

  /// `None` means no extensions were specified; an empty set means no filter.
  pub extensions: Option<BTreeSet<String>>,

  /// Literal list of files, bypassing any directory scan.
  pub paths: Option<Vec<PathBuf>>,

  pub recursive: bool,
  pub shuffle: bool,
  pub limit: Option<InputLimit>,

  /// Copy files that are not used as inputs to the output directory.
  pub copy_non_inputs: bool,

  /// Derive identifiers from the whole relative path, not just the file name.
  pub relative_for_identifier: bool,

  /// Which elements of the identifier to keep.
  pub identifier_subrange: Option<IndexRange>,
}

impl InputContext {
  pub fn assign_directory(&mut self, directory: Option<PathBuf>) {
    self.directory = directory;
  }

  pub fn assign_glob(&mut self, glob: String) {
    self.glob = Some(glob);
  }

  pub fn assign_extensions(&mut self, extensions: BTreeSet<String>) {
    self.extensions = Some(extensions);
  }

  pub fn assign_paths(&mut self, paths: Vec<PathBuf>) {
    self.paths = Some(paths);
  }
}

/// Where and how outputs are written.
#[derive(Debug, Default, Clone, Serialize)]
pub struct OutputContext {
  pub directory: Option<PathBuf>,

  /// Write directly into `directory` with no experiment-identifier subfolder.
  pub omit_experiment_identifier: bool,

  /// Enable every output, overriding `enabled`.
  pub enable_all: bool,
  pub enabled: OutputNames,
  pub disabled: OutputNames,

  /// Suggested format for written images.
  pub image_format: Option<ImageFileFormat>,

  /// Name outputs `0`, `1`, ... instead of by input identifier.
  pub incrementing_number: bool,

  /// Flatten subdirectories in output identifiers.
  pub suppress_directories: bool,

  /// Do not open the output directory in the desktop afterwards.
  pub console_only: bool,
}

/// Suggestions for how the task runs.
#[derive(Debug, Default, Clone, Serialize)]
pub struct TaskContext {
  pub max_processors: Option<usize>,
  pub size: Option<SizeSuggestion>,

  /// Groups inputs by a subset of their identifier elements.
  pub group: Option<Grouping>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct DebugMode {
  /// Only inputs whose identifier contains this are considered.
  pub contains: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Grouping {
  /// `None` groups by the whole identifier.
  pub range: Option<IndexRange>,
}

/// Output names, either first-level (`csv`) or second-level (`stacks:background`).
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct OutputNames {
  pub first: BTreeSet<String>,
  pub second: BTreeMap<String, BTreeSet<String>>,
}

impl OutputNames {
  pub fn is_empty(&self) -> bool {
    self.first.is_empty() && self.second.is_empty()
  }

  /// Adds every comma-separated element of each argument.
  ///
  /// An element `first:second` names a second-level output of `first`.
  pub fn parse(arguments: &[String], option: &'static str) -> Result<Self, ClassifyError> {
    let mut names = OutputNames::default();
    for argument in arguments {
      if argument.is_empty() {
        return Err(ClassifyError::MissingOptionArgument { option });
      }
      for element in argument.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        names.add_element(element)?;
      }
    }
    Ok(names)
  }

  fn add_element(&mut self, element: &str) -> Result<(), ClassifyError> {
    if !element.contains(':') {
      self.first.insert(element.to_string());
      return Ok(());
    }

    let invalid = |reason: &'static str| ClassifyError::InvalidOutputName {
      reason,
      element: element.to_string(),
    };
    if element.starts_with(':') || element.ends_with(':') {
      return Err(invalid("An output-name may not start or end with a colon."));
    }
    let parts: Vec<&str> = element.split(':').collect();
    match parts.as_slice() {
      [first, second] => {
        self
          .second
          .entry(first.to_string())
          .or_default()
          .insert(second.to_string());
        Ok(())
      }
      _ => Err(invalid("Invalid output-name.")),
    }
  }
}

/// A zero-indexed, inclusive range where negative indices count from the end.
///
/// Written as `2`, `-2`, `3:-2`, `2:` or `:2`. A missing start is `0` and a
/// missing end is `-1` (the last element).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexRange {
  pub start: i64,
  pub end: i64,
}

impl IndexRange {
  pub fn parse(value: &str, option: &'static str) -> Result<Self, ClassifyError> {
    let invalid = || ClassifyError::InvalidIndexRange {
      option,
      value: value.to_string(),
    };
    let index = |text: &str, default: i64| {
      let text = text.trim();
      if text.is_empty() {
        Ok(default)
      } else {
        text.parse::<i64>().map_err(|_| invalid())
      }
    };

    let trimmed = value.trim();
    if trimmed.is_empty() {
      return Err(invalid());
    }
    let range = match trimmed.split_once(':') {
      Some((_, end)) if end.contains(':') => return Err(invalid()),
      Some((start, end)) => IndexRange {
        start: index(start, 0)?,
        end: index(end, -1)?,
      },
      None => {
        let single = index(trimmed, 0)?;
        IndexRange {
          start: single,
          end: single,
        }
      }
    };

    // Only comparable when both count from the same end
    if (range.start >= 0) == (range.end >= 0) && range.start > range.end {
      return Err(invalid());
    }
    Ok(range)
  }
}

/// A suggested image size for tasks that resize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeSuggestion {
  /// `800x600`, or `800x` / `x600` to preserve the aspect ratio.
  Dimensions {
    width: Option<u32>,
    height: Option<u32>,
  },

  /// A factor such as `0.5`.
  Scale(f64),
}

impl SizeSuggestion {
  pub fn parse(value: &str) -> Result<Self, ClassifyError> {
    let invalid = || ClassifyError::InvalidSize(value.to_string());
    let value = value.trim();

    if let Some((width, height)) = value.split_once(['x', 'X']) {
      let dimension = |text: &str| -> Result<Option<u32>, ClassifyError> {
        match text.trim() {
          "" => Ok(None),
          text => match text.parse::<u32>() {
            Ok(size) if size > 0 => Ok(Some(size)),
            _ => Err(invalid()),
          },
        }
      };
      let (width, height) = (dimension(width)?, dimension(height)?);
      if width.is_none() && height.is_none() {
        return Err(invalid());
      }
      return Ok(SizeSuggestion::Dimensions { width, height });
    }

    match value.parse::<f64>() {
      Ok(scale) if scale > 0.0 && scale.is_finite() => Ok(SizeSuggestion::Scale(scale)),
      _ => Err(invalid()),
    }
  }
}

/// Image formats that outputs may be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFileFormat {
  Tiff,
  OmeTiff,
  OmeXml,
  Png,
  Jpeg,
  Bmp,
  Gif,
}

impl ImageFileFormat {
  /// Looks up a format by extension, ignoring case and a leading period.
  pub fn parse(identifier: &str) -> Result<Self, ClassifyError> {
    let normalized = identifier.trim().trim_start_matches('.').to_lowercase();
    let format = match normalized.as_str() {
      "tif" | "tiff" => ImageFileFormat::Tiff,
      "ome.tif" | "ome.tiff" => ImageFileFormat::OmeTiff,
      "ome.xml" | "ome" => ImageFileFormat::OmeXml,
      "png" => ImageFileFormat::Png,
      "jpg" | "jpeg" => ImageFileFormat::Jpeg,
      "bmp" => ImageFileFormat::Bmp,
      "gif" => ImageFileFormat::Gif,
      _ => return Err(ClassifyError::UnsupportedImageFormat(identifier.to_string())),
    };
    Ok(format)
  }
}

/// Parses the `-tp` argument: a positive number of processors.
pub fn parse_processors(value: &str) -> Result<usize, ClassifyError> {
  match value.trim().parse::<usize>() {
    Ok(processors) if processors > 0 => Ok(processors),
    _ => Err(ClassifyError::InvalidProcessors(value.to_string())),
  }
}

/// Upper bound on the number of inputs processed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputLimit {
  Fixed(usize),
  Ratio(f64),
}

impl InputLimit {
  /// Parses either a positive integer or a ratio strictly between 0 and 1.
  ///
  /// `option` is the short flag name, used in the error message.
  pub fn parse(value: &str, option: &'static str) -> Result<Self, ClassifyError> {
    let invalid = || ClassifyError::InvalidLimit {
      option,
      value: value.to_string(),
    };

    let value = value.trim();
    if let Ok(fixed) = value.parse::<i64>() {
      return match usize::try_from(fixed) {
        Ok(fixed) if fixed > 0 => Ok(InputLimit::Fixed(fixed)),
        _ => Err(invalid()),
      };
    }

    match value.parse::<f64>() {
      Ok(ratio) if ratio > 0.0 && ratio < 1.0 => Ok(InputLimit::Ratio(ratio)),
      _ => Err(invalid()),
    }
  }
}
