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
use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the library.
pub type Result<T, E = LauncherError> = std::result::Result<T, E>;

/// Top-level error enum for the launcher library.
///
/// Every variant renders as a single, user-facing line.
#[derive(Error, Debug)]
pub enum LauncherError {
  #[error(transparent)]
  Classify(#[from] ClassifyError),

  #[error(transparent)]
  Resolve(#[from] ResolveError),

  #[error(transparent)]
  Io(#[from] std::io::Error),
}

/// Errors raised while classifying raw command-line arguments.
#[derive(Error, Debug)]
pub enum ClassifyError {
  #[error("Only a single wildcard argument is permitted to -i")]
  MultipleWildcards,

  #[error(
    "Only a single BeanXML argument is permitted after -i (i.e. with a path with a .xml extension)"
  )]
  MultipleConfigFiles,

  #[error(
    "If a file-extension (e.g. .png) is specified, all other arguments to -i must also be file-extensions"
  )]
  MixedExtensions,

  #[error(
    "With -i, please specify either a single directory or one or more files or a file extension (with a leading period), but not multiple directories. Perhaps your wildcard match is ill-specified?"
  )]
  MultipleDirectories,

  #[error("No input file exists at path: {0}")]
  InputMissing(PathBuf),

  #[error("Path is a directory not a file for input: {0}")]
  InputIsDirectory(PathBuf),

  #[error("A path passed as an argument is invalid: '{argument}'")]
  InvalidPath {
    argument: String,
    #[source]
    source: std::io::Error,
  },

  #[error("More than one argument was passed to -{option}. Only one is allowed!")]
  OutputMultipleArguments { option: &'static str },

  #[error("Only one of command-line options -o and -oo may be present, but both are!")]
  OutputOptionsConflict,

  #[error("The output-directory already exists. This is not permitted when option -oo is employed.")]
  OutputDirectoryExists,

  #[error("No output-directory was selected, as is required with option -oo")]
  OutputDirectoryRequired,

  #[error(
    "The argument '{argument}' for -o is neither a path to an existing file (BeanXML for an output-manager) nor looks like a directory (into which outputting occurs). See {link}"
  )]
  OutputUnrecognized { argument: String, link: &'static str },

  #[error("An argument (a task-name) must be specified after -t")]
  TaskMissing,

  #[error("Only one instance of the -t option is permitted.")]
  TaskMultiple,

  #[error("The task '{0}' is not known.")]
  UnknownTask(String),

  #[error("Cannot accept a wildcard in path to experiment BeanXML: {0}")]
  ExperimentWildcard(String),

  #[error("Please only pass a single experiment-file as an argument. Multiple files are not allowed")]
  MultipleExperiments,

  #[error(
    "The -{option} option must be either a positive integer or a ratio in the interval (0.0, 1.0), but is {value}"
  )]
  InvalidLimit { option: &'static str, value: String },

  #[error(
    "The -{option} option must be an index range such as 2 OR -2 OR 3:-2 OR 2: OR :2, but is {value}"
  )]
  InvalidIndexRange { option: &'static str, value: String },

  #[error("The -{option} option requires an argument.")]
  MissingOptionArgument { option: &'static str },

  #[error(
    "{reason} It must be in the format of either outputName or firstLevelOutputName:secondLevelOutputName, but is: {element}"
  )]
  InvalidOutputName { reason: &'static str, element: String },

  #[error("No file format identified by {0} is supported.")]
  UnsupportedImageFormat(String),

  #[error("The -tp option must be a positive integer, but is {0}")]
  InvalidProcessors(String),

  #[error(
    "The -ps option must be a size (e.g. 800x600, 800x or x600) or a positive scaling factor (e.g. 0.5), but is {0}"
  )]
  InvalidSize(String),
}

/// Errors raised while resolving defaults or selections against the filesystem.
#[derive(Error, Debug)]
pub enum ResolveError {
  #[error("Cannot find properties file at: {0}")]
  PropertiesNotFound(PathBuf),

  #[error("An error occurred loading properties from the properties file at {path}")]
  PropertiesRead {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Properties file is missing key: {0}")]
  PropertiesMissingKey(&'static str),

  #[error("Cannot determine the location of the running executable")]
  ExecutableLocation(#[source] std::io::Error),

  #[error("Failed to read launcher settings: {0}")]
  Settings(#[from] figment::Error),

  #[error("Please select a path to experiment FILE not a folder: {0}")]
  ExperimentIsDirectory(PathBuf),

  #[error("Error: a file does not exist at \"{0}\"")]
  ConfigMissing(PathBuf),

  #[error("An error occurred reading the {kind} BeanXML at \"{path}\"")]
  ConfigRead {
    kind: &'static str,
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Cannot find a config file for defaultBean instances, looking at: {home} and {user}")]
  DefaultInstancesMissing { home: PathBuf, user: PathBuf },

  #[error("Cannot determine the current working directory")]
  WorkingDirectory(#[source] std::io::Error),
}
