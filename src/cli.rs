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
use crate::context::DebugMode;
use crate::context::ExecutionContext;
use crate::context::Grouping;
use crate::context::ImageFileFormat;
use crate::context::IndexRange;
use crate::context::InputLimit;
use crate::context::OutputNames;
use crate::context::SizeSuggestion;
use crate::context::parse_processors;
use crate::error::Result;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// Flags spelled with a single dash but more than one letter.
const MULTI_LETTER_FLAGS: [&str; 19] = [
  "ic", "ii", "ip", "is", "il", "ir", "oo", "oe", "od", "oa", "oc", "of", "on", "os", "tp", "ps",
  "pg", "sa", "st",
];

#[derive(Debug, Parser)]
#[command(
  name = "anchor",
  version,
  about = "Runs an experiment, optionally replacing its inputs, outputs or task"
)]
pub struct Cli {
  /// Path to an experiment file. If omitted, the default experiment is used.
  #[arg(value_name = "experimentFile.xml")]
  pub experiment: Vec<String>,

  /// An input-directory OR glob (e.g. small_*.jpg) OR file extension (e.g. .png) OR path to BeanXML
  #[arg(short = 'i', long = "input", num_args = 1..)]
  pub input: Option<Vec<String>>,

  /// Copies any unused files (as inputs) to the output directory
  #[arg(long = "ic", alias = "inputCopy")]
  pub input_copy: bool,

  /// Derives identifier from relative filename or path
  #[arg(long = "ip", alias = "inputRelative")]
  pub input_relative: bool,

  /// Subsets the identifier e.g. 2 OR -2 OR 3:-2 OR 2: OR :2 (zero-indexed, negatives count backwards)
  #[arg(
    long = "ii",
    alias = "inputSubsetIdentifier",
    value_name = "RANGE",
    allow_hyphen_values = true
  )]
  pub input_subset_identifier: Option<String>,

  /// Shuffles (randomizes) the order of the inputs
  #[arg(long = "is", alias = "inputShuffle")]
  pub input_shuffle: bool,

  /// Imposes an upper limit on the number of inputs (a count, or a ratio in (0, 1))
  #[arg(long = "il", alias = "inputLimit", value_name = "LIMIT")]
  pub input_limit: Option<String>,

  /// Randomly samples a number (or portion) of inputs
  #[arg(long = "ir", alias = "inputRandom", value_name = "LIMIT")]
  pub input_random: Option<String>,

  /// An output-directory OR path to BeanXML
  #[arg(short = 'o', long = "output", num_args = 1..)]
  pub output: Option<Vec<String>>,

  /// Like -o but omits the experiment identifier in the output directory
  #[arg(long = "oo", alias = "outputOmitExperimentIdentifier", num_args = 1..)]
  pub output_omit_identifier: Option<Vec<String>>,

  /// Enables specific additional output(s), e.g. csv,stacks:background
  #[arg(long = "oe", alias = "outputEnable", value_name = "OUTPUTS")]
  pub output_enable: Option<Vec<String>>,

  /// Disables specific additional output(s)
  #[arg(long = "od", alias = "outputDisable", value_name = "OUTPUTS")]
  pub output_disable: Option<Vec<String>>,

  /// Enables all outputs
  #[arg(long = "oa", alias = "outputEnableAll")]
  pub output_enable_all: bool,

  /// Disables opening the output directory in the desktop
  #[arg(long = "oc", alias = "outputConsoleOnly")]
  pub output_console_only: bool,

  /// Suggested image-format for writing, e.g. png or ome.xml
  #[arg(long = "of", alias = "outputFileFormat", value_name = "FORMAT")]
  pub output_format: Option<String>,

  /// Outputs with an incrementing number sequence
  #[arg(long = "on", alias = "outputIncrementingNumber")]
  pub output_incrementing_number: bool,

  /// Suppresses subdirectories in output file identifiers
  #[arg(long = "os", alias = "outputSuppressDirectories")]
  pub output_suppress_directories: bool,

  /// A task-name OR path to BeanXML. Without a value, lists the predefined tasks.
  #[arg(short = 't', long = "task", num_args = 0..=1)]
  pub task: Option<Option<String>>,

  /// Suggests a maximum number of CPU processors
  #[arg(long = "tp", alias = "taskNumberProcessors", value_name = "N")]
  pub task_processors: Option<String>,

  /// Suggests an image size or scaling factor, e.g. 800x600 OR 0.5
  #[arg(long = "ps", alias = "paramSize", value_name = "SIZE")]
  pub param_size: Option<String>,

  /// Groups inputs by subsetting the identifier e.g. 2 OR -2 OR 3:-2 OR 2: OR :2
  #[arg(
    long = "pg",
    alias = "paramGroup",
    value_name = "RANGE",
    num_args = 0..=1,
    allow_negative_numbers = true
  )]
  pub param_group: Option<Option<String>>,

  /// Enables debug mode, running only the first input (whose identifier contains the value)
  #[arg(short = 'd', long = "debug", value_name = "CONTAINS", num_args = 0..=1)]
  pub debug: Option<Option<String>>,

  /// Prints task-names as useful for -t <name>
  #[arg(long = "st", alias = "showTasks")]
  pub show_tasks: bool,

  /// Prints the experiment path arguments before executing
  #[arg(long = "sa", alias = "showArguments")]
  pub show_arguments: bool,

  /// Logs a detailed error report to this file if the run fails
  #[arg(short = 'l', long = "logError", value_name = "FILE")]
  pub log_error: Option<PathBuf>,
}

impl Cli {
  /// Parses `args` after rewriting single-dash multi-letter flags like `-oo` to `--oo`.
  pub fn parse_normalized<I, T>(args: I) -> Self
  where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
  {
    Cli::parse_from(normalize_args(args))
  }

  /// Like [`Cli::parse_normalized`] but returns clap's error instead of exiting.
  pub fn try_parse_normalized<I, T>(args: I) -> Result<Self, clap::Error>
  where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
  {
    Cli::try_parse_from(normalize_args(args))
  }

  /// The task argument, if `-t` was given with a value.
  pub fn task_arguments(&self) -> Option<Vec<String>> {
    self.task.as_ref()?.as_ref().map(|task| vec![task.clone()])
  }

  /// True if the predefined tasks should be listed instead of running.
  pub fn wants_task_listing(&self) -> bool {
    self.show_tasks || matches!(self.task, Some(None))
  }

  /// Context seeded from the flags that do not classify a selection.
  pub fn execution_context(&self) -> Result<ExecutionContext> {
    let mut context = ExecutionContext::default();

    let input = &mut context.input;
    input.copy_non_inputs = self.input_copy;
    input.relative_for_identifier = self.input_relative;
    if let Some(range) = &self.input_subset_identifier {
      input.identifier_subrange = Some(IndexRange::parse(range, "ii")?);
    }
    input.shuffle = self.input_shuffle;
    if let Some(limit) = &self.input_limit {
      input.limit = Some(InputLimit::parse(limit, "il")?);
    }
    // -ir both shuffles and limits
    if let Some(limit) = &self.input_random {
      input.shuffle = true;
      input.limit = Some(InputLimit::parse(limit, "ir")?);
    }

    let output = &mut context.output;
    output.omit_experiment_identifier = self.output_omit_identifier.is_some();
    if self.output_enable_all {
      output.enable_all = true;
    } else if let Some(outputs) = &self.output_enable {
      output.enabled = OutputNames::parse(outputs, "oe")?;
    }
    if let Some(outputs) = &self.output_disable {
      output.disabled = OutputNames::parse(outputs, "od")?;
    }
    if let Some(format) = &self.output_format {
      output.image_format = Some(ImageFileFormat::parse(format)?);
    }
    output.incrementing_number = self.output_incrementing_number;
    output.suppress_directories = self.output_suppress_directories;
    output.console_only = self.output_console_only;

    let task = &mut context.task;
    if let Some(processors) = &self.task_processors {
      task.max_processors = Some(parse_processors(processors)?);
    }
    if let Some(size) = &self.param_size {
      task.size = Some(SizeSuggestion::parse(size)?);
    }
    if let Some(range) = &self.param_group {
      let range = range
        .as_deref()
        .map(|range| IndexRange::parse(range, "pg"))
        .transpose()?;
      task.group = Some(Grouping { range });
    }

    context.debug = self.debug.as_ref().map(|contains| DebugMode {
      contains: contains.clone(),
    });
    Ok(context)
  }
}

/// Rewrites single-dash multi-letter flags such as `-oo` or `-il` into their double-dash form.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
  I: IntoIterator<Item = T>,
  T: Into<OsString>,
{
  args
    .into_iter()
    .map(|arg| {
      let arg: OsString = arg.into();
      let rewritten = arg
        .to_str()
        .and_then(|text| text.strip_prefix('-'))
        .filter(|flag| MULTI_LETTER_FLAGS.contains(flag))
        .map(|flag| OsString::from(format!("--{flag}")));
      rewritten.unwrap_or(arg)
    })
    .collect()
}
