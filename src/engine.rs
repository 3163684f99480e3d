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
use crate::pretty::normalize;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

/// What a structured-config file is expected to define.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigKind {
  Experiment,
  Input,
  Output,
  Task,
  DefaultInstances,
  InputExtensions,
  RootPaths,
}

impl ConfigKind {
  pub fn name(self) -> &'static str {
    match self {
      ConfigKind::Experiment => "experiment",
      ConfigKind::Input => "input",
      ConfigKind::Output => "output",
      ConfigKind::Task => "task",
      ConfigKind::DefaultInstances => "default-instances",
      ConfigKind::InputExtensions => "input-extensions",
      ConfigKind::RootPaths => "root-paths",
    }
  }
}

/// A structured-config file that has been loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigDocument {
  pub kind: ConfigKind,
  pub path: PathBuf,

  #[serde(skip)]
  pub contents: String,
}

/// Parses structured-config files.
pub trait ConfigLoader {
  fn load(&self, path: &Path, kind: ConfigKind) -> Result<ConfigDocument>;
}

/// Override files after loading, installation layer before user layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadedOverrides {
  pub default_instances: Vec<ConfigDocument>,
  pub input_extensions: Vec<ConfigDocument>,
  pub root_paths: Vec<ConfigDocument>,
}

/// Everything the engine needs besides the [`ExecutionContext`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentPlan {
  pub experiment: ConfigDocument,

  /// Replaces the experiment's input definition, if present.
  pub input: Option<ConfigDocument>,

  /// Replaces the experiment's output definition, if present.
  pub output: Option<ConfigDocument>,

  /// Replaces the experiment's task, if present.
  pub task: Option<ConfigDocument>,

  pub overrides: LoadedOverrides,
}

/// Executes an experiment.
pub trait ExperimentEngine {
  fn execute(&mut self, plan: ExperimentPlan, context: ExecutionContext) -> Result<()>;
}

/// Loads configuration files from the local filesystem as text.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileConfigLoader;

impl ConfigLoader for FileConfigLoader {
  fn load(&self, path: &Path, kind: ConfigKind) -> Result<ConfigDocument> {
    let path = checked_config_path(path)?;
    let contents = fs::read_to_string(&path).map_err(|source| ResolveError::ConfigRead {
      kind: kind.name(),
      path: path.clone(),
      source,
    })?;
    tracing::debug!(kind = kind.name(), path = %path.display(), "Loaded configuration");
    Ok(ConfigDocument {
      kind,
      path,
      contents,
    })
  }
}

/// Normalizes `path` and checks that a file exists there.
pub fn checked_config_path(path: &Path) -> Result<PathBuf> {
  let path = normalize(path);
  if !path.is_file() {
    return Err(ResolveError::ConfigMissing(path).into());
  }
  Ok(path)
}

/// The serialized form written by [`PlanReporter`].
#[derive(Debug, Serialize)]
struct PlanReport<'a> {
  plan: &'a ExperimentPlan,
  context: &'a ExecutionContext,
}

/// Writes the plan and context as pretty JSON instead of running anything.
#[derive(Debug)]
pub struct PlanReporter<W: Write> {
  out: W,
}

impl<W: Write> PlanReporter<W> {
  pub fn new(out: W) -> Self {
    Self { out }
  }

  pub fn into_inner(self) -> W {
    self.out
  }
}

impl<W: Write> ExperimentEngine for PlanReporter<W> {
  fn execute(&mut self, plan: ExperimentPlan, context: ExecutionContext) -> Result<()> {
    let report = PlanReport {
      plan: &plan,
      context: &context,
    };
    let json = serde_json::to_string_pretty(&report).map_err(std::io::Error::from)?;
    writeln!(self.out, "{json}")?;
    Ok(())
  }
}
