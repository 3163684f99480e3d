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
use crate::config::ConfigOverrides;
use crate::config::LauncherConfig;
use crate::context::ExecutionContext;
use crate::engine::ConfigDocument;
use crate::engine::ConfigKind;
use crate::engine::ConfigLoader;
use crate::engine::ExperimentEngine;
use crate::engine::ExperimentPlan;
use crate::engine::LoadedOverrides;
use crate::error::Result;
use crate::selection::ExperimentSelection;
use crate::selection::PathSelection;
use crate::selection::Select;
use std::path::PathBuf;

/// Shown when everything is left at its default.
pub const DEFAULT_BEHAVIOUR_MESSAGE: &str = "Searching recursively for image files. CTRL+C cancels";

/// Runs an experiment once its four selections have been classified.
#[derive(Debug, Clone)]
pub struct ExperimentExecutor {
  config: LauncherConfig,
  experiment: ExperimentSelection,
  pub input: PathSelection,
  pub output: PathSelection,
  pub task: PathSelection,

  /// Describe the selections before executing, even if nothing asks for it.
  pub show_arguments: bool,

  /// Logged when every selection is the default.
  pub default_behaviour: Option<String>,
}

impl ExperimentExecutor {
  pub fn new(config: LauncherConfig, experiment: ExperimentSelection) -> Self {
    Self {
      config,
      experiment,
      input: PathSelection::Default,
      output: PathSelection::Default,
      task: PathSelection::Default,
      show_arguments: false,
      default_behaviour: None,
    }
  }

  pub fn config(&self) -> &LauncherConfig {
    &self.config
  }

  /// Resolves every selection in order and hands the result to `engine`.
  ///
  /// The experiment is selected first, then input, output and task.
  pub fn execute(
    &self,
    mut context: ExecutionContext,
    loader: &dyn ConfigLoader,
    engine: &mut dyn ExperimentEngine,
  ) -> Result<()> {
    let span = tracing::info_span!("experiment");
    let _enter = span.enter();

    if let Some(message) = self.default_behaviour.as_ref().filter(|_| self.all_default()) {
      tracing::info!("{message}. Learn how to select inputs, outputs and tasks with 'anchor -h'.");
    }

    let experiment_path = self.experiment.select(&mut context)?;
    let experiment = loader.load(&experiment_path, ConfigKind::Experiment)?;

    if self.show_arguments {
      tracing::info!("{}", self.describe()?);
    }

    context.model_directory = Some(self.config.model_directory());

    let overrides = load_overrides(
      ConfigOverrides::locate(&self.config.config_directory, &self.config.user_directory)?,
      loader,
    )?;

    let input = self.input.select(&mut context)?;
    let output = self.output.select(&mut context)?;
    let task = self.task.select(&mut context)?;

    let plan = ExperimentPlan {
      experiment,
      input: load_optional(input, ConfigKind::Input, loader)?,
      output: load_optional(output, ConfigKind::Output, loader)?,
      task: load_optional(task, ConfigKind::Task, loader)?,
      overrides,
    };

    tracing::debug!(?context, "Handing experiment to engine");
    engine.execute(plan, context)
  }

  /// One line such as `Executing experiment exp.xml with input .png and task resize`.
  pub fn describe(&self) -> Result<String> {
    let mut parts = Vec::with_capacity(3);
    for (identifier, selection) in [
      ("input", &self.input),
      ("output", &self.output),
      ("task", &self.task),
    ] {
      if !selection.is_default() {
        parts.push(format!("{identifier} {}", selection.describe()?));
      }
    }

    let mut line = format!("Executing {}", self.experiment.describe()?);
    for (index, part) in parts.iter().enumerate() {
      line.push_str(if index == 0 { " with " } else { " and " });
      line.push_str(part);
    }
    Ok(line)
  }

  fn all_default(&self) -> bool {
    self.experiment.is_default()
      && self.input.is_default()
      && self.output.is_default()
      && self.task.is_default()
  }
}

fn load_optional(
  path: Option<PathBuf>,
  kind: ConfigKind,
  loader: &dyn ConfigLoader,
) -> Result<Option<ConfigDocument>> {
  path.map(|path| loader.load(&path, kind)).transpose()
}

fn load_overrides(overrides: ConfigOverrides, loader: &dyn ConfigLoader) -> Result<LoadedOverrides> {
  let load_all = |paths: Vec<PathBuf>, kind: ConfigKind| {
    paths
      .iter()
      .map(|path| loader.load(path, kind))
      .collect::<Result<Vec<_>>>()
  };

  Ok(LoadedOverrides {
    default_instances: load_all(overrides.default_instances, ConfigKind::DefaultInstances)?,
    input_extensions: load_all(overrides.input_extensions, ConfigKind::InputExtensions)?,
    root_paths: load_all(overrides.root_paths, ConfigKind::RootPaths)?,
  })
}
