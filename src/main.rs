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
use anchor_launcher::cli::Cli;
use anchor_launcher::config::LauncherConfig;
use anchor_launcher::config::LauncherSettings;
use anchor_launcher::engine::FileConfigLoader;
use anchor_launcher::engine::PlanReporter;
use anchor_launcher::executor::DEFAULT_BEHAVIOUR_MESSAGE;
use anchor_launcher::executor::ExperimentExecutor;
use anchor_launcher::experiment::classify_experiment;
use anchor_launcher::input::classify_input;
use anchor_launcher::logging::setup_tracing;
use anchor_launcher::output::classify_output_options;
use anchor_launcher::selection::PathSelection;
use anchor_launcher::task::classify_task;
use anchor_launcher::tasks::print_tasks;
use anyhow::Context;
use anyhow::Result;
use std::fs;
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
  let _guard = match setup_tracing() {
    Ok(guard) => guard,
    Err(err) => {
      eprintln!("Could not set up logging: {err:#}");
      return ExitCode::FAILURE;
    }
  };

  let cli = Cli::parse_normalized(std::env::args_os());
  let main_span = tracing::info_span!("launcher");
  let _enter = main_span.enter();

  match run(&cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      eprintln!("{err:#}");
      if let Some(log_path) = &cli.log_error {
        if let Err(log_err) = fs::write(log_path, format!("{err:?}\n")) {
          eprintln!("Could not write error log to {}: {log_err}", log_path.display());
        }
      }
      ExitCode::FAILURE
    }
  }
}

fn run(cli: &Cli) -> Result<()> {
  let settings = LauncherSettings::from_env()?;
  let config = LauncherConfig::resolve(&settings).context("Cannot locate the installation")?;

  if cli.wants_task_listing() {
    let mut stdout = io::stdout().lock();
    print_tasks(&config.tasks_directory(), &mut stdout)?;
    return Ok(());
  }

  let experiment = classify_experiment(&cli.experiment, &config.default_experiment)?;
  let tasks_directory = config.tasks_directory();

  let mut executor = ExperimentExecutor::new(config, experiment);
  executor.input = match &cli.input {
    Some(arguments) => classify_input(arguments)?,
    None => PathSelection::Default,
  };
  executor.output = classify_output_options(
    cli.output.as_deref(),
    cli.output_omit_identifier.as_deref(),
  )?;
  if let Some(arguments) = cli.task_arguments() {
    executor.task = classify_task(&arguments, &tasks_directory)?;
  }
  executor.show_arguments = cli.show_arguments;
  executor.default_behaviour = Some(DEFAULT_BEHAVIOUR_MESSAGE.to_string());

  let context = cli.execution_context()?;
  let mut reporter = PlanReporter::new(io::stdout().lock());
  executor.execute(context, &FileConfigLoader, &mut reporter)?;
  Ok(())
}
