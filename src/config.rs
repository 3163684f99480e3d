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
use crate::pretty::completely_normalize;
use crate::pretty::normalize;
use figment::Figment;
use figment::providers::Env;
use figment::providers::Serialized;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

/// Key in the properties file giving the default experiment, relative to the install dir.
pub const PROPERTY_DEFAULT_EXPERIMENT: &str = "default.config.path.relative";

pub const DEFAULT_PROPERTIES_FILENAME: &str = "anchor.properties";
pub const TASKS_SUBDIRECTORY: &str = "tasks";
pub const USER_SUBDIRECTORY: &str = ".anchor";
pub const DEFAULT_INSTANCES_FILENAME: &str = "defaultBeans.xml";
pub const DEFAULT_EXTENSIONS_FILENAME: &str = "defaultInputExtensions.xml";
pub const ROOT_PATHS_FILENAME: &str = "rootPaths.xml";

/// Settings read from the environment (`ANCHOR_HOME`, `ANCHOR_USER_DIR`, `ANCHOR_PROPERTIES`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LauncherSettings {
  /// Replaces the directory of the running executable.
  #[serde(default)]
  pub home: Option<PathBuf>,

  /// Replaces `~/.anchor`.
  #[serde(default)]
  pub user_dir: Option<PathBuf>,

  /// Properties file name, relative to the install directory.
  #[serde(default)]
  pub properties: Option<String>,
}

impl LauncherSettings {
  /// Extracts settings from defaults layered with `ANCHOR_`-prefixed env vars.
  pub fn from_env() -> Result<Self> {
    let figment = Figment::from(Serialized::defaults(LauncherSettings::default()))
      .merge(Env::prefixed("ANCHOR_"));
    Self::from_figment(figment)
  }

  pub fn from_figment(figment: Figment) -> Result<Self> {
    let settings = figment.extract().map_err(ResolveError::from)?;
    Ok(settings)
  }
}

/// Fully resolved launcher configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LauncherConfig {
  /// Directory holding the running executable (or the `home` override).
  pub install_directory: PathBuf,

  pub default_experiment: PathBuf,

  /// Assumed to be the directory of the default experiment.
  pub config_directory: PathBuf,

  /// Per-user override directory, usually `~/.anchor`.
  pub user_directory: PathBuf,
}

impl LauncherConfig {
  /// Resolves the configuration from `settings`.
  pub fn resolve(settings: &LauncherSettings) -> Result<Self> {
    let install_directory = match &settings.home {
      Some(home) => home.clone(),
      None => executable_directory()?,
    };
    let properties = settings
      .properties
      .as_deref()
      .unwrap_or(DEFAULT_PROPERTIES_FILENAME);
    let user_directory = match &settings.user_dir {
      Some(user_dir) => user_dir.clone(),
      None => default_user_directory(),
    };
    Self::from_install_directory(install_directory, properties, user_directory)
  }

  pub fn from_install_directory(
    install_directory: PathBuf,
    properties: &str,
    user_directory: PathBuf,
  ) -> Result<Self> {
    let default_experiment = default_experiment_path(&install_directory, properties)?;
    let config_directory = default_experiment
      .parent()
      .map(Path::to_path_buf)
      .unwrap_or_else(|| install_directory.clone());

    tracing::debug!(
      install = %install_directory.display(),
      experiment = %default_experiment.display(),
      "Resolved launcher configuration"
    );

    Ok(LauncherConfig {
      install_directory,
      default_experiment,
      config_directory,
      user_directory,
    })
  }

  /// Where symbolic task names are looked up.
  pub fn tasks_directory(&self) -> PathBuf {
    self.config_directory.join(TASKS_SUBDIRECTORY)
  }

  /// `models/` beside the configuration directory, absolute and normalized.
  pub fn model_directory(&self) -> PathBuf {
    let parent = self
      .config_directory
      .parent()
      .unwrap_or(&self.config_directory);
    completely_normalize(&parent.join("models"))
  }
}

/// The directory of the running executable.
///
/// If the executable path is itself a directory (an unpacked bundle), it is used directly.
pub fn executable_directory() -> Result<PathBuf> {
  let executable = env::current_exe().map_err(ResolveError::ExecutableLocation)?;
  Ok(bundle_directory(&executable))
}

/// A bundle path as a directory: itself if a directory, else its parent.
pub fn bundle_directory(path: &Path) -> PathBuf {
  if path.is_dir() {
    path.to_path_buf()
  } else {
    path
      .parent()
      .map(Path::to_path_buf)
      .unwrap_or_else(|| path.to_path_buf())
  }
}

/// `~/.anchor`, or `.anchor` relative to the working directory when no home exists.
pub fn default_user_directory() -> PathBuf {
  dirs_next::home_dir()
    .unwrap_or_default()
    .join(USER_SUBDIRECTORY)
}

/// Reads `<install_directory>/<properties>` and resolves the default experiment it names.
pub fn default_experiment_path(install_directory: &Path, properties: &str) -> Result<PathBuf> {
  let properties_path = install_directory.join(properties);
  if !properties_path.exists() {
    return Err(ResolveError::PropertiesNotFound(properties_path).into());
  }

  let text =
    fs::read_to_string(&properties_path).map_err(|source| ResolveError::PropertiesRead {
      path: properties_path.clone(),
      source,
    })?;

  let relative = parse_properties(&text)
    .remove(PROPERTY_DEFAULT_EXPERIMENT)
    .ok_or(ResolveError::PropertiesMissingKey(PROPERTY_DEFAULT_EXPERIMENT))?;

  Ok(install_directory.join(relative))
}

/// Parses `key=value`, `key: value` or `key value` lines.
///
/// Blank lines and lines starting with `#` or `!` are skipped.
pub fn parse_properties(text: &str) -> BTreeMap<String, String> {
  text
    .lines()
    .map(str::trim)
    .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('!'))
    .map(|line| {
      match line.find(|c: char| c == '=' || c == ':' || c.is_whitespace()) {
        Some(index) => {
          let key = line[..index].trim_end();
          let rest = line[index..].trim_start();
          let value = rest
            .strip_prefix(['=', ':'])
            .unwrap_or(rest)
            .trim_start();
          (key.to_string(), value.to_string())
        }
        None => (line.to_string(), String::new()),
      }
    })
    .collect()
}

/// Override files found at the installation and user levels, in layer order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
  pub default_instances: Vec<PathBuf>,
  pub input_extensions: Vec<PathBuf>,
  pub root_paths: Vec<PathBuf>,
}

impl ConfigOverrides {
  /// Finds which override files exist, installation level first.
  ///
  /// Default instances must exist in at least one location; the other files are optional.
  pub fn locate(config_directory: &Path, user_directory: &Path) -> Result<Self> {
    let home = normalize(&config_directory.join(DEFAULT_INSTANCES_FILENAME));
    let user = normalize(&user_directory.join(DEFAULT_INSTANCES_FILENAME));
    if !home.exists() && !user.exists() {
      return Err(ResolveError::DefaultInstancesMissing { home, user }.into());
    }

    let layers = |filename: &str| existing_layers(config_directory, user_directory, filename);
    Ok(ConfigOverrides {
      default_instances: layers(DEFAULT_INSTANCES_FILENAME),
      input_extensions: layers(DEFAULT_EXTENSIONS_FILENAME),
      root_paths: layers(ROOT_PATHS_FILENAME),
    })
  }
}

fn existing_layers(config_directory: &Path, user_directory: &Path, filename: &str) -> Vec<PathBuf> {
  [config_directory, user_directory]
    .into_iter()
    .map(|directory| normalize(&directory.join(filename)))
    .filter(|path| path.is_file())
    .collect()
}
