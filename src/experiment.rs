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
use crate::selection::ExperimentSelection;
use std::path::Path;
use std::path::PathBuf;

/// Chooses the experiment passed as a positional argument, or the default.
///
/// The default path is ignored whenever the user names an experiment.
pub fn classify_experiment(
  positional: &[String],
  default_experiment: &Path,
) -> Result<ExperimentSelection> {
  match positional {
    [] => Ok(ExperimentSelection::Default(default_experiment.to_path_buf())),
    [argument] => {
      if argument.contains('*') {
        return Err(ClassifyError::ExperimentWildcard(argument.clone()).into());
      }
      Ok(ExperimentSelection::Custom(PathBuf::from(argument)))
    }
    _ => Err(ClassifyError::MultipleExperiments.into()),
  }
}
