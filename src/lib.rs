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

//! # Anchor launcher
//!
//! `anchor-launcher` turns the loosely-typed arguments of the `anchor` command
//! line into a resolved execution plan: which experiment to run, and how its
//! inputs, outputs and task are replaced.
//!
//! Each axis is classified into a selection first, and only resolved against an
//! [`context::ExecutionContext`] once the experiment is about to run.
//!
//! ## Core Modules
//!
//! * [`selection`]: The [`selection::Select`] trait and the selections it is
//!   implemented for.
//! * [`input`], [`output`], [`task`], [`experiment`]: Classify raw
//!   arguments for each axis into a selection.
//! * [`executor`]: Resolves the selections in order and hands the plan to an
//!   [`engine::ExperimentEngine`].
//! * [`config`]: Locates the installation, the default experiment and the
//!   override files.
//! * [`engine`]: The narrow interfaces to the config loader and execution engine.
//! * [`tasks`]: Lists predefined tasks.
//! * [`pretty`]: Shortens paths for display.
//! * [`context`]: The mutable context that selections resolve into.
//! * [`cli`]: Defines the `clap`-based command-line interface.
//! * [`error`]: Defines the custom error types for the library.
//! * [`logging`]: Provides the `setup_tracing` utility.

pub mod cli;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod executor;
pub mod experiment;
pub mod input;
pub mod logging;
pub mod output;
pub mod pretty;
pub mod selection;
pub mod task;
pub mod tasks;
