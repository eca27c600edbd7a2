// Copyright 2025 eraflo
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

//! Configuration for the settings service.

use anyhow::{bail, Context, Result};
use prism_core::{BackendDriver, BackendKind};
use prism_infra::{default_library_names, ContextDriver, LegacyDriver, SimulationDriver};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the settings service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Backends tried at initialization, highest priority first.
    /// Leaving out [`BackendKind::Simulation`] disables the simulated fallback.
    pub backends: Vec<BackendKind>,
    /// Driver library names tried, in order, by both driver generations.
    pub library_names: Vec<String>,
    /// Ask the driver to enumerate connected adapters only.
    pub enumerate_connected_only: bool,
    /// Maximum number of undelivered error notifications.
    /// If the queue is full, new notifications are dropped.
    pub notification_capacity: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            backends: BackendKind::PRIORITY.to_vec(),
            library_names: default_library_names(),
            enumerate_connected_only: true,
            notification_capacity: 256,
        }
    }
}

impl ServiceConfig {
    /// Parses a JSON configuration. Missing fields take their default.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).context("Invalid settings service configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration '{}'", path.display()))?;
        Self::from_json(&text)
    }

    /// Checks invariants serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.notification_capacity == 0 {
            bail!("notification_capacity must be at least 1");
        }
        for (i, kind) in self.backends.iter().enumerate() {
            if self.backends[..i].contains(kind) {
                bail!("backend {kind:?} is listed more than once");
            }
        }
        Ok(())
    }

    /// Instantiates the configured fallback chain, in priority order.
    pub fn build_drivers(&self) -> Vec<Box<dyn BackendDriver>> {
        self.backends
            .iter()
            .map(|kind| -> Box<dyn BackendDriver> {
                match kind {
                    BackendKind::Context => Box::new(ContextDriver::new(
                        self.library_names.clone(),
                        self.enumerate_connected_only,
                    )),
                    BackendKind::Legacy => Box::new(LegacyDriver::new(
                        self.library_names.clone(),
                        self.enumerate_connected_only,
                    )),
                    BackendKind::Simulation => Box::new(SimulationDriver::new()),
                }
            })
            .collect()
    }
}
