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

//! Driver backend selection with fallback support.
//!
//! Backends are tried once, in the configured priority order, and the first
//! one whose `open` succeeds becomes active. A backend that opens but later
//! fails individual calls stays active; that is handled per call by the
//! facade, never by re-running the chain.

use prism_core::{BackendAttempt, BackendDriver, BackendKind, BackendSession, InitError};
use std::time::Instant;

/// Where the fallback chain stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorState {
    /// No selection has run since creation or the last reset.
    Uninitialized,
    /// A backend opened successfully.
    Active(BackendKind),
    /// Every backend failed.
    Exhausted,
}

/// The outcome of a successful selection.
pub struct Selection {
    /// The backend that became active.
    pub kind: BackendKind,
    /// Its open session. Owned by whoever holds the selection.
    pub session: Box<dyn BackendSession>,
    /// Backends that were tried before it, with their failures.
    pub attempts: Vec<BackendAttempt>,
    /// Wall time spent in the chain.
    pub selection_time_ms: u64,
}

/// Tries driver backends in priority order.
pub struct BackendSelector {
    drivers: Vec<Box<dyn BackendDriver>>,
    state: SelectorState,
}

impl BackendSelector {
    /// Creates a selector over `drivers`, highest priority first.
    pub fn new(drivers: Vec<Box<dyn BackendDriver>>) -> Self {
        Self {
            drivers,
            state: SelectorState::Uninitialized,
        }
    }

    /// Current state of the chain.
    pub fn state(&self) -> SelectorState {
        self.state
    }

    /// Kinds of the configured drivers, in priority order.
    pub fn driver_kinds(&self) -> Vec<BackendKind> {
        self.drivers.iter().map(|d| d.kind()).collect()
    }

    /// Runs the chain and returns the first session that opens.
    pub fn select(&mut self) -> Result<Selection, InitError> {
        if self.drivers.is_empty() {
            log::error!("Backend selection requested with no drivers configured.");
            self.state = SelectorState::Exhausted;
            return Err(InitError::NoBackendsConfigured);
        }

        let start_time = Instant::now();
        let mut attempts = Vec::new();

        log::info!("Starting driver backend selection...");

        for driver in &self.drivers {
            let kind = driver.kind();
            log::info!("Attempting to open the {kind} backend...");

            match driver.open() {
                Ok(session) => {
                    let selection_time_ms = start_time.elapsed().as_millis() as u64;
                    log::info!(
                        "Selected the {kind} backend after {} failed attempt(s) in {selection_time_ms} ms.",
                        attempts.len()
                    );
                    self.state = SelectorState::Active(kind);
                    return Ok(Selection {
                        kind,
                        session,
                        attempts,
                        selection_time_ms,
                    });
                }
                Err(error) => {
                    log::warn!("Failed to open the {kind} backend: {error}");
                    attempts.push(BackendAttempt { kind, error });
                }
            }
        }

        self.state = SelectorState::Exhausted;
        Err(InitError::Exhausted { attempts })
    }

    /// Returns to [`SelectorState::Uninitialized`] after the session was released.
    pub fn reset(&mut self) {
        self.state = SelectorState::Uninitialized;
    }
}
