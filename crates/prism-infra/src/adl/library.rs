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

//! Locating the driver library and resolving its entry points.

use libloading::Library;
use prism_core::BackendError;

/// Library names tried, in order, when none are configured.
pub fn default_library_names() -> Vec<String> {
    #[cfg(target_os = "windows")]
    let names: &[&str] = &["atiadlxx.dll", "atiadlxy.dll"];
    #[cfg(not(target_os = "windows"))]
    let names: &[&str] = &["libatiadlxx.so"];

    names.iter().map(|name| name.to_string()).collect()
}

/// A loaded driver library.
///
/// Function pointers copied out of it are valid only while it is alive, so
/// every session stores it next to the pointers it resolved.
pub(crate) struct DriverLibrary {
    library: Library,
    name: String,
}

impl DriverLibrary {
    /// Loads the first candidate that the OS loader accepts.
    pub(crate) fn load(candidates: &[String]) -> Result<Self, BackendError> {
        let mut failures = Vec::new();

        for name in candidates {
            // SAFETY: loading runs the library's initialisers. The candidates
            // name the vendor display library, whose initialisers are inert.
            match unsafe { Library::new(name) } {
                Ok(library) => {
                    log::debug!("Loaded driver library '{name}'.");
                    return Ok(Self {
                        library,
                        name: name.clone(),
                    });
                }
                Err(e) => {
                    log::debug!("Could not load driver library '{name}': {e}");
                    failures.push(format!("{name}: {e}"));
                }
            }
        }

        if failures.is_empty() {
            return Err(BackendError::Unavailable(
                "no driver library names configured".to_string(),
            ));
        }
        Err(BackendError::Unavailable(failures.join("; ")))
    }

    /// Resolves a mandatory entry point.
    ///
    /// `T` must be the exact `extern "C"` function pointer type of `symbol`.
    pub(crate) fn require<T: Copy>(&self, symbol: &'static str) -> Result<T, BackendError> {
        self.resolve(symbol).ok_or_else(|| {
            BackendError::Unavailable(format!("{} does not export {symbol}", self.name))
        })
    }

    /// Resolves an entry point that older drivers may lack.
    pub(crate) fn optional<T: Copy>(&self, symbol: &'static str) -> Option<T> {
        let resolved = self.resolve(symbol);
        if resolved.is_none() {
            log::debug!("{} does not export optional {symbol}.", self.name);
        }
        resolved
    }

    /// Name the library was loaded under.
    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    fn resolve<T: Copy>(&self, symbol: &'static str) -> Option<T> {
        // SAFETY: callers pass the function pointer type matching the symbol's
        // C declaration, and keep `self` alive while the pointer is in use.
        unsafe { self.library.get::<T>(symbol.as_bytes()) }
            .ok()
            .map(|sym| *sym)
    }
}
