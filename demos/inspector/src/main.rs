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

//! Prints every adapter the settings service finds, with its capabilities and
//! current settings.
//!
//! Usage: `inspector [config.json]`

use anyhow::{Context, Result};
use prism_core::{SettingError, SettingKey};
use prism_service::{ServiceConfig, SettingsService};
use std::path::PathBuf;

fn load_config() -> Result<ServiceConfig> {
    match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => ServiceConfig::load(&path),
        None => Ok(ServiceConfig::default()),
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = load_config()?;
    let service = SettingsService::new(&config);
    let notifications = service.subscribe();

    service
        .initialize()
        .context("No driver backend could be initialized")?;
    if let Some(kind) = service.active_backend() {
        println!("Backend: {kind}");
    }

    for adapter in service.list_adapters() {
        println!(
            "\n[{}] {}{}",
            adapter.id,
            adapter,
            if adapter.is_integrated { ", integrated" } else { "" }
        );

        let caps = service.get_capabilities(&adapter.id);
        println!(
            "  anisotropic: {}  tessellation: {}  shader cache: {}  power profiles: {}",
            caps.supports_anisotropic,
            caps.supports_tessellation_control,
            caps.supports_shader_cache,
            caps.supports_power_profiles
        );

        for key in SettingKey::ALL {
            let label = key.to_string();
            match service.get_setting(&adapter.id, key) {
                Ok(value) => println!("  {label:<22} {value}"),
                Err(SettingError::ValueNotSet { .. }) => println!("  {label:<22} (not set)"),
                Err(err) => println!("  {label:<22} unavailable: {err}"),
            }
        }
    }

    for notification in notifications.try_iter() {
        log::warn!("{notification}");
    }

    service.shutdown();
    Ok(())
}
