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

//! Per-adapter capability flags.

use crate::setting::SettingKey;

/// The classes of settings an adapter/backend combination supports.
///
/// Always recomputed on demand: driver state may change between queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CapabilitySet {
    /// Anisotropic filtering and its level can be controlled.
    pub supports_anisotropic: bool,
    /// The tessellation factor can be controlled.
    pub supports_tessellation_control: bool,
    /// The driver shader cache can be toggled.
    pub supports_shader_cache: bool,
    /// Power profiles can be selected.
    pub supports_power_profiles: bool,
}

impl CapabilitySet {
    /// A set with every flag cleared.
    pub const fn none() -> Self {
        Self {
            supports_anisotropic: false,
            supports_tessellation_control: false,
            supports_shader_cache: false,
            supports_power_profiles: false,
        }
    }

    /// A set with every flag granted.
    pub const fn all() -> Self {
        Self {
            supports_anisotropic: true,
            supports_tessellation_control: true,
            supports_shader_cache: true,
            supports_power_profiles: true,
        }
    }

    /// Returns the flag gating `key`, or `None` for keys no flag covers.
    pub fn gate(&self, key: SettingKey) -> Option<bool> {
        match key {
            SettingKey::AnisotropicFiltering | SettingKey::AnisotropicLevel => {
                Some(self.supports_anisotropic)
            }
            SettingKey::TessellationLevel => Some(self.supports_tessellation_control),
            SettingKey::ShaderCache => Some(self.supports_shader_cache),
            SettingKey::PowerProfile => Some(self.supports_power_profiles),
            SettingKey::TextureQuality | SettingKey::VSync => None,
        }
    }

    /// Returns `false` only when a flag covering `key` exists and is cleared.
    pub fn permits(&self, key: SettingKey) -> bool {
        self.gate(key).unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_the_default() {
        assert_eq!(CapabilitySet::default(), CapabilitySet::none());
    }

    #[test]
    fn anisotropic_flag_gates_both_anisotropic_keys() {
        let caps = CapabilitySet {
            supports_anisotropic: false,
            ..CapabilitySet::all()
        };
        assert!(!caps.permits(SettingKey::AnisotropicFiltering));
        assert!(!caps.permits(SettingKey::AnisotropicLevel));
        assert!(caps.permits(SettingKey::ShaderCache));
    }

    #[test]
    fn ungated_keys_are_always_permitted() {
        let caps = CapabilitySet::none();
        assert!(caps.permits(SettingKey::VSync));
        assert!(caps.permits(SettingKey::TextureQuality));
        assert_eq!(caps.gate(SettingKey::VSync), None);
    }
}
