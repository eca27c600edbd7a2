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

//! Setting keys, their fixed value domains, and the tagged setting value.
//!
//! The domain of every key is static metadata. A value is validated against
//! it locally, before anything is handed to a backend.

use std::fmt;

const TEXTURE_QUALITY_CHOICES: &[&str] = &["Performance", "Balanced", "Quality"];
const POWER_PROFILE_CHOICES: &[&str] = &["PowerSaving", "Balanced", "Performance"];

/// A per-adapter rendering setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SettingKey {
    /// Anisotropic filtering on/off.
    AnisotropicFiltering,
    /// Anisotropic sample level. Kept independent of the on/off key.
    AnisotropicLevel,
    /// Texture filtering quality preset.
    TextureQuality,
    /// Maximum tessellation factor.
    TessellationLevel,
    /// Driver shader cache on/off.
    ShaderCache,
    /// Wait for vertical refresh.
    VSync,
    /// Adapter power profile.
    PowerProfile,
}

impl SettingKey {
    /// All keys, in declaration order.
    pub const ALL: [SettingKey; 7] = [
        SettingKey::AnisotropicFiltering,
        SettingKey::AnisotropicLevel,
        SettingKey::TextureQuality,
        SettingKey::TessellationLevel,
        SettingKey::ShaderCache,
        SettingKey::VSync,
        SettingKey::PowerProfile,
    ];

    /// Returns the declared value domain of this key.
    pub fn domain(self) -> ValueDomain {
        match self {
            SettingKey::AnisotropicFiltering | SettingKey::ShaderCache | SettingKey::VSync => {
                ValueDomain::Boolean
            }
            SettingKey::AnisotropicLevel => ValueDomain::Integer { min: 1, max: 16 },
            SettingKey::TessellationLevel => ValueDomain::Integer { min: 0, max: 64 },
            SettingKey::TextureQuality => ValueDomain::Choice(TEXTURE_QUALITY_CHOICES),
            SettingKey::PowerProfile => ValueDomain::Choice(POWER_PROFILE_CHOICES),
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// The set of values a [`SettingKey`] accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueDomain {
    /// `true` or `false`.
    Boolean,
    /// An integer within an inclusive range.
    Integer {
        /// Smallest accepted value.
        min: i32,
        /// Largest accepted value.
        max: i32,
    },
    /// One string out of a closed list.
    Choice(&'static [&'static str]),
}

impl ValueDomain {
    /// Returns `true` if `value` carries the right tag and lies inside the domain.
    pub fn accepts(&self, value: &SettingValue) -> bool {
        match (self, value) {
            (ValueDomain::Boolean, SettingValue::Bool(_)) => true,
            (ValueDomain::Integer { min, max }, SettingValue::Int(v)) => (*min..=*max).contains(v),
            (ValueDomain::Choice(choices), SettingValue::Choice(s)) => {
                choices.contains(&s.as_str())
            }
            _ => false,
        }
    }

    /// Position of `choice` in a [`ValueDomain::Choice`] list.
    pub fn choice_index(&self, choice: &str) -> Option<usize> {
        match self {
            ValueDomain::Choice(choices) => choices.iter().position(|c| *c == choice),
            _ => None,
        }
    }

    /// The choice stored at `index` in a [`ValueDomain::Choice`] list.
    pub fn choice_at(&self, index: usize) -> Option<&'static str> {
        match self {
            ValueDomain::Choice(choices) => choices.get(index).copied(),
            _ => None,
        }
    }
}

impl fmt::Display for ValueDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueDomain::Boolean => write!(f, "boolean"),
            ValueDomain::Integer { min, max } => write!(f, "integer in {min}..={max}"),
            ValueDomain::Choice(choices) => write!(f, "one of [{}]", choices.join(", ")),
        }
    }
}

/// A typed setting value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    /// A boolean switch.
    Bool(bool),
    /// A bounded integer.
    Int(i32),
    /// A member of a closed string enumeration.
    Choice(String),
}

impl SettingValue {
    /// Short name of the value's tag, for diagnostics.
    pub fn tag(&self) -> &'static str {
        match self {
            SettingValue::Bool(_) => "boolean",
            SettingValue::Int(_) => "integer",
            SettingValue::Choice(_) => "choice",
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(v) => write!(f, "{v}"),
            SettingValue::Int(v) => write!(f, "{v}"),
            SettingValue::Choice(v) => f.write_str(v),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(v: bool) -> Self {
        SettingValue::Bool(v)
    }
}

impl From<i32> for SettingValue {
    fn from(v: i32) -> Self {
        SettingValue::Int(v)
    }
}

impl From<&str> for SettingValue {
    fn from(v: &str) -> Self {
        SettingValue::Choice(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolean_keys_reject_strings() {
        let domain = SettingKey::AnisotropicFiltering.domain();
        assert!(domain.accepts(&SettingValue::Bool(true)));
        assert!(!domain.accepts(&SettingValue::from("not-a-bool")));
        assert!(!domain.accepts(&SettingValue::Int(1)));
    }

    #[test]
    fn integer_keys_enforce_bounds() {
        let domain = SettingKey::AnisotropicLevel.domain();
        assert!(domain.accepts(&SettingValue::Int(8)));
        assert!(domain.accepts(&SettingValue::Int(16)));
        assert!(!domain.accepts(&SettingValue::Int(0)));
        assert!(!domain.accepts(&SettingValue::Int(17)));
        assert!(SettingKey::TessellationLevel
            .domain()
            .accepts(&SettingValue::Int(0)));
    }

    #[test]
    fn choice_keys_accept_only_listed_strings() {
        let domain = SettingKey::TextureQuality.domain();
        assert!(domain.accepts(&SettingValue::from("Balanced")));
        assert!(!domain.accepts(&SettingValue::from("balanced")));
        assert!(!domain.accepts(&SettingValue::Bool(true)));
    }

    #[test]
    fn choice_index_round_trips_through_position() {
        let domain = SettingKey::PowerProfile.domain();
        assert_eq!(domain.choice_index("Performance"), Some(2));
        assert_eq!(domain.choice_at(2), Some("Performance"));
        assert_eq!(domain.choice_at(3), None);
        assert_eq!(ValueDomain::Boolean.choice_index("Balanced"), None);
    }

    #[test]
    fn every_key_has_a_domain_description() {
        for key in SettingKey::ALL {
            assert!(!key.domain().to_string().is_empty());
        }
        assert_eq!(
            SettingKey::TextureQuality.domain().to_string(),
            "one of [Performance, Balanced, Quality]"
        );
    }
}
