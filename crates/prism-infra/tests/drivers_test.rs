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

//! Opening the driver bindings on machines with and without a driver.

use prism_core::{BackendDriver, BackendError, BackendKind, SettingKey, SettingValue};
use prism_infra::{ContextDriver, LegacyDriver, SimulationDriver};

fn missing_library() -> Vec<String> {
    vec!["prism-test-missing-driver".to_string()]
}

#[test]
fn test_context_driver_without_library_is_unavailable() {
    let driver = ContextDriver::new(missing_library(), true);
    assert_eq!(driver.kind(), BackendKind::Context);
    match driver.open() {
        Err(BackendError::Unavailable(msg)) => assert!(msg.contains("prism-test-missing-driver")),
        Err(other) => panic!("expected Unavailable, got {other}"),
        Ok(_) => panic!("a missing library must not produce a session"),
    }
}

#[test]
fn test_legacy_driver_without_library_is_unavailable() {
    let driver = LegacyDriver::new(missing_library(), false);
    assert_eq!(driver.kind(), BackendKind::Legacy);
    assert!(matches!(driver.open(), Err(BackendError::Unavailable(_))));
}

#[test]
fn test_library_candidates_are_tried_in_order() {
    let driver = ContextDriver::new(
        vec![
            "prism-test-first-missing".to_string(),
            "prism-test-second-missing".to_string(),
        ],
        true,
    );
    let Err(BackendError::Unavailable(msg)) = driver.open() else {
        panic!("expected Unavailable");
    };
    let first = msg.find("prism-test-first-missing").expect("first candidate reported");
    let second = msg.find("prism-test-second-missing").expect("second candidate reported");
    assert!(first < second);
}

#[test]
fn test_simulation_session_lifecycle() {
    let driver = SimulationDriver::new();
    let mut session = driver.open().expect("simulation always opens");
    assert_eq!(session.kind(), BackendKind::Simulation);

    let adapters = session.list_adapters();
    let amd = adapters
        .iter()
        .find(|a| a.vendor_id == 0x1002)
        .expect("simulated AMD adapter");

    session
        .set_property(amd.index, SettingKey::AnisotropicLevel, &SettingValue::Int(16))
        .expect("write succeeds");
    assert_eq!(
        session.get_property(amd.index, SettingKey::AnisotropicLevel),
        Ok(Some(SettingValue::Int(16)))
    );

    session.close();
}
