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

//! Bindings to the vendor display library, in both of its generations.
//!
//! The same shared library exports the legacy `ADL_*` entry points, which
//! keep their state inside the driver, and the context-based `ADL2_*` entry
//! points, which hand back an opaque context. Both bindings share the
//! adapter record layout and the library loader.

mod context;
mod convert;
pub mod ffi;
mod legacy;
mod library;

pub use self::context::ContextDriver;
pub use self::legacy::LegacyDriver;
pub use self::library::default_library_names;
