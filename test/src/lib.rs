// Copyright (c) 2024, The Netpool Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # The Netpool Test crate
//! This crate implements utilities which are used by the tests in the other crates within
//! the netpool repo. Tests generally start by calling the [`crate::test_info`] macro which
//! returns a [`crate::TestInfo`] implementation with a free tcp/ip port and a temporary
//! directory that is removed when the returned value goes out of scope.

mod impls;
mod macros;
mod public;
mod test;
mod types;

pub use crate::impls::pick_free_port;
pub use crate::public::{TestBuilder, TestInfo};
