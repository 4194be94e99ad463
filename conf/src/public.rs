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

use crate::types::ConfigImpl;
use crate::{Config, ConfigBuilder, ConfigOption};

impl ConfigBuilder {
	/// Build a [`crate::Config`] from the specified vector of [`crate::ConfigOption`]. This
	/// is generally called through the [`crate::config!`] macro.
	pub fn build_config(options: Vec<ConfigOption>) -> impl Config {
		ConfigImpl::new(options)
	}
}
