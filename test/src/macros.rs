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

/// Returns a free port that is not used at the time of the call. It is also guaranteed to not
/// be allocated to another test which calls this macro, so there are no timing concerns.
#[macro_export]
macro_rules! free_port {
	() => {{
		use np_test::pick_free_port;
		pick_free_port()
	}};
}

/// Macro to setup a test directory based on the function name. A free port is also returned.
/// The directory is removed when the returned value goes out of scope unless the `preserve`
/// value is specified and set to true. Specifically a [`crate::TestInfo`] is returned by this
/// macro.
#[macro_export]
macro_rules! test_info {
	() => {{
		test_info!(false)
	}};
	($preserve:expr) => {{
		use np_test::TestBuilder;
		TestBuilder::build_test_info($preserve)
	}};
}
