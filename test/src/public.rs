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

use std::sync::mpsc::{Receiver, SyncSender};

/// This trait defines the data which a test can use. A test can obtain one of these by
/// calling the [`crate::test_info`] macro.
pub trait TestInfo {
	/// Return a free tcp/ip port that can be used by this test. This value is guaranteed not
	/// to be assigned to other tests.
	fn port(&self) -> u16;
	/// Return a directory that can be used by the test. It is automatically deleted when the
	/// [`crate::TestInfo`] goes out of scope.
	fn directory(&self) -> &String;
	/// Return a `(SyncSender<()>, Receiver<()>)` pair in which the sender will automatically
	/// send a message after 60 seconds. This allows threads to timeout so that useful info
	/// about why a test failed may be obtained.
	fn sync_channel(&self) -> (SyncSender<()>, Receiver<()>);
}

/// A builder that is used to construct [`crate::TestInfo`] implementations. This is
/// typically called through the [`crate::test_info`] macro.
pub struct TestBuilder {}

// re-export a few useful things for tests
#[doc(hidden)]
pub use std::sync::mpsc::sync_channel;
#[doc(hidden)]
pub use std::thread::sleep;
#[doc(hidden)]
pub use std::thread::spawn;
#[doc(hidden)]
pub use std::time::Duration;
