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

#[cfg(test)]
mod test {
	use crate as np_test;
	use np_err::*;
	use np_test::{free_port, test_info, TestInfo};
	use std::path::PathBuf;

	#[test]
	fn test_test_info() -> Result<(), Error> {
		let directory;
		{
			let test_info = test_info!()?;
			assert!(test_info.port() >= 9000);
			directory = test_info.directory().clone();
			assert!(PathBuf::from(&directory).exists());
		}
		// directory is removed on drop
		assert!(!PathBuf::from(&directory).exists());
		Ok(())
	}

	#[test]
	fn test_free_port() -> Result<(), Error> {
		let port1 = free_port!()?;
		let port2 = free_port!()?;
		assert_ne!(port1, port2);
		Ok(())
	}

	#[test]
	fn test_sync_channel() -> Result<(), Error> {
		let test_info = test_info!()?;
		let (tx, rx) = test_info.sync_channel();
		tx.send(())?;
		rx.recv()?;
		Ok(())
	}
}
