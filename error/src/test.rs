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
	use crate as np_err;
	use crate::{ErrKind, Error, ErrorKind};
	use np_err::{cbreak, err, map_err, try_into};
	use std::convert::TryInto;
	use std::fs::File;
	use std::num::TryFromIntError;

	fn get_error_kind(error: &Error) -> ErrorKind {
		error.kind()
	}

	#[test]
	fn test_err_macro() -> Result<(), Error> {
		let err: Error = err!(ErrKind::IO, "test {}", 1);
		assert_eq!(get_error_kind(&err), ErrorKind::IO("test 1".to_string()));

		let err: Error = err!(ErrKind::Alloc, "no memory");
		assert_eq!(
			get_error_kind(&err),
			ErrorKind::Alloc("no memory".to_string())
		);

		let err: Error = err!(ErrKind::Selector, "epoll");
		assert_eq!(get_error_kind(&err), ErrorKind::Selector("epoll".to_string()));

		let err: Error = err!(ErrKind::ControlChannel, "socketpair");
		assert_eq!(
			get_error_kind(&err),
			ErrorKind::ControlChannel("socketpair".to_string())
		);

		Ok(())
	}

	#[test]
	fn test_map_err() -> Result<(), Error> {
		let res = map_err!(File::open("/path/to/nothing"), ErrKind::Log, "file open");
		assert!(res.is_err());
		match res.unwrap_err().kind() {
			ErrorKind::Log(_) => {}
			_ => panic!("wrong kind"),
		}

		let res: Result<File, Error> = map_err!(File::open("/path/to/nothing"), ErrKind::IO);
		assert!(res.is_err());
		Ok(())
	}

	#[test]
	fn test_conversions() -> Result<(), Error> {
		let x: Result<u32, TryFromIntError> = u64::MAX.try_into();
		assert!(x.is_err());
		let err: Error = x.unwrap_err().into();
		match err.kind() {
			ErrorKind::Misc(_) => {}
			_ => panic!("wrong kind"),
		}

		let err: Error = std::io::Error::new(std::io::ErrorKind::Other, "test").into();
		match err.kind() {
			ErrorKind::IO(_) => {}
			_ => panic!("wrong kind"),
		}

		let x: Result<u8, Error> = try_into!(100u64);
		assert_eq!(x?, 100u8);
		let x: Result<u8, Error> = try_into!(1_000u64);
		assert!(x.is_err());

		Ok(())
	}

	#[test]
	fn test_display_and_eq() -> Result<(), Error> {
		let err: Error = err!(ErrKind::Test, "simulated");
		let err2: Error = err!(ErrKind::Test, "simulated");
		assert_eq!(err, err2);
		let text = format!("{}", err);
		assert!(text.find("simulated test error: simulated").is_some());
		assert!(err.inner().find("simulated").is_some());
		Ok(())
	}

	#[test]
	fn test_cbreak() -> Result<(), Error> {
		let mut count = 0;
		loop {
			count += 1;
			cbreak!(count == 10);
		}
		assert_eq!(count, 10);
		Ok(())
	}
}
