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

//! # The Netpool Error crate
//! This crate defines the [`crate::Error`] structure which is used throughout the netpool
//! repo. Errors are built with the [`crate::err`] macro and foreign errors are mapped into
//! a named kind with the [`crate::map_err`] macro.
//!
//! # Examples
//!
//!```
//! use np_err::*;
//!
//! fn return_err(fail: bool) -> Result<(), Error> {
//!     if fail {
//!         Err(err!(ErrKind::IllegalArgument, "fail was specified"))
//!     } else {
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), Error> {
//!     assert!(return_err(true).is_err());
//!     assert_eq!(
//!         return_err(true).unwrap_err().kind(),
//!         ErrorKind::IllegalArgument("fail was specified".to_string())
//!     );
//!     assert!(return_err(false).is_ok());
//!     Ok(())
//! }
//!```

mod error;
mod macros;
mod public;
mod test;

pub use crate::public::{ErrKind, Error, ErrorKind};
