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

//! # The Netpool Logging crate
//! This crate implements the logging used by the other crates in the netpool repo. Logging
//! is done through the macros of the form `<level>!`, where level is one of `trace`,
//! `debug`, `info`, `warn`, `error` or `fatal`. Calling a level macro with no arguments
//! sets the logging threshold for the current scope. Calling it with arguments logs the
//! formatted line through the global logger, initializing it with default values if
//! [`crate::log_init`] was not called first.
//!
//! # Examples
//!
//!```
//! use np_err::*;
//! use np_log::*;
//!
//! info!();
//!
//! fn main() -> Result<(), Error> {
//!     // this will be logged because the threshold for this scope is 'info'
//!     info!("starting up")?;
//!
//!     // formatting works just like println! and format!
//!     info!("1 + 1 = {}", 2)?;
//!
//!     // this will not be logged because 'debug' is below the 'info' threshold
//!     debug!("will not show up")?;
//!
//!     Ok(())
//! }
//!```

mod constants;
mod log;
mod macros;
mod public;
mod test;
mod types;

pub use crate::public::{
	GlobalLogFunctions, Log, LogBuilder, LogLevel, LoggingType, NP_GLOBAL_LOG,
};
