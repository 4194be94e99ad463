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

use np_conf::ConfigOption;
use np_deps::dyn_clone::DynClone;
use np_deps::lazy_static::lazy_static;
use np_err::*;
use std::sync::{Arc, RwLock};

/// Standard 6 log levels.
#[derive(PartialEq, Copy, Clone)]
pub enum LogLevel {
	/// Very fine grained logging information that should not generally be visible except for
	/// debugging purposes
	Trace,
	/// Debugging information
	Debug,
	/// Standard information that is usually displayed to the user under most circumstances
	Info,
	/// Warning of something that the user should be aware of, although it may not be an error
	Warn,
	/// Error that the user must be aware of
	Error,
	/// Fatal error that usually causes the application to be unusable
	Fatal,
}

/// Builder struct used to build [`crate::Log`] implementations.
pub struct LogBuilder {}

pub trait Log: DynClone {
	/// Log data to disk/stdout.
	fn log(&mut self, level: LogLevel, line: &str) -> Result<(), Error>;
	/// The same as [`Log::log`], but this function will always log to standard output even if
	/// standard output logging is currently disabled by the underlying logger.
	fn log_all(&mut self, level: LogLevel, line: &str) -> Result<(), Error>;
	/// Log without any of the header details. No timestamp, logging level, or line numbers
	/// data are logged.
	fn log_plain(&mut self, level: LogLevel, line: &str) -> Result<(), Error>;
	/// Do a log rotation. The name of the file rotated is automatically generated and stored
	/// in the same directory as the original log file. Logging then proceeds with the
	/// original log file. If auto rotation is enabled, this function does not need to be
	/// called, however it still may be called manually. Note that auto-rotation only occurs
	/// when the logger is called so it might take some time to happen unless called manually.
	fn rotate(&mut self) -> Result<(), Error>;
	/// This function checks if a log rotation is needed. It returns true if it is needed and
	/// false otherwise.
	fn need_rotate(&self) -> Result<bool, Error>;
	/// Sets the log level threshold. Logging only occurs if the logged line is logged at at
	/// least this level.
	fn set_log_level(&mut self, level: LogLevel);
	/// Initialize the log. The function does any needed i/o operations to secure the file
	/// handle. It may only be called once and must be called before any logging or rotations
	/// occur.
	fn init(&mut self) -> Result<(), Error>;
	/// Close the log file.
	fn close(&mut self) -> Result<(), Error>;
	/// Set the specified [`np_conf::ConfigOption`]. Attempting to set LogFilePath will
	/// result in an error.
	fn set_config_option(&mut self, value: ConfigOption) -> Result<(), Error>;
}

// used by macros
#[doc(hidden)]
#[derive(PartialEq)]
pub enum LoggingType {
	Standard,
	Plain,
	All,
}

// Holder for the global logger
#[doc(hidden)]
pub struct GlobalLogFunctions {}

//  global logger
lazy_static! {
	#[doc(hidden)]
	pub static ref NP_GLOBAL_LOG: Arc<RwLock<Option<Box<dyn Log + Send + Sync>>>> = Arc::new(RwLock::new(None));
}
