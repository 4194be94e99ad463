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

/// The [`crate::trace`] macro is used to set the global logging level at the current scope to
/// the [`crate::LogLevel::Trace`] level _or_ to log at the [`crate::LogLevel::Trace`] level
/// depending on which arguments are passed to the macro. If no arguments are supplied, a
/// logging threshold const is defined for the current scope. If arguments are supplied, the
/// global logger will be called at the trace level and the formatted output will be logged if
/// the threshold of the global logger permits it. All of the other logging macros follow this
/// same pattern at their respective levels.
///
/// # Examples
///```
/// use np_err::*;
/// use np_log::*;
///
/// // set the global logger's logging level to 'trace'. Since it's outside of the function
/// // block, any logging that occurs for the rest of this file will use the 'trace'
/// // threshold.
/// trace!();
///
/// fn main() -> Result<(), Error> {
///     // log at the trace level. Since the threshold is trace, this will be logged.
///     trace!("this is a test")?;
///
///     // formatting can be used just like println! and format!
///     trace!("1 + 1 = {}", 2)?;
///
///     Ok(())
/// }
///```
#[macro_export]
macro_rules! trace {
        () => {
                #[doc(hidden)]
                const NP_GLOBAL_LOG_LEVEL: np_log::LogLevel = np_log::LogLevel::Trace;
        };
        ($($values:tt)*) => {{
                use np_log::*;
                GlobalLogFunctions::log(LogLevel::Trace, &format!($($values)*)[..], NP_GLOBAL_LOG_LEVEL, LoggingType::Standard)
        }};
}

/// Identical to [`crate::trace`] except that just the formatted log line is logged with no
/// timestamp, log level, or line number.
#[macro_export]
macro_rules! trace_plain {
        () => {
                #[doc(hidden)]
                const NP_GLOBAL_LOG_LEVEL: np_log::LogLevel = np_log::LogLevel::Trace;
        };
        ($($values:tt)*) => {{
                use np_log::*;
                GlobalLogFunctions::log(LogLevel::Trace, &format!($($values)*)[..], NP_GLOBAL_LOG_LEVEL, LoggingType::Plain)
        }};
}

/// Identical to [`crate::trace`] except that data are logged to stdout regardless of whether
/// or not stdout logging is enabled for the underlying logger.
#[macro_export]
macro_rules! trace_all {
        () => {
                #[doc(hidden)]
                const NP_GLOBAL_LOG_LEVEL: np_log::LogLevel = np_log::LogLevel::Trace;
        };
        ($($values:tt)*) => {{
                use np_log::*;
                GlobalLogFunctions::log(LogLevel::Trace, &format!($($values)*)[..], NP_GLOBAL_LOG_LEVEL, LoggingType::All)
        }};
}

/// See [`crate::trace`]. Same pattern at the [`crate::LogLevel::Debug`] level.
#[macro_export]
macro_rules! debug {
        () => {
                #[doc(hidden)]
                const NP_GLOBAL_LOG_LEVEL: np_log::LogLevel = np_log::LogLevel::Debug;
        };
        ($($values:tt)*) => {{
                use np_log::*;
                GlobalLogFunctions::log(LogLevel::Debug, &format!($($values)*)[..], NP_GLOBAL_LOG_LEVEL, LoggingType::Standard)
        }};
}

/// See [`crate::trace_plain`]. Same pattern at the [`crate::LogLevel::Debug`] level.
#[macro_export]
macro_rules! debug_plain {
        () => {
                #[doc(hidden)]
                const NP_GLOBAL_LOG_LEVEL: np_log::LogLevel = np_log::LogLevel::Debug;
        };
        ($($values:tt)*) => {{
                use np_log::*;
                GlobalLogFunctions::log(LogLevel::Debug, &format!($($values)*)[..], NP_GLOBAL_LOG_LEVEL, LoggingType::Plain)
        }};
}

/// See [`crate::trace_all`]. Same pattern at the [`crate::LogLevel::Debug`] level.
#[macro_export]
macro_rules! debug_all {
        () => {
                #[doc(hidden)]
                const NP_GLOBAL_LOG_LEVEL: np_log::LogLevel = np_log::LogLevel::Debug;
        };
        ($($values:tt)*) => {{
                use np_log::*;
                GlobalLogFunctions::log(LogLevel::Debug, &format!($($values)*)[..], NP_GLOBAL_LOG_LEVEL, LoggingType::All)
        }};
}

/// See [`crate::trace`]. Same pattern at the [`crate::LogLevel::Info`] level.
#[macro_export]
macro_rules! info {
        () => {
                #[doc(hidden)]
                const NP_GLOBAL_LOG_LEVEL: np_log::LogLevel = np_log::LogLevel::Info;
        };
        ($($values:tt)*) => {{
                use np_log::*;
                GlobalLogFunctions::log(LogLevel::Info, &format!($($values)*)[..], NP_GLOBAL_LOG_LEVEL, LoggingType::Standard)
        }};
}

/// See [`crate::trace_plain`]. Same pattern at the [`crate::LogLevel::Info`] level.
#[macro_export]
macro_rules! info_plain {
        () => {
                #[doc(hidden)]
                const NP_GLOBAL_LOG_LEVEL: np_log::LogLevel = np_log::LogLevel::Info;
        };
        ($($values:tt)*) => {{
                use np_log::*;
                GlobalLogFunctions::log(LogLevel::Info, &format!($($values)*)[..], NP_GLOBAL_LOG_LEVEL, LoggingType::Plain)
        }};
}

/// See [`crate::trace_all`]. Same pattern at the [`crate::LogLevel::Info`] level.
#[macro_export]
macro_rules! info_all {
        () => {
                #[doc(hidden)]
                const NP_GLOBAL_LOG_LEVEL: np_log::LogLevel = np_log::LogLevel::Info;
        };
        ($($values:tt)*) => {{
                use np_log::*;
                GlobalLogFunctions::log(LogLevel::Info, &format!($($values)*)[..], NP_GLOBAL_LOG_LEVEL, LoggingType::All)
        }};
}

/// See [`crate::trace`]. Same pattern at the [`crate::LogLevel::Warn`] level.
#[macro_export]
macro_rules! warn {
        () => {
                #[doc(hidden)]
                const NP_GLOBAL_LOG_LEVEL: np_log::LogLevel = np_log::LogLevel::Warn;
        };
        ($($values:tt)*) => {{
                use np_log::*;
                GlobalLogFunctions::log(LogLevel::Warn, &format!($($values)*)[..], NP_GLOBAL_LOG_LEVEL, LoggingType::Standard)
        }};
}

/// See [`crate::trace_plain`]. Same pattern at the [`crate::LogLevel::Warn`] level.
#[macro_export]
macro_rules! warn_plain {
        () => {
                #[doc(hidden)]
                const NP_GLOBAL_LOG_LEVEL: np_log::LogLevel = np_log::LogLevel::Warn;
        };
        ($($values:tt)*) => {{
                use np_log::*;
                GlobalLogFunctions::log(LogLevel::Warn, &format!($($values)*)[..], NP_GLOBAL_LOG_LEVEL, LoggingType::Plain)
        }};
}

/// See [`crate::trace_all`]. Same pattern at the [`crate::LogLevel::Warn`] level.
#[macro_export]
macro_rules! warn_all {
        () => {
                #[doc(hidden)]
                const NP_GLOBAL_LOG_LEVEL: np_log::LogLevel = np_log::LogLevel::Warn;
        };
        ($($values:tt)*) => {{
                use np_log::*;
                GlobalLogFunctions::log(LogLevel::Warn, &format!($($values)*)[..], NP_GLOBAL_LOG_LEVEL, LoggingType::All)
        }};
}

/// See [`crate::trace`]. Same pattern at the [`crate::LogLevel::Error`] level.
#[macro_export]
macro_rules! error {
        () => {
                #[doc(hidden)]
                const NP_GLOBAL_LOG_LEVEL: np_log::LogLevel = np_log::LogLevel::Error;
        };
        ($($values:tt)*) => {{
                use np_log::*;
                GlobalLogFunctions::log(LogLevel::Error, &format!($($values)*)[..], NP_GLOBAL_LOG_LEVEL, LoggingType::Standard)
        }};
}

/// See [`crate::trace_plain`]. Same pattern at the [`crate::LogLevel::Error`] level.
#[macro_export]
macro_rules! error_plain {
        () => {
                #[doc(hidden)]
                const NP_GLOBAL_LOG_LEVEL: np_log::LogLevel = np_log::LogLevel::Error;
        };
        ($($values:tt)*) => {{
                use np_log::*;
                GlobalLogFunctions::log(LogLevel::Error, &format!($($values)*)[..], NP_GLOBAL_LOG_LEVEL, LoggingType::Plain)
        }};
}

/// See [`crate::trace_all`]. Same pattern at the [`crate::LogLevel::Error`] level.
#[macro_export]
macro_rules! error_all {
        () => {
                #[doc(hidden)]
                const NP_GLOBAL_LOG_LEVEL: np_log::LogLevel = np_log::LogLevel::Error;
        };
        ($($values:tt)*) => {{
                use np_log::*;
                GlobalLogFunctions::log(LogLevel::Error, &format!($($values)*)[..], NP_GLOBAL_LOG_LEVEL, LoggingType::All)
        }};
}

/// See [`crate::trace`]. Same pattern at the [`crate::LogLevel::Fatal`] level.
#[macro_export]
macro_rules! fatal {
        () => {
                #[doc(hidden)]
                const NP_GLOBAL_LOG_LEVEL: np_log::LogLevel = np_log::LogLevel::Fatal;
        };
        ($($values:tt)*) => {{
                use np_log::*;
                GlobalLogFunctions::log(LogLevel::Fatal, &format!($($values)*)[..], NP_GLOBAL_LOG_LEVEL, LoggingType::Standard)
        }};
}

/// See [`crate::trace_plain`]. Same pattern at the [`crate::LogLevel::Fatal`] level.
#[macro_export]
macro_rules! fatal_plain {
        () => {
                #[doc(hidden)]
                const NP_GLOBAL_LOG_LEVEL: np_log::LogLevel = np_log::LogLevel::Fatal;
        };
        ($($values:tt)*) => {{
                use np_log::*;
                GlobalLogFunctions::log(LogLevel::Fatal, &format!($($values)*)[..], NP_GLOBAL_LOG_LEVEL, LoggingType::Plain)
        }};
}

/// See [`crate::trace_all`]. Same pattern at the [`crate::LogLevel::Fatal`] level.
#[macro_export]
macro_rules! fatal_all {
        () => {
                #[doc(hidden)]
                const NP_GLOBAL_LOG_LEVEL: np_log::LogLevel = np_log::LogLevel::Fatal;
        };
        ($($values:tt)*) => {{
                use np_log::*;
                GlobalLogFunctions::log(LogLevel::Fatal, &format!($($values)*)[..], NP_GLOBAL_LOG_LEVEL, LoggingType::All)
        }};
}

/// Initialize the global logger with the specified [`np_conf::ConfigOption`] values. See
/// [`crate::Log`] for the full option list. If the global logger is used before this macro is
/// called, it is initialized with default values.
///
/// # Examples
///```
/// use np_err::*;
/// use np_log::*;
///
/// info!();
///
/// fn main() -> Result<(), Error> {
///     log_init!(DisplayColors(false), DisplayBackTrace(false))?;
///     info!("logger initialized")?;
///     Ok(())
/// }
///```
#[macro_export]
macro_rules! log_init {
        ($($config:tt)*) => {{
                #[allow(unused_imports)]
                use np_conf::ConfigOption::*;
                use np_conf::ConfigOption;

                let v: Vec<ConfigOption> = vec![$($config)*];
                np_log::GlobalLogFunctions::init(v)
        }};
}

/// Set a [`np_conf::ConfigOption`] on the global logger after initialization.
#[macro_export]
macro_rules! set_log_option {
	($option:expr) => {{
		#[allow(unused_imports)]
		use np_conf::ConfigOption::*;
		np_log::GlobalLogFunctions::set_log_option($option)
	}};
}

/// Rotate the global log file. See [`crate::Log::rotate`].
#[macro_export]
macro_rules! log_rotate {
	() => {{
		np_log::GlobalLogFunctions::rotate()
	}};
}

/// Check whether the global log file needs rotation. See [`crate::Log::need_rotate`].
#[macro_export]
macro_rules! need_rotate {
	() => {{
		np_log::GlobalLogFunctions::need_rotate()
	}};
}
