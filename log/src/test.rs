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
	use crate::{Log, LogBuilder, LogLevel};
	use np_conf::ConfigOption;
	use np_err::*;
	use np_test::{test_info, TestInfo};
	use std::fs::read_to_string;
	use std::path::PathBuf;

	fn build_file_logger(directory: &String, name: &str) -> Result<(Box<dyn Log + Send + Sync>, String), Error> {
		let mut path_buf = PathBuf::from(directory);
		path_buf.push(name);
		let path = path_buf.display().to_string();
		let log = LogBuilder::build_log(vec![
			ConfigOption::LogFilePath(Some(Box::new(PathBuf::from(path.clone())))),
			ConfigOption::DisplayStdout(false),
			ConfigOption::DisplayColors(false),
		])?;
		Ok((log, path))
	}

	#[test]
	fn test_log_basic() -> Result<(), Error> {
		let test_info = test_info!()?;
		let (mut log, path) = build_file_logger(test_info.directory(), "basic.log")?;

		// logging before init returns an error
		assert!(log.log(LogLevel::Info, "too early").is_err());

		log.init()?;
		log.set_log_level(LogLevel::Info);
		log.log(LogLevel::Info, "this is a test")?;

		// debug is below the threshold so it is filtered
		log.log(LogLevel::Debug, "filtered")?;

		let contents = read_to_string(&path)?;
		assert!(contents.find("this is a test").is_some());
		assert!(contents.find("filtered").is_none());
		assert!(contents.find("(INFO)").is_some());

		// double init is an error
		assert!(log.init().is_err());

		log.close()?;
		Ok(())
	}

	#[test]
	fn test_log_plain() -> Result<(), Error> {
		let test_info = test_info!()?;
		let (mut log, path) = build_file_logger(test_info.directory(), "plain.log")?;
		log.init()?;
		log.log_plain(LogLevel::Info, "plain line")?;
		let contents = read_to_string(&path)?;
		assert!(contents.find("plain line").is_some());
		// no log level header in plain mode
		assert!(contents.find("(INFO)").is_none());
		Ok(())
	}

	#[test]
	fn test_log_rotate() -> Result<(), Error> {
		let test_info = test_info!()?;
		let (mut log, path) = build_file_logger(test_info.directory(), "rotate.log")?;
		log.init()?;

		for i in 0..100 {
			log.log(LogLevel::Info, &format!("line {}", i))?;
		}

		log.set_config_option(ConfigOption::MaxSizeBytes(50))?;
		log.set_config_option(ConfigOption::AutoRotate(true))?;
		assert!(log.need_rotate()?);
		log.rotate()?;
		assert!(!log.need_rotate()?);

		// original file was moved aside and replaced with an empty one
		let contents = read_to_string(&path)?;
		assert!(contents.find("line 99").is_none());

		// setting the file path after init is rejected
		assert!(log
			.set_config_option(ConfigOption::LogFilePath(None))
			.is_err());

		Ok(())
	}

	#[test]
	fn test_log_config_errors() -> Result<(), Error> {
		// MaxSizeBytes too small
		assert!(LogBuilder::build_log(vec![ConfigOption::MaxSizeBytes(1)]).is_err());
		// MaxAgeMillis too small
		assert!(LogBuilder::build_log(vec![ConfigOption::MaxAgeMillis(1)]).is_err());
		// LineNumDataMaxLen too small
		assert!(LogBuilder::build_log(vec![ConfigOption::LineNumDataMaxLen(1)]).is_err());
		// reactor options are not allowed here
		assert!(LogBuilder::build_log(vec![ConfigOption::Workers(1)]).is_err());
		// duplicates are not allowed
		assert!(LogBuilder::build_log(vec![
			ConfigOption::AutoRotate(true),
			ConfigOption::AutoRotate(false)
		])
		.is_err());
		Ok(())
	}
}
