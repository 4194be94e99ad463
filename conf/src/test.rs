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
	use crate as np_conf;
	use crate::{Config, ConfigBuilder, ConfigOption, ConfigOptionName as CN};
	use np_conf::config;
	use np_err::*;

	#[test]
	fn test_config_basic() -> Result<(), Error> {
		let config = ConfigBuilder::build_config(vec![ConfigOption::Workers(4)]);
		assert_eq!(config.get(&CN::Workers), Some(ConfigOption::Workers(4)));
		assert_eq!(config.get(&CN::MaxClients), None);

		// ok because Workers is allowed
		assert!(config.check_config(vec![CN::Workers], vec![]).is_ok());

		// err because Workers is not allowed
		assert!(config.check_config(vec![CN::MaxClients], vec![]).is_err());

		// ok because Workers is allowed
		assert!(config
			.check_config(vec![CN::MaxClients, CN::Workers], vec![])
			.is_ok());

		let config =
			ConfigBuilder::build_config(vec![ConfigOption::Workers(4), ConfigOption::Workers(8)]);

		// err because it's a duplicate
		assert!(config.check_config(vec![CN::Workers], vec![]).is_err());

		let config = ConfigBuilder::build_config(vec![ConfigOption::MaxClients(100)]);

		// ok because it's both allowed and required and specified
		assert!(config
			.check_config(vec![CN::MaxClients], vec![CN::MaxClients])
			.is_ok());

		// err because Workers is not specified and it's required
		assert!(config
			.check_config(vec![CN::MaxClients, CN::Workers], vec![CN::Workers])
			.is_err());

		Ok(())
	}

	#[test]
	fn test_config_macro() -> Result<(), Error> {
		let config = config!(MaxClients(10), Workers(2), Debug(true));
		assert_eq!(config.get(&CN::MaxClients), Some(ConfigOption::MaxClients(10)));
		assert_eq!(config.get(&CN::Workers), Some(ConfigOption::Workers(2)));
		assert_eq!(config.get(&CN::Debug), Some(ConfigOption::Debug(true)));
		assert_eq!(config.get(&CN::MaxEvents), None);

		let config = config!();
		assert!(config.check_config(vec![], vec![]).is_ok());
		assert!(config.check_config(vec![], vec![CN::Workers]).is_err());

		Ok(())
	}

	#[test]
	fn test_config_log_options() -> Result<(), Error> {
		let config = config!(
			MaxSizeBytes(1_000),
			MaxAgeMillis(3_600_000),
			DisplayColors(false),
			LogFilePath(None)
		);

		assert_eq!(
			config.get(&CN::MaxSizeBytes),
			Some(ConfigOption::MaxSizeBytes(1_000))
		);
		assert_eq!(
			config.get(&CN::MaxAgeMillis),
			Some(ConfigOption::MaxAgeMillis(3_600_000))
		);
		assert_eq!(
			config.get(&CN::DisplayColors),
			Some(ConfigOption::DisplayColors(false))
		);
		assert_eq!(config.get(&CN::LogFilePath), Some(ConfigOption::LogFilePath(None)));

		assert!(config
			.check_config(
				vec![
					CN::MaxSizeBytes,
					CN::MaxAgeMillis,
					CN::DisplayColors,
					CN::LogFilePath
				],
				vec![CN::LogFilePath]
			)
			.is_ok());

		Ok(())
	}
}
