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

/// The config macro allows for a configuration to be specified and checked conveniently. This
/// macro is used throughout netpool.
///
/// # Examples
///
///```
/// use np_conf::*;
/// use np_err::*;
///
/// // create a config using the macro and check it
/// fn main() -> Result<(), Error> {
///     // create a simple config
///     let config = config!(Workers(4), Debug(false));
///
///     // check it
///     let res = config.check_config(
///         vec![
///             ConfigOptionName::Workers,
///             ConfigOptionName::Debug
///         ],
///         vec![ConfigOptionName::Workers]
///     );
///
///     // this configuration is ok because both Workers and Debug are allowed
///     // and the only required configuration 'Workers' is specified
///     assert!(res.is_ok());
///     Ok(())
/// }
///```
///
#[macro_export]
macro_rules! config {
	( $( $config:expr ),* ) => {{
                use np_conf::{ConfigBuilder, ConfigOption, ConfigOption::*};
                let mut config_values: Vec<ConfigOption> = vec![];
                $(
                        config_values.push($config);
                )*

                ConfigBuilder::build_config(config_values)
        }};
}
