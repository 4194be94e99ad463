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

/// The [`crate::client_reactor!`] macro builds a [`crate::ClientReactor`] with the
/// specified [`np_conf::ConfigOption`] values. See
/// [`crate::ReactorBuilder::build_client_reactor`] for the allowed options and error
/// conditions. All three handlers must be set before the reactor is started; use
/// [`crate::client_reactor_oi!`] when only the on_input handler is needed.
///
/// # Examples
///```
/// use np_err::*;
/// use np_reactor::*;
///
/// fn main() -> Result<(), Error> {
///     let mut reactor = client_reactor!(Workers(2), MaxClients(16))?;
///
///     reactor.set_on_input(move |handle, buf| -> Result<(), Error> {
///         // echo
///         write_bytes(handle, buf);
///         Ok(())
///     })?;
///     reactor.set_on_oob(move |_handle, _byte| -> Result<(), Error> { Ok(()) })?;
///     reactor.set_on_write_ready(move |_handle| -> Result<(), Error> { Ok(()) })?;
///
///     reactor.run()?;
///     reactor.stop()?;
///     Ok(())
/// }
///```
#[macro_export]
macro_rules! client_reactor {
        ($($config:tt)*) => {{
                #[allow(unused_imports)]
                use np_conf::ConfigOption::*;
                use np_conf::ConfigOption;
                use np_reactor::ReactorBuilder;

                let v: Vec<ConfigOption> = vec![$($config)*];
                ReactorBuilder::build_client_reactor(v)
        }};
}

/// The [`crate::client_reactor_oi!`] macro is identical to [`crate::client_reactor!`]
/// except that the on_oob and on_write_ready handlers are set to no-ops, so only the
/// on_input handler needs to be specified. Hence, it is called `client_reactor_oi` (on
/// input only).
///
/// # Examples
///```
/// use np_err::*;
/// use np_reactor::*;
///
/// fn main() -> Result<(), Error> {
///     let mut reactor = client_reactor_oi!(Workers(1), MaxClients(4))?;
///
///     reactor.set_on_input(move |handle, buf| -> Result<(), Error> {
///         write_bytes(handle, buf);
///         Ok(())
///     })?;
///
///     // no other handlers are necessary
///     reactor.run()?;
///     reactor.stop()?;
///     Ok(())
/// }
///```
#[macro_export]
macro_rules! client_reactor_oi {
        ($($config:tt)*) => {{
                #[allow(unused_imports)]
                use np_conf::ConfigOption::*;
                use np_conf::ConfigOption;
                use np_reactor::ReactorBuilder;

                let v: Vec<ConfigOption> = vec![$($config)*];
                match ReactorBuilder::build_client_reactor(v) {
                        Ok(mut reactor) => {
                                reactor.set_on_oob(move |_handle, _byte| -> Result<(), Error> {
                                        Ok(())
                                })?;

                                reactor.set_on_write_ready(move |_handle| -> Result<(), Error> {
                                        Ok(())
                                })?;

                                Ok(reactor)
                        }
                        Err(e) => {
                                let text = format!("build_client_reactor resulted in error: {}", e);
                                Err(err!(ErrKind::Configuration, text))
                        }
                }
        }};
}

/// The [`crate::acceptor_reactor!`] macro builds an [`crate::AcceptorReactor`] wrapping
/// the specified [`crate::ClientReactor`]. Handlers must be set on the client reactor
/// before it is wrapped.
///
/// # Examples
///```
/// use np_err::*;
/// use np_reactor::*;
///
/// fn main() -> Result<(), Error> {
///     let mut reactor = client_reactor_oi!(Workers(1), MaxClients(4))?;
///     reactor.set_on_input(move |handle, buf| -> Result<(), Error> {
///         write_bytes(handle, buf);
///         Ok(())
///     })?;
///
///     let mut acceptor = acceptor_reactor!(reactor)?;
///     acceptor.run()?;
///     acceptor.stop()?;
///     Ok(())
/// }
///```
#[macro_export]
macro_rules! acceptor_reactor {
	($client:expr) => {{
		np_reactor::ReactorBuilder::build_acceptor_reactor($client)
	}};
}
