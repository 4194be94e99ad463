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

use crate::{AcceptorReactor, ClientReactor, Handle, ReactorBuilder};
use np_conf::ConfigOption;
use np_err::*;

impl ReactorBuilder {
	/// Builds a [`crate::ClientReactor`] with the specified vector of
	/// [`np_conf::ConfigOption`]. This is generally not called directly, but instead done
	/// indirectly by calling the [`crate::client_reactor!`] or [`crate::client_reactor_oi!`]
	/// macros.
	/// # Input Parameters
	/// * `Workers` - the number of worker threads. Must be at least 1. The default is 4.
	/// * `MaxClients` - the maximum number of simultaneous connections. Must be at least 1.
	/// The connection slots are preallocated, so the backing buffer is expanded up to the
	/// OS page size border. The default is 1_024.
	/// * `MaxEvents` - the maximum number of readiness events pulled per wait call. The
	/// default is 100.
	/// * `Debug` - log additional per event information. Must NOT be set in a production
	/// configuration.
	/// # Errors
	/// * [`np_err::ErrKind::Configuration`] - if a value other than the allowed values is
	/// specified, a value is duplicated, or a value is 0.
	/// * [`np_err::ErrKind::Alloc`] - if the slot buffer cannot be allocated.
	/// * [`np_err::ErrKind::Selector`] - if the readiness object cannot be created.
	/// * [`np_err::ErrKind::ControlChannel`] - if the shutdown control channel cannot be
	/// created or registered.
	pub fn build_client_reactor<OnInput, OnOob, OnWriteReady>(
		configs: Vec<ConfigOption>,
	) -> Result<ClientReactor<OnInput, OnOob, OnWriteReady>, Error>
	where
		OnInput: FnMut(Handle, &[u8]) -> Result<(), Error> + Send + 'static + Clone + Sync + Unpin,
		OnOob: FnMut(Handle, u8) -> Result<(), Error> + Send + 'static + Clone + Sync + Unpin,
		OnWriteReady: FnMut(Handle) -> Result<(), Error> + Send + 'static + Clone + Sync + Unpin,
	{
		ClientReactor::new(configs)
	}

	/// Builds an [`crate::AcceptorReactor`] wrapping the specified
	/// [`crate::ClientReactor`]. The acceptor takes ownership of the client reactor;
	/// handlers must be set on the client reactor before this call. This is generally done
	/// indirectly by calling the [`crate::acceptor_reactor!`] macro.
	pub fn build_acceptor_reactor<OnInput, OnOob, OnWriteReady>(
		client: ClientReactor<OnInput, OnOob, OnWriteReady>,
	) -> Result<AcceptorReactor<OnInput, OnOob, OnWriteReady>, Error>
	where
		OnInput: FnMut(Handle, &[u8]) -> Result<(), Error> + Send + 'static + Clone + Sync + Unpin,
		OnOob: FnMut(Handle, u8) -> Result<(), Error> + Send + 'static + Clone + Sync + Unpin,
		OnWriteReady: FnMut(Handle) -> Result<(), Error> + Send + 'static + Clone + Sync + Unpin,
	{
		AcceptorReactor::new(client)
	}
}
