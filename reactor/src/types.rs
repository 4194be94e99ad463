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

use crate::reactor::READ_BUFFER_SIZE;
use np_deps::nix::sys::epoll::Epoll;
use np_err::Error;
use np_util::{AtomicStack, LockBox};
use std::os::unix::prelude::RawFd;
use std::pin::Pin;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::thread::JoinHandle;

/// The socket descriptor type used throughout this crate.
pub type Handle = RawFd;

/// Builder struct for the crate. All implementations are created through this struct.
pub struct ReactorBuilder {}

/// The [`crate::ClientReactor`] multiplexes readiness events for accepted connections
/// across a fixed pool of worker threads. Connection state is preallocated at construction
/// and rented from a lock-free free list on [`crate::ClientReactor::add_client`]. See the
/// [`crate`] documentation for background and a full example.
pub struct ClientReactor<OnInput, OnOob, OnWriteReady>
where
	OnInput: FnMut(Handle, &[u8]) -> Result<(), Error> + Send + 'static + Clone + Sync + Unpin,
	OnOob: FnMut(Handle, u8) -> Result<(), Error> + Send + 'static + Clone + Sync + Unpin,
	OnWriteReady: FnMut(Handle) -> Result<(), Error> + Send + 'static + Clone + Sync + Unpin,
{
	pub(crate) callbacks: ClientCallbacks<OnInput, OnOob, OnWriteReady>,
	pub(crate) state: Arc<PoolState>,
	pub(crate) workers: Box<dyn LockBox<Vec<JoinHandle<()>>>>,
}

/// The [`crate::AcceptorReactor`] owns the listening sockets and a single worker thread.
/// Each accepted connection is set nonblocking and handed to the wrapped
/// [`crate::ClientReactor`]. See the [`crate`] documentation for background and a full
/// example.
pub struct AcceptorReactor<OnInput, OnOob, OnWriteReady>
where
	OnInput: FnMut(Handle, &[u8]) -> Result<(), Error> + Send + 'static + Clone + Sync + Unpin,
	OnOob: FnMut(Handle, u8) -> Result<(), Error> + Send + 'static + Clone + Sync + Unpin,
	OnWriteReady: FnMut(Handle) -> Result<(), Error> + Send + 'static + Clone + Sync + Unpin,
{
	pub(crate) client: ClientReactor<OnInput, OnOob, OnWriteReady>,
	pub(crate) state: Arc<AcceptorState>,
	pub(crate) worker: Box<dyn LockBox<Vec<JoinHandle<()>>>>,
}

// crate local structures

// A preallocated connection slot. `handle` is zero while the slot is on the free list.
// The read buffer carries one trailing sentinel byte for callers that treat it as a C
// string.
#[derive(Clone)]
pub(crate) struct ClientSlot {
	pub(crate) handle: Handle,
	pub(crate) buf: [u8; READ_BUFFER_SIZE + 1],
}

#[derive(Clone, Debug)]
pub(crate) struct ClientReactorConfig {
	pub(crate) workers: usize,
	pub(crate) max_clients: usize,
	pub(crate) max_events: usize,
	pub(crate) debug: bool,
}

// One kernel readiness object plus the control channel used for the daisy-chained
// shutdown. `ctl_reader` is registered edge triggered one-shot with the null cookie.
pub(crate) struct Selector {
	pub(crate) epoll: Epoll,
	pub(crate) ctl_reader: Handle,
	pub(crate) ctl_writer: Handle,
}

// State shared between the client reactor handle, its workers and the acceptor thread.
pub(crate) struct PoolState {
	pub(crate) selector: Selector,
	pub(crate) slots: AtomicStack<ClientSlot>,
	pub(crate) active: AtomicUsize,
	pub(crate) running: AtomicUsize,
	pub(crate) config: ClientReactorConfig,
}

// State shared between the acceptor reactor handle and its worker thread.
pub(crate) struct AcceptorState {
	pub(crate) selector: Selector,
	pub(crate) running: AtomicUsize,
	pub(crate) listeners: Box<dyn LockBox<Vec<Handle>>>,
}

#[derive(Clone)]
pub(crate) struct ClientCallbacks<OnInput, OnOob, OnWriteReady>
where
	OnInput: FnMut(Handle, &[u8]) -> Result<(), Error> + Send + 'static + Clone + Sync + Unpin,
	OnOob: FnMut(Handle, u8) -> Result<(), Error> + Send + 'static + Clone + Sync + Unpin,
	OnWriteReady: FnMut(Handle) -> Result<(), Error> + Send + 'static + Clone + Sync + Unpin,
{
	pub(crate) on_input: Option<Pin<Box<OnInput>>>,
	pub(crate) on_oob: Option<Pin<Box<OnOob>>>,
	pub(crate) on_write_ready: Option<Pin<Box<OnWriteReady>>>,
}
