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

use crate::constants::*;
use crate::linux::*;
use crate::types::{
	AcceptorState, ClientCallbacks, ClientReactorConfig, ClientSlot, PoolState, Selector,
};
use crate::{AcceptorReactor, ClientReactor, Handle};
use np_conf::{Config, ConfigBuilder, ConfigOption, ConfigOptionName as CN};
use np_deps::errno::errno;
use np_deps::nix::sys::epoll::{Epoll, EpollCreateFlags, EpollEvent, EpollFlags, EpollTimeout};
use np_err::*;
use np_log::*;
use np_util::{lock_box, LockBox, StackNode, UtilBuilder};
use std::net::TcpStream;
use std::os::fd::BorrowedFd;
use std::os::unix::io::IntoRawFd;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::spawn;

info!();

/// The size of the per connection read buffer. One additional sentinel byte is kept at the
/// end of the buffer for callers that treat the buffer as a C string.
pub const READ_BUFFER_SIZE: usize = 4096;

// outcome of a single nonblocking read on a slot
enum ReadOutcome {
	// data was delivered to the on_input handler
	Data,
	// the descriptor is drained
	WouldBlock,
	// the slot was evicted (end of stream or a hard error)
	Gone,
}

/// Close a socket descriptor.
pub fn close_handle(handle: Handle) {
	close_impl(handle)
}

/// Write the specified bytes to the specified socket descriptor. The return value is the
/// underlying `send` return value: the number of bytes written or a negative value on
/// error. Handlers use this to respond on the descriptor they were called with.
pub fn write_bytes(handle: Handle, buf: &[u8]) -> isize {
	write_bytes_impl(handle, buf)
}

/// Convert a [`std::net::TcpStream`] into a nonblocking [`crate::Handle`] that can be added
/// to a [`crate::ClientReactor`] via [`crate::ClientReactor::add_client`]. The stream is
/// consumed; the descriptor is owned by the reactor once add_client returns true.
pub fn tcp_stream_to_handle(strm: TcpStream) -> Result<Handle, Error> {
	strm.set_nonblocking(true)?;
	Ok(strm.into_raw_fd())
}

impl Default for ClientSlot {
	fn default() -> Self {
		Self {
			handle: 0,
			buf: [0u8; READ_BUFFER_SIZE + 1],
		}
	}
}

impl ClientReactorConfig {
	pub(crate) fn new(configs: Vec<ConfigOption>) -> Result<Self, Error> {
		let checker = ConfigBuilder::build_config(configs.clone());
		checker.check_config(
			vec![CN::Workers, CN::MaxClients, CN::MaxEvents, CN::Debug],
			vec![],
		)?;

		let mut ret = Self {
			workers: REACTOR_DEFAULT_WORKERS,
			max_clients: REACTOR_DEFAULT_MAX_CLIENTS,
			max_events: REACTOR_DEFAULT_MAX_EVENTS,
			debug: false,
		};

		for config in configs {
			match config {
				ConfigOption::Workers(v) => ret.workers = v,
				ConfigOption::MaxClients(v) => ret.max_clients = v,
				ConfigOption::MaxEvents(v) => ret.max_events = v,
				ConfigOption::Debug(v) => ret.debug = v,
				_ => {}
			}
		}

		if ret.workers == 0 {
			return Err(err!(ErrKind::Configuration, "Workers must not be 0"));
		}
		if ret.max_clients == 0 {
			return Err(err!(ErrKind::Configuration, "MaxClients must not be 0"));
		}
		if ret.max_events == 0 {
			return Err(err!(ErrKind::Configuration, "MaxEvents must not be 0"));
		}

		Ok(ret)
	}
}

impl Selector {
	pub(crate) fn new() -> Result<Self, Error> {
		let epoll = map_err!(
			Epoll::new(EpollCreateFlags::empty()),
			ErrKind::Selector,
			"failed to create the readiness object"
		)?;
		let (ctl_writer, ctl_reader) = control_pair_impl()?;

		let ret = Self {
			epoll,
			ctl_reader,
			ctl_writer,
		};

		let event = ret.ctl_event();
		map_err!(
			ret.epoll
				.add(unsafe { BorrowedFd::borrow_raw(ret.ctl_reader) }, event),
			ErrKind::ControlChannel,
			"failed to register the control channel"
		)?;

		Ok(ret)
	}

	fn ctl_event(&self) -> EpollEvent {
		let interest = EpollFlags::EPOLLIN | EpollFlags::EPOLLET | EpollFlags::EPOLLONESHOT;
		EpollEvent::new(interest, CONTROL_COOKIE)
	}

	fn client_event(&self, node: *mut StackNode<ClientSlot>) -> EpollEvent {
		let interest = EpollFlags::EPOLLIN
			| EpollFlags::EPOLLET
			| EpollFlags::EPOLLRDHUP
			| EpollFlags::EPOLLPRI
			| EpollFlags::EPOLLONESHOT;
		EpollEvent::new(interest, node as u64)
	}

	// add a listening descriptor. EXCLUSIVE wakes a single waiter per accept event across
	// the threads sharing this selector.
	pub(crate) fn register_listener(&self, handle: Handle) -> Result<(), Error> {
		let interest = EpollFlags::EPOLLIN | EpollFlags::EPOLLET | EpollFlags::EPOLLEXCLUSIVE;
		let event = EpollEvent::new(interest, handle as u64);
		map_err!(
			self.epoll
				.add(unsafe { BorrowedFd::borrow_raw(handle) }, event),
			ErrKind::Selector,
			"failed to register listener"
		)
	}

	// add a connection descriptor. ONESHOT guarantees at most one worker owns the slot
	// until it is rearmed.
	pub(crate) fn register_client(&self, node: *mut StackNode<ClientSlot>) -> Result<(), Error> {
		let handle = unsafe { (*node).value.handle };
		let event = self.client_event(node);
		map_err!(
			self.epoll
				.add(unsafe { BorrowedFd::borrow_raw(handle) }, event),
			ErrKind::Selector,
			"failed to register client"
		)
	}

	// re-enable the one-shot registration for a slot once its descriptor is drained.
	pub(crate) fn rearm_client(&self, node: *mut StackNode<ClientSlot>) -> Result<(), Error> {
		let handle = unsafe { (*node).value.handle };
		let mut event = self.client_event(node);
		map_err!(
			self.epoll
				.modify(unsafe { BorrowedFd::borrow_raw(handle) }, &mut event),
			ErrKind::Selector,
			"failed to rearm client"
		)
	}

	pub(crate) fn deregister(&self, handle: Handle) -> Result<(), Error> {
		map_err!(
			self.epoll.delete(unsafe { BorrowedFd::borrow_raw(handle) }),
			ErrKind::Selector,
			"failed to deregister"
		)
	}

	// publish the shutdown token. The first waiter to consume it starts the daisy chain.
	pub(crate) fn close(&self) -> Result<(), Error> {
		if write_bytes_impl(self.ctl_writer, &[SHUTDOWN_TOKEN]) < 0 {
			let fmt = format!("failed to write the shutdown token: {}", errno());
			return Err(err!(ErrKind::ControlChannel, fmt));
		}
		Ok(())
	}

	// Consume the shutdown token. The control channel is re-registered one-shot before the
	// token is relayed so that the next waiter can receive it. One-shot delivery means no
	// two waiters observe the token simultaneously; each exiting waiter relays it while
	// peers remain, so no waiter needs to know how many peers are left.
	pub(crate) fn consume_token(&self, running: &AtomicUsize) -> Result<(), Error> {
		let mut buf = [0u8; 1];
		read_bytes_impl(self.ctl_reader, &mut buf);

		// failure here would strand the remaining waiters in wait, so it is fatal
		let mut event = self.ctl_event();
		map_err!(
			self.epoll
				.modify(unsafe { BorrowedFd::borrow_raw(self.ctl_reader) }, &mut event),
			ErrKind::ControlChannel,
			"failed to re-register the control channel"
		)?;

		if running.fetch_sub(1, Ordering::SeqCst) > 1 {
			self.close()?;
		}
		Ok(())
	}

	// block pulling ready events
	pub(crate) fn wait(&self, events: &mut [EpollEvent]) -> Result<usize, Error> {
		map_err!(
			self.epoll.wait(events, EpollTimeout::NONE),
			ErrKind::Selector,
			"wait failed"
		)
	}
}

impl Drop for Selector {
	fn drop(&mut self) {
		// the epoll descriptor itself is closed by its owned fd
		close_impl(self.ctl_reader);
		close_impl(self.ctl_writer);
	}
}

// Rent a slot and register the client descriptor. Returns false when the configured client
// limit is reached, the free list is exhausted, or registration is rejected. The caller
// keeps ownership of the descriptor (and typically closes it) whenever false is returned.
pub(crate) fn add_client_impl(state: &PoolState, handle: Handle) -> Result<bool, Error> {
	let active = state.active.fetch_add(1, Ordering::SeqCst);
	if active >= state.config.max_clients {
		state.active.fetch_sub(1, Ordering::SeqCst);
		debug!("client limit reached, refusing handle {}", handle)?;
		return Ok(false);
	}

	let node = match state.slots.pop() {
		Some(node) => node,
		None => {
			state.active.fetch_sub(1, Ordering::SeqCst);
			debug!("free list exhausted, refusing handle {}", handle)?;
			return Ok(false);
		}
	};

	unsafe {
		(*node).value.handle = handle;
	}

	match state.selector.register_client(node) {
		Ok(_) => Ok(true),
		Err(e) => {
			warn!("could not register handle {}: {}", handle, e)?;
			unsafe {
				(*node).value.handle = 0;
				state.slots.push(node);
			}
			state.active.fetch_sub(1, Ordering::SeqCst);
			Ok(false)
		}
	}
}

// Tear a slot down and return it to the free list. The order is mandatory: the slot may
// only reenter the free list once the kernel can no longer deliver events for it and the
// descriptor is closed.
pub(crate) fn evict_slot(state: &PoolState, node: *mut StackNode<ClientSlot>) -> Result<(), Error> {
	let handle = unsafe { (*node).value.handle };
	debug!("evicting handle {}", handle)?;

	match state.selector.deregister(handle) {
		Ok(_) => {}
		Err(e) => warn!("could not deregister handle {}: {}", handle, e)?,
	}
	close_impl(handle);
	unsafe {
		(*node).value.handle = 0;
		state.slots.push(node);
	}
	state.active.fetch_sub(1, Ordering::SeqCst);
	Ok(())
}

// Close any slot still in use. Called after the workers are joined, so no slot is owned by
// a dispatching thread.
pub(crate) fn sweep_slots(state: &PoolState) -> Result<(), Error> {
	let data = state.slots.data();
	for i in 0..state.slots.capacity() {
		let node = unsafe { data.add(i) };
		if unsafe { (*node).value.handle } != 0 {
			evict_slot(state, node)?;
		}
	}
	Ok(())
}

impl<OnInput, OnOob, OnWriteReady> ClientReactor<OnInput, OnOob, OnWriteReady>
where
	OnInput: FnMut(Handle, &[u8]) -> Result<(), Error> + Send + 'static + Clone + Sync + Unpin,
	OnOob: FnMut(Handle, u8) -> Result<(), Error> + Send + 'static + Clone + Sync + Unpin,
	OnWriteReady: FnMut(Handle) -> Result<(), Error> + Send + 'static + Clone + Sync + Unpin,
{
	pub(crate) fn new(configs: Vec<ConfigOption>) -> Result<Self, Error> {
		let config = ClientReactorConfig::new(configs)?;
		let selector = Selector::new()?;
		let slots = UtilBuilder::build_atomic_stack(config.max_clients, &ClientSlot::default())?;

		let state = Arc::new(PoolState {
			selector,
			slots,
			active: AtomicUsize::new(0),
			running: AtomicUsize::new(0),
			config,
		});

		Ok(Self {
			callbacks: ClientCallbacks {
				on_input: None,
				on_oob: None,
				on_write_ready: None,
			},
			state,
			workers: lock_box!(vec![])?,
		})
	}

	/// Set the handler that is executed whenever in-band data is read from a connection.
	/// The handler receives the triggered descriptor and the bytes read. Handlers must be
	/// set before [`crate::ClientReactor::run`] is called.
	pub fn set_on_input(&mut self, on_input: OnInput) -> Result<(), Error> {
		self.callbacks.on_input = Some(Box::pin(on_input));
		Ok(())
	}

	/// Set the handler that is executed when an out-of-band byte is read from a connection.
	pub fn set_on_oob(&mut self, on_oob: OnOob) -> Result<(), Error> {
		self.callbacks.on_oob = Some(Box::pin(on_oob));
		Ok(())
	}

	/// Set the handler that is executed when a connection becomes writable.
	pub fn set_on_write_ready(&mut self, on_write_ready: OnWriteReady) -> Result<(), Error> {
		self.callbacks.on_write_ready = Some(Box::pin(on_write_ready));
		Ok(())
	}

	/// The number of connections currently held by this reactor.
	pub fn active_count(&self) -> usize {
		self.state.active.load(Ordering::SeqCst)
	}

	/// Rent a slot for the specified descriptor and register it for edge triggered
	/// one-shot readiness. Returns `Ok(false)` when the reactor is at capacity or the
	/// registration was rejected. The caller keeps ownership of the descriptor (and
	/// typically closes it) whenever `Ok(false)` is returned.
	pub fn add_client(&self, handle: Handle) -> Result<bool, Error> {
		add_client_impl(&self.state, handle)
	}

	/// Start the worker threads. This function returns immediately. It may be called again
	/// after [`crate::ClientReactor::stop`]; calling it while the reactor is already
	/// running is a no-op.
	pub fn run(&mut self) -> Result<(), Error> {
		let mut workers = self.workers.wlock()?;
		let guard = workers.guard();
		if (**guard).len() != 0 {
			// already running
			return Ok(());
		}

		let worker_count = self.state.config.workers;
		self.state.running.store(worker_count, Ordering::SeqCst);

		for tid in 0..worker_count {
			let state = self.state.clone();
			let callbacks = self.callbacks.clone();
			let jh = spawn(move || {
				let mut callbacks = callbacks;
				match Self::worker_loop(&state, &mut callbacks, tid) {
					Ok(_) => {}
					Err(e) => {
						let _ = error!("worker {} exited with error: {}", tid, e);
					}
				}
			});
			(**guard).push(jh);
		}

		Ok(())
	}

	/// Stop the worker threads and close any descriptor still held by the reactor. The
	/// shutdown token is published once; the workers daisy-chain it so each exits exactly
	/// once. Calling this function while the reactor is not running is a no-op.
	pub fn stop(&mut self) -> Result<(), Error> {
		let mut workers = self.workers.wlock()?;
		let guard = workers.guard();
		if (**guard).len() == 0 {
			// not running
			return Ok(());
		}

		self.state.selector.close()?;
		for jh in (**guard).drain(..) {
			match jh.join() {
				Ok(_) => {}
				Err(_) => {
					let _ = warn!("worker thread panicked");
				}
			}
		}

		// best effort cleanup of anything the workers did not evict
		sweep_slots(&self.state)?;
		Ok(())
	}

	fn worker_loop(
		state: &PoolState,
		callbacks: &mut ClientCallbacks<OnInput, OnOob, OnWriteReady>,
		tid: usize,
	) -> Result<(), Error> {
		debug!("worker {} started", tid)?;
		let mut events = vec![EpollEvent::empty(); state.config.max_events];

		loop {
			let count = match state.selector.wait(&mut events) {
				Ok(count) => count,
				Err(e) => {
					// a wait error terminates this worker only
					warn!("worker {}: {}", tid, e)?;
					break;
				}
			};

			for i in 0..count {
				let cookie = events[i].data();
				if cookie == CONTROL_COOKIE {
					state.selector.consume_token(&state.running)?;
					debug!("worker {} exiting", tid)?;
					return Ok(());
				}

				let node = cookie as *mut StackNode<ClientSlot>;
				Self::process_event(state, callbacks, node, events[i].events())?;
			}
		}
		Ok(())
	}

	// Decode the readiness flags for a slot. Eviction signals win over data. EPOLLOUT is
	// handled in addition to in-band/urgent data unless a hangup flag is present, and a
	// drain that evicted the slot suppresses the write-ready callback.
	fn process_event(
		state: &PoolState,
		callbacks: &mut ClientCallbacks<OnInput, OnOob, OnWriteReady>,
		node: *mut StackNode<ClientSlot>,
		flags: EpollFlags,
	) -> Result<(), Error> {
		let handle = unsafe { (*node).value.handle };
		if state.config.debug {
			debug!("flags {:?} on handle {}", flags, handle)?;
		}

		let has_err = flags.contains(EpollFlags::EPOLLERR);
		let has_hup = flags.intersects(EpollFlags::EPOLLHUP | EpollFlags::EPOLLRDHUP);
		let has_in = flags.contains(EpollFlags::EPOLLIN);
		let has_pri = flags.contains(EpollFlags::EPOLLPRI);
		let has_out = flags.contains(EpollFlags::EPOLLOUT);

		if has_err {
			// have error, close the socket
			return evict_slot(state, node);
		}

		if has_hup && !has_in && !has_pri {
			// hangup with no data left to drain
			return evict_slot(state, node);
		}

		let alive = if has_pri {
			Self::drain_oob(state, callbacks, node)?
		} else if has_in {
			Self::drain_read(state, callbacks, node)?
		} else {
			true
		};

		if has_out && !has_hup && alive {
			match &mut callbacks.on_write_ready {
				Some(on_write_ready) => match on_write_ready(handle) {
					Ok(_) => {}
					Err(e) => warn!("on_write_ready generated error: {}", e)?,
				},
				None => {}
			}
		}

		Ok(())
	}

	// The descriptor is edge triggered, so read until EAGAIN or eviction. Returns false if
	// the slot was evicted.
	fn drain_read(
		state: &PoolState,
		callbacks: &mut ClientCallbacks<OnInput, OnOob, OnWriteReady>,
		node: *mut StackNode<ClientSlot>,
	) -> Result<bool, Error> {
		loop {
			match Self::read_once(state, callbacks, node)? {
				ReadOutcome::Data => {}
				ReadOutcome::WouldBlock => return Self::rearm(state, node),
				ReadOutcome::Gone => return Ok(false),
			}
		}
	}

	// Urgent data loop. If the read pointer is at the mark, deliver the OOB byte, then
	// perform one in-band read with the same outcomes as the read drain. EAGAIN on the
	// in-band read after a successful OOB byte is a valid exit.
	fn drain_oob(
		state: &PoolState,
		callbacks: &mut ClientCallbacks<OnInput, OnOob, OnWriteReady>,
		node: *mut StackNode<ClientSlot>,
	) -> Result<bool, Error> {
		loop {
			let handle = unsafe { (*node).value.handle };

			match at_mark_impl(handle) {
				Ok(true) => {
					let mut oob = [0u8; 1];
					if read_oob_impl(handle, &mut oob) < 0 {
						evict_slot(state, node)?;
						return Ok(false);
					}
					match &mut callbacks.on_oob {
						Some(on_oob) => match on_oob(handle, oob[0]) {
							Ok(_) => {}
							Err(e) => warn!("on_oob generated error: {}", e)?,
						},
						None => {}
					}
				}
				Ok(false) => {}
				Err(e) => {
					warn!("at mark query failed on handle {}: {}", handle, e)?;
					evict_slot(state, node)?;
					return Ok(false);
				}
			}

			match Self::read_once(state, callbacks, node)? {
				ReadOutcome::Data => {}
				ReadOutcome::WouldBlock => return Self::rearm(state, node),
				ReadOutcome::Gone => return Ok(false),
			}
		}
	}

	// One nonblocking in-band read. Data is delivered to the on_input handler. End of
	// stream and hard errors evict the slot.
	fn read_once(
		state: &PoolState,
		callbacks: &mut ClientCallbacks<OnInput, OnOob, OnWriteReady>,
		node: *mut StackNode<ClientSlot>,
	) -> Result<ReadOutcome, Error> {
		let (handle, len) = unsafe {
			let slot = &mut (*node).value;
			(
				slot.handle,
				read_bytes_impl(slot.handle, &mut slot.buf[0..READ_BUFFER_SIZE]),
			)
		};

		if len > 0 {
			let len: usize = try_into!(len)?;
			unsafe {
				// trailing sentinel for callers that treat the buffer as a C string
				(*node).value.buf[len] = 0;
			}
			match &mut callbacks.on_input {
				Some(on_input) => {
					let buf = unsafe { &(&(*node).value.buf)[0..len] };
					match on_input(handle, buf) {
						Ok(_) => {}
						Err(e) => warn!("on_input generated error: {}", e)?,
					}
				}
				None => {}
			}
			Ok(ReadOutcome::Data)
		} else if len == 0 {
			// orderly disconnect
			evict_slot(state, node)?;
			Ok(ReadOutcome::Gone)
		} else if errno().0 == EAGAIN || errno().0 == ETEMPUNAVAILABLE {
			Ok(ReadOutcome::WouldBlock)
		} else {
			evict_slot(state, node)?;
			Ok(ReadOutcome::Gone)
		}
	}

	// Re-enable the one-shot registration. A slot that cannot be rearmed can never be
	// dispatched again, so it is evicted instead.
	fn rearm(state: &PoolState, node: *mut StackNode<ClientSlot>) -> Result<bool, Error> {
		match state.selector.rearm_client(node) {
			Ok(_) => Ok(true),
			Err(e) => {
				let handle = unsafe { (*node).value.handle };
				warn!("could not rearm handle {}: {}", handle, e)?;
				evict_slot(state, node)?;
				Ok(false)
			}
		}
	}
}

impl<OnInput, OnOob, OnWriteReady> Drop for ClientReactor<OnInput, OnOob, OnWriteReady>
where
	OnInput: FnMut(Handle, &[u8]) -> Result<(), Error> + Send + 'static + Clone + Sync + Unpin,
	OnOob: FnMut(Handle, u8) -> Result<(), Error> + Send + 'static + Clone + Sync + Unpin,
	OnWriteReady: FnMut(Handle) -> Result<(), Error> + Send + 'static + Clone + Sync + Unpin,
{
	fn drop(&mut self) {
		match self.stop() {
			Ok(_) => {}
			Err(e) => {
				let _ = error!("stop generated error on drop: {}", e);
			}
		}

		// stop only sweeps when workers were running. Slots rented into a reactor that
		// never ran still hold descriptors, so sweep once more here.
		match sweep_slots(&self.state) {
			Ok(_) => {}
			Err(e) => {
				let _ = error!("sweep generated error on drop: {}", e);
			}
		}
	}
}

impl<OnInput, OnOob, OnWriteReady> AcceptorReactor<OnInput, OnOob, OnWriteReady>
where
	OnInput: FnMut(Handle, &[u8]) -> Result<(), Error> + Send + 'static + Clone + Sync + Unpin,
	OnOob: FnMut(Handle, u8) -> Result<(), Error> + Send + 'static + Clone + Sync + Unpin,
	OnWriteReady: FnMut(Handle) -> Result<(), Error> + Send + 'static + Clone + Sync + Unpin,
{
	pub(crate) fn new(client: ClientReactor<OnInput, OnOob, OnWriteReady>) -> Result<Self, Error> {
		let selector = Selector::new()?;
		let state = Arc::new(AcceptorState {
			selector,
			running: AtomicUsize::new(0),
			listeners: lock_box!(vec![])?,
		});

		Ok(Self {
			client,
			state,
			worker: lock_box!(vec![])?,
		})
	}

	/// A reference to the wrapped [`crate::ClientReactor`]. Accepted connections are handed
	/// to it; use this to query [`crate::ClientReactor::active_count`] or to add externally
	/// prepared clients.
	pub fn client(&self) -> &ClientReactor<OnInput, OnOob, OnWriteReady> {
		&self.client
	}

	/// Create a nonblocking TCP listener bound to INADDR_ANY on the specified port with
	/// SO_REUSEADDR set, and register it with this acceptor. Returns `Ok(false)` if the
	/// socket could not be created or registered.
	pub fn bind(&mut self, port: u16, backlog: usize) -> Result<bool, Error> {
		let handle = match create_listener_impl(port, backlog) {
			Ok(handle) => handle,
			Err(e) => {
				warn!("could not bind port {}: {}", port, e)?;
				return Ok(false);
			}
		};
		match self.add(handle)? {
			true => Ok(true),
			false => {
				close_impl(handle);
				Ok(false)
			}
		}
	}

	/// Register an externally prepared listening descriptor with this acceptor. The
	/// descriptor must already be listening and nonblocking. Returns `Ok(false)` if the
	/// registration was rejected.
	pub fn add(&mut self, handle: Handle) -> Result<bool, Error> {
		match self.state.selector.register_listener(handle) {
			Ok(_) => {
				let mut listeners = self.state.listeners.clone();
				let mut listeners = listeners.wlock()?;
				(**listeners.guard()).push(handle);
				Ok(true)
			}
			Err(e) => {
				warn!("could not register listener {}: {}", handle, e)?;
				Ok(false)
			}
		}
	}

	/// Start the wrapped client reactor and the single acceptor thread. Idempotent; see
	/// [`crate::ClientReactor::run`].
	pub fn run(&mut self) -> Result<(), Error> {
		self.client.run()?;

		let mut worker = self.worker.wlock()?;
		let guard = worker.guard();
		if (**guard).len() != 0 {
			// already running
			return Ok(());
		}

		self.state.running.store(1, Ordering::SeqCst);
		let state = self.state.clone();
		let pool = self.client.state.clone();
		let jh = spawn(move || match Self::acceptor_loop(&state, &pool) {
			Ok(_) => {}
			Err(e) => {
				let _ = error!("acceptor exited with error: {}", e);
			}
		});
		(**guard).push(jh);

		Ok(())
	}

	/// Stop the acceptor thread, then the wrapped client reactor. Idempotent.
	pub fn stop(&mut self) -> Result<(), Error> {
		{
			let mut worker = self.worker.wlock()?;
			let guard = worker.guard();
			if (**guard).len() != 0 {
				// a daisy chain of length one
				self.state.selector.close()?;
				for jh in (**guard).drain(..) {
					match jh.join() {
						Ok(_) => {}
						Err(_) => {
							let _ = warn!("acceptor thread panicked");
						}
					}
				}
			}
		}
		self.client.stop()
	}

	fn acceptor_loop(state: &AcceptorState, pool: &PoolState) -> Result<(), Error> {
		debug!("acceptor started")?;
		let mut events = vec![EpollEvent::empty(); REACTOR_DEFAULT_MAX_EVENTS];

		loop {
			let count = match state.selector.wait(&mut events) {
				Ok(count) => count,
				Err(e) => {
					warn!("acceptor: {}", e)?;
					break;
				}
			};

			for i in 0..count {
				let cookie = events[i].data();
				if cookie == CONTROL_COOKIE {
					state.selector.consume_token(&state.running)?;
					debug!("acceptor exiting")?;
					return Ok(());
				}

				Self::process_listener(state, pool, cookie as Handle, events[i].events())?;
			}
		}
		Ok(())
	}

	// Drain the accept queue for a readable listener. Each accepted descriptor is set
	// nonblocking and offered to the client reactor; a refused or unregisterable
	// descriptor is closed, which the peer observes as a reset.
	fn process_listener(
		state: &AcceptorState,
		pool: &PoolState,
		handle: Handle,
		flags: EpollFlags,
	) -> Result<(), Error> {
		if flags.contains(EpollFlags::EPOLLERR) {
			warn!("error flags {:?} on listener {}", flags, handle)?;
			match state.selector.deregister(handle) {
				Ok(_) => {}
				Err(e) => warn!("could not deregister listener {}: {}", handle, e)?,
			}
			{
				let mut listeners = state.listeners.clone();
				let mut listeners = listeners.wlock()?;
				(**listeners.guard()).retain(|l| *l != handle);
			}
			close_impl(handle);
			return Ok(());
		}

		loop {
			let accepted = match accept_impl(handle) {
				Ok(accepted) => accepted,
				Err(e) => {
					warn!("accept failed on listener {}: {}", handle, e)?;
					return Ok(());
				}
			};
			// a negative value means the queue is drained
			cbreak!(accepted < 0);

			if !add_client_impl(pool, accepted)? {
				close_impl(accepted);
			}
		}

		Ok(())
	}
}

impl<OnInput, OnOob, OnWriteReady> Drop for AcceptorReactor<OnInput, OnOob, OnWriteReady>
where
	OnInput: FnMut(Handle, &[u8]) -> Result<(), Error> + Send + 'static + Clone + Sync + Unpin,
	OnOob: FnMut(Handle, u8) -> Result<(), Error> + Send + 'static + Clone + Sync + Unpin,
	OnWriteReady: FnMut(Handle) -> Result<(), Error> + Send + 'static + Clone + Sync + Unpin,
{
	fn drop(&mut self) {
		match self.stop() {
			Ok(_) => {}
			Err(e) => {
				let _ = error!("stop generated error on drop: {}", e);
			}
		}

		// listeners are not owned by any slot, so they are closed here at latest
		let mut listeners = self.state.listeners.clone();
		let lock_result = listeners.wlock_ignore_poison();
		match lock_result {
			Ok(mut listeners) => {
				for handle in (**listeners.guard()).drain(..) {
					close_impl(handle);
				}
			}
			Err(e) => {
				let _ = error!("could not close listeners on drop: {}", e);
			}
		}
	}
}
