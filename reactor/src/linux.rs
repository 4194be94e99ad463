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
use crate::types::Handle;
use np_deps::errno::{errno, set_errno, Errno};
use np_deps::libc::{
	accept, bind, c_int, c_void, close, fcntl, ioctl, listen, recv, send, setsockopt,
	sockaddr, sockaddr_in, socket, socketpair, socklen_t, AF_INET, AF_UNIX, F_GETFL, F_SETFL,
	INADDR_ANY, MSG_OOB, O_NONBLOCK, SOCK_STREAM, SOL_SOCKET, SO_REUSEADDR,
};
use np_err::*;
use std::mem::{size_of, size_of_val, zeroed};

// Create a nonblocking TCP listener bound to INADDR_ANY on the specified port.
pub(crate) fn create_listener_impl(port: u16, backlog: usize) -> Result<Handle, Error> {
	let fd = unsafe { socket(AF_INET, SOCK_STREAM, 0) };
	if fd < 0 {
		return Err(err!(ErrKind::IO, "socket failed: {}", errno()));
	}

	unsafe {
		let optval: c_int = 1;
		setsockopt(
			fd,
			SOL_SOCKET,
			SO_REUSEADDR,
			&optval as *const _ as *const c_void,
			size_of_val(&optval) as socklen_t,
		);
	}

	let mut addr: sockaddr_in = unsafe { zeroed() };
	addr.sin_family = AF_INET as u16;
	addr.sin_port = port.to_be();
	addr.sin_addr.s_addr = INADDR_ANY.to_be();

	let res = unsafe {
		bind(
			fd,
			&addr as *const sockaddr_in as *const sockaddr,
			size_of::<sockaddr_in>() as socklen_t,
		)
	};
	if res != 0 {
		let e = err!(ErrKind::IO, "bind failed: {}", errno());
		close_impl(fd);
		return Err(e);
	}

	if unsafe { listen(fd, try_into!(backlog)?) } != 0 {
		let e = err!(ErrKind::IO, "listen failed: {}", errno());
		close_impl(fd);
		return Err(e);
	}

	set_nonblocking_impl(fd)?;
	Ok(fd)
}

// Accept a connection on the specified listener. The accepted descriptor is set
// nonblocking. A negative value is returned when the accept queue is drained.
pub(crate) fn accept_impl(fd: Handle) -> Result<Handle, Error> {
	set_errno(Errno(0));
	let mut addr: sockaddr = unsafe { zeroed() };
	let mut len = size_of::<sockaddr>() as socklen_t;
	let handle = unsafe { accept(fd, &mut addr, &mut len) };

	if handle < 0 {
		if errno().0 == EAGAIN || errno().0 == ETEMPUNAVAILABLE {
			// would block, return the negative number
			return Ok(handle);
		}
		let fmt = format!("accept failed: {}", errno());
		return Err(err!(ErrKind::IO, fmt));
	}

	set_nonblocking_impl(handle)?;
	Ok(handle)
}

pub(crate) fn set_nonblocking_impl(fd: Handle) -> Result<(), Error> {
	let flags = unsafe { fcntl(fd, F_GETFL, 0) };
	if flags < 0 || unsafe { fcntl(fd, F_SETFL, flags | O_NONBLOCK) } < 0 {
		return Err(err!(ErrKind::IO, "fcntl failed: {}", errno()));
	}
	Ok(())
}

pub(crate) fn close_impl(handle: Handle) {
	unsafe {
		close(handle);
	}
}

pub(crate) fn read_bytes_impl(handle: Handle, buf: &mut [u8]) -> isize {
	let cbuf: *mut c_void = buf as *mut _ as *mut c_void;
	unsafe { recv(handle, cbuf, buf.len(), 0) }
}

pub(crate) fn read_oob_impl(handle: Handle, buf: &mut [u8]) -> isize {
	let cbuf: *mut c_void = buf as *mut _ as *mut c_void;
	unsafe { recv(handle, cbuf, 1, MSG_OOB) }
}

pub(crate) fn write_bytes_impl(handle: Handle, buf: &[u8]) -> isize {
	let cbuf: *const c_void = buf as *const _ as *const c_void;
	unsafe { send(handle, cbuf, buf.len(), 0) }
}

// Query whether the read pointer is at the urgent data mark.
pub(crate) fn at_mark_impl(handle: Handle) -> Result<bool, Error> {
	let mut mark: c_int = 0;
	if unsafe { ioctl(handle, SIOCATMARK, &mut mark) } == -1 {
		return Err(err!(ErrKind::IO, "SIOCATMARK failed: {}", errno()));
	}
	Ok(mark != 0)
}

// Create the connected nonblocking socket pair used as a selector's control channel.
// Returns (writer, reader).
pub(crate) fn control_pair_impl() -> Result<(Handle, Handle), Error> {
	let mut fds = [0 as c_int; 2];
	if unsafe { socketpair(AF_UNIX, SOCK_STREAM, 0, fds.as_mut_ptr()) } != 0 {
		let fmt = format!("socketpair failed: {}", errno());
		return Err(err!(ErrKind::ControlChannel, fmt));
	}
	for fd in fds {
		match set_nonblocking_impl(fd) {
			Ok(_) => {}
			Err(e) => {
				close_impl(fds[0]);
				close_impl(fds[1]);
				return Err(err!(ErrKind::ControlChannel, "{}", e));
			}
		}
	}
	Ok((fds[0], fds[1]))
}
