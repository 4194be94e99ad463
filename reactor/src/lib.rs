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

//! # The Netpool Reactor crate
//! This crate implements the two cooperating reactors that make up the netpool transport
//! substrate: the [`crate::ClientReactor`] and the [`crate::AcceptorReactor`]. Together
//! they host large numbers of simultaneous TCP connections on a small, fixed pool of
//! worker threads.
//!
//! The client reactor preallocates all of its per connection state at construction. Slots
//! are rented from a lock-free free list when a connection arrives and returned when it
//! goes away, so there is no allocator traffic on the hot path and slot addresses can be
//! handed to the kernel as stable event cookies. All worker threads share a single epoll
//! instance. Connection descriptors are registered edge triggered and one-shot, which
//! guarantees that at most one worker owns a connection at a time without any per slot
//! locking; a worker drains the descriptor to EAGAIN and then rearms it. Listening
//! descriptors are registered edge triggered with exclusive wakeup so that exactly one
//! waiter wakes per accept event.
//!
//! Shutdown is daisy-chained through an internal control channel. `stop` writes a single
//! token byte; the worker that receives it re-registers the channel, decrements the
//! running counter and relays the token while peers remain, so each worker exits exactly
//! once and none remains blocked in wait.
//!
//! The acceptor reactor owns the listening sockets and a single thread. On an accept
//! event it drains the accept queue, sets each accepted descriptor nonblocking, and hands
//! it to the client reactor, closing it if the pool refuses.
//!
//! # Examples
//!
//!```
//! // Echo server
//! use np_err::*;
//! use np_log::*;
//! use np_reactor::*;
//! use np_test::pick_free_port;
//! use std::io::{Read, Write};
//! use std::net::TcpStream;
//!
//! info!();
//!
//! fn main() -> Result<(), Error> {
//!     // create a client reactor. The on_oob and on_write_ready handlers default to
//!     // no-ops with this macro.
//!     let mut reactor = client_reactor_oi!(Workers(2), MaxClients(16))?;
//!
//!     // echo every buffer back to the connection it was read from
//!     reactor.set_on_input(move |handle, buf| -> Result<(), Error> {
//!         info!("read {} bytes on handle {}", buf.len(), handle)?;
//!         write_bytes(handle, buf);
//!         Ok(())
//!     })?;
//!
//!     // wrap it in an acceptor and bind a port
//!     let mut acceptor = acceptor_reactor!(reactor)?;
//!     let port = pick_free_port()?;
//!     assert!(acceptor.bind(port, 10)?);
//!
//!     // start the workers and the acceptor thread
//!     acceptor.run()?;
//!
//!     // connect and verify the echo
//!     let mut connection = TcpStream::connect(format!("127.0.0.1:{}", port))?;
//!     connection.write(b"test1")?;
//!     let mut buf = vec![];
//!     buf.resize(100, 0u8);
//!     let len = connection.read(&mut buf)?;
//!     assert_eq!(&buf[0..len], b"test1");
//!
//!     // stop both reactors
//!     acceptor.stop()?;
//!     Ok(())
//! }
//!```

mod builder;
mod constants;
mod linux;
mod macros;
mod reactor;
mod test;
mod types;

pub use crate::reactor::{
	close_handle, tcp_stream_to_handle, write_bytes, READ_BUFFER_SIZE,
};
pub use crate::types::{AcceptorReactor, ClientReactor, Handle, ReactorBuilder};
