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
	use crate as np_reactor;
	use crate::{tcp_stream_to_handle, write_bytes, ReactorBuilder};
	use np_conf::ConfigOption;
	use np_deps::libc::{c_void, send, MSG_OOB};
	use np_err::*;
	use np_log::*;
	use crate::{acceptor_reactor, client_reactor, client_reactor_oi};
	use np_test::*;
	use np_util::{lock_box, rlock, wlock, LockBox};
	use std::io::{Read, Write};
	use std::net::{Shutdown, TcpListener, TcpStream};
	use std::os::unix::io::AsRawFd;
	use std::thread::sleep;
	use std::time::Duration;

	info!();

	// poll a condition for a bounded time
	fn wait_for<F>(mut cond: F) -> bool
	where
		F: FnMut() -> bool,
	{
		for _ in 0..10_000 {
			if cond() {
				return true;
			}
			sleep(Duration::from_millis(1));
		}
		false
	}

	#[test]
	fn test_reactor_config_errors() -> Result<(), Error> {
		assert!(
			ReactorBuilder::build_client_reactor::<
				fn(crate::Handle, &[u8]) -> Result<(), Error>,
				fn(crate::Handle, u8) -> Result<(), Error>,
				fn(crate::Handle) -> Result<(), Error>,
			>(vec![ConfigOption::Workers(0)])
			.is_err()
		);
		assert!(
			ReactorBuilder::build_client_reactor::<
				fn(crate::Handle, &[u8]) -> Result<(), Error>,
				fn(crate::Handle, u8) -> Result<(), Error>,
				fn(crate::Handle) -> Result<(), Error>,
			>(vec![ConfigOption::MaxClients(0)])
			.is_err()
		);
		// duplicates are rejected
		assert!(
			ReactorBuilder::build_client_reactor::<
				fn(crate::Handle, &[u8]) -> Result<(), Error>,
				fn(crate::Handle, u8) -> Result<(), Error>,
				fn(crate::Handle) -> Result<(), Error>,
			>(vec![ConfigOption::Workers(1), ConfigOption::Workers(2)])
			.is_err()
		);
		// log options are not allowed here
		assert!(
			ReactorBuilder::build_client_reactor::<
				fn(crate::Handle, &[u8]) -> Result<(), Error>,
				fn(crate::Handle, u8) -> Result<(), Error>,
				fn(crate::Handle) -> Result<(), Error>,
			>(vec![ConfigOption::MaxSizeBytes(100)])
			.is_err()
		);
		Ok(())
	}

	#[test]
	fn test_echo_one() -> Result<(), Error> {
		let test_info = test_info!()?;
		let mut reactor = client_reactor_oi!(Workers(1), MaxClients(4))?;

		let mut received: Box<dyn LockBox<Vec<u8>>> = lock_box!(Vec::new())?;
		let received_clone = received.clone();

		reactor.set_on_input(move |handle, buf| -> Result<(), Error> {
			{
				let mut received = received.wlock()?;
				(**received.guard()).extend(buf);
			}
			// echo
			write_bytes(handle, buf);
			Ok(())
		})?;

		let mut acceptor = acceptor_reactor!(reactor)?;
		let port = test_info.port();
		assert!(acceptor.bind(port, 10)?);
		acceptor.run()?;

		let mut connection = TcpStream::connect(format!("127.0.0.1:{}", port))?;
		connection.write(b"abc")?;

		let mut buf = [0u8; 100];
		let len = connection.read(&mut buf)?;
		assert_eq!(&buf[0..len], b"abc");
		assert_eq!(rlock!(received_clone), b"abc".to_vec());

		assert_eq!(acceptor.client().active_count(), 1);

		// the free list and the active counter always cover the full capacity
		let state = &acceptor.client().state;
		assert_eq!(
			state.slots.len() + state.active.load(std::sync::atomic::Ordering::SeqCst),
			state.slots.capacity()
		);

		// close the client and the slot returns to the free list
		drop(connection);
		let client = acceptor.client();
		assert!(wait_for(|| client.active_count() == 0));

		acceptor.stop()?;
		Ok(())
	}

	#[test]
	fn test_echo_many() -> Result<(), Error> {
		let test_info = test_info!()?;
		let mut reactor = client_reactor_oi!(Workers(4), MaxClients(100))?;

		reactor.set_on_input(move |handle, buf| -> Result<(), Error> {
			write_bytes(handle, buf);
			Ok(())
		})?;

		let mut acceptor = acceptor_reactor!(reactor)?;
		let port = test_info.port();
		assert!(acceptor.bind(port, 1_000)?);
		acceptor.run()?;

		// every client sends a distinct 16 byte payload and must receive its own back
		info!("opening 100 connections on port {}", port)?;
		let mut connections = vec![];
		for i in 0..100 {
			let mut connection = TcpStream::connect(format!("127.0.0.1:{}", port))?;
			let payload = format!("payload---{:06}", i);
			assert_eq!(payload.len(), 16);
			connection.write(payload.as_bytes())?;

			let mut buf = [0u8; 16];
			connection.read_exact(&mut buf)?;
			assert_eq!(&buf[..], payload.as_bytes());
			connections.push(connection);
		}

		let client = acceptor.client();
		assert!(wait_for(|| client.active_count() == 100));

		drop(connections);
		let client = acceptor.client();
		assert!(wait_for(|| client.active_count() == 0));

		acceptor.stop()?;
		Ok(())
	}

	#[test]
	fn test_backpressure() -> Result<(), Error> {
		let test_info = test_info!()?;
		let mut reactor = client_reactor_oi!(Workers(1), MaxClients(2))?;

		reactor.set_on_input(move |handle, buf| -> Result<(), Error> {
			write_bytes(handle, buf);
			Ok(())
		})?;

		let mut acceptor = acceptor_reactor!(reactor)?;
		let port = test_info.port();
		assert!(acceptor.bind(port, 10)?);
		acceptor.run()?;

		let mut connection1 = TcpStream::connect(format!("127.0.0.1:{}", port))?;
		let mut connection2 = TcpStream::connect(format!("127.0.0.1:{}", port))?;
		{
			let client = acceptor.client();
			assert!(wait_for(|| client.active_count() == 2));
		}

		// the third connection is refused and closed by the acceptor
		let mut connection3 = TcpStream::connect(format!("127.0.0.1:{}", port))?;
		connection3.set_read_timeout(Some(Duration::from_millis(30_000)))?;
		let mut buf = [0u8; 16];
		match connection3.read(&mut buf) {
			Ok(len) => assert_eq!(len, 0),
			Err(_) => {}
		}

		// the first two connections continue echoing
		connection1.write(b"first")?;
		let len = connection1.read(&mut buf)?;
		assert_eq!(&buf[0..len], b"first");

		connection2.write(b"second")?;
		let len = connection2.read(&mut buf)?;
		assert_eq!(&buf[0..len], b"second");

		assert_eq!(acceptor.client().active_count(), 2);

		acceptor.stop()?;
		Ok(())
	}

	#[test]
	fn test_hangup() -> Result<(), Error> {
		let test_info = test_info!()?;
		let mut reactor = client_reactor_oi!(Workers(2), MaxClients(4))?;

		let mut read_count = lock_box!(0usize)?;
		let read_count_clone = read_count.clone();

		reactor.set_on_input(move |_handle, buf| -> Result<(), Error> {
			wlock!(read_count) += buf.len();
			Ok(())
		})?;

		let mut acceptor = acceptor_reactor!(reactor)?;
		let port = test_info.port();
		assert!(acceptor.bind(port, 10)?);
		acceptor.run()?;

		let mut connection = TcpStream::connect(format!("127.0.0.1:{}", port))?;
		connection.write(b"0123456789")?;
		{
			let client = acceptor.client();
			assert!(wait_for(|| client.active_count() == 1));
		}

		// half close: the server observes end of stream and returns the slot
		connection.shutdown(Shutdown::Write)?;
		let client = acceptor.client();
		assert!(wait_for(|| client.active_count() == 0));

		let count_check = move || -> Result<usize, Error> { Ok(rlock!(read_count_clone)) };
		assert_eq!(count_check()?, 10);

		acceptor.stop()?;
		Ok(())
	}

	#[test]
	fn test_oob() -> Result<(), Error> {
		let test_info = test_info!()?;
		let mut reactor = client_reactor!(Workers(1), MaxClients(4))?;

		let mut oob_byte = lock_box!(0u8)?;
		let oob_byte_clone = oob_byte.clone();
		let mut in_band = lock_box!(Vec::new())?;
		let in_band_clone = in_band.clone();

		reactor.set_on_input(move |_handle, buf| -> Result<(), Error> {
			let mut in_band = in_band.wlock()?;
			(**in_band.guard()).extend(buf);
			Ok(())
		})?;
		reactor.set_on_oob(move |_handle, byte| -> Result<(), Error> {
			wlock!(oob_byte) = byte;
			Ok(())
		})?;
		reactor.set_on_write_ready(move |_handle| -> Result<(), Error> { Ok(()) })?;

		let mut acceptor = acceptor_reactor!(reactor)?;
		let port = test_info.port();
		assert!(acceptor.bind(port, 10)?);
		acceptor.run()?;

		let mut connection = TcpStream::connect(format!("127.0.0.1:{}", port))?;
		{
			let client = acceptor.client();
			assert!(wait_for(|| client.active_count() == 1));
		}

		// send one urgent byte followed by in-band data
		let oob = [0x05u8];
		let res = unsafe {
			send(
				connection.as_raw_fd(),
				&oob as *const _ as *const c_void,
				1,
				MSG_OOB,
			)
		};
		assert_eq!(res, 1);
		sleep(Duration::from_millis(100));
		connection.write(b"x")?;

		let oob_check = move || -> Result<u8, Error> { Ok(rlock!(oob_byte_clone)) };
		assert!(wait_for(|| oob_check().unwrap_or(0) == 0x05));

		let in_band_check = move || -> Result<Vec<u8>, Error> { Ok(rlock!(in_band_clone).clone()) };
		assert!(wait_for(|| in_band_check().unwrap_or(vec![]) == b"x".to_vec()));

		acceptor.stop()?;
		Ok(())
	}

	#[test]
	fn test_shutdown_while_idle() -> Result<(), Error> {
		let mut reactor = client_reactor_oi!(Workers(8), MaxClients(16))?;
		reactor.set_on_input(move |_handle, _buf| -> Result<(), Error> { Ok(()) })?;

		reactor.run()?;
		// all eight workers must observe the daisy-chained token and join
		reactor.stop()?;
		assert_eq!(reactor.active_count(), 0);
		Ok(())
	}

	#[test]
	fn test_run_stop_idempotent() -> Result<(), Error> {
		let test_info = test_info!()?;
		let mut reactor = client_reactor_oi!(Workers(1), MaxClients(4))?;
		reactor.set_on_input(move |handle, buf| -> Result<(), Error> {
			write_bytes(handle, buf);
			Ok(())
		})?;

		let mut acceptor = acceptor_reactor!(reactor)?;
		let port = test_info.port();
		assert!(acceptor.bind(port, 10)?);

		// a second run is a no-op, a second stop is a no-op
		acceptor.run()?;
		acceptor.run()?;
		acceptor.stop()?;
		acceptor.stop()?;
		assert_eq!(acceptor.client().active_count(), 0);

		// the reactors restart cleanly and still serve connections
		acceptor.run()?;
		let mut connection = TcpStream::connect(format!("127.0.0.1:{}", port))?;
		connection.write(b"again")?;
		let mut buf = [0u8; 16];
		let len = connection.read(&mut buf)?;
		assert_eq!(&buf[0..len], b"again");

		drop(connection);
		acceptor.stop()?;
		assert_eq!(acceptor.client().active_count(), 0);
		Ok(())
	}

	#[test]
	fn test_add_client_exhausted() -> Result<(), Error> {
		let test_info = test_info!()?;
		let mut reactor = client_reactor_oi!(Workers(1), MaxClients(1))?;
		reactor.set_on_input(move |_handle, _buf| -> Result<(), Error> { Ok(()) })?;
		reactor.run()?;

		// prepare two accepted connections outside of the reactors
		let listener = TcpListener::bind(format!("127.0.0.1:{}", test_info.port()))?;
		let _connection1 = TcpStream::connect(listener.local_addr()?)?;
		let _connection2 = TcpStream::connect(listener.local_addr()?)?;
		let (strm1, _) = listener.accept()?;
		let (strm2, _) = listener.accept()?;

		let handle1 = tcp_stream_to_handle(strm1)?;
		let handle2 = tcp_stream_to_handle(strm2)?;

		assert!(reactor.add_client(handle1)?);
		assert_eq!(reactor.active_count(), 1);

		// at capacity: the second client is refused and active_count is unchanged
		assert!(!reactor.add_client(handle2)?);
		assert_eq!(reactor.active_count(), 1);
		crate::close_handle(handle2);

		// stop sweeps the slot that was still in use
		reactor.stop()?;
		assert_eq!(reactor.active_count(), 0);
		Ok(())
	}

	#[test]
	fn test_acceptor_bind_errors() -> Result<(), Error> {
		let test_info = test_info!()?;
		let mut reactor = client_reactor_oi!(Workers(1), MaxClients(4))?;
		reactor.set_on_input(move |_handle, _buf| -> Result<(), Error> { Ok(()) })?;
		let mut acceptor = acceptor_reactor!(reactor)?;

		// the port is already taken
		let listener = TcpListener::bind(format!("127.0.0.1:{}", test_info.port()))?;
		assert!(!acceptor.bind(listener.local_addr()?.port(), 10)?);

		// a descriptor the readiness object rejects cannot be registered
		let file = std::fs::File::create(format!("{}/not_a_socket", test_info.directory()))?;
		assert!(!acceptor.add(file.as_raw_fd())?);

		// a valid externally prepared listener is accepted
		let port = pick_free_port()?;
		assert!(acceptor.bind(port, 10)?);

		Ok(())
	}
}
