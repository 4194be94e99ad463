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

use np_err::*;
use np_log::*;
use np_reactor::*;
use std::thread::park;

info!();

const DEFAULT_PORT: u16 = 8092;
const DEFAULT_WORKERS: usize = 4;
const DEFAULT_MAX_CLIENTS: usize = 10_000;
const DEFAULT_BACKLOG: usize = 100_000;

fn env_or<T>(name: &str, default: T) -> Result<T, Error>
where
	T: std::str::FromStr,
	Error: From<<T as std::str::FromStr>::Err>,
{
	match std::env::var(name) {
		Ok(v) => Ok(v.parse()?),
		Err(_) => Ok(default),
	}
}

fn main() -> Result<(), Error> {
	log_init!()?;

	let port: u16 = env_or("NETPOOL_PORT", DEFAULT_PORT)?;
	let workers: usize = env_or("NETPOOL_WORKERS", DEFAULT_WORKERS)?;
	let max_clients: usize = env_or("NETPOOL_MAX_CLIENTS", DEFAULT_MAX_CLIENTS)?;

	let mut reactor = client_reactor_oi!(Workers(workers), MaxClients(max_clients))?;

	// write every buffer back to the connection it was read from
	reactor.set_on_input(move |handle, buf| -> Result<(), Error> {
		if write_bytes(handle, buf) < 0 {
			warn!("echo write failed on handle {}", handle)?;
		}
		Ok(())
	})?;

	let mut acceptor = acceptor_reactor!(reactor)?;
	if !acceptor.bind(port, DEFAULT_BACKLOG)? {
		return Err(err!(ErrKind::IO, "could not bind port {}", port));
	}
	acceptor.run()?;

	info!(
		"echo server listening on port {} with {} workers, max {} clients",
		port, workers, max_clients
	)?;

	loop {
		park();
	}
}
