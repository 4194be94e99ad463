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

use clap::{load_yaml, App, ArgMatches};
use np_deps::num_format::{Locale, ToFormattedString};
use np_err::*;
use np_log::*;
use np_reactor::*;
use np_util::{lock_box, rlock, wlock, LockBox};
use std::io::{Read, Write};
use std::net::TcpStream;
use std::process::exit;
use std::thread::{park, spawn};
use std::time::Instant;

info!();

const SPACER: &str =
	"----------------------------------------------------------------------------------------------------";

const MESSAGE: &[u8] = b"0123456789abcdef";

const DEFAULT_THREADS: usize = 4;
const DEFAULT_PORT: u16 = 8092;
const DEFAULT_CLIENTS: usize = 1;
const DEFAULT_COUNT: usize = 1_000;
const DEFAULT_ITT: usize = 10;
const DEFAULT_MAX_CLIENTS: usize = 10_000;

fn arg_or<T>(args: &ArgMatches, name: &str, default: T) -> Result<T, Error>
where
	T: std::str::FromStr,
	Error: From<<T as std::str::FromStr>::Err>,
{
	match args.value_of(name) {
		Some(v) => Ok(v.parse()?),
		None => Ok(default),
	}
}

fn run_eventhandler(args: &ArgMatches) -> Result<(), Error> {
	let threads: usize = arg_or(args, "threads", DEFAULT_THREADS)?;
	let port: u16 = arg_or(args, "port", DEFAULT_PORT)?;
	let max_clients: usize = arg_or(args, "max_clients", DEFAULT_MAX_CLIENTS)?;
	let debug = args.is_present("debug");

	let start = Instant::now();

	info_plain!("{}", SPACER)?;
	info!("threads:     '{}'", threads.to_formatted_string(&Locale::en))?;
	info!("port:        '{}'", port)?;
	info!(
		"max_clients: '{}'",
		max_clients.to_formatted_string(&Locale::en)
	)?;
	info!("debug:       '{}'", debug)?;
	info_plain!("{}", SPACER)?;

	let mut reactor = client_reactor_oi!(
		Workers(threads),
		MaxClients(max_clients),
		Debug(debug)
	)?;

	reactor.set_on_input(move |handle, buf| -> Result<(), Error> {
		// echo
		if write_bytes(handle, buf) < 0 {
			warn!("echo write failed on handle {}", handle)?;
		}
		Ok(())
	})?;

	let mut acceptor = acceptor_reactor!(reactor)?;
	if !acceptor.bind(port, 100_000)? {
		return Err(err!(ErrKind::IO, "could not bind port {}", port));
	}
	acceptor.run()?;

	info!("Server started in {} ms.", start.elapsed().as_millis())?;
	info_plain!("{}", SPACER)?;

	loop {
		park();
	}
}

fn run_client(args: &ArgMatches) -> Result<(), Error> {
	let threads: usize = arg_or(args, "threads", DEFAULT_THREADS)?;
	let port: u16 = arg_or(args, "port", DEFAULT_PORT)?;
	let clients: usize = arg_or(args, "clients", DEFAULT_CLIENTS)?;
	let count: usize = arg_or(args, "count", DEFAULT_COUNT)?;
	let itt: usize = arg_or(args, "itt", DEFAULT_ITT)?;

	info_plain!("{}", SPACER)?;
	info!("threads: '{}'", threads.to_formatted_string(&Locale::en))?;
	info!("port:    '{}'", port)?;
	info!("clients: '{}'", clients.to_formatted_string(&Locale::en))?;
	info!("count:   '{}'", count.to_formatted_string(&Locale::en))?;
	info!("itt:     '{}'", itt.to_formatted_string(&Locale::en))?;
	info_plain!("{}", SPACER)?;

	let start = Instant::now();
	let total = lock_box!(0usize)?;
	let total_clone = total.clone();

	let mut jhs = vec![];
	for _ in 0..threads {
		let mut total = total.clone();
		jhs.push(spawn(move || -> Result<(), Error> {
			let mut connections = vec![];
			for _ in 0..clients {
				connections.push(TcpStream::connect(format!("127.0.0.1:{}", port))?);
			}

			let mut buf = [0u8; MESSAGE.len()];
			for _ in 0..itt {
				for connection in &mut connections {
					for _ in 0..count {
						connection.write(MESSAGE)?;
						connection.read_exact(&mut buf)?;
						if &buf[..] != MESSAGE {
							return Err(err!(ErrKind::IO, "unexpected echo response"));
						}
					}
				}
			}

			wlock!(total) += clients * itt * count;
			Ok(())
		}));
	}

	for jh in jhs {
		match jh.join() {
			Ok(res) => res?,
			Err(_) => return Err(err!(ErrKind::ThreadPanic, "client thread panicked")),
		}
	}

	let elapsed = start.elapsed();
	let messages = rlock!(total_clone);
	let mps = (messages as f64 / elapsed.as_secs_f64()) as usize;

	info!("Perf test completed successfully!")?;
	info!(
		"total_messages=[{}],elapsed_time=[{:.2}s]",
		messages.to_formatted_string(&Locale::en),
		elapsed.as_secs_f64()
	)?;
	info!(
		"messages_per_second=[{}]",
		mps.to_formatted_string(&Locale::en)
	)?;
	info_plain!("{}", SPACER)?;

	Ok(())
}

fn main() -> Result<(), Error> {
	log_init!(DisplayLineNum(false))?;

	let yml = load_yaml!("echo_perf.yml");
	let args = App::from_yaml(yml).get_matches();

	let is_server = args.is_present("eventhandler");
	let is_client = args.is_present("client");

	if !is_server && !is_client {
		error!("either --eventhandler or --client must be specified")?;
		exit(1);
	}

	if is_server && is_client {
		error!("--eventhandler and --client cannot be combined")?;
		exit(1);
	}

	if is_server {
		run_eventhandler(&args)?;
	} else {
		run_client(&args)?;
	}

	Ok(())
}
