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

// configuration defaults
pub(crate) const REACTOR_DEFAULT_WORKERS: usize = 4;
pub(crate) const REACTOR_DEFAULT_MAX_CLIENTS: usize = 1_024;
pub(crate) const REACTOR_DEFAULT_MAX_EVENTS: usize = 100;

// errno().0 values
pub(crate) const EAGAIN: i32 = 11;
pub(crate) const ETEMPUNAVAILABLE: i32 = 35;

// ioctl request number for SIOCATMARK on Linux (asm-generic/sockios.h); not
// exposed by the libc crate on this platform.
pub(crate) const SIOCATMARK: np_deps::libc::Ioctl = 0x8905;

// the cookie that identifies the shutdown control channel in a selector
pub(crate) const CONTROL_COOKIE: u64 = 0;

// the byte written through the control channel to start or relay a shutdown
pub(crate) const SHUTDOWN_TOKEN: u8 = '$' as u8;
