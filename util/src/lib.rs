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

//! # The Netpool Util crate
//! This crate implements the data structures used by the other crates in the netpool repo.
//! The most notable is the [`crate::AtomicStack`], a lock-free LIFO stack of preallocated
//! nodes which the reactor crate uses as the free-list of connection slots. The stack's
//! backing buffer is allocated up front, either as an anonymous memory mapping or on the
//! heap, and node addresses remain stable for the lifetime of the stack.
//!
//! # Examples
//!
//!```
//! use np_err::*;
//! use np_util::*;
//!
//! fn main() -> Result<(), Error> {
//!     // build a stack with at least 10 slots. The actual capacity is expanded so that
//!     // the backing buffer is a whole number of OS pages.
//!     let stack: AtomicStack<u64> = UtilBuilder::build_atomic_stack(10, &0u64)?;
//!     assert!(stack.capacity() >= 10);
//!
//!     // rent a node, update it and return it
//!     let node = stack.pop().unwrap();
//!     unsafe {
//!         (*node).value = 1234;
//!         stack.push(node);
//!     }
//!
//!     Ok(())
//! }
//!```

mod builder;
mod constants;
mod lock;
mod macros;
mod mem;
mod stack;
mod test;
mod types;

pub use crate::stack::{AtomicStack, StackBackend, StackNode};
pub use crate::types::{
	Lock, LockBox, RwLockReadGuardWrapper, RwLockWriteGuardWrapper, UtilBuilder,
};
