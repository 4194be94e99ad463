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
use crate::types::LockImpl;
use crate::{AtomicStack, Lock, LockBox, StackBackend, StackNode, UtilBuilder};
use np_err::Error;
use std::mem::size_of;

impl UtilBuilder {
	/// Build a [`crate::Lock`] wrapping the specified value.
	pub fn build_lock<T>(t: T) -> Result<impl Lock<T>, Error>
	where
		T: Send + Sync + 'static,
	{
		Ok(LockImpl::new(t))
	}

	/// The same as [`crate::UtilBuilder::build_lock`] except that the value returned is in a
	/// `Box<dyn LockBox<T>>` structure.
	pub fn build_lock_box<T>(t: T) -> Result<Box<dyn LockBox<T>>, Error>
	where
		T: Send + Sync + 'static,
	{
		Ok(Box::new(LockImpl::new(t)))
	}

	/// Build an [`crate::AtomicStack`] with at least `capacity_hint` nodes, each initialized
	/// to a clone of `default`. The backing buffer is an anonymous mapping for large
	/// capacities and a heap allocation for small ones.
	pub fn build_atomic_stack<T>(capacity_hint: usize, default: &T) -> Result<AtomicStack<T>, Error>
	where
		T: Clone,
	{
		let backend = if capacity_hint * size_of::<StackNode<T>>() >= PAGE_MAP_THRESHOLD_BYTES {
			StackBackend::PageMap
		} else {
			StackBackend::Heap
		};
		AtomicStack::new(capacity_hint, default, backend)
	}

	/// The same as [`crate::UtilBuilder::build_atomic_stack`] with an explicitly chosen
	/// [`crate::StackBackend`].
	pub fn build_atomic_stack_with_backend<T>(
		capacity_hint: usize,
		default: &T,
		backend: StackBackend,
	) -> Result<AtomicStack<T>, Error>
	where
		T: Clone,
	{
		AtomicStack::new(capacity_hint, default, backend)
	}
}
