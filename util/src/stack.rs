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

use crate::mem::{free_heap_buffer, heap_buffer, map_buffer, unmap_buffer};
use np_err::*;
use np_log::*;
use std::ptr::{drop_in_place, null_mut, write};
use std::sync::atomic::{AtomicPtr, Ordering};

info!();

/// The backing allocation used by an [`crate::AtomicStack`]. `PageMap` maps an anonymous
/// private region. `Heap` uses the standard allocator. Both expand the requested capacity
/// up to the page size border so node addresses and capacities behave identically.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum StackBackend {
	PageMap,
	Heap,
}

/// A node in an [`crate::AtomicStack`]. Nodes live in a single preallocated buffer and
/// their addresses are stable for the lifetime of the stack, so they may be handed to
/// external systems as opaque cookies.
pub struct StackNode<T> {
	pub(crate) next: *mut StackNode<T>,
	pub value: T,
}

/// A lock-free LIFO stack threaded through preallocated [`crate::StackNode`] values. The
/// head pointer is updated only by single-word compare-and-swap. `push` and `pop` are O(1)
/// and never block.
///
/// A node that has been popped is exclusively owned by the popping thread until it is
/// pushed back. Pushing a node that is still reachable elsewhere is undefined behavior.
pub struct AtomicStack<T> {
	head: AtomicPtr<StackNode<T>>,
	buffer: *mut StackNode<T>,
	capacity: usize,
	backend: StackBackend,
}

unsafe impl<T> Send for AtomicStack<T> where T: Send {}
unsafe impl<T> Sync for AtomicStack<T> where T: Send {}

impl<T> AtomicStack<T> {
	pub(crate) fn new(capacity_hint: usize, default: &T, backend: StackBackend) -> Result<Self, Error>
	where
		T: Clone,
	{
		let mut capacity = capacity_hint;
		let buffer = match backend {
			StackBackend::PageMap => map_buffer::<StackNode<T>>(&mut capacity)?,
			StackBackend::Heap => heap_buffer::<StackNode<T>>(&mut capacity)?,
		};

		// build the free list in address order. The bottom node terminates the list and
		// the highest-indexed node becomes the head.
		unsafe {
			for i in 0..capacity {
				let node = buffer.add(i);
				write(&mut (*node).value, default.clone());
				(*node).next = match i {
					0 => null_mut(),
					_ => buffer.add(i - 1),
				};
			}
		}

		let head = AtomicPtr::new(unsafe { buffer.add(capacity - 1) });
		debug!("stack created, requested {}, capacity {}", capacity_hint, capacity)?;

		Ok(Self {
			head,
			buffer,
			capacity,
			backend,
		})
	}

	/// The actual capacity of this stack. This is at least the requested capacity hint,
	/// expanded up to the page size border.
	pub fn capacity(&self) -> usize {
		self.capacity
	}

	/// Raw pointer to the underlying node buffer. The buffer holds
	/// [`crate::AtomicStack::capacity`] nodes regardless of how many are currently on the
	/// stack.
	pub fn data(&self) -> *mut StackNode<T> {
		self.buffer
	}

	/// Pushes a node to the top of the stack.
	///
	/// # Safety
	/// `node` must have been obtained from this stack via [`crate::AtomicStack::pop`] or
	/// [`crate::AtomicStack::data`] and must not be reachable by any other thread.
	pub unsafe fn push(&self, node: *mut StackNode<T>) {
		unsafe {
			(*node).next = self.head.load(Ordering::Relaxed);
		}
		loop {
			let next = unsafe { (*node).next };
			match self
				.head
				.compare_exchange_weak(next, node, Ordering::Release, Ordering::Relaxed)
			{
				Ok(_) => break,
				Err(actual) => unsafe {
					(*node).next = actual;
				},
			}
		}
	}

	/// Pops a node from the top of the stack. Returns [`None`] when the stack is
	/// exhausted. The returned node is exclusively owned by the caller until it is pushed
	/// back.
	pub fn pop(&self) -> Option<*mut StackNode<T>> {
		let mut old = self.head.load(Ordering::Relaxed);
		while !old.is_null() {
			let next = unsafe { (*old).next };
			match self
				.head
				.compare_exchange_weak(old, next, Ordering::Release, Ordering::Relaxed)
			{
				Ok(_) => return Some(old),
				Err(actual) => old = actual,
			}
		}
		None
	}

	/// Number of nodes currently on the stack. Walks the list, so this is only meaningful
	/// when no other thread is mutating the stack. Used by tests.
	pub fn len(&self) -> usize {
		let mut count = 0;
		let mut cur = self.head.load(Ordering::Relaxed);
		while !cur.is_null() {
			count += 1;
			cur = unsafe { (*cur).next };
		}
		count
	}
}

impl<T> Drop for AtomicStack<T> {
	fn drop(&mut self) {
		unsafe {
			for i in 0..self.capacity {
				drop_in_place(&mut (*self.buffer.add(i)).value);
			}
		}
		match self.backend {
			StackBackend::PageMap => unmap_buffer(self.buffer, self.capacity),
			StackBackend::Heap => free_heap_buffer(self.buffer, self.capacity),
		}
		self.head.store(null_mut(), Ordering::Relaxed);
	}
}
