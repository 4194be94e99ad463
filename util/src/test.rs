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
	use crate as np_util;
	use crate::mem::{page_size, round_to_page_multiple};
	use crate::{AtomicStack, Lock, LockBox, StackBackend, StackNode, UtilBuilder};
	use np_err::*;
	use np_util::{lock, lock_box, rlock, wlock};
	use std::mem::size_of;
	use std::sync::Arc;
	use std::thread::spawn;

	#[test]
	fn test_round_to_page_multiple() -> Result<(), Error> {
		let page = page_size();

		// count * unit is always a whole multiple of the page size and never shrinks
		for unit in [1, 8, 24, 4104, 4112] {
			for count in [1, 2, 100, 1_000] {
				let rounded = round_to_page_multiple(count, unit);
				assert!(rounded >= count);
				assert_eq!((rounded * unit) % page, 0);
			}
		}

		// already aligned counts are unchanged
		assert_eq!(round_to_page_multiple(page, 1), page);
		Ok(())
	}

	#[test]
	fn test_stack_basic() -> Result<(), Error> {
		let stack: AtomicStack<u64> = UtilBuilder::build_atomic_stack(10, &0u64)?;

		// capacity is expanded to the page size border
		assert!(stack.capacity() >= 10);
		assert_eq!(
			(stack.capacity() * size_of::<StackNode<u64>>()) % page_size(),
			0
		);
		assert_eq!(stack.len(), stack.capacity());

		// the first pop returns the highest-indexed node
		let node = stack.pop().unwrap();
		assert_eq!(node as usize, unsafe {
			stack.data().add(stack.capacity() - 1) as usize
		});

		// nodes are zero initialized
		unsafe {
			assert_eq!((*node).value, 0);
			(*node).value = 42;
			stack.push(node);
		}

		// LIFO: the node we just pushed comes back first
		let node2 = stack.pop().unwrap();
		assert_eq!(node2 as usize, node as usize);
		unsafe {
			assert_eq!((*node2).value, 42);
			stack.push(node2);
		}

		Ok(())
	}

	#[test]
	fn test_stack_exhaustion() -> Result<(), Error> {
		let stack: AtomicStack<u8> =
			UtilBuilder::build_atomic_stack_with_backend(1, &0u8, StackBackend::Heap)?;
		let capacity = stack.capacity();

		let mut nodes = vec![];
		for _ in 0..capacity {
			nodes.push(stack.pop().unwrap());
		}

		// stack is empty now
		assert!(stack.pop().is_none());
		assert_eq!(stack.len(), 0);

		// every node returns and the full capacity is available again
		for node in nodes {
			unsafe {
				stack.push(node);
			}
		}
		assert_eq!(stack.len(), capacity);

		Ok(())
	}

	#[test]
	fn test_stack_backends_match() -> Result<(), Error> {
		let heap: AtomicStack<[u8; 100]> =
			UtilBuilder::build_atomic_stack_with_backend(77, &[0u8; 100], StackBackend::Heap)?;
		let map: AtomicStack<[u8; 100]> =
			UtilBuilder::build_atomic_stack_with_backend(77, &[0u8; 100], StackBackend::PageMap)?;
		assert_eq!(heap.capacity(), map.capacity());
		Ok(())
	}

	#[test]
	fn test_stack_zero_capacity() -> Result<(), Error> {
		assert!(UtilBuilder::build_atomic_stack::<u64>(0, &0u64).is_err());
		Ok(())
	}

	#[test]
	fn test_stack_concurrent() -> Result<(), Error> {
		let stack: Arc<AtomicStack<u64>> = Arc::new(UtilBuilder::build_atomic_stack(100, &0u64)?);
		let capacity = stack.capacity();

		// several threads rent and return nodes repeatedly
		let mut jhs = vec![];
		for _ in 0..4 {
			let stack = stack.clone();
			jhs.push(spawn(move || {
				for _ in 0..10_000 {
					match stack.pop() {
						Some(node) => unsafe {
							(*node).value += 1;
							stack.push(node);
						},
						None => {}
					}
				}
			}));
		}

		for jh in jhs {
			assert!(jh.join().is_ok());
		}

		// every node is back on the free list
		assert_eq!(stack.len(), capacity);

		Ok(())
	}

	#[test]
	fn test_lock() -> Result<(), Error> {
		let mut v = lock!(10u32)?;
		{
			let mut guard = v.wlock()?;
			**guard.guard() = 20;
		}
		assert_eq!(**(v.rlock()?.guard()), 20);
		Ok(())
	}

	#[test]
	fn test_lock_box() -> Result<(), Error> {
		let mut v = lock_box!(0usize)?;
		let v_clone = v.clone();
		wlock!(v) = 101;
		assert_eq!(rlock!(v_clone), 101);
		Ok(())
	}

	#[test]
	fn test_lock_would_deadlock() -> Result<(), Error> {
		let mut v = lock_box!(0u64)?;
		{
			let _guard = v.rlock()?;
			// a second lock on the same id in the same thread is rejected
			let mut v2 = v.clone();
			assert!(v2.wlock().is_err());
		}
		// after the guard drops, locking works again
		assert!(v.wlock().is_ok());
		Ok(())
	}
}
