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

use np_deps::libc::{
	self, c_void, MAP_ANONYMOUS, MAP_FAILED, MAP_PRIVATE, PROT_READ, PROT_WRITE,
};
use np_err::*;
use std::alloc::{alloc_zeroed, dealloc, Layout};
use std::mem::size_of;
use std::ptr::null_mut;

pub(crate) fn page_size() -> usize {
	unsafe { libc::sysconf(libc::_SC_PAGESIZE) as usize }
}

fn gcd(mut a: usize, mut b: usize) -> usize {
	while b != 0 {
		let t = b;
		b = a % b;
		a = t;
	}
	a
}

// Expand `count` to the smallest value >= count such that count * unit_size is a whole
// multiple of the OS page size.
pub(crate) fn round_to_page_multiple(count: usize, unit_size: usize) -> usize {
	let page = page_size();
	let quantum = page / gcd(page, unit_size);
	match count % quantum {
		0 => count,
		rem => count + quantum - rem,
	}
}

// Allocate a zeroed buffer of at least `*count` units of T as an anonymous private mapping.
// `count` is expanded up to the page size border.
pub(crate) fn map_buffer<T>(count: &mut usize) -> Result<*mut T, Error> {
	if *count == 0 {
		return Err(err!(ErrKind::IllegalArgument, "count must not be zero"));
	}

	*count = round_to_page_multiple(*count, size_of::<T>());
	let size = *count * size_of::<T>();

	let ptr = unsafe {
		libc::mmap(
			null_mut(),
			size,
			PROT_READ | PROT_WRITE,
			MAP_PRIVATE | MAP_ANONYMOUS,
			-1,
			0,
		)
	};

	if ptr == MAP_FAILED {
		Err(err!(ErrKind::Alloc, "mmap failed for {} bytes", size))
	} else {
		Ok(ptr as *mut T)
	}
}

// Release a buffer previously returned by [`map_buffer`].
pub(crate) fn unmap_buffer<T>(ptr: *mut T, count: usize) {
	let size = count * size_of::<T>();
	unsafe {
		libc::munmap(ptr as *mut c_void, size);
	}
}

// Allocate a zeroed buffer of at least `*count` units of T on the heap. `count` is expanded
// up to the page size border so both backends report the same capacities.
pub(crate) fn heap_buffer<T>(count: &mut usize) -> Result<*mut T, Error> {
	if *count == 0 {
		return Err(err!(ErrKind::IllegalArgument, "count must not be zero"));
	}

	*count = round_to_page_multiple(*count, size_of::<T>());
	let layout = Layout::array::<T>(*count)?;
	let ptr = unsafe { alloc_zeroed(layout) };

	if ptr.is_null() {
		Err(err!(ErrKind::Alloc, "alloc failed for {} bytes", layout.size()))
	} else {
		Ok(ptr as *mut T)
	}
}

// Release a buffer previously returned by [`heap_buffer`].
pub(crate) fn free_heap_buffer<T>(ptr: *mut T, count: usize) {
	// unwrap ok because the identical layout was computed on allocation
	let layout = Layout::array::<T>(count).unwrap();
	unsafe {
		dealloc(ptr as *mut u8, layout);
	}
}
