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

/// Build a [`crate::Lock`] wrapping the specified value.
///
/// # Examples
///```
/// use np_err::*;
/// use np_util::*;
///
/// fn main() -> Result<(), Error> {
///     let mut v = lock!(10u32)?;
///     {
///         let mut guard = v.wlock()?;
///         **guard.guard() = 20;
///     }
///     assert_eq!(**(v.rlock()?.guard()), 20);
///     Ok(())
/// }
///```
#[macro_export]
macro_rules! lock {
	($value:expr) => {{
		np_util::UtilBuilder::build_lock($value)
	}};
}

/// The same as lock except that the value returned is in a `Box<dyn LockBox<T>>` structure.
/// See [`crate::LockBox`].
#[macro_export]
macro_rules! lock_box {
	($value:expr) => {{
		np_util::UtilBuilder::build_lock_box($value)
	}};
}

/// macro to call wlock and guard function on a [`crate::LockBox`] at the same time. Note that
/// this only allows a single access to the variable. If more than one operation needs to be
/// done, this macro should not be used.
#[macro_export]
macro_rules! wlock {
	($value:expr) => {
		**($value.wlock()?.guard())
	};
}

/// macro to call rlock and guard function on a [`crate::LockBox`] at the same time. Note that
/// this only allows a single access to the variable. If more than one operation needs to be
/// done, this macro should not be used.
#[macro_export]
macro_rules! rlock {
	($value:expr) => {
		**($value.rlock()?.guard())
	};
}
