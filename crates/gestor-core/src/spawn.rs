//! Fire-and-forget local tasks.
//!
//! Event handlers are synchronous, but some of them start asynchronous work
//! (navigation after a fragment change, logout after `user:logout`). In the
//! browser that work is handed to `wasm_bindgen_futures::spawn_local`. On
//! native targets tasks go to a thread-local queue that the host drains
//! with [`run_until_idle`].

use std::future::Future;

/// Spawns a `!Send` future on the current thread.
#[cfg(target_arch = "wasm32")]
pub fn spawn_local<F>(future: F)
where
	F: Future<Output = ()> + 'static,
{
	wasm_bindgen_futures::spawn_local(future);
}

#[cfg(not(target_arch = "wasm32"))]
mod queue {
	use std::cell::RefCell;
	use std::collections::VecDeque;

	use futures_util::future::LocalBoxFuture;

	thread_local! {
		pub(super) static TASKS: RefCell<VecDeque<LocalBoxFuture<'static, ()>>> =
			RefCell::new(VecDeque::new());
	}
}

/// Queues a `!Send` future on the current thread.
#[cfg(not(target_arch = "wasm32"))]
pub fn spawn_local<F>(future: F)
where
	F: Future<Output = ()> + 'static,
{
	use futures_util::FutureExt;

	queue::TASKS.with(|tasks| tasks.borrow_mut().push_back(future.boxed_local()));
}

/// Number of queued tasks that have not started yet.
#[cfg(not(target_arch = "wasm32"))]
pub fn pending_tasks() -> usize {
	queue::TASKS.with(|tasks| tasks.borrow().len())
}

/// Runs queued tasks one after another, including tasks queued while
/// draining, until the queue is empty. Returns how many tasks ran.
///
/// Tasks run to completion in FIFO order, which matches how the browser
/// serializes event handlers.
#[cfg(not(target_arch = "wasm32"))]
pub async fn run_until_idle() -> usize {
	let mut ran = 0;
	loop {
		let next = queue::TASKS.with(|tasks| tasks.borrow_mut().pop_front());
		match next {
			Some(task) => {
				task.await;
				ran += 1;
			}
			None => return ran,
		}
	}
}
