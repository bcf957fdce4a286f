//! Worker pool for blocking work (password hashing), with a high and a normal
//! priority queue.

use flume::{Receiver, Sender};
use futures::channel::oneshot;
use std::{sync::Arc, thread};

use crate::prelude::*;

type Job = Box<dyn FnOnce() + Send>;
type JobQueue = Arc<Receiver<Job>>;

#[derive(Debug)]
pub struct WorkerPool {
	high: Sender<Job>,
	normal: Sender<Job>,
}

impl WorkerPool {
	/// `n_high` threads serve only the high queue, `n_normal` threads serve both.
	pub fn new(n_high: usize, n_normal: usize) -> Self {
		let (high, rx_high) = flume::unbounded();
		let (normal, rx_normal) = flume::unbounded();

		let rx_high = Arc::new(rx_high);
		let rx_normal = Arc::new(rx_normal);

		for _ in 0..n_high {
			let rx_high = Arc::clone(&rx_high);
			thread::spawn(move || worker_loop(&[rx_high]));
		}

		for _ in 0..n_normal {
			let rx_high = Arc::clone(&rx_high);
			let rx_normal = Arc::clone(&rx_normal);
			thread::spawn(move || worker_loop(&[rx_high, rx_normal]));
		}

		Self { high, normal }
	}

	fn submit<F, T>(queue: &Sender<Job>, f: F) -> impl Future<Output = ClResult<T>> + use<F, T>
	where
		F: FnOnce() -> T + Send + 'static,
		T: Send + 'static,
	{
		let (res_tx, res_rx) = oneshot::channel();

		let job = Box::new(move || {
			let _ignore = res_tx.send(f());
		});

		if queue.send(job).is_err() {
			error!("Failed to send job to worker queue");
		}

		async move {
			res_rx.await.map_err(|_| {
				error!("Worker dropped result channel (task may have panicked)");
				Error::Internal("worker task failed".into())
			})
		}
	}

	pub fn run<F, T>(&self, f: F) -> impl Future<Output = ClResult<T>> + use<F, T>
	where
		F: FnOnce() -> T + Send + 'static,
		T: Send + 'static,
	{
		Self::submit(&self.normal, f)
	}

	/// Like `run`, but flattens `ClResult<ClResult<T>>` into `ClResult<T>`.
	pub fn try_run<F, T>(&self, f: F) -> impl Future<Output = ClResult<T>> + use<F, T>
	where
		F: FnOnce() -> ClResult<T> + Send + 'static,
		T: Send + 'static,
	{
		let fut = self.run(f);
		async move { fut.await? }
	}

	pub fn run_immed<F, T>(&self, f: F) -> impl Future<Output = ClResult<T>> + use<F, T>
	where
		F: FnOnce() -> T + Send + 'static,
		T: Send + 'static,
	{
		Self::submit(&self.high, f)
	}

	/// Like `run_immed`, but flattens `ClResult<ClResult<T>>` into `ClResult<T>`.
	pub fn try_run_immed<F, T>(&self, f: F) -> impl Future<Output = ClResult<T>> + use<F, T>
	where
		F: FnOnce() -> ClResult<T> + Send + 'static,
		T: Send + 'static,
	{
		let fut = self.run_immed(f);
		async move { fut.await? }
	}
}

fn worker_loop(queues: &[JobQueue]) {
	loop {
		// Higher priority queues first (non-blocking)
		let mut job = None;
		for rx in queues {
			if let Ok(j) = rx.try_recv() {
				job = Some(j);
				break;
			}
		}

		let job = match job {
			Some(job) => job,
			None => {
				let mut selector = flume::Selector::new();
				for rx in queues {
					selector = selector.recv(rx, |res| res);
				}
				let job: Result<Job, flume::RecvError> = selector.wait();
				match job {
					Ok(job) => job,
					// every sender is gone, the pool was dropped
					Err(_) => return,
				}
			}
		};

		if let Err(e) = std::panic::catch_unwind(std::panic::AssertUnwindSafe(job)) {
			error!("Worker thread caught panic: {:?}", e);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_run_returns_result() {
		let pool = WorkerPool::new(1, 1);
		let res = pool.run(|| 2 + 2).await.unwrap();
		assert_eq!(res, 4);
		let res = pool.run_immed(|| "hi".to_string()).await.unwrap();
		assert_eq!(res, "hi");
	}

	#[tokio::test]
	async fn test_try_run_immed_flattens() {
		let pool = WorkerPool::new(1, 0);
		let res: ClResult<u32> = pool.try_run_immed(|| Err(Error::Parse)).await;
		assert!(matches!(res, Err(Error::Parse)));
	}

	#[tokio::test]
	async fn test_try_run_flattens() {
		let pool = WorkerPool::new(0, 1);
		let res: ClResult<u32> = pool.try_run(|| Err(Error::Parse)).await;
		assert!(matches!(res, Err(Error::Parse)));
		assert_eq!(pool.try_run(|| Ok(7)).await.unwrap(), 7);
	}
}

// vim: ts=4
