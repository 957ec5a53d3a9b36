//! Background thread pool for async work.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use async_executor::{Executor, Task};

/// A thread pool for executing async tasks.
///
/// ```
/// use inkstroke_assets::TaskPool;
///
/// let pool = TaskPool::new(2).unwrap();
/// let task = pool.spawn(async { 42 });
/// assert_eq!(pollster::block_on(task), 42);
/// ```
pub struct TaskPool {
    executor: Arc<Executor<'static>>,
    threads: Vec<thread::JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

impl TaskPool {
    /// Create a new task pool with the specified number of threads.
    ///
    /// # Panics
    ///
    /// Panics if num_threads is 0.
    pub fn new(num_threads: usize) -> std::io::Result<Self> {
        assert!(num_threads > 0, "TaskPool must have at least one thread");

        let executor = Arc::new(Executor::new());
        let shutdown = Arc::new(AtomicBool::new(false));
        let mut threads = Vec::with_capacity(num_threads);

        for i in 0..num_threads {
            let exec = executor.clone();
            let shutdown_flag = shutdown.clone();

            let handle = thread::Builder::new()
                .name(format!("inkstroke-task-{}", i))
                .spawn(move || {
                    while !shutdown_flag.load(Ordering::Relaxed) {
                        if !exec.try_tick() {
                            thread::sleep(Duration::from_millis(1));
                        }
                    }
                })?;

            threads.push(handle);
        }

        tracing::debug!("TaskPool created with {} threads", num_threads);

        Ok(Self {
            executor,
            threads,
            shutdown,
        })
    }

    /// Uses max(1, num_cpus - 1) threads to leave one core for the main thread.
    pub fn default_threads() -> std::io::Result<Self> {
        let num_threads = num_cpus::get().saturating_sub(1).max(1);
        Self::new(num_threads)
    }

    pub fn spawn<T>(&self, future: impl Future<Output = T> + Send + 'static) -> Task<T>
    where
        T: Send + 'static,
    {
        self.executor.spawn(future)
    }

    pub fn thread_count(&self) -> usize {
        self.threads.len()
    }

    /// Stop the workers and wait for them to exit.
    ///
    /// Tasks not yet started are dropped.
    pub fn shutdown(mut self) {
        tracing::debug!("Shutting down TaskPool with {} threads", self.threads.len());

        self.shutdown.store(true, Ordering::Relaxed);

        let threads = std::mem::take(&mut self.threads);
        for handle in threads {
            if let Err(e) = handle.join() {
                tracing::error!("Task pool thread panicked: {:?}", e);
            }
        }

        tracing::debug!("TaskPool shutdown complete");
    }
}

impl Drop for TaskPool {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}
