use std::future::Future;

use async_executor::Task;
use futures_lite::future;

use crate::{AssetError, AssetResult, TaskPool};

enum TaskState<T> {
    Pending(Task<AssetResult<T>>),
    Taken,
}

/// A single asset load running on a [`TaskPool`].
///
/// The owner polls it once per frame; the result is handed out exactly once.
pub struct AssetTask<T> {
    label: String,
    state: TaskState<T>,
}

impl<T: Send + 'static> AssetTask<T> {
    pub fn spawn(
        pool: &TaskPool,
        label: impl Into<String>,
        load: impl Future<Output = AssetResult<T>> + Send + 'static,
    ) -> Self {
        let label = label.into();
        tracing::debug!("Loading {}", label);
        Self {
            label,
            state: TaskState::Pending(pool.spawn(load)),
        }
    }
}

impl<T> AssetTask<T> {
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Check for completion without blocking.
    ///
    /// Returns `Some` exactly once, on the first poll after the load finished.
    pub fn poll(&mut self) -> Option<AssetResult<T>> {
        let TaskState::Pending(task) = &mut self.state else {
            return None;
        };

        if !task.is_finished() {
            return None;
        }

        let result = future::block_on(future::poll_once(task))?;
        self.state = TaskState::Taken;
        Some(result)
    }

    /// Block until the load finishes.
    pub fn wait(self) -> AssetResult<T> {
        match self.state {
            TaskState::Pending(task) => future::block_on(task),
            TaskState::Taken => Err(AssetError::Cancelled),
        }
    }

    /// Whether the result has been handed out by [`poll`](Self::poll).
    pub fn is_taken(&self) -> bool {
        matches!(self.state, TaskState::Taken)
    }
}
