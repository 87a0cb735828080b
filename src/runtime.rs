//! Task spawning bound to an owner's lifetime
//!
//! Views own the handles of the tasks they start. Dropping a handle aborts
//! the task, so a view that goes away never receives a late result.

use crate::{MapError, Result};
use futures::Future;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Handle to a spawned task; aborts the task when dropped
#[derive(Debug)]
pub struct TaskHandle {
    inner: Option<JoinHandle<()>>,
}

impl TaskHandle {
    /// Check if the task is finished
    pub fn is_finished(&self) -> bool {
        self.inner.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Cancel the task
    pub fn cancel(&mut self) {
        if let Some(handle) = self.inner.take() {
            if !handle.is_finished() {
                log::debug!("cancelling in-flight task");
            }
            handle.abort();
        }
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Spawns `future` on the current tokio runtime.
///
/// Fails when called outside a runtime context.
pub fn spawn<F>(future: F) -> Result<TaskHandle>
where
    F: Future<Output = ()> + Send + 'static,
{
    let handle = Handle::try_current()
        .map_err(|e| MapError::Runtime(format!("no async runtime available: {}", e)))?;
    Ok(TaskHandle {
        inner: Some(handle.spawn(future)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_spawn_outside_runtime_fails() {
        assert!(matches!(spawn(async {}), Err(MapError::Runtime(_))));
    }

    #[tokio::test]
    async fn test_drop_aborts_task() {
        let ran_to_end = Arc::new(AtomicBool::new(false));
        let flag = ran_to_end.clone();

        let handle = spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(200)).await;
            flag.store(true, Ordering::SeqCst);
        })
        .unwrap();
        drop(handle);

        tokio::time::sleep(std::time::Duration::from_millis(400)).await;
        assert!(!ran_to_end.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_finished_task_reports_finished() {
        let handle = spawn(async {}).unwrap();
        for _ in 0..100 {
            if handle.is_finished() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(handle.is_finished());
    }
}
