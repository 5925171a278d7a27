use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::{FutureObj, join_all};
use futures::task::{Spawn, SpawnError};

/// Where the form engine and demo players put their timer tasks.
pub type SharedSpawner = Arc<dyn Spawn + Send + Sync>;

/// Runs spawned tasks on a gpui background executor.
#[derive(Clone)]
pub struct GpuiSpawner {
    executor: gpui::BackgroundExecutor,
}

impl GpuiSpawner {
    pub fn new(executor: gpui::BackgroundExecutor) -> Self {
        Self { executor }
    }

    pub fn shared(self) -> SharedSpawner {
        Arc::new(self)
    }
}

impl Spawn for GpuiSpawner {
    fn spawn_obj(&self, future: FutureObj<'static, ()>) -> Result<(), SpawnError> {
        self.executor.spawn(future).detach();
        Ok(())
    }
}

/// Holds spawned tasks until the host drives them with [`QueueSpawner::run_pending`].
///
/// Useful for hosts without a background executor and for deterministic tests.
#[derive(Clone, Default)]
pub struct QueueSpawner {
    queue: Arc<Mutex<Vec<FutureObj<'static, ()>>>>,
}

impl QueueSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(&self) -> SharedSpawner {
        Arc::new(self.clone())
    }

    pub fn pending(&self) -> usize {
        lock_queue(&self.queue).len()
    }

    /// Runs every queued task to completion, including tasks queued while
    /// running.
    pub async fn run_pending(&self) {
        loop {
            let tasks = std::mem::take(&mut *lock_queue(&self.queue));
            if tasks.is_empty() {
                return;
            }
            join_all(tasks).await;
        }
    }
}

impl Spawn for QueueSpawner {
    fn spawn_obj(&self, future: FutureObj<'static, ()>) -> Result<(), SpawnError> {
        lock_queue(&self.queue).push(future);
        Ok(())
    }
}

fn lock_queue<T>(queue: &Mutex<T>) -> MutexGuard<'_, T> {
    match queue.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use futures::task::SpawnExt;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn queue_spawner_defers_until_driven() {
        let spawner = QueueSpawner::new();
        let ran = Arc::new(AtomicUsize::new(0));
        {
            let ran = ran.clone();
            spawner
                .spawn(async move {
                    ran.fetch_add(1, Ordering::SeqCst);
                })
                .expect("queue accepts task");
        }
        assert_eq!(spawner.pending(), 1);
        assert_eq!(ran.load(Ordering::SeqCst), 0);

        block_on(spawner.run_pending());
        assert_eq!(spawner.pending(), 0);
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn tasks_spawned_while_running_are_drained() {
        let spawner = QueueSpawner::new();
        let ran = Arc::new(AtomicUsize::new(0));
        {
            let inner = spawner.clone();
            let ran = ran.clone();
            spawner
                .spawn(async move {
                    let ran = ran.clone();
                    inner
                        .spawn(async move {
                            ran.fetch_add(1, Ordering::SeqCst);
                        })
                        .expect("nested spawn");
                })
                .expect("outer spawn");
        }
        block_on(spawner.run_pending());
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }
}
