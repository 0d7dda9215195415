use std::future::Future;
use std::io;
use std::sync::Arc;
use std::thread::JoinHandle;
use tokio::runtime::{Builder, Runtime};
use tokio::sync::oneshot;

/// Owns the tokio runtime that pane initialization, debouncing and flushing run on.
///
/// A current-thread runtime only makes progress inside `block_on`, and the host loop never
/// blocks on it, so the fallback is driven from a dedicated thread until the runtime is dropped.
pub struct AsyncRuntime {
    runtime: Arc<Runtime>,
    driver: Option<Driver>,
}

struct Driver {
    stop: oneshot::Sender<()>,
    thread: JoinHandle<()>,
}

impl AsyncRuntime {
    pub fn new() -> io::Result<Self> {
        match Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("zdash-worker")
            .enable_all()
            .build()
        {
            Ok(runtime) => Ok(Self {
                runtime: Arc::new(runtime),
                driver: None,
            }),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    "Failed to create multi-thread tokio runtime, falling back to current-thread"
                );
                Self::driven(Builder::new_current_thread().enable_all().build()?)
            }
        }
    }

    /// Wraps a current-thread runtime and drives it on a `zdash-driver` thread.
    fn driven(runtime: Runtime) -> io::Result<Self> {
        let runtime = Arc::new(runtime);
        let (stop, stopped) = oneshot::channel::<()>();
        let driven = Arc::clone(&runtime);
        let thread = std::thread::Builder::new()
            .name("zdash-driver".to_string())
            .spawn(move || {
                driven.block_on(async {
                    let _ = stopped.await;
                });
            })?;
        Ok(Self {
            runtime,
            driver: Some(Driver { stop, thread }),
        })
    }

    pub fn tokio_handle(&self) -> tokio::runtime::Handle {
        self.runtime.handle().clone()
    }

    pub fn is_driven(&self) -> bool {
        self.driver.is_some()
    }

    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

impl Drop for AsyncRuntime {
    fn drop(&mut self) {
        if let Some(driver) = self.driver.take() {
            let _ = driver.stop.send(());
            if driver.thread.join().is_err() {
                tracing::warn!("runtime driver thread panicked");
            }
        }
    }
}
