use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use boxcat_fetch::{HttpClient, ReqwestClient, StatusReport, TitleVersion, format_id};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::completion::PendingCompletion;
use crate::sync::Shared;
use crate::{
    BoxcatConfig, CompletionCallback, CompletionSender, DirectoryGetter, Error, ErrorDisplay,
    LogErrorDisplay, Result, runtime,
};

/// Per-title content passphrase. Accepted for protocol compatibility only.
pub type Passphrase = [u8; 0x40];

pub struct BoxcatBuilder<C> {
    client:      C,
    config:      BoxcatConfig,
    directories: Box<dyn DirectoryGetter>,
    display:     Box<dyn ErrorDisplay>,
    runtime:     Option<Handle>,
}

impl BoxcatBuilder<ReqwestClient> {
    pub fn new(config: BoxcatConfig, directories: impl DirectoryGetter + 'static) -> Self {
        Self {
            client: ReqwestClient::new(),
            config,
            directories: Box::new(directories),
            display: Box::new(LogErrorDisplay),
            runtime: None,
        }
    }
}

impl<C: HttpClient + Clone + 'static> BoxcatBuilder<C> {
    /// Swap the transport, e.g. for the `boxcat-fetch` mock client in tests.
    pub fn client<D: HttpClient + Clone + 'static>(self, client: D) -> BoxcatBuilder<D> {
        BoxcatBuilder {
            client,
            config: self.config,
            directories: self.directories,
            display: self.display,
            runtime: self.runtime,
        }
    }

    #[must_use]
    pub fn error_display(mut self, display: impl ErrorDisplay + 'static) -> Self {
        self.display = Box::new(display);
        self
    }

    /// Run tasks on the host's runtime instead of the shared [`runtime::POOL`].
    #[must_use]
    pub fn runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    pub fn build(self, completions: CompletionSender) -> Result<Boxcat<C>> {
        let endpoint = self.config.endpoint()?;
        Ok(Boxcat {
            shared: Arc::new(Shared {
                client: self.client,
                config: self.config,
                endpoint,
                directories: self.directories,
                display: self.display,
            }),
            runtime: self.runtime.unwrap_or_else(runtime::handle),
            in_flight: Arc::new(Mutex::new(HashSet::new())),
            completions,
        })
    }
}

type InFlight = Arc<Mutex<HashSet<u64>>>;

/// The boxcat backend.
///
/// Synchronizations run as tasks on a tokio runtime, at most one per title at a
/// time. Their outcomes arrive on the [`crate::CompletionQueue`] paired with the
/// sender given to [`BoxcatBuilder::build`].
pub struct Boxcat<C: HttpClient + Clone + 'static = ReqwestClient> {
    shared:      Arc<Shared<C>>,
    runtime:     Handle,
    in_flight:   InFlight,
    completions: CompletionSender,
}

impl<C: HttpClient + Clone + 'static> Boxcat<C> {
    /// Bring a title's content directory up to date with the server.
    ///
    /// Returns once the task is scheduled. `on_complete` runs, through the
    /// completion queue, exactly once with whether the sync succeeded.
    pub fn synchronize(
        &self,
        title: TitleVersion,
        on_complete: impl FnOnce(bool) + Send + 'static,
    ) -> Result<SyncHandle> {
        self.spawn_sync(title, None, Box::new(on_complete))
    }

    /// Like [`Boxcat::synchronize`], but only the named top-level subdirectory is
    /// copied. It must exist in both the archive and the content directory;
    /// siblings are left alone.
    pub fn synchronize_directory(
        &self,
        title: TitleVersion,
        name: impl Into<String>,
        on_complete: impl FnOnce(bool) + Send + 'static,
    ) -> Result<SyncHandle> {
        self.spawn_sync(title, Some(name.into()), Box::new(on_complete))
    }

    fn spawn_sync(
        &self,
        title: TitleVersion,
        scope: Option<String>,
        on_complete: CompletionCallback,
    ) -> Result<SyncHandle> {
        let guard = InFlightGuard::acquire(&self.in_flight, title.title_id)?;
        let pending = PendingCompletion::new(on_complete, self.completions.clone());
        let shared = Arc::clone(&self.shared);

        let task = self.runtime.spawn(async move {
            let _guard = guard;
            let success = match shared.synchronize(title, scope.as_deref()).await {
                Ok(()) => true,
                Err(e) => {
                    error!(title_id = %format_id(title.title_id), error = %e, "synchronization failed");
                    false
                }
            };
            pending.report(success);
            success
        });

        Ok(SyncHandle {
            title_id: title.title_id,
            task,
        })
    }

    pub fn is_syncing(&self, title_id: u64) -> bool {
        lock(&self.in_flight).contains(&title_id)
    }

    /// Delete every top-level subdirectory of the title's content directory.
    ///
    /// Stops at the first failed deletion; earlier deletions stay done.
    pub fn clear(&self, title_id: u64) -> Result<()> {
        if self.shared.config.local_only {
            info!(title_id = %format_id(title_id), "local-only mode, not clearing");
            return Ok(());
        }

        let dir = self
            .shared
            .directories
            .directory(title_id)
            .ok_or(Error::NoDirectory { title_id })?;

        for name in dir.subdirectory_names()? {
            dir.delete_subdirectory_recursive(&name)
                .map_err(|source| Error::Clear {
                    title_id,
                    name,
                    source,
                })?;
        }
        debug!(title_id = %format_id(title_id), "cleared content directory");
        Ok(())
    }

    pub async fn launch_parameter(&self, title: TitleVersion) -> Option<Vec<u8>> {
        self.shared.launch_parameter(title).await
    }

    /// Blocks on the backend's runtime. Must not be called from async context.
    pub fn launch_parameter_blocking(&self, title: TitleVersion) -> Option<Vec<u8>> {
        self.runtime.block_on(self.launch_parameter(title))
    }

    pub async fn status(&self) -> StatusReport { self.shared.status().await }

    /// Blocks on the backend's runtime. Must not be called from async context.
    pub fn status_blocking(&self) -> StatusReport { self.runtime.block_on(self.status()) }

    pub fn set_passphrase(&self, title_id: u64, passphrase: &Passphrase) {
        debug!(
            title_id = %format_id(title_id),
            passphrase = %hex::encode(passphrase),
            "passphrase set"
        );
    }

    pub fn config(&self) -> &BoxcatConfig { &self.shared.config }
}

/// A scheduled synchronization.
///
/// Aborting takes effect at the task's next suspension point, which is during
/// the download; once extraction has begun the task runs to the end. An aborted
/// sync still reports `false` through the completion queue.
#[derive(Debug)]
pub struct SyncHandle {
    title_id: u64,
    task:     JoinHandle<bool>,
}

impl SyncHandle {
    pub fn title_id(&self) -> u64 { self.title_id }

    pub fn is_finished(&self) -> bool { self.task.is_finished() }

    pub fn abort(&self) { self.task.abort() }

    /// Wait for the outcome. Aborted or panicked tasks count as failure.
    pub async fn wait(self) -> bool { self.task.await.unwrap_or(false) }
}

struct InFlightGuard {
    set:      InFlight,
    title_id: u64,
}

impl InFlightGuard {
    fn acquire(set: &InFlight, title_id: u64) -> Result<Self> {
        if !lock(set).insert(title_id) {
            return Err(Error::AlreadySyncing { title_id });
        }
        Ok(Self {
            set: Arc::clone(set),
            title_id,
        })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) { lock(&self.set).remove(&self.title_id); }
}

fn lock(set: &InFlight) -> std::sync::MutexGuard<'_, HashSet<u64>> {
    set.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
