//! The shared worker pool synchronization tasks run on when the host supplies none.

use once_cell::sync::Lazy;
use tokio::runtime::{Handle, Runtime};

pub const WORKER_THREADS: usize = 4;

pub static POOL: Lazy<Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(WORKER_THREADS)
        .thread_name("boxcat-sync")
        .enable_all()
        .build()
        .expect("failed to build the boxcat worker pool")
});

pub fn handle() -> Handle { POOL.handle().clone() }
