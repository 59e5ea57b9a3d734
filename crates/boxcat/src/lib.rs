//! Background boxcat content synchronization.
//!
//! A [`Boxcat`] fetches a title's content archive from the boxcat service only when
//! the server has something newer than the staged copy, extracts it in memory, and
//! copies it into the directory the host resolves for that title. Completion is
//! reported through a [`CompletionQueue`] the host drains on its own thread, so
//! callbacks never race host-side state.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use boxcat::{BoxcatBuilder, BoxcatConfig, TitleVersion, completion_queue};
//! use boxcat_fs::{Directory, DiskDir};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BoxcatConfig::load(None)?;
//! let (sender, mut queue) = completion_queue();
//! let boxcat = BoxcatBuilder::new(config, |title_id: u64| {
//!     DiskDir::open(format!("/tmp/bcat-content/{title_id:016X}"))
//!         .ok()
//!         .map(|dir| dir as Arc<dyn Directory>)
//! })
//! .build(sender)?;
//!
//! boxcat.synchronize(TitleVersion::new(0x0100_0000_0000_1337, 1), |ok| {
//!     println!("synchronized: {ok}");
//! })?;
//!
//! // Later, on the host's own turn:
//! queue.drain();
//! # Ok(())
//! # }
//! ```

mod backend;
mod completion;
mod config;
mod directory;
mod display;
mod error;
pub mod runtime;
mod sync;

pub use backend::{Boxcat, BoxcatBuilder, Passphrase, SyncHandle};
pub use completion::{CompletionCallback, CompletionQueue, CompletionSender, completion_queue};
pub use config::BoxcatConfig;
pub use directory::{DirectoryGetter, DiskDirectoryGetter};
pub use display::{ERROR_TITLE, ErrorDisplay, LogErrorDisplay};
pub use error::{Error, Result, SyncError};

pub use boxcat_fetch::{
    DownloadResult, EventStatus, StatusReport, StatusResult, TitleVersion, format_id,
};
