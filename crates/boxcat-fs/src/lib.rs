//! Virtual directory trees, recursive copy, and atomic staging writes.
//!
//! - [`Directory`] - handle to a directory, on disk ([`DiskDir`]) or in memory ([`MemoryDir`])
//! - [`copy_dir`] - structural copy between two handles
//! - [`atomic_write`] / [`atomic_read`] - whole-file staging I/O

mod atomic_write;
mod copy_dir;
mod dir;
mod disk;
mod error;
mod memory;

pub use atomic_write::{AtomicWriteOptions, atomic_read, atomic_write, remove_file_if_exists};
pub use copy_dir::copy_dir;
pub use dir::{Directory, validate_name};
pub use disk::DiskDir;
pub use error::{Error, Result};
pub use memory::MemoryDir;
