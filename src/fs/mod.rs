//! In-memory filesystem tree.
//!
//! Directory nodes own their children through per-directory file and
//! subdirectory collections with joint name-uniqueness across both; children
//! keep weak back-references to their parent. The [`path`] helpers translate
//! path strings into nodes by walking [`Dir::find_dir`].

mod dir;
mod file;
pub mod path;

pub use dir::{Dir, EntryKind, FsError, SEPARATOR};
pub use file::File;
