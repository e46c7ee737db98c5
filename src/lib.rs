//! imgtidy library crate
//!
//! Result model and workflow state for an image cleanup assistant: blurry
//! images, similar pairs and unreadable files found by a scan, the user's
//! selection over them, and the file operations that act on that selection.
//! Rendering is left to the front end.

pub mod aggregate;
pub mod app;
pub mod category;
pub mod confirm;
pub mod error;
pub mod fileops;
pub mod filter;
pub mod item;
pub mod logging;
pub mod notify;
pub mod preview;
pub mod results;
pub mod scan;
pub mod selection;
pub mod settings;
pub mod size;
pub mod store;
pub mod tour;
pub mod view;

pub use app::{CleanupApp, Collaborators, FolderPicker};
pub use category::Category;
pub use error::{CleanupError, Result};
pub use results::ResultSet;
