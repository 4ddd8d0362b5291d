pub mod walker;

pub use walker::{Enumeration, FolderWalker};
