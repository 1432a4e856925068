pub mod browser;
pub mod clipboard;
pub mod export;
pub mod share;

pub use browser::{is_openable, open_url};
pub use clipboard::{ClipboardProvider, MemoryClipboard, SystemClipboard};
pub use export::{download_png, export_file_name};
pub use share::{ShareError, share_png};
