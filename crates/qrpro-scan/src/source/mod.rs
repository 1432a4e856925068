mod frames;
#[cfg(feature = "screen")]
mod screen;

pub use frames::FrameDirProvider;
#[cfg(feature = "screen")]
pub use screen::ScreenProvider;
