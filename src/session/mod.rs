//! The [`Composer`](composer::Composer) service: slideshow rendering, thumbnails, duration
//! reporting and clip merging on top of an injectable process runner.

pub mod composer;
pub mod merge;
pub mod thumbnail;
