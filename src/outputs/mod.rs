//! Output generation.
//!
//! # Submodules
//!
//! - [`rss`]: Renders harvested articles as an RSS 2.0 document and writes it to disk
//!
//! Each run overwrites the output file; nothing is merged with earlier runs.

pub mod rss;
