//! The library code for the `chisel` static blog generator. A build can be
//! broken down into three steps:
//!
//! 1. Scanning entries from source files on disk ([`crate::scan`])
//! 2. Putting them in canonical order, newest first ([`crate::entry`])
//! 3. Running each build step against the ordered entries ([`crate::build`])
//!
//! The third step is where the pages get made. Most steps render one
//! template per output page and overwrite whatever was there before, but the
//! year and month archives ([`crate::archive`]) are incremental: a page that
//! already exists is kept as-is unless the build is forced.
//!
//! Besides the build, the binary exposes a couple of auxiliary commands
//! ([`crate::command`]): a local preview server ([`crate::serve`]) and a post
//! scaffolder ([`crate::new_post`]).

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod archive;
pub mod build;
pub mod command;
pub mod config;
pub mod entry;
pub mod feed;
pub mod markdown;
pub mod new_post;
pub mod scan;
pub mod serve;
pub mod steps;
pub mod template;
pub mod urls;
pub mod write;
