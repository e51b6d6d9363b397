//! Core library for roam2md.
//!
//! Builds an in-memory index of org-roam notes from the org-roam database,
//! converts each note through an external converter, and rewrites `id:`
//! links into wikilinks that resolve in the markdown output tree.

#![deny(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod convert;
pub mod index;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
