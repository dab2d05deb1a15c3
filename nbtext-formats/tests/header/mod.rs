//! Header tests
//!
//! Reading, migrating, rendering and version-checking the metadata found in
//! the header of text notebooks.

mod metadata;
mod render;
