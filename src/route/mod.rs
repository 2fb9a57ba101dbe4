// src/route/mod.rs

//! Change routing.
//!
//! - [`relevance`] holds the string-level filters (build outputs, resource
//!   directory segments, source-set extraction).
//! - [`router`] resolves a relevant change to its owning module.

pub mod relevance;
pub mod router;

pub use relevance::{
    is_build_output, is_relevant_path, resource_anchor, resource_dir_names, source_set_of,
    BUILD_OUTPUT_SEGMENT, CANONICAL_RESOURCE_DIR,
};
pub use router::{outermost_per_base_dir, ChangeRouter};
