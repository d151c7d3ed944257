//! FlowSim: cycle-accurate simulation of latency-insensitive valid-ready dataflow.

// # Tries to deny all lints (`rustc -W help`).
#![deny(absolute_paths_not_starting_with_crate)]
#![deny(anonymous_parameters)]
#![deny(deprecated_in_future)]
#![deny(explicit_outlives_requirements)]
#![deny(keyword_idents)]
#![deny(macro_use_extern_crate)]
#![deny(missing_debug_implementations)]
#![deny(non_ascii_idents)]
#![deny(rust_2018_idioms)]
#![deny(trivial_numeric_casts)]
#![deny(unsafe_op_in_unsafe_fn)]
#![deny(unused_extern_crates)]
#![deny(unused_import_braces)]
#![deny(variant_size_differences)]
//
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(unreachable_pub)]

pub mod interface;
pub mod module;
pub mod signal;
pub mod sim;
pub mod utils;
pub mod valid_ready;

pub use interface::*;
pub use module::*;
pub use signal::*;
pub use sim::*;
pub use utils::*;
pub use valid_ready::*;
