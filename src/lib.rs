// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Decoder for flat binary molecular-dynamics trajectory payloads.
//!
//! A trajectory API serves coordinates as a bare `f32` stream. This crate
//! turns that stream into per-frame coordinate buffers aligned to the full
//! system topology, ready to hand to a 3D viewer. PCA projection payloads,
//! which carry only a backbone or heavy-atom subset, are spread back onto
//! their topology slots with every other atom left at the origin.
//!
//! # Key entry points
//!
//! - [`decoder::TrajectoryDecoder`] - the decoder, configured by
//!   [`options::DecodeOptions`]
//! - [`decoder::decode`] - one-shot decode with default options
//! - [`topology::Topology`] - atom records, loaded from PDB/mmCIF files
//! - [`payload::payload_from_bytes`] - raw response bytes to `f32`
//!
//! # Example
//!
//! ```
//! use trajframe::{decode, Atom, FrameMode, Topology};
//!
//! let topology = Topology::new(vec![
//!     Atom::new("N", "N", true),
//!     Atom::new("CA", "C", true),
//! ]);
//! let payload: Vec<f32> = (0..12).map(|v| v as f32).collect();
//! let traj = decode(Some(&topology), Some(payload.as_slice()), 2, FrameMode::Frames(2))?
//!     .expect("both inputs present");
//! assert_eq!(traj.frames()[1].as_slice(), [6.0, 7.0, 8.0, 9.0, 10.0, 11.0]);
//! # Ok::<(), trajframe::DecodeError>(())
//! ```

pub mod decoder;
pub mod error;
pub mod options;
pub mod payload;
pub mod scheme;
pub mod topology;
pub mod trajectory;
#[cfg(feature = "web")]
pub mod web;

pub use decoder::{decode, TrajectoryDecoder};
pub use error::DecodeError;
pub use options::{DecodeOptions, SchemeChoice};
pub use payload::payload_from_bytes;
pub use scheme::{SchemeDiagnostic, SelectionScheme};
pub use topology::{Atom, Topology};
pub use trajectory::{DecodedTrajectory, Frame, FrameMode};
