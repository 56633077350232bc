//! Per-frame DSSP secondary structure assignment from backbone coordinates.
//!
//! Callers supply a residue/atom topology once plus one coordinate array
//! per trajectory frame; the crate returns a per-frame, per-residue grid
//! of DSSP codes (full alphabet or the simplified H/E/C collapse).

pub mod dssp;
pub mod geometry;
pub mod types;

pub use dssp::{
    compute_secondary_structure, compute_secondary_structure_with, DsspError, DsspOptions,
};
pub use types::{Chain, Frame, Residue, SsCode, SsCounts, Topology, TopologyAtom};
