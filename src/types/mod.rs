//! Core data types for the traj-dssp crate.

pub mod codes;
pub mod topology;

// Re-export commonly used items
pub use codes::{SsCode, SsCounts};
pub use topology::{
    is_standard_amino_acid, Chain, Frame, Residue, Topology, TopologyAtom, STANDARD_AMINO_ACIDS,
};
