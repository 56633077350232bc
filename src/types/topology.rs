//! Narrow topology and frame interface consumed by the assignment engine.
//!
//! The engine does not parse structure files; callers hand it a residue
//! graph (ordered chains of named residues, each with per-atom indices
//! into a flat coordinate array) and one coordinate array per frame.

use glam::Vec3;

/// Standard amino acid residue names accepted for assignment, including
/// the common protein-like substitutions (selenomethionine etc.).
pub const STANDARD_AMINO_ACIDS: &[&str] = &[
    "ALA", "ARG", "ASN", "ASP", "CYS", "GLN", "GLU", "GLY", "HIS", "ILE", "LEU", "LYS", "MET",
    "PHE", "PRO", "SER", "THR", "TRP", "TYR", "VAL", // Non-standard but protein-like
    "MSE", "SEC", "PYL",
];

/// Whether a residue name is a recognized amino acid.
pub fn is_standard_amino_acid(name: &str) -> bool {
    STANDARD_AMINO_ACIDS.contains(&name.trim())
}

/// One named atom, pointing at its slot in a frame's coordinate array.
#[derive(Debug, Clone)]
pub struct TopologyAtom {
    pub name: String,
    pub index: usize,
}

/// One residue: name, author sequence number, and its atoms.
#[derive(Debug, Clone)]
pub struct Residue {
    pub name: String,
    pub seq: i32,
    pub atoms: Vec<TopologyAtom>,
}

impl Residue {
    /// Coordinate-array index of the named atom, if present.
    pub fn atom_index(&self, name: &str) -> Option<usize> {
        self.atoms
            .iter()
            .find(|a| a.name.trim() == name)
            .map(|a| a.index)
    }
}

/// One chain of residues in topology order.
#[derive(Debug, Clone)]
pub struct Chain {
    pub id: char,
    pub residues: Vec<Residue>,
}

/// The residue/atom graph for a structure. Residue order within a chain
/// is fixed; chains are concatenated in topology order everywhere the
/// engine reports per-residue results.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    pub chains: Vec<Chain>,
}

impl Topology {
    pub fn new(chains: Vec<Chain>) -> Topology {
        Topology { chains }
    }

    /// Total residue count across all chains.
    pub fn residue_count(&self) -> usize {
        self.chains.iter().map(|c| c.residues.len()).sum()
    }

    /// Total atom count across all chains.
    pub fn atom_count(&self) -> usize {
        self.chains
            .iter()
            .flat_map(|c| c.residues.iter())
            .map(|r| r.atoms.len())
            .sum()
    }

    /// Residues in topology order, paired with the ordinal of their chain.
    pub fn residues(&self) -> impl Iterator<Item = (usize, &Residue)> {
        self.chains
            .iter()
            .enumerate()
            .flat_map(|(ci, chain)| chain.residues.iter().map(move |r| (ci, r)))
    }
}

/// One frame's atomic coordinates, indexed consistently with the topology.
#[derive(Debug, Clone)]
pub struct Frame {
    pub positions: Vec<Vec3>,
}

impl Frame {
    pub fn new(positions: Vec<Vec3>) -> Frame {
        Frame { positions }
    }
}
