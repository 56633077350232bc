//! Backbone extraction: per-frame residue records for the assignment passes.
//!
//! A residue is eligible iff it has a recognized amino-acid name and all of
//! N, CA, C, O at finite coordinates. Ineligible residues are dropped from
//! the working list (they emit `NA` in the final output) and the survivors
//! are kept in topology order, each remembering its original slot.

use glam::Vec3;

use crate::types::topology::{is_standard_amino_acid, Frame, Residue, Topology};

use super::DsspError;

/// Peptide-bond C(i)-N(i+1) distances beyond this mark a chain break.
const CHAIN_BREAK_DISTANCE: f32 = 2.5;

/// Backbone record for one eligible residue in one frame.
#[derive(Debug, Clone)]
pub(crate) struct BackboneResidue {
    /// Index of the residue in the flattened topology (for scatter-back).
    pub topo_index: usize,
    /// Ordinal of the owning chain.
    pub chain: usize,
    pub n: Vec3,
    pub ca: Vec3,
    pub c: Vec3,
    pub o: Vec3,
    /// Amide hydrogen; `None` means the residue never donates
    /// (proline, chain start, or residue after a break).
    pub h: Option<Vec3>,
    /// True when no peptide bond connects this residue to its predecessor
    /// in the working list (chain boundary, gap, or list start).
    pub break_before: bool,
}

/// True when no break interrupts the working-list stretch `[lo, hi]`.
pub(crate) fn no_chain_break(residues: &[BackboneResidue], lo: usize, hi: usize) -> bool {
    residues[lo + 1..=hi].iter().all(|r| !r.break_before)
}

fn finite(v: Vec3) -> bool {
    v.x.is_finite() && v.y.is_finite() && v.z.is_finite()
}

fn atom_position(
    residue: &Residue,
    name: &str,
    frame: &Frame,
) -> Result<Option<Vec3>, DsspError> {
    match residue.atom_index(name) {
        Some(index) => {
            let pos = frame
                .positions
                .get(index)
                .copied()
                .ok_or(DsspError::AtomIndexOutOfRange {
                    index,
                    len: frame.positions.len(),
                })?;
            Ok(Some(pos))
        }
        None => Ok(None),
    }
}

/// Extract the eligible backbone residues of one frame.
///
/// Returns the compact working list; skipped topology residues simply
/// have no record and stay NA. Missing or degenerate atoms make a
/// residue NA; a bad atom *index* is a malformed topology and is
/// surfaced as an error instead.
pub(crate) fn extract_backbone(
    topology: &Topology,
    frame: &Frame,
) -> Result<Vec<BackboneResidue>, DsspError> {
    let mut residues: Vec<BackboneResidue> = Vec::new();
    let mut proline: Vec<bool> = Vec::new();

    for (topo_index, (chain, residue)) in topology.residues().enumerate() {
        if !is_standard_amino_acid(&residue.name) {
            continue;
        }

        let n = atom_position(residue, "N", frame)?;
        let ca = atom_position(residue, "CA", frame)?;
        let c = atom_position(residue, "C", frame)?;
        let o = atom_position(residue, "O", frame)?;
        let (n, ca, c, o) = match (n, ca, c, o) {
            (Some(n), Some(ca), Some(c), Some(o))
                if finite(n) && finite(ca) && finite(c) && finite(o) =>
            {
                (n, ca, c, o)
            }
            _ => continue,
        };

        // Explicit amide hydrogen if the topology carries one; the
        // geometric fallback is filled in below once neighbors are known.
        let h = atom_position(residue, "H", frame)?
            .or(atom_position(residue, "HN", frame)?)
            .or(atom_position(residue, "1H", frame)?)
            .filter(|&p| finite(p));

        proline.push(residue.name.trim() == "PRO");
        residues.push(BackboneResidue {
            topo_index,
            chain,
            n,
            ca,
            c,
            o,
            h,
            break_before: residues.is_empty(),
        });
    }

    // Chain breaks between consecutive eligible residues: chain boundary,
    // or a stretched/missing peptide bond (an NA residue between two kept
    // ones leaves a gap the distance check catches).
    for k in 1..residues.len() {
        let d = residues[k - 1].c.distance(residues[k].n);
        residues[k].break_before =
            residues[k].chain != residues[k - 1].chain || !d.is_finite() || d > CHAIN_BREAK_DISTANCE;
    }

    // Donation policy: N-terminal-like residues and prolines never donate.
    // Everyone else gets the explicit H, or one rebuilt 1 A from N opposite
    // the preceding carbonyl.
    for k in 0..residues.len() {
        if residues[k].break_before || proline[k] {
            residues[k].h = None;
            continue;
        }
        if residues[k].h.is_none() {
            let prev = &residues[k - 1];
            residues[k].h = (prev.c - prev.o)
                .try_normalize()
                .map(|dir| residues[k].n + dir);
        }
    }

    Ok(residues)
}
