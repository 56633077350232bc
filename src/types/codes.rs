//! Per-residue secondary structure codes.
//!
//! The full DSSP alphabet plus `NA` for residues the engine cannot
//! classify (non-protein residues, incomplete backbones). The simplified
//! three-symbol alphabet is a pure post-processing collapse of the full
//! one and never feeds back into assignment.

use std::fmt;

/// One secondary structure assignment for a single residue in a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SsCode {
    /// `H` — alpha helix (4-turn).
    AlphaHelix,
    /// `G` — 3-10 helix (3-turn).
    Helix310,
    /// `I` — pi helix (5-turn).
    PiHelix,
    /// `E` — extended strand in a beta ladder.
    Strand,
    /// `B` — isolated beta bridge.
    BetaBridge,
    /// `T` — hydrogen-bonded turn.
    Turn,
    /// `S` — bend (high backbone curvature).
    Bend,
    /// `P` — polyproline-II helix (optional extension).
    Ppii,
    /// `C` — coil, the default when nothing else applies.
    Coil,
    /// `NA` — residue not eligible for assignment.
    NotAssigned,
}

impl SsCode {
    /// The DSSP code string (`"NA"` for unassignable residues).
    pub fn as_str(&self) -> &'static str {
        match self {
            SsCode::AlphaHelix => "H",
            SsCode::Helix310 => "G",
            SsCode::PiHelix => "I",
            SsCode::Strand => "E",
            SsCode::BetaBridge => "B",
            SsCode::Turn => "T",
            SsCode::Bend => "S",
            SsCode::Ppii => "P",
            SsCode::Coil => "C",
            SsCode::NotAssigned => "NA",
        }
    }

    /// Parse a single DSSP code character. `' '` is accepted as coil, the
    /// way DSSP output files leave unassigned positions blank.
    pub fn from_code(c: char) -> Option<SsCode> {
        match c.to_ascii_uppercase() {
            'H' => Some(SsCode::AlphaHelix),
            'G' => Some(SsCode::Helix310),
            'I' => Some(SsCode::PiHelix),
            'E' => Some(SsCode::Strand),
            'B' => Some(SsCode::BetaBridge),
            'T' => Some(SsCode::Turn),
            'S' => Some(SsCode::Bend),
            'P' => Some(SsCode::Ppii),
            'C' | ' ' | '~' => Some(SsCode::Coil),
            _ => None,
        }
    }

    /// Collapse to the simplified three-symbol alphabet:
    /// helices to `H`, strand/bridge to `E`, `NA` stays `NA`, and
    /// everything else to `C`.
    pub fn simplify(self) -> SsCode {
        match self {
            SsCode::AlphaHelix | SsCode::Helix310 | SsCode::PiHelix => SsCode::AlphaHelix,
            SsCode::Strand | SsCode::BetaBridge => SsCode::Strand,
            SsCode::NotAssigned => SsCode::NotAssigned,
            _ => SsCode::Coil,
        }
    }
}

impl fmt::Display for SsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composition summary for one frame's assignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SsCounts {
    /// Residues assigned H, G or I.
    pub helix: usize,
    /// Residues assigned E or B.
    pub sheet: usize,
    /// Residues assigned T, S, P or C.
    pub coil: usize,
    /// Residues left as NA.
    pub not_assigned: usize,
}

impl SsCounts {
    /// Tally one frame's codes.
    pub fn from_codes(codes: &[SsCode]) -> SsCounts {
        let mut counts = SsCounts::default();
        for code in codes {
            match code.simplify() {
                SsCode::AlphaHelix => counts.helix += 1,
                SsCode::Strand => counts.sheet += 1,
                SsCode::NotAssigned => counts.not_assigned += 1,
                _ => counts.coil += 1,
            }
        }
        counts
    }

    /// Number of residues that received a real assignment.
    pub fn assigned(&self) -> usize {
        self.helix + self.sheet + self.coil
    }

    /// Fraction of assigned residues in helix, 0.0 for empty frames.
    pub fn helix_fraction(&self) -> f32 {
        if self.assigned() == 0 {
            return 0.0;
        }
        self.helix as f32 / self.assigned() as f32
    }

    /// Fraction of assigned residues in sheet, 0.0 for empty frames.
    pub fn sheet_fraction(&self) -> f32 {
        if self.assigned() == 0 {
            return 0.0;
        }
        self.sheet as f32 / self.assigned() as f32
    }
}
