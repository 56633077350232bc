//! Per-residue code resolution.
//!
//! Pattern flags overlap; the final code is the first matching rule in a
//! fixed priority order, falling through to coil.

use crate::types::SsCode;

use super::pattern::{ResidueFlags, StrandKind};

/// Priority table, strongest first. Pi helices outrank alpha so that the
/// rare marked pi span survives the surrounding alpha flags.
const RULES: &[(fn(&ResidueFlags) -> bool, SsCode)] = &[
    (|f| f.helix_i, SsCode::PiHelix),
    (|f| f.helix_h, SsCode::AlphaHelix),
    (|f| f.helix_g, SsCode::Helix310),
    (|f| f.strand == Some(StrandKind::Ladder), SsCode::Strand),
    (|f| f.strand == Some(StrandKind::Bridge), SsCode::BetaBridge),
    (|f| f.turn, SsCode::Turn),
    (|f| f.bend, SsCode::Bend),
    (|f| f.ppii, SsCode::Ppii),
];

pub(crate) fn assign_code(flags: &ResidueFlags) -> SsCode {
    for (rule, code) in RULES {
        if rule(flags) {
            return *code;
        }
    }
    SsCode::Coil
}

/// Resolve a whole working list at once.
pub(crate) fn assign_codes(flags: &[ResidueFlags]) -> Vec<SsCode> {
    flags.iter().map(assign_code).collect()
}
