//! Kabsch-Sander backbone hydrogen-bond detection.
//!
//! Every ordered (donor, acceptor) residue pair gets the electrostatic
//! dipole approximation energy from the four N/H x C/O distances. Pairs
//! within threshold compete for two bond slots per residue per role, the
//! strongest bonds winning.

use glam::Vec3;

use super::backbone::BackboneResidue;

/// Coupling constant q1*q2*332 for the partial charges of the backbone
/// amide and carbonyl dipoles (kcal/mol * A).
pub(crate) const KS_COUPLING: f32 = 27.888;

/// Bonds require an energy at or below this (kcal/mol).
pub(crate) const HBOND_ENERGY_CUTOFF: f32 = -0.5;

/// Energies are clamped here when atoms approach unphysically.
const MIN_HBOND_ENERGY: f32 = -9.9;

/// Distances below this mean degenerate coordinates; the pair is skipped.
const MIN_ATOM_DISTANCE: f32 = 0.5;

/// CA-CA prune: residues farther apart cannot hydrogen-bond.
const CA_PRUNE_DISTANCE: f32 = 9.0;

/// Maximum bonds a residue may hold in each role.
const BONDS_PER_ROLE: usize = 2;

/// One accepted backbone hydrogen bond (N-H of `donor` to C=O of `acceptor`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct HBond {
    pub donor: usize,
    pub acceptor: usize,
    pub energy: f32,
}

/// The accepted bond set for one frame, with per-residue role slots.
#[derive(Debug, Clone)]
pub(crate) struct HBonds {
    /// Per residue: bonds it donates (partner = acceptor).
    donated: Vec<[Option<(usize, f32)>; BONDS_PER_ROLE]>,
    /// Per residue: bonds it accepts (partner = donor).
    accepted: Vec<[Option<(usize, f32)>; BONDS_PER_ROLE]>,
    bonds: Vec<HBond>,
}

impl HBonds {
    fn with_len(n: usize) -> HBonds {
        HBonds {
            donated: vec![[None; BONDS_PER_ROLE]; n],
            accepted: vec![[None; BONDS_PER_ROLE]; n],
            bonds: Vec::new(),
        }
    }

    /// Does `donor`'s N-H bond to `acceptor`'s C=O?
    pub(crate) fn is_bonded(&self, donor: usize, acceptor: usize) -> bool {
        self.donated[donor]
            .iter()
            .flatten()
            .any(|&(partner, _)| partner == acceptor)
    }

    /// All accepted bonds, strongest first.
    #[cfg(test)]
    pub(crate) fn bonds(&self) -> &[HBond] {
        &self.bonds
    }

    fn slot_count(slots: &[Option<(usize, f32)>; BONDS_PER_ROLE]) -> usize {
        slots.iter().flatten().count()
    }

    fn push(&mut self, bond: HBond) {
        let free = |slots: &mut [Option<(usize, f32)>; BONDS_PER_ROLE], partner, energy| {
            for slot in slots.iter_mut() {
                if slot.is_none() {
                    *slot = Some((partner, energy));
                    return;
                }
            }
        };
        free(&mut self.donated[bond.donor], bond.acceptor, bond.energy);
        free(&mut self.accepted[bond.acceptor], bond.donor, bond.energy);
        self.bonds.push(bond);
    }

    /// Test-only constructor building a bond set straight from
    /// (donor, acceptor) pairs, bypassing geometry.
    #[cfg(test)]
    pub(crate) fn from_pairs(n: usize, pairs: &[(usize, usize)]) -> HBonds {
        let mut set = HBonds::with_len(n);
        for &(donor, acceptor) in pairs {
            set.push(HBond {
                donor,
                acceptor,
                energy: -2.0,
            });
        }
        set
    }
}

/// Kabsch-Sander energy for one donor/acceptor pair, `None` when any of
/// the four distances is degenerate or not finite.
fn hbond_energy(n: Vec3, h: Vec3, c: Vec3, o: Vec3) -> Option<f32> {
    let d_on = o.distance(n);
    let d_ch = c.distance(h);
    let d_oh = o.distance(h);
    let d_cn = c.distance(n);
    for d in [d_on, d_ch, d_oh, d_cn] {
        if !d.is_finite() || d < MIN_ATOM_DISTANCE {
            return None;
        }
    }
    let energy = KS_COUPLING * (1.0 / d_on + 1.0 / d_ch - 1.0 / d_oh - 1.0 / d_cn);
    if !energy.is_finite() {
        return None;
    }
    Some(energy.max(MIN_HBOND_ENERGY))
}

/// Detect the frame's bond set over all eligible residue pairs.
///
/// Candidates are collected first and reduced afterwards: sorted by
/// (energy, donor, acceptor) and accepted greedily while both residues
/// still have capacity in the relevant role.
pub(crate) fn detect_hbonds(residues: &[BackboneResidue]) -> HBonds {
    let n = residues.len();
    let mut candidates: Vec<HBond> = Vec::new();

    for donor in 0..n {
        let h = match residues[donor].h {
            Some(h) => h,
            None => continue,
        };
        for acceptor in 0..n {
            // Self-bonds and bonds to the peptide-bonded predecessor are
            // unphysical by convention.
            if acceptor == donor || acceptor + 1 == donor {
                continue;
            }
            if residues[donor].ca.distance(residues[acceptor].ca) > CA_PRUNE_DISTANCE {
                continue;
            }
            let energy = match hbond_energy(
                residues[donor].n,
                h,
                residues[acceptor].c,
                residues[acceptor].o,
            ) {
                Some(e) if e <= HBOND_ENERGY_CUTOFF => e,
                _ => continue,
            };
            candidates.push(HBond {
                donor,
                acceptor,
                energy,
            });
        }
    }

    candidates.sort_by(|a, b| {
        a.energy
            .total_cmp(&b.energy)
            .then(a.donor.cmp(&b.donor))
            .then(a.acceptor.cmp(&b.acceptor))
    });

    let mut set = HBonds::with_len(n);
    for bond in candidates {
        if HBonds::slot_count(&set.donated[bond.donor]) < BONDS_PER_ROLE
            && HBonds::slot_count(&set.accepted[bond.acceptor]) < BONDS_PER_ROLE
        {
            set.push(bond);
        }
    }
    set
}
