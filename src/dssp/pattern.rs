//! Structural pattern recognition over the frame's hydrogen-bond set.
//!
//! Produces per-residue candidate flags (helices, strands, turns, bends,
//! polyproline runs); the assigner resolves them into a single code per
//! residue. Flags here deliberately overlap, a residue can be a turn and
//! a bend at once.

use std::collections::{HashMap, VecDeque};

use crate::geometry::{dihedral_deg, vector_angle_deg};

use super::backbone::{no_chain_break, BackboneResidue};
use super::hbond::HBonds;

/// CA(i-2)/CA(i)/CA(i+2) virtual-bond angles above this mark a bend.
const BEND_KAPPA_MIN_DEG: f32 = 70.0;

/// Polyproline-II torsion windows, centered on (-75, 145).
const PPII_PHI_RANGE: (f32, f32) = (-104.0, -46.0);
const PPII_PSI_RANGE: (f32, f32) = (116.0, 174.0);

/// Minimum consecutive residues in the torsion window for a PPII run.
const PPII_MIN_RUN: usize = 2;

/// Strand marks distinguish the single-pair case (`B`) from real ladders (`E`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StrandKind {
    Bridge,
    Ladder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BridgeKind {
    Parallel,
    Antiparallel,
}

/// Candidate pattern flags for one working-list residue.
#[derive(Debug, Clone, Default)]
pub(crate) struct ResidueFlags {
    pub helix_h: bool,
    pub helix_g: bool,
    pub helix_i: bool,
    pub strand: Option<StrandKind>,
    /// 1-based sheet number shared by connected ladders.
    pub sheet: Option<u32>,
    pub turn: bool,
    pub bend: bool,
    pub ppii: bool,
}

/// Run every pattern pass for one frame.
pub(crate) fn classify(
    residues: &[BackboneResidue],
    bonds: &HBonds,
    ppii: bool,
) -> Vec<ResidueFlags> {
    let mut flags = vec![ResidueFlags::default(); residues.len()];

    let bridges = find_bridges(residues, bonds);
    let ladders = build_ladders(residues, bridges);
    mark_strands(&ladders, &mut flags);
    assign_sheets(&ladders, &mut flags);

    let starts = turn_starts(residues, bonds);
    mark_helices(&starts, &mut flags);
    mark_turns(&starts, &mut flags);

    mark_bends(residues, &mut flags);
    if ppii {
        mark_ppii(residues, &mut flags);
    }
    flags
}

/// `starts[s][i]` iff residue i begins an (s+3)-turn: bond from i+s+3 back
/// to i with an unbroken stretch between them.
fn turn_starts(residues: &[BackboneResidue], bonds: &HBonds) -> [Vec<bool>; 3] {
    let n = residues.len();
    let mut starts = [vec![false; n], vec![false; n], vec![false; n]];
    for (s, stride) in starts.iter_mut().zip(3usize..=5) {
        for i in 0..n.saturating_sub(stride) {
            if bonds.is_bonded(i + stride, i) && no_chain_break(residues, i, i + stride) {
                s[i] = true;
            }
        }
    }
    starts
}

/// Ownership marks used while growing helices. Alpha helices claim their
/// span unconditionally; 3-10 and pi helices only grow through residues
/// nothing stronger has claimed yet.
#[derive(Clone, Copy, PartialEq)]
enum Claim {
    Empty,
    Alpha,
    Three,
    Five,
    Strand,
}

fn mark_helices(starts: &[Vec<bool>; 3], flags: &mut [ResidueFlags]) {
    let n = flags.len();
    let mut claims: Vec<Claim> = flags
        .iter()
        .map(|f| {
            if f.strand.is_some() {
                Claim::Strand
            } else {
                Claim::Empty
            }
        })
        .collect();

    // Two consecutive 4-turn starts make an alpha helix.
    for i in 1..n.saturating_sub(4) {
        if starts[1][i] && starts[1][i - 1] {
            for k in i..=i + 3 {
                flags[k].helix_h = true;
                claims[k] = Claim::Alpha;
            }
        }
    }

    for i in 1..n.saturating_sub(3) {
        if starts[0][i] && starts[0][i - 1] {
            let span = i..=i + 2;
            if span
                .clone()
                .all(|k| matches!(claims[k], Claim::Empty | Claim::Three))
            {
                for k in span {
                    flags[k].helix_g = true;
                    claims[k] = Claim::Three;
                }
            }
        }
    }

    for i in 1..n.saturating_sub(5) {
        if starts[2][i] && starts[2][i - 1] {
            let span = i..=i + 4;
            if span
                .clone()
                .all(|k| matches!(claims[k], Claim::Empty | Claim::Five))
            {
                for k in span {
                    flags[k].helix_i = true;
                    claims[k] = Claim::Five;
                }
            }
        }
    }
}

/// Residues strictly inside any n-turn carry the turn flag.
fn mark_turns(starts: &[Vec<bool>; 3], flags: &mut [ResidueFlags]) {
    let n = flags.len();
    for (s, stride) in starts.iter().zip(3usize..=5) {
        for i in 0..n {
            if (1..stride).any(|k| i >= k && s[i - k]) {
                flags[i].turn = true;
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Bridge {
    kind: BridgeKind,
    i: usize,
    j: usize,
}

/// Find beta bridges between non-overlapping residue pairs. Both pairs
/// need intact neighbors on each side for the bond patterns to be
/// meaningful.
fn find_bridges(residues: &[BackboneResidue], bonds: &HBonds) -> Vec<Bridge> {
    let n = residues.len();
    let mut out = Vec::new();
    for i in 1..n.saturating_sub(4) {
        if !no_chain_break(residues, i - 1, i + 1) {
            continue;
        }
        for j in (i + 3)..n.saturating_sub(1) {
            if !no_chain_break(residues, j - 1, j + 1) {
                continue;
            }
            let parallel = (bonds.is_bonded(i + 1, j) && bonds.is_bonded(j, i - 1))
                || (bonds.is_bonded(j + 1, i) && bonds.is_bonded(i, j - 1));
            let antiparallel = (bonds.is_bonded(i + 1, j - 1) && bonds.is_bonded(j + 1, i - 1))
                || (bonds.is_bonded(j, i) && bonds.is_bonded(i, j));
            let kind = if parallel {
                BridgeKind::Parallel
            } else if antiparallel {
                BridgeKind::Antiparallel
            } else {
                continue;
            };
            out.push(Bridge { kind, i, j });
        }
    }
    out
}

/// A run of bridges between the same two strands. `i` ascends; `j`
/// ascends for parallel ladders and descends for antiparallel ones, so
/// front/back of `j` are always min/max.
#[derive(Debug, Clone)]
struct Ladder {
    kind: BridgeKind,
    i: VecDeque<usize>,
    j: VecDeque<usize>,
}

impl Ladder {
    fn from_bridge(b: Bridge) -> Ladder {
        Ladder {
            kind: b.kind,
            i: VecDeque::from([b.i]),
            j: VecDeque::from([b.j]),
        }
    }

    /// All residue indices the ladder covers, including bulged positions
    /// between consecutive rungs.
    fn residue_span(&self) -> impl Iterator<Item = usize> + '_ {
        let range = |d: &VecDeque<usize>| match (d.iter().min(), d.iter().max()) {
            (Some(&lo), Some(&hi)) => lo..=hi,
            _ => 1..=0,
        };
        range(&self.i).chain(range(&self.j))
    }
}

/// Chain consecutive bridges into ladders, then merge bulge-linked
/// ladders.
fn build_ladders(residues: &[BackboneResidue], bridges: Vec<Bridge>) -> Vec<Ladder> {
    let mut ladders: Vec<Ladder> = Vec::new();
    'bridges: for b in bridges {
        for lad in ladders.iter_mut() {
            if lad.kind != b.kind {
                continue;
            }
            let extends_i = lad.i.back().is_some_and(|&tail| b.i == tail + 1);
            if !extends_i {
                continue;
            }
            match b.kind {
                BridgeKind::Parallel => {
                    if lad.j.back().is_some_and(|&tail| b.j == tail + 1) {
                        lad.i.push_back(b.i);
                        lad.j.push_back(b.j);
                        continue 'bridges;
                    }
                }
                BridgeKind::Antiparallel => {
                    if lad.j.front().is_some_and(|&head| b.j + 1 == head) {
                        lad.i.push_back(b.i);
                        lad.j.push_front(b.j);
                        continue 'bridges;
                    }
                }
            }
        }
        ladders.push(Ladder::from_bridge(b));
    }
    merge_bulges(residues, ladders)
}

fn merge_bulges(residues: &[BackboneResidue], mut ladders: Vec<Ladder>) -> Vec<Ladder> {
    ladders.sort_by_key(|l| l.i.front().copied());
    loop {
        let mut pair = None;
        'scan: for a in 0..ladders.len() {
            for b in a + 1..ladders.len() {
                if bulge_linked(residues, &ladders[a], &ladders[b]) {
                    pair = Some((a, b));
                    break 'scan;
                }
            }
        }
        let (a, b) = match pair {
            Some(p) => p,
            None => break,
        };
        let other = ladders.remove(b);
        let lad = &mut ladders[a];
        lad.i.extend(other.i);
        match lad.kind {
            BridgeKind::Parallel => lad.j.extend(other.j),
            BridgeKind::Antiparallel => {
                for j in other.j.into_iter().rev() {
                    lad.j.push_front(j);
                }
            }
        }
    }
    ladders
}

/// Beta-bulge criterion between two ladders of the same kind, `a`
/// starting at or before `b` in the i direction: a short insertion on one
/// strand (up to 4 extra residues) against at most one on the other.
fn bulge_linked(residues: &[BackboneResidue], a: &Ladder, b: &Ladder) -> bool {
    if a.kind != b.kind {
        return false;
    }
    let ends = |d: &VecDeque<usize>| match (d.front(), d.back()) {
        (Some(&front), Some(&back)) => Some((front, back)),
        _ => None,
    };
    let ((ibi, iei), (jbi, jei)) = match (ends(&a.i), ends(&a.j)) {
        (Some(i), Some(j)) => (i, j),
        _ => return false,
    };
    let ((ibj, iej), (jbj, jej)) = match (ends(&b.i), ends(&b.j)) {
        (Some(i), Some(j)) => (i, j),
        _ => return false,
    };

    // Overlapping i ranges are competing ladders, not a bulge.
    if iei >= ibj && ibi <= iej {
        return false;
    }
    if ibj - iei >= 6 {
        return false;
    }
    let lo = ibi.min(jbi.min(jbj));
    let hi = iej.max(jei.max(jej));
    if !no_chain_break(residues, lo, hi) {
        return false;
    }

    match a.kind {
        BridgeKind::Parallel => {
            jbj >= jei && (jbj - jei < 3 || (jbj - jei < 6 && ibj - iei < 3))
        }
        BridgeKind::Antiparallel => {
            jbi >= jej && (jbi - jej < 3 || (jbi - jej < 6 && ibj - iei < 3))
        }
    }
}

/// Mark strand residues: single-rung ladders yield isolated bridges,
/// longer ones extended strand. Extended marks are never demoted.
fn mark_strands(ladders: &[Ladder], flags: &mut [ResidueFlags]) {
    for lad in ladders {
        let kind = if lad.i.len() > 1 {
            StrandKind::Ladder
        } else {
            StrandKind::Bridge
        };
        for k in lad.residue_span() {
            if flags[k].strand != Some(StrandKind::Ladder) {
                flags[k].strand = Some(kind);
            }
        }
    }
}

struct Dsu {
    parent: Vec<usize>,
}

impl Dsu {
    fn new(n: usize) -> Dsu {
        Dsu {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            let root = self.find(self.parent[x]);
            self.parent[x] = root;
        }
        self.parent[x]
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            self.parent[rb] = ra;
        }
    }
}

/// Ladders sharing a residue belong to one sheet; sheets are numbered
/// from 1 in order of first appearance.
fn assign_sheets(ladders: &[Ladder], flags: &mut [ResidueFlags]) {
    let mut dsu = Dsu::new(ladders.len());
    let mut owner: Vec<Option<usize>> = vec![None; flags.len()];
    for (li, lad) in ladders.iter().enumerate() {
        for k in lad.residue_span() {
            match owner[k] {
                Some(other) => dsu.union(li, other),
                None => owner[k] = Some(li),
            }
        }
    }

    let mut ids: HashMap<usize, u32> = HashMap::new();
    for li in 0..ladders.len() {
        let root = dsu.find(li);
        let next = ids.len() as u32 + 1;
        let id = *ids.entry(root).or_insert(next);
        for k in ladders[li].residue_span() {
            flags[k].sheet = Some(id);
        }
    }
}

fn mark_bends(residues: &[BackboneResidue], flags: &mut [ResidueFlags]) {
    let n = residues.len();
    for i in 2..n.saturating_sub(2) {
        if !no_chain_break(residues, i - 2, i + 2) {
            continue;
        }
        let u = residues[i].ca - residues[i - 2].ca;
        let v = residues[i + 2].ca - residues[i].ca;
        if let Some(kappa) = vector_angle_deg(u, v) {
            if kappa > BEND_KAPPA_MIN_DEG {
                flags[i].bend = true;
            }
        }
    }
}

fn phi_angle(residues: &[BackboneResidue], i: usize) -> Option<f32> {
    if i == 0 || residues[i].break_before {
        return None;
    }
    dihedral_deg(
        residues[i - 1].c,
        residues[i].n,
        residues[i].ca,
        residues[i].c,
    )
}

fn psi_angle(residues: &[BackboneResidue], i: usize) -> Option<f32> {
    let next = residues.get(i + 1)?;
    if next.break_before {
        return None;
    }
    dihedral_deg(residues[i].n, residues[i].ca, residues[i].c, next.n)
}

/// Mark runs of at least `PPII_MIN_RUN` residues whose phi/psi fall in
/// the polyproline-II window.
fn mark_ppii(residues: &[BackboneResidue], flags: &mut [ResidueFlags]) {
    let n = residues.len();
    let in_window = |i: usize| {
        matches!(
            (phi_angle(residues, i), psi_angle(residues, i)),
            (Some(phi), Some(psi))
                if (PPII_PHI_RANGE.0..=PPII_PHI_RANGE.1).contains(&phi)
                    && (PPII_PSI_RANGE.0..=PPII_PSI_RANGE.1).contains(&psi)
        )
    };
    let candidate: Vec<bool> = (0..n).map(in_window).collect();

    let mut i = 0;
    while i < n {
        if !candidate[i] {
            i += 1;
            continue;
        }
        let mut j = i;
        while j + 1 < n && candidate[j + 1] {
            j += 1;
        }
        if j - i + 1 >= PPII_MIN_RUN {
            for k in i..=j {
                flags[k].ppii = true;
            }
        }
        i = j + 1;
    }
}
