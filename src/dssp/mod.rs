//! DSSP-style secondary structure assignment.
//!
//! Each frame is processed independently: extract eligible backbone
//! residues, detect Kabsch-Sander hydrogen bonds, recognize helix,
//! strand, turn and bend patterns, then resolve one code per residue by
//! priority. Frames are distributed across a thread pool; results come
//! back in frame order.

mod assign;
mod backbone;
mod hbond;
mod pattern;

use rayon::prelude::*;
use thiserror::Error;

use crate::types::{Frame, SsCode, Topology};

use assign::assign_codes;
use backbone::extract_backbone;
use hbond::detect_hbonds;
use pattern::classify;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DsspError {
    /// A frame's coordinate array does not cover the topology's atoms.
    #[error("frame {frame} has {got} coordinates, topology expects {expected}")]
    FrameSizeMismatch {
        frame: usize,
        got: usize,
        expected: usize,
    },
    /// The topology points outside the coordinate array (malformed input).
    #[error("atom index {index} out of range for frame with {len} coordinates")]
    AtomIndexOutOfRange { index: usize, len: usize },
}

/// Assignment options beyond the classic algorithm.
#[derive(Debug, Clone, Default)]
pub struct DsspOptions {
    /// Collapse the output to the three-symbol H/E/C alphabet.
    pub simplified: bool,
    /// Also detect polyproline-II runs (`P`), off by default.
    pub ppii: bool,
}

/// Assign secondary structure codes for every residue in every frame.
///
/// Returns one row per frame, one code per topology residue in chain
/// order. Residues without a complete protein backbone come back as
/// [`SsCode::NotAssigned`].
pub fn compute_secondary_structure(
    topology: &Topology,
    frames: &[Frame],
    simplified: bool,
) -> Result<Vec<Vec<SsCode>>, DsspError> {
    compute_secondary_structure_with(
        topology,
        frames,
        &DsspOptions {
            simplified,
            ..DsspOptions::default()
        },
    )
}

/// [`compute_secondary_structure`] with full option control.
pub fn compute_secondary_structure_with(
    topology: &Topology,
    frames: &[Frame],
    options: &DsspOptions,
) -> Result<Vec<Vec<SsCode>>, DsspError> {
    let expected = topology.atom_count();
    frames
        .par_iter()
        .enumerate()
        .map(|(fi, frame)| {
            if frame.positions.len() != expected {
                return Err(DsspError::FrameSizeMismatch {
                    frame: fi,
                    got: frame.positions.len(),
                    expected,
                });
            }
            assign_frame(topology, frame, options)
        })
        .collect()
}

fn assign_frame(
    topology: &Topology,
    frame: &Frame,
    options: &DsspOptions,
) -> Result<Vec<SsCode>, DsspError> {
    let residues = extract_backbone(topology, frame)?;
    let codes = if residues.is_empty() {
        Vec::new()
    } else {
        let bonds = detect_hbonds(&residues);
        let flags = classify(&residues, &bonds, options.ppii);
        assign_codes(&flags)
    };

    // Scatter the compact working-list results back to topology order.
    let mut out = vec![SsCode::NotAssigned; topology.residue_count()];
    for (residue, code) in residues.iter().zip(&codes) {
        out[residue.topo_index] = *code;
    }
    if options.simplified {
        for code in &mut out {
            *code = code.simplify();
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Chain, Residue, TopologyAtom};
    use glam::{Mat3, Vec3};

    /// Extend a backbone by one atom with the given internal coordinates
    /// (standard natural-extension reference frame construction).
    fn place_atom(a: Vec3, b: Vec3, c: Vec3, bond: f32, angle_deg: f32, torsion_deg: f32) -> Vec3 {
        let theta = angle_deg.to_radians();
        let chi = torsion_deg.to_radians();
        let local = Vec3::new(
            -bond * theta.cos(),
            bond * theta.sin() * chi.cos(),
            bond * theta.sin() * chi.sin(),
        );
        let bc = (c - b).normalize();
        let n = (b - a).cross(bc).normalize();
        let frame = Mat3::from_cols(bc, n.cross(bc), n);
        c + frame * local
    }

    /// Ideal-geometry backbone with uniform (phi, psi) torsions; returns
    /// per-residue [N, CA, C, O].
    fn build_backbone(count: usize, phi: f32, psi: f32) -> Vec<[Vec3; 4]> {
        let n0 = Vec3::ZERO;
        let ca0 = Vec3::new(1.458, 0.0, 0.0);
        let open = (180.0f32 - 111.2).to_radians();
        let c0 = ca0 + 1.525 * Vec3::new(open.cos(), open.sin(), 0.0);
        let o0 = place_atom(n0, ca0, c0, 1.231, 120.5, psi + 180.0);

        let mut out = vec![[n0, ca0, c0, o0]];
        for _ in 1..count {
            let [pn, pca, pc, _] = out[out.len() - 1];
            let ni = place_atom(pn, pca, pc, 1.329, 116.2, psi);
            let cai = place_atom(pca, pc, ni, 1.458, 121.7, 180.0);
            let ci = place_atom(pc, ni, cai, 1.525, 111.2, phi);
            let oi = place_atom(ni, cai, ci, 1.231, 120.5, psi + 180.0);
            out.push([ni, cai, ci, oi]);
        }
        out
    }

    fn make_topology(
        chains: Vec<(char, Vec<(&str, Vec<(&str, Vec3)>)>)>,
    ) -> (Topology, Frame) {
        let mut positions = Vec::new();
        let mut out_chains = Vec::new();
        for (id, residues) in chains {
            let mut out_residues = Vec::new();
            for (seq, (name, atoms)) in residues.into_iter().enumerate() {
                let mut out_atoms = Vec::new();
                for (atom_name, pos) in atoms {
                    out_atoms.push(TopologyAtom {
                        name: atom_name.to_string(),
                        index: positions.len(),
                    });
                    positions.push(pos);
                }
                out_residues.push(Residue {
                    name: name.to_string(),
                    seq: seq as i32 + 1,
                    atoms: out_atoms,
                });
            }
            out_chains.push(Chain {
                id,
                residues: out_residues,
            });
        }
        (Topology::new(out_chains), Frame::new(positions))
    }

    fn backbone_residues(
        backbone: &[[Vec3; 4]],
        offset: Vec3,
    ) -> Vec<(&'static str, Vec<(&'static str, Vec3)>)> {
        backbone
            .iter()
            .map(|&[n, ca, c, o]| {
                (
                    "ALA",
                    vec![
                        ("N", n + offset),
                        ("CA", ca + offset),
                        ("C", c + offset),
                        ("O", o + offset),
                    ],
                )
            })
            .collect()
    }

    fn alpha_helix_system(count: usize) -> (Topology, Frame) {
        let backbone = build_backbone(count, -57.0, -47.0);
        make_topology(vec![('A', backbone_residues(&backbone, Vec3::ZERO))])
    }

    #[test]
    fn ideal_alpha_helix_core_is_h() {
        let (top, frame) = alpha_helix_system(12);
        let codes = &compute_secondary_structure(&top, &[frame], false).unwrap()[0];
        assert_eq!(codes.len(), 12);
        for k in 1..=10 {
            assert_eq!(codes[k], SsCode::AlphaHelix, "residue {k}");
        }
        // Termini fall outside the marked spans but stay assignable.
        assert_eq!(codes[0], SsCode::Coil);
        assert_ne!(codes[11], SsCode::AlphaHelix);
        assert_ne!(codes[11], SsCode::NotAssigned);
        assert_eq!(codes[11].simplify(), SsCode::Coil);
    }

    #[test]
    fn simplified_output_is_the_collapsed_full_output() {
        let (top, frame) = alpha_helix_system(12);
        let full = compute_secondary_structure(&top, &[frame.clone()], false).unwrap();
        let simple = compute_secondary_structure(&top, &[frame], true).unwrap();
        assert_eq!(full.len(), simple.len());
        for (f_row, s_row) in full.iter().zip(&simple) {
            let collapsed: Vec<SsCode> = f_row.iter().map(|c| c.simplify()).collect();
            assert_eq!(&collapsed, s_row);
        }
    }

    #[test]
    fn water_only_frame_is_all_na() {
        let waters = (0..4)
            .map(|i| ("HOH", vec![("O", Vec3::new(3.0 * i as f32, 0.0, 0.0))]))
            .collect();
        let (top, frame) = make_topology(vec![('A', waters)]);
        for simplified in [false, true] {
            let rows = compute_secondary_structure(&top, &[frame.clone()], simplified).unwrap();
            assert_eq!(rows, vec![vec![SsCode::NotAssigned; 4]]);
        }
    }

    #[test]
    fn no_frames_no_rows() {
        let (top, _) = alpha_helix_system(5);
        let rows = compute_secondary_structure(&top, &[], false).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn short_frame_is_an_error() {
        let (top, mut frame) = alpha_helix_system(5);
        frame.positions.pop();
        let got = frame.positions.len();
        assert_eq!(
            compute_secondary_structure(&top, &[frame], false),
            Err(DsspError::FrameSizeMismatch {
                frame: 0,
                got,
                expected: top.atom_count(),
            })
        );
    }

    #[test]
    fn chains_are_assigned_independently() {
        let backbone = build_backbone(12, -57.0, -47.0);
        let (top_one, frame_one) =
            make_topology(vec![('A', backbone_residues(&backbone, Vec3::ZERO))]);
        let (top_two, frame_two) = make_topology(vec![
            ('A', backbone_residues(&backbone, Vec3::ZERO)),
            ('B', backbone_residues(&backbone, Vec3::new(100.0, 0.0, 0.0))),
        ]);

        let single = &compute_secondary_structure(&top_one, &[frame_one], false).unwrap()[0];
        let double = &compute_secondary_structure(&top_two, &[frame_two], false).unwrap()[0];
        assert_eq!(&double[..12], &single[..]);
        assert_eq!(&double[12..], &single[..]);
    }

    #[test]
    fn solvent_and_side_chain_atoms_do_not_shift_protein_codes() {
        let backbone = build_backbone(12, -57.0, -47.0);
        let (plain_top, plain_frame) =
            make_topology(vec![('A', backbone_residues(&backbone, Vec3::ZERO))]);

        let mut residues = backbone_residues(&backbone, Vec3::ZERO);
        for (_, atoms) in residues.iter_mut() {
            let ca = atoms[1].1;
            atoms.push(("CB", ca + Vec3::new(0.0, 0.0, 1.5)));
        }
        let waters = (0..3)
            .map(|i| ("HOH", vec![("O", Vec3::new(40.0 + 3.0 * i as f32, 0.0, 0.0))]))
            .collect();
        let (rich_top, rich_frame) = make_topology(vec![('A', residues), ('W', waters)]);

        let plain = &compute_secondary_structure(&plain_top, &[plain_frame], false).unwrap()[0];
        let rich = &compute_secondary_structure(&rich_top, &[rich_frame], false).unwrap()[0];
        assert_eq!(&rich[..12], &plain[..]);
        assert!(rich[12..].iter().all(|&c| c == SsCode::NotAssigned));
    }

    #[test]
    fn polyproline_run_needs_the_option() {
        let backbone = build_backbone(10, -75.0, 145.0);
        let (top, frame) = make_topology(vec![('A', backbone_residues(&backbone, Vec3::ZERO))]);

        let off = &compute_secondary_structure(&top, &[frame.clone()], false).unwrap()[0];
        assert!(off.iter().all(|c| *c != SsCode::Ppii));

        let options = DsspOptions {
            simplified: false,
            ppii: true,
        };
        let on = &compute_secondary_structure_with(&top, &[frame], &options).unwrap()[0];
        // Interior residues have both torsions defined; chain ends do not.
        for k in 1..=8 {
            assert_eq!(on[k], SsCode::Ppii, "residue {k}");
        }
        assert_ne!(on[0], SsCode::Ppii);
        assert_ne!(on[9], SsCode::Ppii);
    }

    #[test]
    fn repeated_runs_agree() {
        let (top, frame) = alpha_helix_system(12);
        let frames = vec![frame.clone(), frame.clone(), frame];
        let first = compute_secondary_structure(&top, &frames, false).unwrap();
        let second = compute_secondary_structure(&top, &frames, false).unwrap();
        assert_eq!(first, second);
        assert_eq!(first[0], first[1]);
        assert_eq!(first[0], first[2]);
    }
}
