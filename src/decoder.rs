//! Payload-to-frames decoding.
//!
//! Full-system payloads are reshaped into per-frame buffers without any
//! remapping. Projection payloads only carry a reduced atom selection; each
//! selected atom's triplet is written to its topology slot and every other
//! slot stays at `0.0`, so all frames have the full topology length.

use crate::error::DecodeError;
use crate::options::DecodeOptions;
use crate::payload::atoms_per_frame;
use crate::scheme::{
    count_candidates, infer_scheme, SchemeDiagnostic, SelectionScheme,
};
use crate::topology::Topology;
use crate::trajectory::{DecodedTrajectory, Frame, FrameMode};

/// Stateless decoder configured by [`DecodeOptions`].
///
/// Holds no per-call state; one instance may serve any number of threads.
#[derive(Debug, Clone, Default)]
pub struct TrajectoryDecoder {
    options: DecodeOptions,
}

impl TrajectoryDecoder {
    /// Decoder with the given options.
    #[must_use]
    pub fn new(options: DecodeOptions) -> Self {
        Self { options }
    }

    /// Options this decoder runs with.
    #[must_use]
    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Decode `payload` into frames aligned to `topology`.
    ///
    /// `atom_subset` is the number of atoms per frame in the payload. For
    /// [`FrameMode::Frames`] and [`FrameMode::Single`] it must equal the
    /// topology atom count.
    ///
    /// Returns `Ok(None)` while either input is still missing. Any read
    /// outside the payload, or an atom count the topology cannot support,
    /// fails with [`DecodeError::TopologyMismatch`]; no partial output is
    /// returned.
    pub fn decode(
        &self,
        topology: Option<&Topology>,
        payload: Option<&[f32]>,
        atom_subset: usize,
        mode: FrameMode,
    ) -> Result<Option<DecodedTrajectory>, DecodeError> {
        let (Some(topology), Some(payload)) = (topology, payload) else {
            log::trace!("decode skipped: topology or payload not loaded");
            return Ok(None);
        };

        let result = if atom_subset == 0 {
            Err(DecodeError::mismatch("payload atom count is zero"))
        } else {
            match mode {
                FrameMode::Frames(n) => {
                    reshape(topology, payload, atom_subset, n)
                }
                FrameMode::Single => reshape(topology, payload, atom_subset, 1),
                FrameMode::Projection => {
                    self.decode_projection(topology, payload, atom_subset)
                }
            }
        };

        match result {
            Ok(traj) => Ok(Some(traj)),
            Err(e) => {
                log::error!("trajectory decode failed: {e}");
                Err(e)
            }
        }
    }

    fn decode_projection(
        &self,
        topology: &Topology,
        payload: &[f32],
        atom_subset: usize,
    ) -> Result<DecodedTrajectory, DecodeError> {
        let n_frames = self.options.projection_frames;
        let (scheme, scheme_warning) =
            self.resolve_scheme(topology, payload, atom_subset)?;

        let slots = scheme.map_or_else(Vec::new, |s| {
            selected_slots(topology, s, atom_subset)
        });
        log::debug!(
            "projection: {n_frames} frames, scheme {}, {} of {} atoms placed",
            scheme.map_or_else(|| "undetermined".to_owned(), |s| s.to_string()),
            slots.len(),
            topology.atom_count()
        );

        let frames = (0..n_frames)
            .map(|i| place_frame(topology, payload, atom_subset, &slots, i))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DecodedTrajectory {
            atom_count: topology.atom_count(),
            scheme,
            scheme_warning,
            frames,
        })
    }

    fn resolve_scheme(
        &self,
        topology: &Topology,
        payload: &[f32],
        atom_subset: usize,
    ) -> Result<(Option<SelectionScheme>, Option<SchemeDiagnostic>), DecodeError>
    {
        if let Some(fixed) = self.options.scheme.fixed() {
            return Ok((Some(fixed), None));
        }

        let observed =
            atoms_per_frame(payload.len(), self.options.projection_frames)?;
        match infer_scheme(observed, count_candidates(topology, atom_subset)) {
            Ok(scheme) => Ok((Some(scheme), None)),
            Err(diag) if self.options.strict_scheme => {
                Err(DecodeError::AmbiguousScheme(diag))
            }
            Err(diag) => {
                log::warn!("{diag}; projection frames left zeroed");
                Ok((None, Some(diag)))
            }
        }
    }
}

/// Decode with default options.
pub fn decode(
    topology: Option<&Topology>,
    payload: Option<&[f32]>,
    atom_subset: usize,
    mode: FrameMode,
) -> Result<Option<DecodedTrajectory>, DecodeError> {
    TrajectoryDecoder::default().decode(topology, payload, atom_subset, mode)
}

fn reshape(
    topology: &Topology,
    payload: &[f32],
    atom_subset: usize,
    n_frames: usize,
) -> Result<DecodedTrajectory, DecodeError> {
    let atom_count = topology.atom_count();
    if atom_subset != atom_count {
        return Err(DecodeError::mismatch(format!(
            "payload carries {atom_subset} atoms per frame, topology has \
             {atom_count}"
        )));
    }

    let (stride, needed) = atom_subset
        .checked_mul(3)
        .and_then(|stride| Some((stride, stride.checked_mul(n_frames)?)))
        .ok_or_else(|| {
            DecodeError::mismatch(format!(
                "{n_frames} frames of {atom_subset} atoms exceed the \
                 addressable payload size"
            ))
        })?;
    let data = payload.get(..needed).ok_or_else(|| {
        DecodeError::mismatch(format!(
            "{n_frames} frames of {atom_subset} atoms need {needed} values, \
             payload has {}",
            payload.len()
        ))
    })?;
    if payload.len() > needed {
        log::debug!(
            "ignoring {} trailing payload values",
            payload.len() - needed
        );
    }

    let frames = data
        .chunks_exact(stride)
        .map(|chunk| Frame(chunk.to_vec()))
        .collect();
    Ok(DecodedTrajectory {
        atom_count,
        scheme: None,
        scheme_warning: None,
        frames,
    })
}

/// Topology indices of the atoms a projection payload carries, in payload
/// order. At most `atom_subset` atoms are selected.
fn selected_slots(
    topology: &Topology,
    scheme: SelectionScheme,
    atom_subset: usize,
) -> Vec<usize> {
    topology
        .protein_prefix()
        .filter(|(_, atom)| scheme.selects(atom))
        .map(|(idx, _)| idx)
        .take(atom_subset)
        .collect()
}

fn place_frame(
    topology: &Topology,
    payload: &[f32],
    atom_subset: usize,
    slots: &[usize],
    frame_idx: usize,
) -> Result<Frame, DecodeError> {
    let past_end = |k: usize| {
        DecodeError::mismatch(format!(
            "frame {frame_idx} atom {k} reads past payload end ({} values)",
            payload.len()
        ))
    };

    let mut frame = Frame::zeroed(topology.atom_count());
    let base = frame_idx.checked_mul(atom_subset).and_then(|v| v.checked_mul(3));
    for (k, &slot) in slots.iter().enumerate() {
        let src = base
            .and_then(|b| b.checked_add(k * 3))
            .ok_or_else(|| past_end(k))?;
        let xyz = src
            .checked_add(3)
            .and_then(|end| payload.get(src..end))
            .ok_or_else(|| past_end(k))?;
        frame.0[slot * 3..slot * 3 + 3].copy_from_slice(xyz);
    }
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::SchemeChoice;
    use crate::topology::Atom;

    fn sequence(n: usize) -> Vec<f32> {
        (0..n).map(|v| v as f32).collect()
    }

    fn plain_topology(n: usize) -> Topology {
        (0..n).map(|_| Atom::new("OW", "O", false)).collect()
    }

    /// N CA HA C O CB of one residue followed by a water.
    fn residue_topology() -> Topology {
        Topology::new(vec![
            Atom::new("N", "N", true),
            Atom::new("CA", "C", true),
            Atom::new("HA", "H", true),
            Atom::new("C", "C", true),
            Atom::new("O", "O", true),
            Atom::new("CB", "C", true),
            Atom::new("OW", "O", false),
        ])
    }

    #[test]
    fn missing_inputs_decode_to_none() {
        let topo = plain_topology(2);
        let payload = sequence(6);
        assert!(decode(Some(&topo), None, 2, FrameMode::Frames(1))
            .unwrap()
            .is_none());
        assert!(decode(None, Some(payload.as_slice()), 2, FrameMode::Frames(1))
            .unwrap()
            .is_none());
    }

    #[test]
    fn multi_frame_payload_is_sliced_in_order() {
        let topo = plain_topology(2);
        let payload = sequence(12);
        let traj = decode(Some(&topo), Some(payload.as_slice()), 2, FrameMode::Frames(2))
            .unwrap()
            .unwrap();
        assert_eq!(traj.len(), 2);
        assert_eq!(traj.frames()[0].as_slice(), [0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(
            traj.frames()[1].as_slice(),
            [6.0, 7.0, 8.0, 9.0, 10.0, 11.0]
        );
        assert_eq!(traj.scheme(), None);
    }

    #[test]
    fn single_frame_reads_first_slice_only() {
        let topo = plain_topology(2);
        let payload = sequence(12);
        let traj = decode(Some(&topo), Some(payload.as_slice()), 2, FrameMode::Single)
            .unwrap()
            .unwrap();
        assert_eq!(traj.len(), 1);
        assert_eq!(traj.frames()[0].as_slice(), [0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn projection_places_backbone_atom() {
        let topo = Topology::new(vec![
            Atom::new("HA", "H", true),
            Atom::new("CA", "C", true),
            Atom::new("O", "O", true),
        ]);
        let payload = sequence(21 * 3);
        let traj = decode(Some(&topo), Some(payload.as_slice()), 1, FrameMode::Projection)
            .unwrap()
            .unwrap();

        assert_eq!(traj.len(), 20);
        assert_eq!(traj.scheme(), Some(SelectionScheme::Backbone));
        assert!(traj.scheme_warning().is_none());
        for (i, frame) in traj.frames().iter().enumerate() {
            let v = (3 * i) as f32;
            assert_eq!(
                frame.as_slice(),
                [0.0, 0.0, 0.0, v, v + 1.0, v + 2.0, 0.0, 0.0, 0.0],
                "frame {i}"
            );
        }
    }

    #[test]
    fn projection_ignores_requested_frame_count() {
        let topo = Topology::new(vec![Atom::new("CA", "C", true)]);
        let payload = sequence(60);
        let decoder = TrajectoryDecoder::default();
        let a = decoder
            .decode(Some(&topo), Some(payload.as_slice()), 1, FrameMode::Projection)
            .unwrap()
            .unwrap();
        assert_eq!(a.len(), 20);
        assert_eq!(FrameMode::from_flags(5, true, false), FrameMode::Projection);
    }

    #[test]
    fn projection_places_heavy_atoms_and_skips_hydrogens() {
        let topo = residue_topology();
        let payload = sequence(20 * 5 * 3);
        let traj = decode(Some(&topo), Some(payload.as_slice()), 5, FrameMode::Projection)
            .unwrap()
            .unwrap();

        assert_eq!(traj.scheme(), Some(SelectionScheme::Heavy));
        let first = traj.frames()[0].as_slice();
        assert_eq!(first.len(), 7 * 3);
        assert_eq!(&first[0..6], [0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(&first[6..9], [0.0, 0.0, 0.0]);
        assert_eq!(&first[9..18], [6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0]);
        assert_eq!(&first[18..21], [0.0, 0.0, 0.0]);

        let last = traj.frames()[19].as_slice();
        assert_eq!(&last[0..3], [285.0, 286.0, 287.0]);
    }

    #[test]
    fn fixed_scheme_skips_inference() {
        let topo = residue_topology();
        // Three atoms per frame would infer as backbone; force heavy.
        let payload = sequence(20 * 3 * 3);
        let decoder = TrajectoryDecoder::new(DecodeOptions {
            scheme: SchemeChoice::Heavy,
            ..DecodeOptions::default()
        });
        let traj = decoder
            .decode(Some(&topo), Some(payload.as_slice()), 3, FrameMode::Projection)
            .unwrap()
            .unwrap();
        assert_eq!(traj.scheme(), Some(SelectionScheme::Heavy));
        // N, CA then C; HA is skipped.
        let first = traj.frames()[0].as_slice();
        assert_eq!(&first[6..9], [0.0, 0.0, 0.0]);
        assert_eq!(&first[9..12], [6.0, 7.0, 8.0]);
        assert_eq!(&first[12..15], [0.0, 0.0, 0.0]);
    }

    #[test]
    fn ambiguous_projection_yields_zeroed_frames_and_warning() {
        let topo = residue_topology();
        // Four atoms per frame: neither 3 (backbone) nor 5 (heavy).
        let payload = sequence(20 * 4 * 3);
        let traj = decode(Some(&topo), Some(payload.as_slice()), 5, FrameMode::Projection)
            .unwrap()
            .unwrap();

        assert_eq!(traj.len(), 20);
        assert_eq!(traj.scheme(), None);
        assert!(traj
            .frames()
            .iter()
            .all(|f| f.as_slice().len() == 21 && f.as_slice().iter().all(|&v| v == 0.0)));
        let warning = traj.scheme_warning().unwrap();
        assert_eq!(warning.expected_backbone, 3);
        assert_eq!(warning.expected_heavy, 5);
        assert_eq!(warning.observed, 4);
    }

    #[test]
    fn strict_scheme_promotes_ambiguity_to_error() {
        let topo = residue_topology();
        let payload = sequence(20 * 4 * 3);
        let decoder = TrajectoryDecoder::new(DecodeOptions {
            strict_scheme: true,
            ..DecodeOptions::default()
        });
        let err = decoder
            .decode(Some(&topo), Some(payload.as_slice()), 5, FrameMode::Projection)
            .unwrap_err();
        assert!(matches!(err, DecodeError::AmbiguousScheme(d) if d.observed == 4));
    }

    #[test]
    fn truncated_projection_is_a_mismatch() {
        let topo = residue_topology();
        let payload = sequence(20 * 3);
        let decoder = TrajectoryDecoder::new(DecodeOptions {
            scheme: SchemeChoice::Heavy,
            ..DecodeOptions::default()
        });
        let err = decoder
            .decode(Some(&topo), Some(payload.as_slice()), 5, FrameMode::Projection)
            .unwrap_err();
        assert!(matches!(err, DecodeError::TopologyMismatch { .. }));
    }

    #[test]
    fn huge_projection_subset_is_a_mismatch() {
        let topo = Topology::new(vec![Atom::new("CA", "C", true)]);
        let payload = sequence(60);
        let err = decode(
            Some(&topo),
            Some(payload.as_slice()),
            usize::MAX / 2,
            FrameMode::Projection,
        )
        .unwrap_err();
        assert!(matches!(err, DecodeError::TopologyMismatch { .. }));
    }

    #[test]
    fn later_projection_frames_past_payload_are_a_mismatch() {
        // Two backbone atoms per frame declared, but 60 values only cover
        // ten frames of two atoms.
        let topo = Topology::new(vec![
            Atom::new("N", "N", true),
            Atom::new("CA", "C", true),
        ]);
        let payload = sequence(60);
        let decoder = TrajectoryDecoder::new(DecodeOptions {
            scheme: SchemeChoice::Backbone,
            ..DecodeOptions::default()
        });
        let err = decoder
            .decode(Some(&topo), Some(payload.as_slice()), 2, FrameMode::Projection)
            .unwrap_err();
        assert!(err.to_string().contains("frame 10 atom 0"), "{err}");
    }

    #[test]
    fn unaddressable_frame_count_is_a_mismatch() {
        let topo = plain_topology(2);
        let payload = sequence(12);
        let err = decode(
            Some(&topo),
            Some(payload.as_slice()),
            2,
            FrameMode::Frames(usize::MAX),
        )
        .unwrap_err();
        assert!(matches!(err, DecodeError::TopologyMismatch { .. }));
    }

    #[test]
    fn short_payload_is_a_mismatch() {
        let topo = plain_topology(2);
        let payload = sequence(9);
        let err = decode(Some(&topo), Some(payload.as_slice()), 2, FrameMode::Frames(2))
            .unwrap_err();
        assert!(matches!(err, DecodeError::TopologyMismatch { .. }));
    }

    #[test]
    fn subset_must_match_topology_outside_projection() {
        let topo = plain_topology(3);
        let payload = sequence(12);
        let err = decode(Some(&topo), Some(payload.as_slice()), 2, FrameMode::Frames(2))
            .unwrap_err();
        assert!(err.to_string().contains("topology has 3"));
    }

    #[test]
    fn zero_subset_is_a_mismatch() {
        let topo = plain_topology(0);
        let empty: [f32; 0] = [];
        let err = decode(Some(&topo), Some(&empty[..]), 0, FrameMode::Single)
            .unwrap_err();
        assert!(matches!(err, DecodeError::TopologyMismatch { .. }));
    }

    #[test]
    fn repeated_decodes_are_equal() {
        let topo = residue_topology();
        let payload = sequence(20 * 5 * 3);
        let a = decode(Some(&topo), Some(payload.as_slice()), 5, FrameMode::Projection)
            .unwrap();
        let b = decode(Some(&topo), Some(payload.as_slice()), 5, FrameMode::Projection)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn concurrent_decodes_do_not_interfere() {
        let decoder = TrajectoryDecoder::default();
        let residue = residue_topology();
        let residue_payload = sequence(20 * 5 * 3);
        let plain = plain_topology(4);
        let plain_payload = sequence(3 * 4 * 3);

        let expected_residue = decoder
            .decode(Some(&residue), Some(residue_payload.as_slice()), 5, FrameMode::Projection)
            .unwrap();
        let expected_plain = decoder
            .decode(Some(&plain), Some(plain_payload.as_slice()), 4, FrameMode::Frames(3))
            .unwrap();

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let decoder = &decoder;
                    let (topo, payload, subset, mode) = if i % 2 == 0 {
                        (&residue, &residue_payload, 5, FrameMode::Projection)
                    } else {
                        (&plain, &plain_payload, 4, FrameMode::Frames(3))
                    };
                    s.spawn(move || {
                        let got = decoder
                            .decode(Some(topo), Some(payload.as_slice()), subset, mode)
                            .unwrap();
                        (i, got)
                    })
                })
                .collect();
            for handle in handles {
                let (i, got) = handle.join().unwrap();
                if i % 2 == 0 {
                    assert_eq!(got, expected_residue);
                } else {
                    assert_eq!(got, expected_plain);
                }
            }
        });
    }
}
