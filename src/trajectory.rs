//! Decoded trajectory containers handed to the viewer.

use glam::Vec3;
use serde::Serialize;

use crate::scheme::{SchemeDiagnostic, SelectionScheme};

/// How many frames a payload holds and how they are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameMode {
    /// `n` consecutive full-system frames.
    Frames(usize),
    /// One full-system frame; any further data in the payload is ignored.
    Single,
    /// A PCA projection: a fixed number of frames over a reduced atom
    /// selection.
    Projection,
}

impl FrameMode {
    /// Mode from the flag pair used by the trajectory API. A projection flag
    /// wins over the single-frame flag.
    #[must_use]
    pub fn from_flags(n_frames: usize, projection: bool, single: bool) -> Self {
        if projection {
            Self::Projection
        } else if single {
            Self::Single
        } else {
            Self::Frames(n_frames)
        }
    }
}

/// Flat `x, y, z` coordinates of every topology atom at one time step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Frame(pub(crate) Vec<f32>);

impl Frame {
    pub(crate) fn zeroed(atom_count: usize) -> Self {
        Self(vec![0.0; atom_count * 3])
    }

    /// Coordinates as a flat slice.
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Take ownership of the flat coordinate buffer.
    #[must_use]
    pub fn into_vec(self) -> Vec<f32> {
        self.0
    }

    /// Number of atoms covered.
    #[must_use]
    pub fn atom_count(&self) -> usize {
        self.0.len() / 3
    }

    /// Position of atom `index`, if in range.
    #[must_use]
    pub fn position(&self, index: usize) -> Option<Vec3> {
        self.0
            .get(index * 3..index * 3 + 3)
            .map(Vec3::from_slice)
    }

    /// Per-atom positions in topology order.
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.0.chunks_exact(3).map(Vec3::from_slice)
    }
}

/// Frames aligned to a topology, ready for a viewer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedTrajectory {
    pub(crate) atom_count: usize,
    pub(crate) scheme: Option<SelectionScheme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) scheme_warning: Option<SchemeDiagnostic>,
    pub(crate) frames: Vec<Frame>,
}

impl DecodedTrajectory {
    /// Decoded frames in order.
    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Take ownership of the frames.
    #[must_use]
    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }

    /// Number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether there are no frames.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Atom count of every frame (the full topology size).
    #[must_use]
    pub fn atom_count(&self) -> usize {
        self.atom_count
    }

    /// Atom subset used to place a projection payload. `None` for
    /// full-system frames and for projections whose subset was undetermined.
    #[must_use]
    pub fn scheme(&self) -> Option<SelectionScheme> {
        self.scheme
    }

    /// Set when a projection's subset could not be determined and every
    /// frame was left zeroed.
    #[must_use]
    pub fn scheme_warning(&self) -> Option<&SchemeDiagnostic> {
        self.scheme_warning.as_ref()
    }
}
