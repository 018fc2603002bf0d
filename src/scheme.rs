//! Atom-subset schemes for PCA projection payloads.
//!
//! Projection payloads carry only a reduced atom selection, either the
//! protein backbone (N, CA, C) or the protein heavy atoms. The payload does
//! not say which; the scheme is recovered by comparing the per-frame atom
//! count of the payload against both candidate counts in the topology.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::topology::{Atom, Topology};

/// Which atoms a reduced payload carries.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum SelectionScheme {
    /// Protein atoms named N, CA or C.
    Backbone,
    /// Protein atoms that are not hydrogens.
    Heavy,
}

impl SelectionScheme {
    /// Whether `atom` is part of this selection.
    #[must_use]
    pub fn selects(self, atom: &Atom) -> bool {
        match self {
            Self::Backbone => atom.is_backbone(),
            Self::Heavy => !atom.is_hydrogen(),
        }
    }
}

impl fmt::Display for SelectionScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backbone => f.write_str("backbone"),
            Self::Heavy => f.write_str("heavy"),
        }
    }
}

/// Candidate per-frame atom counts derived from a topology.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchemeCounts {
    /// Backbone atoms in the protein prefix, capped at the subset size.
    pub backbone: usize,
    /// Heavy atoms in the protein prefix, capped at the subset size.
    pub heavy: usize,
}

/// Count backbone and heavy atoms over the leading protein atoms.
///
/// Each count saturates at `limit`; scanning ends at the first non-protein
/// atom or once both counts have reached `limit`.
#[must_use]
pub fn count_candidates(topology: &Topology, limit: usize) -> SchemeCounts {
    let mut counts = SchemeCounts::default();
    for (_, atom) in topology.protein_prefix() {
        if counts.backbone >= limit && counts.heavy >= limit {
            break;
        }
        if counts.backbone < limit && atom.is_backbone() {
            counts.backbone += 1;
        }
        if counts.heavy < limit && !atom.is_hydrogen() {
            counts.heavy += 1;
        }
    }
    counts
}

/// Reported when a projection payload's atom count fits no scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SchemeDiagnostic {
    /// Backbone atom count expected from the topology.
    pub expected_backbone: usize,
    /// Heavy atom count expected from the topology.
    pub expected_heavy: usize,
    /// Atoms per frame actually present in the payload.
    pub observed: usize,
}

impl fmt::Display for SchemeDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "payload has {} atoms per frame, expected {} (backbone) or {} \
             (heavy atoms)",
            self.observed, self.expected_backbone, self.expected_heavy
        )
    }
}

/// Pick the scheme whose count equals `observed`, preferring backbone.
pub fn infer_scheme(
    observed: usize,
    counts: SchemeCounts,
) -> Result<SelectionScheme, SchemeDiagnostic> {
    if observed == counts.backbone {
        Ok(SelectionScheme::Backbone)
    } else if observed == counts.heavy {
        Ok(SelectionScheme::Heavy)
    } else {
        Err(SchemeDiagnostic {
            expected_backbone: counts.backbone,
            expected_heavy: counts.heavy,
            observed,
        })
    }
}
