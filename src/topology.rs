//! Atom-level topology the decoder aligns frames against.
//!
//! Only the three per-atom properties the decoder needs are kept: atom
//! name, element symbol and whether the atom belongs to a protein residue.
//! Atoms are stored in file order, which is also the slot order of every
//! decoded frame.

use std::collections::HashSet;
use std::path::Path;

use molex::adapters::pdb::structure_file_to_coords;
use molex::types::coords::{Coords, Element};
use molex::types::entity::{split_into_entities, MoleculeType};
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// Backbone atom names (amide nitrogen, alpha carbon, carbonyl carbon).
pub const BACKBONE_NAMES: [&str; 3] = ["C", "CA", "N"];

/// A single atom record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Atom {
    /// Atom name, e.g. `CA`.
    pub name: String,
    /// Element symbol, e.g. `C`.
    pub element: String,
    /// Whether the atom belongs to a protein residue.
    pub is_protein: bool,
}

impl Atom {
    /// Atom record from its name, element symbol and protein flag.
    pub fn new(
        name: impl Into<String>,
        element: impl Into<String>,
        is_protein: bool,
    ) -> Self {
        Self {
            name: name.into(),
            element: element.into(),
            is_protein,
        }
    }

    /// Whether this atom is named N, CA or C.
    #[must_use]
    pub fn is_backbone(&self) -> bool {
        BACKBONE_NAMES.contains(&self.name.trim())
    }

    /// Whether this atom is a hydrogen.
    #[must_use]
    pub fn is_hydrogen(&self) -> bool {
        self.element.trim().eq_ignore_ascii_case("H")
    }
}

/// Ordered atom records of a full simulated system.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Topology {
    atoms: Vec<Atom>,
}

impl Topology {
    /// Topology over the given atoms, in order.
    #[must_use]
    pub fn new(atoms: Vec<Atom>) -> Self {
        Self { atoms }
    }

    /// Total atom count, solvent and ions included.
    #[must_use]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// All atoms in topology order.
    #[must_use]
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// Leading run of protein atoms with their topology indices.
    ///
    /// Iteration stops at the first non-protein atom; protein atoms that
    /// appear after solvent or ligands are not visited.
    pub fn protein_prefix(&self) -> impl Iterator<Item = (usize, &Atom)> {
        self.atoms.iter().enumerate().take_while(|(_, a)| a.is_protein)
    }

    /// Read a topology from a structure file (PDB or mmCIF, by extension).
    pub fn load(path: &Path) -> Result<Self, DecodeError> {
        let coords = structure_file_to_coords(path)
            .map_err(|e| DecodeError::StructureLoad(e.to_string()))?;
        let topology = Self::from_coords(&coords);
        log::debug!(
            "loaded topology of {} atoms ({} protein) from {}",
            topology.atom_count(),
            topology.atoms.iter().filter(|a| a.is_protein).count(),
            path.display()
        );
        Ok(topology)
    }

    /// Topology over parsed structure coordinates, in file order.
    ///
    /// An atom is protein when its residue belongs to a protein entity.
    /// Atoms without a known element get the first letter of their name.
    #[must_use]
    pub fn from_coords(coords: &Coords) -> Self {
        let protein_residues: HashSet<ResidueKey> = split_into_entities(coords)
            .iter()
            .filter(|e| e.molecule_type == MoleculeType::Protein)
            .flat_map(|e| {
                (0..e.coords.num_atoms).map(move |i| residue_key(&e.coords, i))
            })
            .collect();

        (0..coords.num_atoms)
            .map(|i| {
                let name = std::str::from_utf8(&coords.atom_names[i])
                    .unwrap_or("")
                    .trim_matches(|c: char| c == ' ' || c == '\0');
                let element = match coords.elements.get(i) {
                    Some(Element::Unknown) | None => name
                        .chars()
                        .find(char::is_ascii_alphabetic)
                        .map(String::from)
                        .unwrap_or_default(),
                    Some(el) => format!("{el:?}"),
                };
                let is_protein =
                    protein_residues.contains(&residue_key(coords, i));
                Atom::new(name, element, is_protein)
            })
            .collect()
    }
}

impl FromIterator<Atom> for Topology {
    fn from_iter<I: IntoIterator<Item = Atom>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Chain, residue number and residue name per atom.
type ResidueKey = (u8, i32, [u8; 3]);

fn residue_key(coords: &Coords, i: usize) -> ResidueKey {
    (coords.chain_ids[i], coords.res_nums[i], coords.res_names[i])
}
