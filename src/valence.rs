//! Electron bookkeeping for atoms in a [`Molecule`].
//!
//! Every query answers zero for an atom that does not exist.

use crate::molecule::{AtomId, Molecule};

impl Molecule {
    pub fn bond_order_sum(&self, id: AtomId) -> u32 {
        self.ligands(id)
            .iter()
            .map(|(_, bond)| u32::from(bond.order))
            .sum()
    }

    pub fn ligand_count(&self, id: AtomId) -> u32 {
        self.get_atom(id)
            .map(|atom| atom.bonds().len() as u32)
            .unwrap_or(0)
    }

    /// `floor((valence - bond order sum) / 2)`, never negative.
    pub fn lone_pair_count(&self, id: AtomId) -> u32 {
        let Some(atom) = self.get_atom(id) else {
            return 0;
        };
        let valence = atom.element.valence_electrons();
        valence.saturating_sub(self.bond_order_sum(id)) / 2
    }

    /// Ligands plus lone pairs; selects the electron-domain geometry.
    pub fn steric_number(&self, id: AtomId) -> u32 {
        self.ligand_count(id) + self.lone_pair_count(id)
    }

    pub fn formal_charge(&self, id: AtomId) -> i32 {
        let Some(atom) = self.get_atom(id) else {
            return 0;
        };
        let valence = atom.element.valence_electrons() as i32;
        if valence == 0 {
            return 0;
        }
        valence - 2 * self.lone_pair_count(id) as i32 - self.bond_order_sum(id) as i32
    }

    /// Bond orders the atom can still accept.
    pub fn open_valence(&self, id: AtomId) -> u32 {
        self.get_atom(id)
            .map(|atom| atom.element.max_bonds.saturating_sub(self.bond_order_sum(id)))
            .unwrap_or(0)
    }

    pub fn has_open_valence(&self, id: AtomId) -> bool {
        self.open_valence(id) > 0
    }
}
