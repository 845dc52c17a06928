use std::collections::{BTreeMap, HashMap};
use std::fmt;

use glam::Vec3;

use crate::element::{ElementData, HasElementData};
use crate::error::GraphError;

/// Highest bond order the builder models (triple bond).
pub const MAX_BOND_ORDER: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AtomId(u64);

impl AtomId {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AtomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BondId(u64);

impl BondId {
    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Atom {
    pub id: AtomId,
    pub element: &'static ElementData,
    pub position: Vec3,
    pub velocity: Vec3,
    pub force: Vec3,
    bonds: Vec<BondId>,
    lone_pairs: Vec<Vec3>,
}

impl Atom {
    fn new(id: AtomId, element: &'static ElementData, position: Vec3) -> Self {
        Self {
            id,
            element,
            position,
            velocity: Vec3::ZERO,
            force: Vec3::ZERO,
            bonds: Vec::new(),
            lone_pairs: Vec::new(),
        }
    }

    pub fn symbol(&self) -> &'static str {
        self.element.symbol
    }

    pub fn bonds(&self) -> &[BondId] {
        &self.bonds
    }

    /// Unit directions reserved for lone pairs by the last geometry update.
    pub fn lone_pair_directions(&self) -> &[Vec3] {
        &self.lone_pairs
    }

    pub(crate) fn set_lone_pair_directions(&mut self, directions: Vec<Vec3>) {
        self.lone_pairs = directions;
    }
}

impl HasElementData for Atom {
    fn element_data(&self) -> &ElementData {
        self.element
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bond {
    pub id: BondId,
    pub a: AtomId,
    pub b: AtomId,
    pub order: u8,
}

impl Bond {
    pub fn connects(&self, a: AtomId, b: AtomId) -> bool {
        (self.a == a && self.b == b) || (self.a == b && self.b == a)
    }

    pub fn other(&self, atom: AtomId) -> Option<AtomId> {
        if self.a == atom {
            Some(self.b)
        } else if self.b == atom {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Everything removed along with an atom.
#[derive(Debug, Clone)]
pub struct RemovedAtom {
    pub atom: Atom,
    pub bonds: Vec<Bond>,
    pub neighbors: Vec<AtomId>,
}

/// The atom/bond graph.
///
/// Mutations keep three invariants: no bond-order sum above the element's
/// maximum, at most one bond per atom pair, and every bond listed on both of
/// its endpoints.
#[derive(Debug, Clone)]
pub struct Molecule {
    pub name: String,
    atoms: HashMap<AtomId, Atom>,
    atom_order: Vec<AtomId>,
    bonds: BTreeMap<BondId, Bond>,
    next_atom_id: u64,
    next_bond_id: u64,
}

impl Molecule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            atoms: HashMap::new(),
            atom_order: Vec::new(),
            bonds: BTreeMap::new(),
            next_atom_id: 1,
            next_bond_id: 1,
        }
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn atoms_in_order(&self) -> impl Iterator<Item = &Atom> {
        self.atom_order.iter().filter_map(|id| self.atoms.get(id))
    }

    pub fn atom_ids(&self) -> Vec<AtomId> {
        self.atom_order.clone()
    }

    pub fn get_atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(&id)
    }

    pub(crate) fn get_atom_mut(&mut self, id: AtomId) -> Option<&mut Atom> {
        self.atoms.get_mut(&id)
    }

    pub fn bonds(&self) -> impl Iterator<Item = &Bond> {
        self.bonds.values()
    }

    pub fn get_bond(&self, id: BondId) -> Option<&Bond> {
        self.bonds.get(&id)
    }

    pub fn insert_atom(&mut self, element: &'static ElementData, position: Vec3) -> AtomId {
        let id = AtomId(self.next_atom_id);
        self.next_atom_id += 1;
        self.atoms.insert(id, Atom::new(id, element, position));
        self.atom_order.push(id);
        id
    }

    /// Removes an atom and every bond touching it.
    pub fn remove_atom(&mut self, id: AtomId) -> Option<RemovedAtom> {
        let atom = self.atoms.remove(&id)?;
        self.atom_order.retain(|entry| *entry != id);

        let mut bonds = Vec::with_capacity(atom.bonds.len());
        let mut neighbors = Vec::with_capacity(atom.bonds.len());
        for bond_id in &atom.bonds {
            let Some(bond) = self.bonds.remove(bond_id) else {
                continue;
            };
            if let Some(other) = bond.other(id) {
                if let Some(neighbor) = self.atoms.get_mut(&other) {
                    neighbor.bonds.retain(|entry| entry != bond_id);
                }
                if !neighbors.contains(&other) {
                    neighbors.push(other);
                }
            }
            bonds.push(bond);
        }

        Some(RemovedAtom {
            atom,
            bonds,
            neighbors,
        })
    }

    pub fn set_atom_position(&mut self, id: AtomId, position: Vec3) -> Option<()> {
        let atom = self.atoms.get_mut(&id)?;
        atom.position = position;
        Some(())
    }

    /// Moves the given atoms by `offset` as one rigid body.
    pub fn translate_atoms(&mut self, ids: &[AtomId], offset: Vec3) {
        for id in ids {
            if let Some(atom) = self.atoms.get_mut(id) {
                atom.position += offset;
            }
        }
    }

    /// Creates a single bond between two atoms with spare capacity.
    pub fn add_bond(&mut self, a: AtomId, b: AtomId) -> Result<BondId, GraphError> {
        self.ensure_atoms_exist(a, b)?;
        if a == b {
            return Err(GraphError::SelfBond(a));
        }
        if self.bond_between(a, b).is_some() {
            return Err(GraphError::DuplicateBond(a, b));
        }
        self.ensure_valence_available(a)?;
        self.ensure_valence_available(b)?;

        let id = BondId(self.next_bond_id);
        self.next_bond_id += 1;
        self.bonds.insert(
            id,
            Bond {
                id,
                a,
                b,
                order: 1,
            },
        );
        for endpoint in [a, b] {
            if let Some(atom) = self.atoms.get_mut(&endpoint) {
                atom.bonds.push(id);
            }
        }
        Ok(id)
    }

    /// Raises the order of an existing bond by one. Returns the new order.
    pub fn raise_bond_order(&mut self, a: AtomId, b: AtomId) -> Result<u8, GraphError> {
        self.ensure_atoms_exist(a, b)?;
        let id = self.bond_between(a, b).ok_or(GraphError::NoBond(a, b))?;
        self.ensure_valence_available(a)?;
        self.ensure_valence_available(b)?;
        let bond = self.bonds.get_mut(&id).ok_or(GraphError::NoBond(a, b))?;
        if bond.order >= MAX_BOND_ORDER {
            return Err(GraphError::MaxBondOrder(a, b));
        }
        bond.order += 1;
        Ok(bond.order)
    }

    pub fn bond_between(&self, a: AtomId, b: AtomId) -> Option<BondId> {
        let atom = self.atoms.get(&a)?;
        atom.bonds
            .iter()
            .filter_map(|id| self.bonds.get(id))
            .find(|bond| bond.connects(a, b))
            .map(|bond| bond.id)
    }

    /// Bonded neighbours of `id` with the connecting bond, in bond creation order.
    pub fn ligands(&self, id: AtomId) -> Vec<(AtomId, &Bond)> {
        let Some(atom) = self.atoms.get(&id) else {
            return Vec::new();
        };
        atom.bonds
            .iter()
            .filter_map(|bond_id| self.bonds.get(bond_id))
            .filter_map(|bond| bond.other(id).map(|other| (other, bond)))
            .collect()
    }

    pub fn clear(&mut self) {
        self.atoms.clear();
        self.atom_order.clear();
        self.bonds.clear();
    }

    fn ensure_atoms_exist(&self, a: AtomId, b: AtomId) -> Result<(), GraphError> {
        for id in [a, b] {
            if !self.atoms.contains_key(&id) {
                return Err(GraphError::AtomNotFound(id));
            }
        }
        Ok(())
    }

    fn ensure_valence_available(&self, atom_id: AtomId) -> Result<(), GraphError> {
        let atom = self
            .atoms
            .get(&atom_id)
            .ok_or(GraphError::AtomNotFound(atom_id))?;
        let max = atom.element.max_bonds;
        if self.bond_order_sum(atom_id) + 1 > max {
            return Err(GraphError::Saturated {
                atom: atom_id,
                symbol: atom.element.symbol,
                max,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::element;

    fn carbon() -> &'static ElementData {
        element("C").unwrap()
    }

    fn hydrogen() -> &'static ElementData {
        element("H").unwrap()
    }

    #[test]
    fn insert_keeps_order() {
        let mut molecule = Molecule::new("test");
        let a = molecule.insert_atom(carbon(), Vec3::ZERO);
        let b = molecule.insert_atom(hydrogen(), Vec3::X);
        assert_eq!(molecule.atom_ids(), vec![a, b]);
        assert_eq!(molecule.get_atom(b).unwrap().symbol(), "H");
    }

    #[test]
    fn bond_listed_on_both_endpoints() {
        let mut molecule = Molecule::new("test");
        let a = molecule.insert_atom(carbon(), Vec3::ZERO);
        let b = molecule.insert_atom(hydrogen(), Vec3::X);
        let bond = molecule.add_bond(a, b).unwrap();
        assert_eq!(molecule.get_atom(a).unwrap().bonds(), &[bond]);
        assert_eq!(molecule.get_atom(b).unwrap().bonds(), &[bond]);
        assert_eq!(molecule.bond_between(b, a), Some(bond));
    }

    #[test]
    fn duplicate_and_self_bonds_rejected() {
        let mut molecule = Molecule::new("test");
        let a = molecule.insert_atom(carbon(), Vec3::ZERO);
        let b = molecule.insert_atom(carbon(), Vec3::X);
        molecule.add_bond(a, b).unwrap();
        assert_eq!(molecule.add_bond(b, a), Err(GraphError::DuplicateBond(b, a)));
        assert_eq!(molecule.add_bond(a, a), Err(GraphError::SelfBond(a)));
        assert_eq!(molecule.bond_count(), 1);
    }

    #[test]
    fn bond_valence_rejected() {
        let mut molecule = Molecule::new("test");
        let c = molecule.insert_atom(carbon(), Vec3::ZERO);
        for _ in 0..4 {
            let h = molecule.insert_atom(hydrogen(), Vec3::X);
            molecule.add_bond(c, h).unwrap();
        }
        let h5 = molecule.insert_atom(hydrogen(), Vec3::Y);
        let result = molecule.add_bond(c, h5);
        assert!(matches!(result, Err(GraphError::Saturated { max: 4, .. })));
        assert!(molecule.bond_between(c, h5).is_none());
    }

    #[test]
    fn raise_order_caps_at_triple() {
        let mut molecule = Molecule::new("test");
        let a = molecule.insert_atom(carbon(), Vec3::ZERO);
        let b = molecule.insert_atom(carbon(), Vec3::X);
        molecule.add_bond(a, b).unwrap();
        assert_eq!(molecule.raise_bond_order(a, b), Ok(2));
        assert_eq!(molecule.raise_bond_order(b, a), Ok(3));
        assert_eq!(molecule.raise_bond_order(a, b), Err(GraphError::MaxBondOrder(a, b)));
        assert_eq!(molecule.bond_order_sum(a), 3);
    }

    #[test]
    fn raise_order_requires_capacity() {
        let mut molecule = Molecule::new("test");
        let c = molecule.insert_atom(carbon(), Vec3::ZERO);
        let h = molecule.insert_atom(hydrogen(), Vec3::X);
        molecule.add_bond(c, h).unwrap();
        assert!(matches!(
            molecule.raise_bond_order(c, h),
            Err(GraphError::Saturated { .. })
        ));
        let bond = molecule.bond_between(c, h).unwrap();
        assert_eq!(molecule.get_bond(bond).unwrap().order, 1);
    }

    #[test]
    fn remove_atom_cascades_bonds() {
        let mut molecule = Molecule::new("test");
        let c = molecule.insert_atom(carbon(), Vec3::ZERO);
        let h1 = molecule.insert_atom(hydrogen(), Vec3::X);
        let h2 = molecule.insert_atom(hydrogen(), Vec3::Y);
        molecule.add_bond(c, h1).unwrap();
        molecule.add_bond(c, h2).unwrap();

        let removed = molecule.remove_atom(c).unwrap();
        assert_eq!(removed.bonds.len(), 2);
        assert_eq!(removed.neighbors, vec![h1, h2]);
        assert_eq!(molecule.bond_count(), 0);
        assert!(molecule.get_atom(h1).unwrap().bonds().is_empty());
        assert!(molecule.get_atom(h2).unwrap().bonds().is_empty());
        assert!(molecule.remove_atom(c).is_none());
    }

    #[test]
    fn ligands_follow_bond_creation_order() {
        let mut molecule = Molecule::new("test");
        let c = molecule.insert_atom(carbon(), Vec3::ZERO);
        let h1 = molecule.insert_atom(hydrogen(), Vec3::X);
        let h2 = molecule.insert_atom(hydrogen(), Vec3::Y);
        molecule.add_bond(c, h2).unwrap();
        molecule.add_bond(h1, c).unwrap();
        let ligands: Vec<AtomId> = molecule.ligands(c).into_iter().map(|(id, _)| id).collect();
        assert_eq!(ligands, vec![h2, h1]);
    }

    #[test]
    fn translate_moves_only_listed_atoms() {
        let mut molecule = Molecule::new("test");
        let a = molecule.insert_atom(carbon(), Vec3::ZERO);
        let b = molecule.insert_atom(carbon(), Vec3::X);
        molecule.translate_atoms(&[b], Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(molecule.get_atom(a).unwrap().position, Vec3::ZERO);
        assert_eq!(molecule.get_atom(b).unwrap().position, Vec3::new(1.0, 2.0, 0.0));
    }
}
