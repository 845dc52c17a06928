//! Materialising a parsed structure (atom list plus bond list) in the scene.

use std::collections::VecDeque;

use glam::Vec3;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::element::element;
use crate::error::StructureError;
use crate::molecule::{AtomId, MAX_BOND_ORDER};
use crate::scene::Scene;

/// Distance along X between the roots of disconnected input fragments.
const FRAGMENT_SPACING: f32 = 4.0;

/// Upper bound on full sweeps of [`Scene::saturate_with_multiple_bonds`].
const MAX_SATURATION_SWEEPS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BondSpec {
    pub from: usize,
    pub to: usize,
    #[serde(default = "single_bond")]
    pub order: u8,
}

fn single_bond() -> u8 {
    1
}

/// Element symbols plus index-based bonds, as produced by a formula parser
/// or read from JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureSpec {
    pub atoms: Vec<String>,
    pub bonds: Vec<BondSpec>,
    /// Promote bonds to fill every open valence after building.
    pub saturate: bool,
}

impl StructureSpec {
    pub fn validate(&self) -> Result<(), StructureError> {
        for symbol in &self.atoms {
            if element(symbol).is_none() {
                return Err(StructureError::UnknownElement(symbol.clone()));
            }
        }
        let count = self.atoms.len();
        for (index, bond) in self.bonds.iter().enumerate() {
            for end in [bond.from, bond.to] {
                if end >= count {
                    return Err(StructureError::BondIndexOutOfRange {
                        bond: index,
                        index: end,
                        count,
                    });
                }
            }
            if bond.from == bond.to {
                return Err(StructureError::SelfBond(index));
            }
        }
        Ok(())
    }

    /// `(neighbour, bond index)` pairs for `atom`, in bond-list order.
    fn neighbors(&self, atom: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.bonds.iter().enumerate().filter_map(move |(index, bond)| {
            if bond.from == atom {
                Some((bond.to, index))
            } else if bond.to == atom {
                Some((bond.from, index))
            } else {
                None
            }
        })
    }
}

impl Scene {
    /// Replaces the scene with `spec`.
    ///
    /// Each connected part is grown breadth-first from its first atom, every
    /// new atom going to the most open slot of the atom it hangs from. Bonds
    /// that would break a valence limit are skipped. Returns the new atom ids
    /// in the order of `spec.atoms`.
    pub fn build_structure(&mut self, spec: &StructureSpec) -> Result<Vec<AtomId>, StructureError> {
        spec.validate()?;
        self.reset();

        let mut ids: Vec<Option<AtomId>> = vec![None; spec.atoms.len()];
        let mut tree_bonds = vec![false; spec.bonds.len()];
        let mut roots = 0;
        for root in 0..spec.atoms.len() {
            if ids[root].is_some() {
                continue;
            }
            let Some(data) = element(&spec.atoms[root]) else {
                continue;
            };
            let origin = Vec3::new(roots as f32 * FRAGMENT_SPACING, 0.0, 0.0);
            ids[root] = Some(self.add_atom(data, origin));
            roots += 1;

            let mut queue = VecDeque::from([root]);
            while let Some(parent) = queue.pop_front() {
                let Some(parent_id) = ids[parent] else {
                    continue;
                };
                for (child, bond) in spec.neighbors(parent) {
                    if ids[child].is_some() {
                        continue;
                    }
                    let Some(data) = element(&spec.atoms[child]) else {
                        continue;
                    };
                    let position = self
                        .molecule()
                        .new_atom_position(parent_id, data)
                        .unwrap_or(Vec3::ZERO);
                    let child_id = self.add_atom(data, position);
                    ids[child] = Some(child_id);
                    tree_bonds[bond] = true;
                    self.bond_with_order(parent_id, child_id, spec.bonds[bond].order);
                    queue.push_back(child);
                }
            }
        }

        // Ring closures and anything else not used to grow the tree.
        for (bond, _) in spec.bonds.iter().zip(&tree_bonds).filter(|(_, used)| !**used) {
            if let (Some(a), Some(b)) = (ids[bond.from], ids[bond.to]) {
                self.bond_with_order(a, b, bond.order);
            }
        }

        if spec.saturate {
            self.saturate_with_multiple_bonds();
        }
        self.ensure_connectivity();
        self.update_all_geometry();
        self.update_all_geometry();

        info!(
            "built {} atoms and {} bonds",
            self.molecule().atom_count(),
            self.molecule().bond_count()
        );
        Ok(ids.into_iter().flatten().collect())
    }

    fn bond_with_order(&mut self, a: AtomId, b: AtomId, order: u8) {
        if self.create_bond(a, b).is_none() {
            return;
        }
        for _ in 1..order.min(MAX_BOND_ORDER) {
            if self.increment_bond_order(a, b).is_none() {
                debug!("bond {a}-{b} stopped short of order {order}");
                break;
            }
        }
    }

    /// Raises bond orders until no atom has open valence toward a neighbour
    /// that can take it. Each atom repeatedly promotes the bond to the
    /// neighbour with the most open valence. Returns the number of increments.
    pub fn saturate_with_multiple_bonds(&mut self) -> usize {
        let mut raised = 0;
        for _ in 0..MAX_SATURATION_SWEEPS {
            let mut changed = false;
            for atom in self.molecule().atom_ids() {
                while self.molecule().has_open_valence(atom) {
                    let Some(partner) = self.saturation_partner(atom) else {
                        break;
                    };
                    if self.increment_bond_order(atom, partner).is_none() {
                        break;
                    }
                    raised += 1;
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
        raised
    }

    fn saturation_partner(&self, atom: AtomId) -> Option<AtomId> {
        let molecule = self.molecule();
        let mut best = None;
        let mut best_open = 0;
        for (neighbor, bond) in molecule.ligands(atom) {
            if bond.order >= MAX_BOND_ORDER {
                continue;
            }
            let open = molecule.open_valence(neighbor);
            if open > best_open {
                best_open = open;
                best = Some(neighbor);
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(atoms: &[&str], bonds: &[(usize, usize, u8)], saturate: bool) -> StructureSpec {
        StructureSpec {
            atoms: atoms.iter().map(|s| s.to_string()).collect(),
            bonds: bonds
                .iter()
                .map(|&(from, to, order)| BondSpec { from, to, order })
                .collect(),
            saturate,
        }
    }

    fn angle(scene: &Scene, center: AtomId, a: AtomId, b: AtomId) -> f32 {
        let molecule = scene.molecule();
        let origin = molecule.get_atom(center).unwrap().position;
        let da = molecule.get_atom(a).unwrap().position - origin;
        let db = molecule.get_atom(b).unwrap().position - origin;
        da.angle_between(db).to_degrees()
    }

    #[test]
    fn carbon_dioxide_is_linear() {
        let mut scene = Scene::default();
        let ids = scene
            .build_structure(&spec(&["C", "O", "O"], &[(0, 1, 2), (0, 2, 2)], false))
            .unwrap();
        let molecule = scene.molecule();
        assert_eq!(molecule.bond_count(), 2);
        assert!(molecule.bonds().all(|bond| bond.order == 2));
        assert!((angle(&scene, ids[0], ids[1], ids[2]) - 180.0).abs() < 1.0);
    }

    #[test]
    fn ethylene_saturates_to_double_bond() {
        let mut scene = Scene::default();
        let ids = scene
            .build_structure(&spec(
                &["C", "C", "H", "H", "H", "H"],
                &[(0, 1, 1), (0, 2, 1), (0, 3, 1), (1, 4, 1), (1, 5, 1)],
                true,
            ))
            .unwrap();
        let molecule = scene.molecule();
        let cc = molecule.bond_between(ids[0], ids[1]).unwrap();
        assert_eq!(molecule.get_bond(cc).unwrap().order, 2);
        assert!(!molecule.has_open_valence(ids[0]));
        assert!((angle(&scene, ids[0], ids[2], ids[3]) - 120.0).abs() < 2.0);
    }

    #[test]
    fn saturation_counts_increments() {
        let mut scene = Scene::default();
        scene
            .build_structure(&spec(&["N", "N"], &[(0, 1, 1)], false))
            .unwrap();
        assert_eq!(scene.saturate_with_multiple_bonds(), 2);
        assert_eq!(scene.saturate_with_multiple_bonds(), 0);
    }

    #[test]
    fn over_valent_bonds_are_skipped() {
        let mut scene = Scene::default();
        let ids = scene
            .build_structure(&spec(
                &["O", "H", "H", "H"],
                &[(0, 1, 1), (0, 2, 1), (0, 3, 1)],
                false,
            ))
            .unwrap();
        let molecule = scene.molecule();
        assert_eq!(ids.len(), 4);
        assert_eq!(molecule.bond_order_sum(ids[0]), 2);
        assert!(molecule.bond_between(ids[0], ids[3]).is_none());
    }

    #[test]
    fn disconnected_parts_are_joined() {
        let mut scene = Scene::default();
        scene.build_structure(&spec(&["C", "C"], &[], false)).unwrap();
        assert_eq!(scene.molecule().bond_count(), 1);
        assert_eq!(scene.molecule().components().len(), 1);
    }

    #[test]
    fn invalid_structure_leaves_scene_alone() {
        let mut scene = Scene::default();
        scene.add_element("C", None).unwrap();

        let err = scene.build_structure(&spec(&["C", "Qq"], &[], false)).unwrap_err();
        assert_eq!(err, StructureError::UnknownElement("Qq".into()));
        let err = scene
            .build_structure(&spec(&["C"], &[(0, 3, 1)], false))
            .unwrap_err();
        assert!(matches!(err, StructureError::BondIndexOutOfRange { index: 3, .. }));
        let err = scene
            .build_structure(&spec(&["C"], &[(0, 0, 1)], false))
            .unwrap_err();
        assert_eq!(err, StructureError::SelfBond(0));

        assert_eq!(scene.molecule().atom_count(), 1);
    }

    #[test]
    fn ring_closure_bonds_are_created() {
        let mut scene = Scene::default();
        let ids = scene
            .build_structure(&spec(
                &["C", "C", "C"],
                &[(0, 1, 1), (1, 2, 1), (2, 0, 1)],
                false,
            ))
            .unwrap();
        assert_eq!(scene.molecule().bond_count(), 3);
        assert!(scene.molecule().bond_between(ids[2], ids[0]).is_some());
    }

    #[test]
    fn structure_json_defaults_order() {
        let json = r#"{ "atoms": ["O", "H", "H"], "bonds": [{ "from": 0, "to": 1 }] }"#;
        let spec: StructureSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.bonds[0].order, 1);
        assert!(!spec.saturate);
    }
}
