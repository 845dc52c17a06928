//! Positioning new atoms and re-laying out the ligands of existing ones.

use glam::Vec3;

use crate::element::HasElementData;
use crate::geometry::{ideal_directions, DEFAULT_AXIS};
use crate::molecule::{AtomId, Molecule};
use crate::orientation::{best_rotation, direction_between, LigandLayout};

/// Each step of bond order above one shortens the bond by this much.
pub const BOND_ORDER_CONTRACTION: f32 = 0.1;

/// Sum of the radii, pulled in linearly for multiple bonds.
pub fn ideal_bond_length(a: &impl HasElementData, b: &impl HasElementData, order: u8) -> f32 {
    a.radius() + b.radius() - f32::from(order.saturating_sub(1)) * BOND_ORDER_CONTRACTION
}

impl Molecule {
    /// Unit directions from `id` to each ligand, in bond creation order.
    pub fn ligand_directions(&self, id: AtomId) -> Vec<Vec3> {
        let Some(center) = self.get_atom(id) else {
            return Vec::new();
        };
        self.ligands(id)
            .into_iter()
            .filter_map(|(ligand, _)| self.get_atom(ligand))
            .map(|ligand| direction_between(center.position, ligand.position))
            .collect()
    }

    /// Where an atom of `new_atom`'s element should go when bonded to `target`.
    ///
    /// Picks, among the idealised directions for the target's future steric
    /// number, the one farthest (by smallest angle) from every occupied
    /// ligand and lone-pair direction.
    pub fn new_atom_position(
        &self,
        target: AtomId,
        new_atom: &impl HasElementData,
    ) -> Option<Vec3> {
        let target_atom = self.get_atom(target)?;
        let ligand_count = self.ligand_count(target);
        let future_steric = ligand_count + 1 + self.lone_pair_count(target);
        let ideal = ideal_directions(future_steric)
            .or_else(|| ideal_directions(ligand_count + 1))
            .or_else(|| ideal_directions(4))
            .unwrap_or(std::slice::from_ref(&DEFAULT_AXIS));

        let ligand_dirs = self.ligand_directions(target);
        let rotation = if ideal.len() > 1 {
            best_rotation(ideal, &ligand_dirs)
        } else {
            glam::Quat::IDENTITY
        };
        let rotated: Vec<Vec3> = ideal.iter().map(|direction| rotation * *direction).collect();

        let used: Vec<Vec3> = ligand_dirs
            .iter()
            .chain(target_atom.lone_pair_directions())
            .copied()
            .collect();
        let direction = most_open_direction(&rotated, &used)
            .or_else(|| first_unclaimed_direction(&rotated, &used))
            .unwrap_or(DEFAULT_AXIS);

        let length = ideal_bond_length(target_atom, new_atom, 1);
        Some(target_atom.position + direction.normalize_or_zero() * length)
    }

    /// Re-lays out every ligand of `center` onto its best-fit ideal geometry.
    ///
    /// Ligands move onto their assigned direction at the ideal bond length
    /// with zeroed velocity. Atoms without ligands, or with several ligands
    /// and a steric number that has no geometry, are left alone.
    pub fn update_atom_geometry(&mut self, center: AtomId) {
        let Some(center_atom) = self.get_atom(center) else {
            return;
        };
        let center_position = center_atom.position;
        let center_element = center_atom.element;
        let ligands: Vec<(AtomId, u8)> = self
            .ligands(center)
            .into_iter()
            .map(|(ligand, bond)| (ligand, bond.order))
            .collect();
        if ligands.is_empty() {
            return;
        }

        // A single ligand constrains only two rotational degrees of freedom:
        // keep its direction and correct the distance.
        if let [(ligand, order)] = ligands.as_slice() {
            let Some(ligand_atom) = self.get_atom_mut(*ligand) else {
                return;
            };
            let direction = direction_between(center_position, ligand_atom.position);
            let length = ideal_bond_length(center_element, &*ligand_atom, *order);
            ligand_atom.position = center_position + direction * length;
            ligand_atom.velocity = Vec3::ZERO;
            if let Some(center_atom) = self.get_atom_mut(center) {
                center_atom.set_lone_pair_directions(Vec::new());
            }
            return;
        }

        let Some(ideal) = ideal_directions(self.steric_number(center)) else {
            return;
        };

        let actual = self.ligand_directions(center);
        let lone_pairs = self.lone_pair_count(center) as usize;
        let layout = LigandLayout::solve(ideal, &actual, lone_pairs);

        for (index, (ligand, order)) in ligands.iter().enumerate() {
            let Some(direction) = layout.ligand_direction(index) else {
                continue;
            };
            let Some(ligand_atom) = self.get_atom_mut(*ligand) else {
                continue;
            };
            let length = ideal_bond_length(center_element, &*ligand_atom, *order);
            ligand_atom.position = center_position + direction.normalize_or_zero() * length;
            ligand_atom.velocity = Vec3::ZERO;
        }
        if let Some(center_atom) = self.get_atom_mut(center) {
            center_atom.set_lone_pair_directions(layout.lone_pairs);
        }
    }
}

/// The candidate maximising the minimum angle to every used direction.
fn most_open_direction(candidates: &[Vec3], used: &[Vec3]) -> Option<Vec3> {
    let mut best = None;
    let mut best_clearance = -1.0;
    for candidate in candidates {
        let clearance = used
            .iter()
            .map(|occupied| candidate.angle_between(*occupied))
            .reduce(f32::min)
            .unwrap_or(std::f32::consts::PI);
        if clearance > best_clearance {
            best_clearance = clearance;
            best = Some(*candidate);
        }
    }
    best
}

/// First candidate not nearest to any used direction.
fn first_unclaimed_direction(candidates: &[Vec3], used: &[Vec3]) -> Option<Vec3> {
    let claimed: Vec<usize> = used
        .iter()
        .filter_map(|occupied| {
            candidates
                .iter()
                .enumerate()
                .map(|(index, candidate)| (index, candidate.angle_between(*occupied)))
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(index, _)| index)
        })
        .collect();
    candidates
        .iter()
        .enumerate()
        .find(|(index, _)| !claimed.contains(index))
        .map(|(_, candidate)| *candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::element;

    #[test]
    fn bond_length_contracts_with_order() {
        let c = element("C").unwrap();
        let o = element("O").unwrap();
        assert!((ideal_bond_length(c, o, 1) - 1.30).abs() < 1e-5);
        assert!((ideal_bond_length(c, o, 2) - 1.20).abs() < 1e-5);
        assert!((ideal_bond_length(c, o, 3) - 1.10).abs() < 1e-5);
    }

    #[test]
    fn first_neighbor_goes_at_bond_length() {
        let mut molecule = Molecule::new("test");
        let c = molecule.insert_atom(element("C").unwrap(), Vec3::new(1.0, 2.0, 3.0));
        let h = element("H").unwrap();
        let position = molecule.new_atom_position(c, h).unwrap();
        assert!((position.distance(Vec3::new(1.0, 2.0, 3.0)) - 1.07).abs() < 1e-5);
    }

    #[test]
    fn new_position_avoids_existing_ligand() {
        let mut molecule = Molecule::new("test");
        let o = molecule.insert_atom(element("O").unwrap(), Vec3::ZERO);
        let h1 = molecule.insert_atom(element("H").unwrap(), Vec3::new(0.97, 0.0, 0.0));
        molecule.add_bond(o, h1).unwrap();
        let position = molecule.new_atom_position(o, element("H").unwrap()).unwrap();
        let angle = position.angle_between(Vec3::X).to_degrees();
        // Future steric number 4: the new hydrogen takes a tetrahedral slot.
        assert!((angle - 109.47).abs() < 0.5, "angle was {angle}");
    }

    #[test]
    fn missing_target_has_no_position() {
        let mut molecule = Molecule::new("test");
        let c = molecule.insert_atom(element("C").unwrap(), Vec3::ZERO);
        molecule.remove_atom(c);
        assert!(molecule.new_atom_position(c, element("H").unwrap()).is_none());
    }

    #[test]
    fn single_ligand_keeps_direction() {
        let mut molecule = Molecule::new("test");
        let c = molecule.insert_atom(element("C").unwrap(), Vec3::ZERO);
        let h = molecule.insert_atom(element("H").unwrap(), Vec3::new(3.0, 4.0, 0.0));
        molecule.add_bond(c, h).unwrap();
        molecule.update_atom_geometry(c);
        let position = molecule.get_atom(h).unwrap().position;
        assert!((position.length() - 1.07).abs() < 1e-5);
        assert!(position.normalize().distance(Vec3::new(0.6, 0.8, 0.0)) < 1e-5);
    }

    #[test]
    fn update_is_idempotent() {
        let mut molecule = Molecule::new("test");
        let n = molecule.insert_atom(element("N").unwrap(), Vec3::ZERO);
        let spots = [
            Vec3::new(1.0, 0.2, 0.0),
            Vec3::new(-0.3, 1.0, 0.1),
            Vec3::new(0.1, -0.4, 1.0),
        ];
        for spot in spots {
            let h = molecule.insert_atom(element("H").unwrap(), spot);
            molecule.add_bond(n, h).unwrap();
        }
        molecule.update_atom_geometry(n);
        let first: Vec<Vec3> = molecule.atoms_in_order().map(|a| a.position).collect();
        molecule.update_atom_geometry(n);
        let second: Vec<Vec3> = molecule.atoms_in_order().map(|a| a.position).collect();
        for (a, b) in first.iter().zip(&second) {
            assert!(a.distance(*b) < 1e-5);
        }
    }

    #[test]
    fn lone_pairs_reserved_after_update() {
        let mut molecule = Molecule::new("ammonia");
        let n = molecule.insert_atom(element("N").unwrap(), Vec3::ZERO);
        for spot in [Vec3::X, Vec3::Y, Vec3::Z] {
            let h = molecule.insert_atom(element("H").unwrap(), spot);
            molecule.add_bond(n, h).unwrap();
        }
        molecule.update_atom_geometry(n);
        let reserved = molecule.get_atom(n).unwrap().lone_pair_directions().to_vec();
        assert_eq!(reserved.len(), 1);
        for direction in molecule.ligand_directions(n) {
            assert!((direction.angle_between(reserved[0]).to_degrees() - 109.47).abs() < 0.5);
        }
    }

    #[test]
    fn no_geometry_is_a_no_op() {
        let mut molecule = Molecule::new("test");
        // Zinc: twelve valence electrons push the steric number past six.
        let zn = molecule.insert_atom(element("Zn").unwrap(), Vec3::ZERO);
        let spots = [Vec3::new(5.0, 0.0, 0.0), Vec3::new(0.0, 5.0, 0.0)];
        for spot in spots {
            let cl = molecule.insert_atom(element("Cl").unwrap(), spot);
            molecule.add_bond(zn, cl).unwrap();
        }
        assert!(molecule.steric_number(zn) > 6);
        molecule.update_atom_geometry(zn);
        let positions: Vec<Vec3> = molecule.atoms_in_order().skip(1).map(|a| a.position).collect();
        assert_eq!(positions, spots.to_vec());
    }

    #[test]
    fn most_open_prefers_clearance() {
        let candidates = [Vec3::X, Vec3::Y, Vec3::NEG_X];
        assert_eq!(most_open_direction(&candidates, &[Vec3::X]), Some(Vec3::NEG_X));
        assert_eq!(most_open_direction(&candidates, &[]), Some(Vec3::X));
        assert_eq!(most_open_direction(&[], &[Vec3::X]), None);
    }

    #[test]
    fn unclaimed_skips_nearest_slots() {
        let candidates = [Vec3::X, Vec3::Y, Vec3::Z];
        assert_eq!(first_unclaimed_direction(&candidates, &[Vec3::X, Vec3::Y]), Some(Vec3::Z));
    }
}
