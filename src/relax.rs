//! Force-directed relaxation run once per rendered frame.

use std::collections::HashSet;

use glam::Vec3;
use log::trace;
use serde::{Deserialize, Serialize};

use crate::molecule::{AtomId, Molecule};
use crate::placement::ideal_bond_length;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelaxConfig {
    /// Numerator of the inverse-cube pair repulsion.
    pub repulsion_strength: f32,
    /// Spring constant per unit of bond order.
    pub bond_stiffness: f32,
    /// Velocity multiplier applied every step.
    pub damping: f32,
    /// Upper bound on a single step, guarding against frame hitches.
    pub max_time_step: f32,
    /// Pairs closer than this exert no repulsion.
    pub min_distance: f32,
    /// Skip repulsion between directly bonded atoms.
    pub exclude_bonded_pairs: bool,
    /// Move the centroid back to the origin after each step.
    pub recenter: bool,
}

impl Default for RelaxConfig {
    fn default() -> Self {
        Self {
            repulsion_strength: 0.8,
            bond_stiffness: 30.0,
            damping: 0.95,
            max_time_step: 0.1,
            min_distance: 1e-4,
            exclude_bonded_pairs: true,
            recenter: false,
        }
    }
}

/// Advances the layout by one damped step of `dt`.
///
/// `pinned` (the atom under the pointer, if any) keeps its position and
/// velocity. `dt` is clamped to `[0, max_time_step]`; a non-finite `dt` or
/// a non-positive bound leaves the layout untouched.
pub fn relax_step(molecule: &mut Molecule, config: &RelaxConfig, dt: f32, pinned: Option<AtomId>) {
    if molecule.atom_count() < 2 || !dt.is_finite() {
        return;
    }
    let dt = dt.min(config.max_time_step).max(0.0);
    if dt == 0.0 {
        return;
    }
    let ids = molecule.atom_ids();

    let bonded: HashSet<(AtomId, AtomId)> = if config.exclude_bonded_pairs {
        molecule
            .bonds()
            .flat_map(|bond| [(bond.a, bond.b), (bond.b, bond.a)])
            .collect()
    } else {
        HashSet::new()
    };

    let positions: Vec<Vec3> = ids
        .iter()
        .filter_map(|id| molecule.get_atom(*id).map(|atom| atom.position))
        .collect();
    let mut forces = vec![Vec3::ZERO; positions.len()];

    for i in 0..positions.len() {
        for j in i + 1..positions.len() {
            if bonded.contains(&(ids[i], ids[j])) {
                continue;
            }
            let delta = positions[i] - positions[j];
            let distance = delta.length();
            if distance < config.min_distance {
                continue;
            }
            let force = delta * (config.repulsion_strength / (distance * distance * distance));
            forces[i] += force;
            forces[j] -= force;
        }
    }

    let index_of = |id: AtomId| ids.iter().position(|entry| *entry == id);
    for bond in molecule.bonds() {
        let (Some(i), Some(j)) = (index_of(bond.a), index_of(bond.b)) else {
            continue;
        };
        let (Some(a), Some(b)) = (molecule.get_atom(bond.a), molecule.get_atom(bond.b)) else {
            continue;
        };
        let ideal = ideal_bond_length(a, b, bond.order);
        let delta = positions[i] - positions[j];
        let displacement = delta.length() - ideal;
        let force = delta.normalize_or_zero()
            * (-config.bond_stiffness * displacement * f32::from(bond.order));
        forces[i] += force;
        forces[j] -= force;
    }

    for (id, force) in ids.iter().zip(forces) {
        let Some(atom) = molecule.get_atom_mut(*id) else {
            continue;
        };
        atom.force = force;
        if Some(*id) == pinned {
            continue;
        }
        atom.velocity += force * dt;
        atom.velocity *= config.damping;
        atom.position += atom.velocity * dt;
    }

    if config.recenter && pinned.is_none() {
        recenter(molecule);
    }
    trace!("relaxed {} atoms over {dt:.4}", ids.len());
}

pub fn recenter(molecule: &mut Molecule) {
    let ids = molecule.atom_ids();
    if ids.is_empty() {
        return;
    }
    let centroid = molecule
        .atoms_in_order()
        .fold(Vec3::ZERO, |sum, atom| sum + atom.position)
        / ids.len() as f32;
    molecule.translate_atoms(&ids, -centroid);
}
