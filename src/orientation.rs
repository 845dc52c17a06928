//! Fitting an idealised direction set onto the ligands an atom actually has.
//!
//! The search is a coarse, deterministic approximation: every idealised slot
//! is tried as the image of the first ligand, combined with a fixed number of
//! roll steps about that ligand's axis. Slot assignment afterwards is greedy.

use std::f32::consts::TAU;

use glam::{Quat, Vec3};

/// Roll steps per full turn about the anchor ligand.
pub const ROLL_STEPS: usize = 12;

/// Unit direction from `from` to `to`, or [`DEFAULT_AXIS`](crate::geometry::DEFAULT_AXIS)
/// when the points coincide.
pub fn direction_between(from: Vec3, to: Vec3) -> Vec3 {
    (to - from)
        .try_normalize()
        .unwrap_or(crate::geometry::DEFAULT_AXIS)
}

/// Finds the rotation that best maps `ideal` onto `actual`.
///
/// `actual[0]` anchors the search. The score of a candidate sums, over the
/// remaining actual directions, the distance to the nearest rotated ideal
/// direction (excluding the anchored slot). Ties keep the first candidate.
pub fn best_rotation(ideal: &[Vec3], actual: &[Vec3]) -> Quat {
    let Some(&anchor) = actual.first() else {
        return Quat::IDENTITY;
    };

    let mut best = Quat::IDENTITY;
    let mut best_score = f32::INFINITY;
    for (slot, ideal_dir) in ideal.iter().enumerate() {
        let align = Quat::from_rotation_arc(*ideal_dir, anchor);
        for step in 0..ROLL_STEPS {
            let roll = Quat::from_axis_angle(anchor, step as f32 / ROLL_STEPS as f32 * TAU);
            let candidate = roll * align;
            let score = mismatch(ideal, slot, candidate, &actual[1..]);
            if score < best_score {
                best_score = score;
                best = candidate;
            }
        }
    }
    best
}

fn mismatch(ideal: &[Vec3], anchored: usize, rotation: Quat, remaining: &[Vec3]) -> f32 {
    let rotated: Vec<Vec3> = ideal
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != anchored)
        .map(|(_, direction)| rotation * *direction)
        .collect();
    remaining
        .iter()
        .map(|actual| {
            rotated
                .iter()
                .map(|candidate| actual.distance(*candidate))
                .fold(f32::INFINITY, f32::min)
        })
        .sum()
}

/// Greedy one-to-one assignment of `directions` to `slots`.
///
/// Each direction, in order, takes the closest slot not yet taken. Entries
/// are `None` only when the slots run out.
pub fn assign_slots(slots: &[Vec3], directions: &[Vec3]) -> Vec<Option<usize>> {
    let mut used = vec![false; slots.len()];
    directions
        .iter()
        .map(|direction| {
            let mut best: Option<(usize, f32)> = None;
            for (index, slot) in slots.iter().enumerate() {
                if used[index] {
                    continue;
                }
                let distance = direction.distance(*slot);
                if best.map_or(true, |(_, best_distance)| distance < best_distance) {
                    best = Some((index, distance));
                }
            }
            best.map(|(index, _)| {
                used[index] = true;
                index
            })
        })
        .collect()
}

/// Result of fitting an atom's surroundings to its ideal geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct LigandLayout {
    pub rotation: Quat,
    /// Rotated idealised directions.
    pub slots: Vec<Vec3>,
    /// Slot index per ligand, in the order the ligands were given.
    pub assignment: Vec<Option<usize>>,
    /// Slots left over after ligand assignment, reserved for lone pairs.
    pub lone_pairs: Vec<Vec3>,
}

impl LigandLayout {
    pub fn solve(ideal: &[Vec3], actual: &[Vec3], lone_pair_count: usize) -> Self {
        let rotation = best_rotation(ideal, actual);
        let slots: Vec<Vec3> = ideal.iter().map(|direction| rotation * *direction).collect();
        let assignment = assign_slots(&slots, actual);
        let lone_pairs = slots
            .iter()
            .enumerate()
            .filter(|(index, _)| !assignment.contains(&Some(*index)))
            .map(|(_, slot)| *slot)
            .take(lone_pair_count)
            .collect();
        Self {
            rotation,
            slots,
            assignment,
            lone_pairs,
        }
    }

    pub fn ligand_direction(&self, index: usize) -> Option<Vec3> {
        self.assignment
            .get(index)
            .copied()
            .flatten()
            .map(|slot| self.slots[slot])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ideal_directions;

    const TETRAHEDRAL_ANGLE: f32 = 109.471_22;

    #[test]
    fn no_ligands_gives_identity() {
        let ideal = ideal_directions(4).unwrap();
        assert_eq!(best_rotation(ideal, &[]), Quat::IDENTITY);
    }

    #[test]
    fn anchor_lands_on_a_slot() {
        let ideal = ideal_directions(4).unwrap();
        let anchor = Vec3::new(0.3, -0.8, 0.2).normalize();
        let rotation = best_rotation(ideal, &[anchor]);
        let closest = ideal
            .iter()
            .map(|direction| (rotation * *direction).distance(anchor))
            .fold(f32::INFINITY, f32::min);
        assert!(closest < 1e-5);
    }

    #[test]
    fn recovers_rotated_tetrahedron() {
        let ideal = ideal_directions(4).unwrap();
        // A rotation the search can hit exactly: slot 0 onto the anchor, two roll steps.
        let anchor = Vec3::new(0.2, 0.9, -0.4).normalize();
        let true_rotation = Quat::from_axis_angle(anchor, 2.0 * TAU / ROLL_STEPS as f32)
            * Quat::from_rotation_arc(ideal[0], anchor);
        let actual: Vec<Vec3> = ideal.iter().map(|d| true_rotation * *d).collect();
        let layout = LigandLayout::solve(ideal, &actual, 0);
        for (index, direction) in actual.iter().enumerate() {
            let assigned = layout.ligand_direction(index).unwrap();
            assert!(assigned.distance(*direction) < 1e-4);
        }
    }

    #[test]
    fn assignment_is_one_to_one() {
        let slots = ideal_directions(4).unwrap();
        // Every direction is nearest to slot 0, but each gets its own slot.
        let directions = vec![slots[0]; 4];
        let assignment = assign_slots(slots, &directions);
        let mut taken: Vec<usize> = assignment.iter().map(|slot| slot.unwrap()).collect();
        taken.sort_unstable();
        assert_eq!(taken, vec![0, 1, 2, 3]);
        assert_eq!(assign_slots(&slots[..1], &directions)[1], None);
    }

    #[test]
    fn distorted_ligands_snap_to_tetrahedral_slots() {
        let ideal = ideal_directions(4).unwrap();
        let actual = [
            Vec3::X,
            Vec3::new(-0.5, 0.866, 0.0),
            Vec3::new(-0.5, -0.866, 0.0),
        ];
        let layout = LigandLayout::solve(ideal, &actual, 1);
        let assigned: Vec<Vec3> = (0..3).map(|i| layout.ligand_direction(i).unwrap()).collect();
        for (i, a) in assigned.iter().enumerate() {
            for b in &assigned[i + 1..] {
                assert!((a.angle_between(*b).to_degrees() - TETRAHEDRAL_ANGLE).abs() < 0.1);
            }
        }
        assert_eq!(layout.lone_pairs.len(), 1);
        for direction in &assigned {
            assert!(layout.lone_pairs[0].distance(*direction) > 0.1);
        }
    }

    #[test]
    fn lone_pairs_limited_by_count() {
        let ideal = ideal_directions(6).unwrap();
        let layout = LigandLayout::solve(ideal, &[Vec3::X, Vec3::NEG_X], 2);
        assert_eq!(layout.lone_pairs.len(), 2);
    }

    #[test]
    fn coincident_points_fall_back_to_default_axis() {
        assert_eq!(direction_between(Vec3::ONE, Vec3::ONE), Vec3::X);
        assert_eq!(direction_between(Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0)), Vec3::Y);
    }
}
