use std::collections::{HashSet, VecDeque};

use log::debug;

use crate::molecule::{AtomId, Molecule};
use crate::scene::Scene;

impl Molecule {
    /// Connected components, found breadth-first from each unvisited atom in
    /// insertion order. Atoms within a component are in discovery order.
    pub fn components(&self) -> Vec<Vec<AtomId>> {
        let mut visited = HashSet::new();
        let mut components = Vec::new();
        for start in self.atom_ids() {
            if !visited.insert(start) {
                continue;
            }
            let mut component = vec![start];
            let mut queue = VecDeque::from([start]);
            while let Some(current) = queue.pop_front() {
                for (neighbor, _) in self.ligands(current) {
                    if visited.insert(neighbor) {
                        component.push(neighbor);
                        queue.push_back(neighbor);
                    }
                }
            }
            components.push(component);
        }
        components
    }

    /// Atom with the most open valence; ties go to the last one in `component`.
    fn attach_point(&self, component: &[AtomId]) -> Option<AtomId> {
        let mut open: Vec<(AtomId, u32)> = component
            .iter()
            .map(|id| (*id, self.open_valence(*id)))
            .filter(|(_, capacity)| *capacity > 0)
            .collect();
        open.sort_by_key(|(_, capacity)| *capacity);
        open.pop().map(|(id, _)| id)
    }
}

impl Scene {
    /// Bonds disconnected fragments onto the largest component until one
    /// component remains or no attach point is left. Returns the number of
    /// bonds added.
    pub fn ensure_connectivity(&mut self) -> usize {
        let mut added = 0;
        loop {
            let mut components = self.molecule().components();
            if components.len() < 2 {
                break;
            }
            components.sort_by(|a, b| b.len().cmp(&a.len()));
            let (main, fragment) = (&components[0], &components[1]);

            let molecule = self.molecule();
            let (Some(from), Some(to)) =
                (molecule.attach_point(main), molecule.attach_point(fragment))
            else {
                debug!("no attach point left for a fragment of {} atoms", fragment.len());
                break;
            };
            let Some(to_atom) = molecule.get_atom(to) else {
                break;
            };
            let Some(target) = molecule.new_atom_position(from, to_atom) else {
                break;
            };
            let offset = target - to_atom.position;
            let fragment = fragment.clone();
            self.molecule_mut().translate_atoms(&fragment, offset);
            if self.create_bond(from, to).is_none() {
                break;
            }
            added += 1;
        }
        added
    }
}
