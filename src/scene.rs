//! The interactive builder: one [`Molecule`] plus selection and gesture state.
//!
//! Every user request either succeeds or silently does nothing. Refusals are
//! logged at debug level and reported through `Option`/`bool` returns.

use glam::Vec3;
use log::debug;

use crate::config::Config;
use crate::element::{element, ElementData};
use crate::molecule::{AtomId, BondId, Molecule};
use crate::relax::relax_step;

/// Ghost position offered for attaching a new atom to `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementPreview {
    pub target: AtomId,
    pub position: Vec3,
}

/// Outcome of one click in the two-click bonding gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BondGesture {
    /// First atom remembered; waiting for the second.
    Anchored(AtomId),
    /// A bond was created or its order raised.
    Bonded(BondId),
    /// The request was refused or the anchor was clicked again.
    Cleared,
}

#[derive(Debug, Clone)]
pub struct Scene {
    molecule: Molecule,
    config: Config,
    selected: Option<AtomId>,
    bond_anchor: Option<AtomId>,
    dragged: Option<AtomId>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Scene {
    pub fn new(config: Config) -> Self {
        Self {
            molecule: Molecule::new("molecule"),
            config,
            selected: None,
            bond_anchor: None,
            dragged: None,
        }
    }

    pub fn molecule(&self) -> &Molecule {
        &self.molecule
    }

    pub(crate) fn molecule_mut(&mut self) -> &mut Molecule {
        &mut self.molecule
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    pub fn selected(&self) -> Option<AtomId> {
        self.selected
    }

    pub fn bond_anchor(&self) -> Option<AtomId> {
        self.bond_anchor
    }

    pub fn dragged(&self) -> Option<AtomId> {
        self.dragged
    }

    pub fn add_atom(&mut self, element: &'static ElementData, position: Vec3) -> AtomId {
        self.molecule.insert_atom(element, position)
    }

    /// Periodic-table click: adds `symbol` to the structure.
    ///
    /// An empty scene gets a free atom at the origin. Otherwise the atom is
    /// attached to `target` when given, else to the only open atom, else to
    /// the first open atom in insertion order.
    pub fn add_element(&mut self, symbol: &str, target: Option<AtomId>) -> Option<AtomId> {
        let Some(data) = element(symbol) else {
            debug!("unknown element {symbol:?}");
            return None;
        };
        if self.molecule.is_empty() {
            return Some(self.add_atom(data, Vec3::ZERO));
        }
        if !self.element_available(symbol) {
            debug!("{} cannot join the current structure", data.symbol);
            return None;
        }
        let target = match target {
            Some(target) => target,
            None => *self.placement_targets().first()?,
        };
        self.place_atom(data.symbol, target)
    }

    /// Whether the periodic table should offer `symbol` right now.
    pub fn element_available(&self, symbol: &str) -> bool {
        let Some(data) = element(symbol) else {
            return false;
        };
        if self.molecule.is_empty() {
            return true;
        }
        data.max_bonds > 0 && !self.placement_targets().is_empty()
    }

    /// Atoms that can still accept a bond, in insertion order.
    pub fn placement_targets(&self) -> Vec<AtomId> {
        self.molecule
            .atoms_in_order()
            .filter(|atom| self.molecule.has_open_valence(atom.id))
            .map(|atom| atom.id)
            .collect()
    }

    /// One ghost position per open atom for a pending `symbol` placement.
    pub fn placement_previews(&self, symbol: &str) -> Vec<PlacementPreview> {
        let Some(data) = element(symbol) else {
            return Vec::new();
        };
        self.placement_targets()
            .into_iter()
            .filter_map(|target| {
                self.molecule
                    .new_atom_position(target, data)
                    .map(|position| PlacementPreview { target, position })
            })
            .collect()
    }

    /// Creates an atom at the most open slot of `target` and bonds it there.
    pub fn place_atom(&mut self, symbol: &str, target: AtomId) -> Option<AtomId> {
        let element = element(symbol)?;
        if element.max_bonds == 0 || !self.molecule.has_open_valence(target) {
            debug!("cannot attach {} to {target}", element.symbol);
            return None;
        }
        let position = self.molecule.new_atom_position(target, element)?;
        let atom = self.molecule.insert_atom(element, position);
        self.create_bond(atom, target)?;
        self.molecule.update_atom_geometry(target);
        self.molecule.update_atom_geometry(atom);
        Some(atom)
    }

    /// Bonds two atoms and re-lays out both. No-op when the pair is already
    /// bonded or either endpoint is saturated.
    pub fn create_bond(&mut self, a: AtomId, b: AtomId) -> Option<BondId> {
        match self.molecule.add_bond(a, b) {
            Ok(bond) => {
                self.molecule.update_atom_geometry(a);
                self.molecule.update_atom_geometry(b);
                Some(bond)
            }
            Err(err) => {
                debug!("bond refused: {err}");
                None
            }
        }
    }

    /// Raises an existing bond's order (up to triple) and re-lays out both ends.
    pub fn increment_bond_order(&mut self, a: AtomId, b: AtomId) -> Option<u8> {
        match self.molecule.raise_bond_order(a, b) {
            Ok(order) => {
                self.molecule.update_atom_geometry(a);
                self.molecule.update_atom_geometry(b);
                Some(order)
            }
            Err(err) => {
                debug!("bond order unchanged: {err}");
                None
            }
        }
    }

    /// Bonds the pair, or raises the order when they are already bonded.
    pub fn request_bond(&mut self, a: AtomId, b: AtomId) -> Option<BondId> {
        match self.molecule.bond_between(a, b) {
            Some(bond) => self.increment_bond_order(a, b).map(|_| bond),
            None => self.create_bond(a, b),
        }
    }

    /// One click of the bonding gesture.
    pub fn bond_gesture(&mut self, atom: AtomId) -> BondGesture {
        if self.molecule.get_atom(atom).is_none() {
            return BondGesture::Cleared;
        }
        match self.bond_anchor.take() {
            None => {
                self.bond_anchor = Some(atom);
                BondGesture::Anchored(atom)
            }
            Some(anchor) if anchor != atom => match self.request_bond(anchor, atom) {
                Some(bond) => BondGesture::Bonded(bond),
                None => BondGesture::Cleared,
            },
            Some(_) => BondGesture::Cleared,
        }
    }

    pub fn select(&mut self, atom: Option<AtomId>) {
        self.selected = atom.filter(|id| self.molecule.get_atom(*id).is_some());
    }

    /// Removes an atom and its bonds, then re-lays out its former neighbours.
    pub fn delete_atom(&mut self, atom: AtomId) -> bool {
        let Some(removed) = self.molecule.remove_atom(atom) else {
            return false;
        };
        for slot in [&mut self.selected, &mut self.bond_anchor, &mut self.dragged] {
            if *slot == Some(atom) {
                *slot = None;
            }
        }
        for neighbor in &removed.neighbors {
            self.molecule.update_atom_geometry(*neighbor);
        }
        if self.molecule.is_empty() {
            self.reset();
        }
        true
    }

    pub fn delete_selected(&mut self) -> bool {
        match self.selected {
            Some(atom) => self.delete_atom(atom),
            None => false,
        }
    }

    pub fn reset(&mut self) {
        self.molecule.clear();
        self.selected = None;
        self.bond_anchor = None;
        self.dragged = None;
    }

    pub fn begin_drag(&mut self, atom: AtomId) -> bool {
        if self.molecule.get_atom(atom).is_none() {
            return false;
        }
        self.dragged = Some(atom);
        true
    }

    /// Moves the dragged atom; it stays pinned during relaxation.
    pub fn drag_to(&mut self, position: Vec3) {
        let Some(atom) = self.dragged else {
            return;
        };
        if let Some(dragged) = self.molecule.get_atom_mut(atom) {
            dragged.position = position;
            dragged.velocity = Vec3::ZERO;
        }
    }

    pub fn end_drag(&mut self) {
        self.dragged = None;
    }

    pub fn tick(&mut self, dt: f32) {
        if self.molecule.is_empty() {
            return;
        }
        relax_step(&mut self.molecule, &self.config.relax, dt, self.dragged);
    }

    /// Re-lays out every atom, in insertion order.
    pub fn update_all_geometry(&mut self) {
        for id in self.molecule.atom_ids() {
            self.molecule.update_atom_geometry(id);
        }
    }
}
