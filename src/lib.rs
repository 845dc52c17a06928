//! Geometry core of an interactive VSEPR molecule builder.
//!
//! [`Scene`] is the entry point for interactive use: it owns a [`Molecule`]
//! and turns user requests (add an element, bond two atoms, drag, delete)
//! into graph edits followed by local VSEPR re-layout. [`relax_step`] runs
//! the per-frame force relaxation.

pub mod config;
pub mod connectivity;
pub mod element;
pub mod error;
pub mod formula;
pub mod geometry;
pub mod molecule;
pub mod orientation;
pub mod placement;
pub mod relax;
pub mod render;
pub mod scene;
pub mod structure;
pub mod valence;
pub mod validate;
pub mod xyz;

pub use config::{Config, PerceptionConfig, RenderConfig};
pub use element::{element, elements, ElementData, HasElementData};
pub use error::{ConfigError, GraphError, StructureError, XyzError};
pub use geometry::{ideal_directions, ElectronGeometry};
pub use molecule::{Atom, AtomId, Bond, BondId, Molecule, RemovedAtom, MAX_BOND_ORDER};
pub use orientation::{best_rotation, LigandLayout};
pub use placement::ideal_bond_length;
pub use relax::{recenter, relax_step, RelaxConfig};
pub use render::{AtomInstance, BondInstance};
pub use scene::{BondGesture, PlacementPreview, Scene};
pub use structure::{BondSpec, StructureSpec};
pub use validate::ValenceIssue;
pub use xyz::{parse_xyz, write_xyz, XyzAtom, XyzFrame};
