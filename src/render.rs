//! GPU-ready instance data for spheres (atoms) and cylinders (bonds).

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::config::RenderConfig;
use crate::scene::Scene;

pub const FLAG_SELECTED: u32 = 1;
pub const FLAG_BOND_ANCHOR: u32 = 1 << 1;
pub const FLAG_INVALID: u32 = 1 << 2;

const BOND_COLOR: [f32; 3] = [0.4, 0.4, 0.4];

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct AtomInstance {
    pub position: [f32; 3],
    pub radius: f32,
    pub color: [f32; 3],
    pub flags: u32,
}

/// A unit cylinder along +Y, scaled to `length` and rotated onto `direction`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct BondInstance {
    pub midpoint: [f32; 3],
    pub direction: [f32; 3],
    pub length: f32,
    pub radius: f32,
    pub color: [f32; 3],
    pub flags: u32,
}

/// One cylinder per unit of bond order, side by side across the bond axis.
pub fn bond_cylinders(
    start: Vec3,
    end: Vec3,
    order: u8,
    render: &RenderConfig,
) -> Vec<BondInstance> {
    let delta = end - start;
    let length = delta.length();
    let direction = delta.try_normalize().unwrap_or(Vec3::Y);
    let offset_axis = if direction.dot(Vec3::Y).abs() > 0.99 {
        Vec3::X
    } else {
        direction.cross(Vec3::Y).normalize()
    };
    let midpoint = (start + end) * 0.5;
    let count = order.max(1);
    let center = f32::from(count - 1) / 2.0;
    let spacing = render.bond_radius * render.bond_offset_factor;
    (0..count)
        .map(|index| {
            let offset = (f32::from(index) - center) * spacing;
            BondInstance {
                midpoint: (midpoint + offset_axis * offset).to_array(),
                direction: direction.to_array(),
                length,
                radius: render.bond_radius,
                color: BOND_COLOR,
                flags: 0,
            }
        })
        .collect()
}

impl Scene {
    pub fn atom_instances(&self) -> Vec<AtomInstance> {
        let molecule = self.molecule();
        molecule
            .atoms_in_order()
            .map(|atom| {
                let mut flags = 0;
                if self.selected() == Some(atom.id) {
                    flags |= FLAG_SELECTED;
                }
                if self.bond_anchor() == Some(atom.id) {
                    flags |= FLAG_BOND_ANCHOR;
                }
                if !molecule.is_valid(atom.id) {
                    flags |= FLAG_INVALID;
                }
                AtomInstance {
                    position: atom.position.to_array(),
                    radius: atom.element.radius,
                    color: atom.element.color_rgb(),
                    flags,
                }
            })
            .collect()
    }

    pub fn bond_instances(&self) -> Vec<BondInstance> {
        let molecule = self.molecule();
        let render = &self.config().render;
        molecule
            .bonds()
            .filter_map(|bond| {
                let a = molecule.get_atom(bond.a)?;
                let b = molecule.get_atom(bond.b)?;
                Some(bond_cylinders(a.position, b.position, bond.order, render))
            })
            .flatten()
            .collect()
    }
}
