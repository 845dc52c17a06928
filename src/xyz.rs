use std::fmt::Write as _;

use glam::Vec3;
use log::{debug, info};

use crate::element::element;
use crate::error::{StructureError, XyzError};
use crate::molecule::{AtomId, Molecule};
use crate::scene::Scene;

#[derive(Debug, Clone, PartialEq)]
pub struct XyzAtom {
    pub symbol: String,
    pub position: Vec3,
}

/// One frame of an XYZ file: a title and raw atom records.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XyzFrame {
    pub name: String,
    pub atoms: Vec<XyzAtom>,
}

pub fn parse_xyz(contents: &str) -> Result<XyzFrame, XyzError> {
    let mut lines = contents.lines();
    let count_line = lines.next().ok_or(XyzError::MissingCount)?;
    let atom_count: usize = count_line
        .trim()
        .parse()
        .map_err(|_| XyzError::InvalidCount)?;
    let name = lines.next().ok_or(XyzError::MissingComment)?.trim().to_string();

    let mut atoms = Vec::with_capacity(atom_count);
    for (index, line) in lines.enumerate() {
        if atoms.len() >= atom_count {
            break;
        }
        let line_number = index + 3;
        let mut parts = line.split_whitespace();
        let symbol = parts
            .next()
            .ok_or(XyzError::MissingField {
                field: "element",
                line: line_number,
            })?
            .to_string();
        let mut coordinate = |field: &'static str| -> Result<f32, XyzError> {
            parts
                .next()
                .ok_or(XyzError::MissingField {
                    field,
                    line: line_number,
                })?
                .parse()
                .map_err(|_| XyzError::InvalidField {
                    field,
                    line: line_number,
                })
        };
        let position = Vec3::new(coordinate("x")?, coordinate("y")?, coordinate("z")?);
        atoms.push(XyzAtom { symbol, position });
    }

    if atoms.len() != atom_count {
        return Err(XyzError::CountMismatch {
            expected: atom_count,
            actual: atoms.len(),
        });
    }
    Ok(XyzFrame { name, atoms })
}

pub fn write_xyz(molecule: &Molecule) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", molecule.atom_count());
    let _ = writeln!(out, "{}", molecule.name);
    for atom in molecule.atoms_in_order() {
        let p = atom.position;
        let _ = writeln!(out, "{:<2} {:>12.6} {:>12.6} {:>12.6}", atom.symbol(), p.x, p.y, p.z);
    }
    out
}

impl Scene {
    /// Replaces the scene with the atoms of `frame` at their given
    /// coordinates and perceives bonds from interatomic distances.
    ///
    /// Pairs within `(rA + rB) * tolerance` are bonded shortest first while
    /// both atoms have capacity left. Positions are not re-laid out.
    pub fn import_xyz(&mut self, frame: &XyzFrame) -> Result<Vec<AtomId>, StructureError> {
        let mut elements = Vec::with_capacity(frame.atoms.len());
        for atom in &frame.atoms {
            let data = element(&atom.symbol)
                .ok_or_else(|| StructureError::UnknownElement(atom.symbol.clone()))?;
            elements.push(data);
        }

        self.reset();
        self.molecule_mut().name = frame.name.clone();
        let ids: Vec<AtomId> = frame
            .atoms
            .iter()
            .zip(&elements)
            .map(|(atom, data)| self.add_atom(*data, atom.position))
            .collect();

        let tolerance = self.config().perception.bond_tolerance;
        let mut candidates = Vec::new();
        for i in 0..ids.len() {
            for j in i + 1..ids.len() {
                let distance = frame.atoms[i].position.distance(frame.atoms[j].position);
                let cutoff = (elements[i].radius + elements[j].radius) * tolerance;
                if distance <= cutoff {
                    candidates.push((distance, ids[i], ids[j]));
                }
            }
        }
        candidates.sort_by(|a, b| a.0.total_cmp(&b.0));

        let molecule = self.molecule_mut();
        for (distance, a, b) in candidates {
            if let Err(err) = molecule.add_bond(a, b) {
                debug!("skipping perceived bond at {distance:.3}: {err}");
            }
        }
        info!(
            "imported {} atoms, perceived {} bonds",
            molecule.atom_count(),
            molecule.bond_count()
        );
        Ok(ids)
    }
}
