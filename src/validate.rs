//! Chemical sanity checks used to flag atoms in the view.

use std::fmt;

use crate::element::ElementData;
use crate::molecule::{AtomId, Molecule};

/// Electronegativity at or above which a positive formal charge is suspicious.
const ELECTRONEGATIVE: f32 = 3.4;
/// Electronegativity below which a negative formal charge is suspicious.
const ELECTROPOSITIVE: f32 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValenceIssue {
    BondsExceeded { sum: u32, max: u32 },
    OctetExceeded { electrons: u32 },
    DuetExceeded { electrons: u32 },
    ChargeMagnitude { charge: i32 },
    PositiveOnElectronegative { charge: i32 },
    NegativeOnElectropositive { charge: i32 },
}

impl fmt::Display for ValenceIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BondsExceeded { sum, max } => write!(f, "bond order sum {sum} exceeds {max}"),
            Self::OctetExceeded { electrons } => {
                write!(f, "{electrons} electrons exceed the octet")
            }
            Self::DuetExceeded { electrons } => write!(f, "{electrons} electrons exceed the duet"),
            Self::ChargeMagnitude { charge } => write!(f, "formal charge {charge:+}"),
            Self::PositiveOnElectronegative { charge } => {
                write!(f, "formal charge {charge:+} on an electronegative atom")
            }
            Self::NegativeOnElectropositive { charge } => {
                write!(f, "formal charge {charge:+} on an electropositive atom")
            }
        }
    }
}

impl Molecule {
    /// Every rule `id` currently breaks; empty for a missing atom.
    pub fn valence_issues(&self, id: AtomId) -> Vec<ValenceIssue> {
        let Some(atom) = self.get_atom(id) else {
            return Vec::new();
        };
        issues_for(
            atom.element,
            self.bond_order_sum(id),
            self.lone_pair_count(id),
            self.formal_charge(id),
        )
    }

    pub fn is_valid(&self, id: AtomId) -> bool {
        self.valence_issues(id).is_empty()
    }

    /// Atoms with at least one issue, in insertion order.
    pub fn invalid_atoms(&self) -> Vec<(AtomId, Vec<ValenceIssue>)> {
        self.atom_ids()
            .into_iter()
            .map(|id| (id, self.valence_issues(id)))
            .filter(|(_, issues)| !issues.is_empty())
            .collect()
    }
}

fn issues_for(element: &ElementData, sum: u32, lone_pairs: u32, charge: i32) -> Vec<ValenceIssue> {
    let mut issues = Vec::new();
    let electrons = 2 * (sum + lone_pairs);

    if sum > element.max_bonds {
        issues.push(ValenceIssue::BondsExceeded {
            sum,
            max: element.max_bonds,
        });
    }
    if element.period == 2 && element.number > 2 && electrons > 8 {
        issues.push(ValenceIssue::OctetExceeded { electrons });
    }
    if element.number == 1 && electrons > 2 {
        issues.push(ValenceIssue::DuetExceeded { electrons });
    }
    if charge.abs() > 1 {
        issues.push(ValenceIssue::ChargeMagnitude { charge });
    }
    if let Some(en) = element.electronegativity {
        if en >= ELECTRONEGATIVE && charge > 0 {
            issues.push(ValenceIssue::PositiveOnElectronegative { charge });
        }
        if en < ELECTROPOSITIVE && charge < 0 {
            issues.push(ValenceIssue::NegativeOnElectropositive { charge });
        }
    }
    issues
}
