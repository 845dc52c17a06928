use std::io;

use thiserror::Error;

use crate::molecule::AtomId;

/// Errors raised by raw mutations of the atom/bond graph.
///
/// The interactive [`Scene`](crate::Scene) treats every one of these as an
/// ordinary outcome of user input and turns it into a no-op.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("atom {0} does not exist")]
    AtomNotFound(AtomId),

    #[error("atom {0} cannot bond to itself")]
    SelfBond(AtomId),

    #[error("bond between {0} and {1} already exists")]
    DuplicateBond(AtomId, AtomId),

    #[error("valence exceeded for {symbol} {atom} (max {max})")]
    Saturated {
        atom: AtomId,
        symbol: &'static str,
        max: u32,
    },

    #[error("no bond between {0} and {1}")]
    NoBond(AtomId, AtomId),

    #[error("bond between {0} and {1} is already triple")]
    MaxBondOrder(AtomId, AtomId),
}

/// Errors in a parsed structure handed to the builder.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    #[error("unknown element symbol: {0}")]
    UnknownElement(String),

    #[error("bond {bond} references atom {index} (only {count} atoms)")]
    BondIndexOutOfRange {
        bond: usize,
        index: usize,
        count: usize,
    },

    #[error("bond {0} connects an atom to itself")]
    SelfBond(usize),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum XyzError {
    #[error("missing atom count")]
    MissingCount,

    #[error("invalid atom count")]
    InvalidCount,

    #[error("missing comment line")]
    MissingComment,

    #[error("missing {field} at line {line}")]
    MissingField { field: &'static str, line: usize },

    #[error("invalid {field} at line {line}")]
    InvalidField { field: &'static str, line: usize },

    #[error("atom count does not match data lines (expected {expected}, got {actual})")]
    CountMismatch { expected: usize, actual: usize },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] io::Error),

    #[error("could not parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
