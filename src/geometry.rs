//! Idealised electron-domain directions keyed by steric number.

use glam::Vec3;

const INV_SQRT_3: f32 = 0.577_350_26;
const SIN_120: f32 = 0.866_025_4;

static LINEAR: [Vec3; 2] = [Vec3::new(1.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0)];

static TRIGONAL_PLANAR: [Vec3; 3] = [
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(-0.5, SIN_120, 0.0),
    Vec3::new(-0.5, -SIN_120, 0.0),
];

// Alternating cube corners: an even number of sign flips.
static TETRAHEDRAL: [Vec3; 4] = [
    Vec3::new(INV_SQRT_3, INV_SQRT_3, INV_SQRT_3),
    Vec3::new(INV_SQRT_3, -INV_SQRT_3, -INV_SQRT_3),
    Vec3::new(-INV_SQRT_3, INV_SQRT_3, -INV_SQRT_3),
    Vec3::new(-INV_SQRT_3, -INV_SQRT_3, INV_SQRT_3),
];

static TRIGONAL_BIPYRAMIDAL: [Vec3; 5] = [
    Vec3::new(0.0, 0.0, 1.0),
    Vec3::new(0.0, 0.0, -1.0),
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(-0.5, SIN_120, 0.0),
    Vec3::new(-0.5, -SIN_120, 0.0),
];

static OCTAHEDRAL: [Vec3; 6] = [
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(-1.0, 0.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
    Vec3::new(0.0, -1.0, 0.0),
    Vec3::new(0.0, 0.0, 1.0),
    Vec3::new(0.0, 0.0, -1.0),
];

/// Axis used when no geometry applies at all.
pub const DEFAULT_AXIS: Vec3 = Vec3::X;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElectronGeometry {
    Linear,
    TrigonalPlanar,
    Tetrahedral,
    TrigonalBipyramidal,
    Octahedral,
}

impl ElectronGeometry {
    /// Geometry for a steric number; only 2 through 6 have one.
    pub fn from_steric_number(steric: u32) -> Option<Self> {
        match steric {
            2 => Some(Self::Linear),
            3 => Some(Self::TrigonalPlanar),
            4 => Some(Self::Tetrahedral),
            5 => Some(Self::TrigonalBipyramidal),
            6 => Some(Self::Octahedral),
            _ => None,
        }
    }

    pub fn directions(self) -> &'static [Vec3] {
        match self {
            Self::Linear => &LINEAR,
            Self::TrigonalPlanar => &TRIGONAL_PLANAR,
            Self::Tetrahedral => &TETRAHEDRAL,
            Self::TrigonalBipyramidal => &TRIGONAL_BIPYRAMIDAL,
            Self::Octahedral => &OCTAHEDRAL,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::TrigonalPlanar => "trigonal planar",
            Self::Tetrahedral => "tetrahedral",
            Self::TrigonalBipyramidal => "trigonal bipyramidal",
            Self::Octahedral => "octahedral",
        }
    }
}

/// Idealised unit directions for `steric`, if that steric number has a geometry.
pub fn ideal_directions(steric: u32) -> Option<&'static [Vec3]> {
    ElectronGeometry::from_steric_number(steric).map(ElectronGeometry::directions)
}
