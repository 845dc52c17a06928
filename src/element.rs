//! Periodic-table data consumed by the builder.
//!
//! Radii are in the same length unit as atom positions. Colours are the usual
//! CPK hex values and only matter to renderers.

/// Per-element data the geometry core needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementData {
    pub number: u8,
    pub symbol: &'static str,
    pub name: &'static str,
    pub group: u8,
    pub period: u8,
    /// Upper bound on the bond-order sum of one atom of this element.
    pub max_bonds: u32,
    pub radius: f32,
    /// Explicit valence electron count, when the group-derived one is wrong.
    pub valence_electrons: Option<u8>,
    pub electronegativity: Option<f32>,
    pub color: u32,
}

impl ElementData {
    #[allow(clippy::too_many_arguments)]
    const fn new(
        number: u8,
        symbol: &'static str,
        name: &'static str,
        group: u8,
        period: u8,
        max_bonds: u32,
        radius: f32,
        electronegativity: Option<f32>,
        color: u32,
    ) -> Self {
        Self {
            number,
            symbol,
            name,
            group,
            period,
            max_bonds,
            radius,
            valence_electrons: None,
            electronegativity,
            color,
        }
    }

    const fn with_valence(mut self, electrons: u8) -> Self {
        self.valence_electrons = Some(electrons);
        self
    }

    /// Valence electron count.
    ///
    /// Falls back to the periodic group (`group - 10` past the transition
    /// block). This ignores d-electron involvement, so transition metals get
    /// rough numbers.
    pub fn valence_electrons(&self) -> u32 {
        if let Some(explicit) = self.valence_electrons {
            return u32::from(explicit);
        }
        match self.group {
            0 => 0,
            g if g > 12 => u32::from(g - 10),
            g => u32::from(g),
        }
    }

    pub fn color_rgb(&self) -> [f32; 3] {
        let channel = |shift: u32| ((self.color >> shift) & 0xFF) as f32 / 255.0;
        [channel(16), channel(8), channel(0)]
    }
}

/// Anything that carries element data: placed atoms and placement previews.
pub trait HasElementData {
    fn element_data(&self) -> &ElementData;

    fn radius(&self) -> f32 {
        self.element_data().radius
    }
}

impl HasElementData for ElementData {
    fn element_data(&self) -> &ElementData {
        self
    }
}

impl<T: HasElementData + ?Sized> HasElementData for &T {
    fn element_data(&self) -> &ElementData {
        (**self).element_data()
    }
}

#[rustfmt::skip]
static ELEMENTS: [ElementData; 38] = [
    ElementData::new(1, "H", "Hydrogen", 1, 1, 1, 0.37, Some(2.20), 0xFFFFFF),
    ElementData::new(2, "He", "Helium", 18, 1, 0, 0.32, None, 0xD9FFFF).with_valence(2),
    ElementData::new(3, "Li", "Lithium", 1, 2, 1, 1.45, Some(0.98), 0xCC80FF),
    ElementData::new(4, "Be", "Beryllium", 2, 2, 2, 1.05, Some(1.57), 0xC2FF00),
    ElementData::new(5, "B", "Boron", 13, 2, 3, 0.85, Some(2.04), 0xFFB5B5),
    ElementData::new(6, "C", "Carbon", 14, 2, 4, 0.70, Some(2.55), 0x909090),
    ElementData::new(7, "N", "Nitrogen", 15, 2, 3, 0.65, Some(3.04), 0x3050F8),
    ElementData::new(8, "O", "Oxygen", 16, 2, 2, 0.60, Some(3.44), 0xFF0D0D),
    ElementData::new(9, "F", "Fluorine", 17, 2, 1, 0.50, Some(3.98), 0x90E050),
    ElementData::new(10, "Ne", "Neon", 18, 2, 0, 0.38, None, 0xB3E3F5),
    ElementData::new(11, "Na", "Sodium", 1, 3, 1, 1.80, Some(0.93), 0xAB5CF2),
    ElementData::new(12, "Mg", "Magnesium", 2, 3, 2, 1.50, Some(1.31), 0x8AFF00),
    ElementData::new(13, "Al", "Aluminium", 13, 3, 3, 1.25, Some(1.61), 0xBFA6A6),
    ElementData::new(14, "Si", "Silicon", 14, 3, 4, 1.10, Some(1.90), 0xF0C8A0),
    ElementData::new(15, "P", "Phosphorus", 15, 3, 5, 1.00, Some(2.19), 0xFF8000),
    ElementData::new(16, "S", "Sulfur", 16, 3, 6, 1.00, Some(2.58), 0xFFFF30),
    ElementData::new(17, "Cl", "Chlorine", 17, 3, 1, 1.00, Some(3.16), 0x1FF01F),
    ElementData::new(18, "Ar", "Argon", 18, 3, 0, 0.71, None, 0x80D1E3),
    ElementData::new(19, "K", "Potassium", 1, 4, 1, 2.20, Some(0.82), 0x8F40D4),
    ElementData::new(20, "Ca", "Calcium", 2, 4, 2, 1.80, Some(1.00), 0x3DFF00),
    ElementData::new(21, "Sc", "Scandium", 3, 4, 3, 1.60, Some(1.36), 0xE6E6E6),
    ElementData::new(22, "Ti", "Titanium", 4, 4, 4, 1.40, Some(1.54), 0xBFC2C7),
    ElementData::new(23, "V", "Vanadium", 5, 4, 5, 1.35, Some(1.63), 0xA6A6AB),
    ElementData::new(24, "Cr", "Chromium", 6, 4, 6, 1.40, Some(1.66), 0x8A99C7),
    ElementData::new(25, "Mn", "Manganese", 7, 4, 4, 1.40, Some(1.55), 0x9C7AC7),
    ElementData::new(26, "Fe", "Iron", 8, 4, 3, 1.40, Some(1.83), 0xE06633),
    ElementData::new(27, "Co", "Cobalt", 9, 4, 3, 1.35, Some(1.88), 0xF090A0),
    ElementData::new(28, "Ni", "Nickel", 10, 4, 2, 1.35, Some(1.91), 0x50D050),
    ElementData::new(29, "Cu", "Copper", 11, 4, 2, 1.35, Some(1.90), 0xC88033),
    ElementData::new(30, "Zn", "Zinc", 12, 4, 2, 1.35, Some(1.65), 0x7D80B0),
    ElementData::new(31, "Ga", "Gallium", 13, 4, 3, 1.30, Some(1.81), 0xC28F8F),
    ElementData::new(32, "Ge", "Germanium", 14, 4, 4, 1.25, Some(2.01), 0x668F8F),
    ElementData::new(33, "As", "Arsenic", 15, 4, 3, 1.15, Some(2.18), 0xBD80E3),
    ElementData::new(34, "Se", "Selenium", 16, 4, 2, 1.15, Some(2.55), 0xFFA100),
    ElementData::new(35, "Br", "Bromine", 17, 4, 1, 1.15, Some(2.96), 0xA62929),
    ElementData::new(36, "Kr", "Krypton", 18, 4, 0, 0.88, Some(3.00), 0x5CB8D1),
    ElementData::new(53, "I", "Iodine", 17, 5, 1, 1.40, Some(2.66), 0x940094),
    ElementData::new(54, "Xe", "Xenon", 18, 5, 6, 1.08, Some(2.60), 0x429EB0),
];

/// Looks up an element by symbol, ignoring case.
pub fn element(symbol: &str) -> Option<&'static ElementData> {
    let symbol = symbol.trim();
    ELEMENTS
        .iter()
        .find(|data| data.symbol.eq_ignore_ascii_case(symbol))
}

pub fn elements() -> &'static [ElementData] {
    &ELEMENTS
}
