use std::collections::BTreeMap;

use crate::molecule::Molecule;

impl Molecule {
    pub fn composition(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for atom in self.atoms_in_order() {
            *counts.entry(atom.symbol()).or_insert(0) += 1;
        }
        counts
    }

    /// Carbon first, then hydrogen when carbon is present, then the rest
    /// alphabetically. Counts of one are left implicit.
    pub fn formula(&self) -> String {
        let composition = self.composition();
        let has_carbon = composition.contains_key("C");
        let mut symbols: Vec<(&str, usize)> = composition.into_iter().collect();
        symbols.sort_by_key(|(symbol, _)| {
            let rank = match *symbol {
                "C" => 0,
                "H" if has_carbon => 1,
                _ => 2,
            };
            (rank, *symbol)
        });
        symbols
            .into_iter()
            .map(|(symbol, count)| {
                if count > 1 {
                    format!("{symbol}{count}")
                } else {
                    symbol.to_string()
                }
            })
            .collect()
    }
}
