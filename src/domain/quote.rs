//! Current-price snapshot for one evaluation cycle.

/// Symbol to current price, iterated in insertion order.
///
/// Re-inserting a symbol replaces its price and keeps its original position,
/// so evaluation order is the order in which the provider first reported
/// each symbol.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurrentPrices {
    entries: Vec<(String, f64)>,
}

impl CurrentPrices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: impl Into<String>, price: f64) {
        let symbol = symbol.into();
        match self.entries.iter_mut().find(|(s, _)| *s == symbol) {
            Some(entry) => entry.1 = price,
            None => self.entries.push((symbol, price)),
        }
    }

    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|(_, p)| *p)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(s, p)| (s.as_str(), *p))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for CurrentPrices {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut prices = CurrentPrices::new();
        for (symbol, price) in iter {
            prices.insert(symbol, price);
        }
        prices
    }
}
