use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::order_core::precision::normalize;

/// Precision filters published by the exchange for one symbol.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SymbolFilters {
    /// LOT_SIZE stepSize
    pub quantity_step: Decimal,
    /// PRICE_FILTER tickSize
    pub price_tick: Decimal,
}

impl SymbolFilters {
    pub fn new(quantity_step: Decimal, price_tick: Decimal) -> Self {
        SymbolFilters { quantity_step, price_tick }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecisionKind {
    Quantity,
    Price,
}

/// Symbol → precision filters, loaded once and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct SymbolRules {
    filters: HashMap<String, SymbolFilters>,
}

impl SymbolRules {
    pub fn new(filters: HashMap<String, SymbolFilters>) -> Self {
        let filters = filters
            .into_iter()
            .map(|(symbol, f)| (symbol.to_uppercase(), f))
            .collect();
        SymbolRules { filters }
    }

    pub fn get(&self, symbol: &str) -> Option<&SymbolFilters> {
        self.filters.get(&symbol.to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Floors `value` to the symbol's step for `kind`. Unknown symbols pass through.
    pub fn normalize(&self, symbol: &str, value: Decimal, kind: PrecisionKind) -> Decimal {
        match self.get(symbol) {
            Some(f) => {
                let step = match kind {
                    PrecisionKind::Quantity => f.quantity_step,
                    PrecisionKind::Price => f.price_tick,
                };
                normalize(value, step)
            }
            None => value,
        }
    }
}

impl FromIterator<(String, SymbolFilters)> for SymbolRules {
    fn from_iter<I: IntoIterator<Item = (String, SymbolFilters)>>(iter: I) -> Self {
        SymbolRules::new(iter.into_iter().collect())
    }
}
