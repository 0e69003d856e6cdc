//streaming indicators fed one price at a time, and the per-contract registry

pub mod rsi;
pub mod sma;

pub use rsi::Rsi;
pub use sma::Sma;

use crate::instrument::ContractSymbol;
use indexmap::IndexMap;

//a stateful accumulator over a price stream
pub trait Indicator: Send {
    fn name(&self) -> &str;

    fn period(&self) -> usize;

    //feed the next observation
    fn update(&mut self, price: f64);

    //true once enough observations have been seen to produce a value
    fn is_ready(&self) -> bool;

    //latest value, `None` until ready
    fn current(&self) -> Option<f64>;

    //number of prices observed so far
    fn samples(&self) -> usize;
}

//the SMA/RSI pair kept for one contract
#[derive(Debug, Clone)]
pub struct IndicatorPair {
    pub sma: Sma,
    pub rsi: Rsi,
}

impl IndicatorPair {
    pub fn new(period: usize) -> Self {
        Self {
            sma: Sma::new(period),
            rsi: Rsi::new(period),
        }
    }

    pub fn update(&mut self, price: f64) {
        self.sma.update(price);
        self.rsi.update(price);
    }

    pub fn is_ready(&self) -> bool {
        self.sma.is_ready() && self.rsi.is_ready()
    }

    //`(sma, rsi)` once both are ready
    pub fn values(&self) -> Option<(f64, f64)> {
        if !self.is_ready() {
            return None;
        }
        Some((self.sma.current()?, self.rsi.current()?))
    }
}

//contract -> indicator pair, created lazily and never removed
#[derive(Debug, Clone)]
pub struct IndicatorRegistry {
    period: usize,
    pairs: IndexMap<ContractSymbol, IndicatorPair>,
}

impl IndicatorRegistry {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            pairs: IndexMap::new(),
        }
    }

    //returns the pair for `symbol`, creating it on first sight
    pub fn get_or_create(&mut self, symbol: &ContractSymbol) -> &mut IndicatorPair {
        let period = self.period;
        self.pairs
            .entry(symbol.clone())
            .or_insert_with(|| IndicatorPair::new(period))
    }

    pub fn get(&self, symbol: &ContractSymbol) -> Option<&IndicatorPair> {
        self.pairs.get(symbol)
    }

    pub fn contains(&self, symbol: &ContractSymbol) -> bool {
        self.pairs.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

#[cfg(test)]
pub(crate) const DEFAULT_EPSILON: f64 = 1e-10;

#[cfg(test)]
pub(crate) fn assert_approx(actual: f64, expected: f64, eps: f64) {
    assert!(
        (actual - expected).abs() < eps,
        "expected {expected}, got {actual} (eps {eps})"
    );
}
