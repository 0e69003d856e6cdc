use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

//identifier of one tradable contract (eg ESH23)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContractSymbol(String);

impl ContractSymbol {
    pub fn new(symbol: impl Into<String>) -> Self {
        ContractSymbol(symbol.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContractSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContractSymbol {
    fn from(s: &str) -> Self {
        ContractSymbol::new(s)
    }
}

//a contract as seen in one data slice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractQuote {
    pub symbol: ContractSymbol,
    pub root: String,
    pub expiry: NaiveDate,
    pub last_price: f64,
}

//restricts a chain to contracts expiring within [min_days, max_days]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainFilter {
    pub min_days: i64,
    pub max_days: i64,
}

impl Default for ChainFilter {
    fn default() -> Self {
        ChainFilter {
            min_days: 0,
            max_days: 90,
        }
    }
}

impl ChainFilter {
    pub fn new(min_days: i64, max_days: i64) -> Self {
        ChainFilter { min_days, max_days }
    }

    //true if a contract expiring on `expiry` is eligible on `today`
    pub fn accepts(&self, today: NaiveDate, expiry: NaiveDate) -> bool {
        let days = (expiry - today).num_days();
        days >= self.min_days && days <= self.max_days
    }
}

//the tradable contracts of one underlying at one timestamp
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FuturesChain {
    pub root: String,
    contracts: Vec<ContractQuote>,
}

impl FuturesChain {
    pub fn new(root: impl Into<String>) -> Self {
        FuturesChain {
            root: root.into(),
            contracts: Vec::new(),
        }
    }

    //adds a contract, replacing any earlier quote for the same symbol
    pub fn insert(&mut self, quote: ContractQuote) {
        match self.contracts.iter_mut().find(|c| c.symbol == quote.symbol) {
            Some(existing) => *existing = quote,
            None => self.contracts.push(quote),
        }
    }

    pub fn contracts(&self) -> &[ContractQuote] {
        &self.contracts
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    pub fn get(&self, symbol: &ContractSymbol) -> Option<&ContractQuote> {
        self.contracts.iter().find(|c| &c.symbol == symbol)
    }
}

//nearest-expiry contract of a chain, none when the chain is empty
//contracts sharing an expiry are ordered by symbol
pub fn front_contract(chain: &FuturesChain) -> Option<&ContractQuote> {
    chain
        .contracts()
        .iter()
        .min_by(|a, b| a.expiry.cmp(&b.expiry).then_with(|| a.symbol.cmp(&b.symbol)))
}
