use crate::data::bar::Bar;
use crate::instrument::{ChainFilter, ContractQuote, ContractSymbol, FuturesChain};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;

//everything the host knows at one timestamp
#[derive(Debug, Clone)]
pub struct DataSlice {
    pub time: DateTime<Utc>,

    //one chain per subscribed root, in subscription order
    pub chains: IndexMap<String, FuturesChain>,

    //bars of every subscribed contract at this timestamp
    pub bars: IndexMap<ContractSymbol, Bar>,
}

impl DataSlice {
    pub fn new(time: DateTime<Utc>, roots: &[String]) -> Self {
        let chains = roots
            .iter()
            .map(|r| (r.to_uppercase(), FuturesChain::new(r.to_uppercase())))
            .collect();

        DataSlice {
            time,
            chains,
            bars: IndexMap::new(),
        }
    }

    //returns the bar of a contract, if it traded in this slice
    pub fn bar(&self, symbol: &ContractSymbol) -> Option<&Bar> {
        self.bars.get(symbol)
    }

    //adds a bar, routing it into its chain when the filter accepts it
    fn push(&mut self, bar: &Bar, filter: &ChainFilter) {
        let Some(chain) = self.chains.get_mut(&bar.root) else {
            return;
        };

        let symbol = ContractSymbol::new(bar.symbol.clone());

        if filter.accepts(self.time.date_naive(), bar.expiry) {
            chain.insert(ContractQuote {
                symbol: symbol.clone(),
                root: bar.root.clone(),
                expiry: bar.expiry,
                last_price: bar.close,
            });
        }

        self.bars.insert(symbol, bar.clone());
    }
}

//groups time-sorted bars into one slice per distinct timestamp
pub fn build_slices(bars: &[Bar], roots: &[String], filter: ChainFilter) -> Vec<DataSlice> {
    let mut slices: Vec<DataSlice> = Vec::new();

    for bar in bars {
        let needs_new = slices
            .last()
            .map(|s| s.time != bar.timestamp)
            .unwrap_or(true);

        if needs_new {
            slices.push(DataSlice::new(bar.timestamp, roots));
        }

        if let Some(slice) = slices.last_mut() {
            slice.push(bar, &filter);
        }
    }

    slices
}
