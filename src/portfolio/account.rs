use crate::engine::execution::Fill;
use crate::instrument::{ContractSymbol, FuturesContract};
use crate::portfolio::position::Position;
use indexmap::IndexMap;

//cash, positions and the fill log of one backtest
#[derive(Debug, Clone)]
pub struct Account {
    pub initial_balance: f64,

    //initial balance plus realized pnl
    pub cash: f64,

    //cash plus unrealized pnl at the last marks
    pub equity: f64,

    pub open_positions: IndexMap<ContractSymbol, Position>,

    pub trade_log: Vec<Fill>,

    //spec of each traded contract, keyed by symbol
    contracts: IndexMap<ContractSymbol, FuturesContract>,

    //last known price of each traded contract
    marks: IndexMap<ContractSymbol, f64>,
}

impl Account {
    pub fn new(initial_balance: f64) -> Self {
        Account {
            initial_balance,
            cash: initial_balance,
            equity: initial_balance,
            open_positions: IndexMap::new(),
            trade_log: Vec::new(),
            contracts: IndexMap::new(),
            marks: IndexMap::new(),
        }
    }

    pub fn process_fill(&mut self, fill: Fill, contract: &FuturesContract) {
        self.contracts
            .entry(fill.symbol.clone())
            .or_insert_with(|| contract.clone());

        let position = self
            .open_positions
            .entry(fill.symbol.clone())
            .or_insert_with(|| Position::new(fill.symbol.clone()));

        self.cash += position.apply_fill(fill.qty, fill.fill_price, contract);
        self.marks.insert(fill.symbol.clone(), fill.fill_price);

        self.trade_log.push(fill);
        self.revalue();
    }

    //records a new price for a contract and revalues equity
    pub fn mark(&mut self, symbol: &ContractSymbol, price: f64) {
        if self.contracts.contains_key(symbol) {
            self.marks.insert(symbol.clone(), price);
        }
    }

    pub fn revalue(&mut self) {
        self.equity = self.cash + self.total_unrealized_pnl();
    }

    pub fn total_unrealized_pnl(&self) -> f64 {
        self.open_positions
            .iter()
            .filter_map(|(symbol, position)| {
                let contract = self.contracts.get(symbol)?;
                let mark = self.marks.get(symbol)?;
                Some(position.unrealized_pnl(*mark, contract))
            })
            .sum()
    }

    pub fn total_realized_pnl(&self) -> f64 {
        self.open_positions.values().map(|p| p.realized_pnl).sum()
    }

    pub fn get_position(&self, symbol: &ContractSymbol) -> Option<&Position> {
        self.open_positions.get(symbol)
    }

    pub fn total_return(&self) -> f64 {
        (self.equity - self.initial_balance) / self.initial_balance
    }
}
