pub mod chain;
pub mod futures_contract;

pub use chain::{front_contract, ChainFilter, ContractQuote, ContractSymbol, FuturesChain};
pub use futures_contract::FuturesContract;
