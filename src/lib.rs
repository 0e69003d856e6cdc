//a session-gated sma/rsi futures strategy and the backtesting host it runs in

pub mod config;
pub mod data;
pub mod engine;
pub mod indicators;
pub mod instrument;
pub mod logging;
pub mod metrics;
pub mod portfolio;
pub mod schedule;
pub mod strategy;

//prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{AlgorithmConfig, ConfigError, SignalParams};
    pub use crate::data::{build_slices, load_csv, Bar, DataSlice};
    pub use crate::engine::{
        BacktestEngine, BacktestResult, ExecutionEngine, Fill, Order, OrderEvent, OrderSide,
        OrderStatus,
    };
    pub use crate::indicators::{Indicator, IndicatorPair, IndicatorRegistry, Rsi, Sma};
    pub use crate::instrument::{
        front_contract, ChainFilter, ContractQuote, ContractSymbol, FuturesChain, FuturesContract,
    };
    pub use crate::metrics::{EquityPoint, SummaryMetrics};
    pub use crate::portfolio::{Account, Position};
    pub use crate::schedule::{SessionEventKind, SessionGate, SessionSchedule, SessionTime};
    pub use crate::strategy::{
        silver_bullet::{entry_signal, EntrySignal, SessionGatedSignalStrategy},
        LogEntry, Strategy, StrategyContext,
    };
}
