pub mod backtest;
pub mod execution;

pub use backtest::{BacktestEngine, BacktestResult};
pub use execution::{ExecutionEngine, Fill, Order, OrderEvent, OrderSide, OrderStatus};
