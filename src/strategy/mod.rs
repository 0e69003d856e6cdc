pub mod silver_bullet;

use crate::data::DataSlice;
use crate::engine::execution::{Order, OrderEvent};
use crate::instrument::ContractSymbol;
use crate::schedule::SessionGate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

//callbacks the host drives, serially, in timestamp order
pub trait Strategy: Send {
    //called once before any event
    fn on_init(&mut self, context: &mut StrategyContext);

    //called at each scheduled session open
    fn on_session_start(&mut self, context: &mut StrategyContext);

    //called at each scheduled session close
    fn on_session_end(&mut self, context: &mut StrategyContext);

    //called once per data slice
    fn on_data(&mut self, context: &mut StrategyContext, slice: &DataSlice);

    //called for every order state change the host reports
    fn on_order_event(&mut self, context: &mut StrategyContext, event: &OrderEvent);

    //returns the strategy name
    fn name(&self) -> &str;
}

//one line written to the diagnostic sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub time: DateTime<Utc>,
    pub message: String,
}

//state handed to every callback: host clock, session flag, order outbox, log sink
#[derive(Debug, Clone)]
pub struct StrategyContext {
    time: DateTime<Utc>,
    session: SessionGate,
    next_order_id: u64,
    outbox: Vec<Order>,
    log: Vec<LogEntry>,
}

impl StrategyContext {
    pub fn new(time: DateTime<Utc>) -> Self {
        StrategyContext {
            time,
            session: SessionGate::new(),
            next_order_id: 1,
            outbox: Vec::new(),
            log: Vec::new(),
        }
    }

    //current host time
    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    //advances the host clock
    pub fn set_time(&mut self, time: DateTime<Utc>) {
        self.time = time;
    }

    pub fn in_session(&self) -> bool {
        self.session.is_open()
    }

    pub fn open_session(&mut self) {
        self.session.open();
    }

    pub fn close_session(&mut self) {
        self.session.close();
    }

    //queues a limit order (positive qty buys, negative sells) and returns its id
    pub fn limit_order(&mut self, symbol: ContractSymbol, qty: i32, limit_price: f64) -> u64 {
        let id = self.next_order_id;
        self.next_order_id += 1;
        self.outbox
            .push(Order::limit(id, self.time, symbol, qty, limit_price));
        id
    }

    //orders queued since the last drain
    pub fn pending_orders(&self) -> &[Order] {
        &self.outbox
    }

    //hands queued orders to the host
    pub fn take_orders(&mut self) -> Vec<Order> {
        std::mem::take(&mut self.outbox)
    }

    //writes a diagnostic line
    pub fn debug(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!(target: "silverbullet::strategy", time = %self.time, "{}", message);
        self.log.push(LogEntry {
            time: self.time,
            message,
        });
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    pub fn take_log(&mut self) -> Vec<LogEntry> {
        std::mem::take(&mut self.log)
    }
}
