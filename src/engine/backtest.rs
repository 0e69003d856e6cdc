use crate::config::{AlgorithmConfig, ConfigError};
use crate::data::{build_slices, filter_by_time_range, filter_by_roots, Bar, DataSlice};
use crate::engine::execution::{ExecutionEngine, Fill, Order, OrderEvent, OrderStatus};
use crate::instrument::FuturesContract;
use crate::metrics::{calculate_equity_curve, EquityPoint, SummaryMetrics};
use crate::portfolio::Account;
use crate::schedule::{SessionEvent, SessionEventKind, SessionSchedule};
use crate::strategy::{LogEntry, Strategy, StrategyContext};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use tracing::{info, warn};

//result of a backtest
#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub summary: SummaryMetrics,
    pub equity_curve: Vec<EquityPoint>,
    pub fills: Vec<Fill>,
    pub orders: Vec<Order>,
    pub order_events: Vec<OrderEvent>,
    pub log: Vec<LogEntry>,
}

//host that replays slices and session events into a strategy
pub struct BacktestEngine {
    slices: Vec<DataSlice>,
    schedule: SessionSchedule,
    window: (DateTime<Utc>, DateTime<Utc>),
    contracts: IndexMap<String, FuturesContract>,
    initial_cash: f64,
    account: Account,
    execution: ExecutionEngine,
    equity_history: Vec<(DateTime<Utc>, f64)>,
    order_events: Vec<OrderEvent>,
}

impl BacktestEngine {
    //validates the config and prepares slices from raw bars
    pub fn new(config: &AlgorithmConfig, bars: &[Bar]) -> Result<Self, ConfigError> {
        config.validate()?;

        let schedule = config.schedule()?;
        let window = schedule.local_window(config.start_date, config.end_date);

        let roots = config.roots();
        let bars = filter_by_time_range(&filter_by_roots(bars, &roots), window.0, window.1);
        let slices = build_slices(&bars, &roots, config.chain_filter);

        let contracts = config
            .contracts()?
            .into_iter()
            .map(|c| (c.root.clone(), c))
            .collect();

        Ok(BacktestEngine {
            slices,
            schedule,
            window,
            contracts,
            initial_cash: config.initial_cash,
            account: Account::new(config.initial_cash),
            execution: ExecutionEngine::new(),
            equity_history: Vec::new(),
            order_events: Vec::new(),
        })
    }

    pub fn slice_count(&self) -> usize {
        self.slices.len()
    }

    //runs the strategy over every slice in time order
    pub fn run(&mut self, strategy: &mut dyn Strategy) -> BacktestResult {
        info!(
            strategy = strategy.name(),
            slices = self.slices.len(),
            start = %self.window.0,
            end = %self.window.1,
            "starting backtest"
        );

        let mut context = StrategyContext::new(self.window.0);
        strategy.on_init(&mut context);
        self.submit_queued(strategy, &mut context);

        let events = self.schedule.events_between(self.window.0, self.window.1);
        let mut events = events.into_iter().peekable();

        let slices = std::mem::take(&mut self.slices);
        for slice in &slices {
            //session events at or before this timestamp fire first
            while let Some(event) = events.next_if(|e| e.time <= slice.time) {
                self.dispatch_session_event(strategy, &mut context, event);
            }

            context.set_time(slice.time);

            for fill in self.execution.process_orders(slice) {
                self.book_fill(slice, &fill);
                self.deliver(strategy, &mut context, OrderEvent::filled(&fill));
            }

            strategy.on_data(&mut context, slice);
            self.submit_queued(strategy, &mut context);

            for (symbol, bar) in &slice.bars {
                self.account.mark(symbol, bar.close);
            }
            self.account.revalue();
            self.equity_history.push((slice.time, self.account.equity));
        }
        self.slices = slices;

        for event in events {
            self.dispatch_session_event(strategy, &mut context, event);
        }

        let end_time = context.time();
        for event in self.execution.cancel_all_orders(end_time) {
            self.deliver(strategy, &mut context, event);
        }

        let result = self.build_result(context.take_log());
        info!(
            orders = result.summary.num_orders,
            fills = result.summary.num_fills,
            final_balance = result.summary.final_balance,
            "backtest finished"
        );
        result
    }

    fn dispatch_session_event(
        &mut self,
        strategy: &mut dyn Strategy,
        context: &mut StrategyContext,
        event: SessionEvent,
    ) {
        context.set_time(event.time);
        match event.kind {
            SessionEventKind::Start => strategy.on_session_start(context),
            SessionEventKind::End => strategy.on_session_end(context),
        }
        self.submit_queued(strategy, context);
    }

    //hands queued orders to execution until the strategy stops queuing
    fn submit_queued(&mut self, strategy: &mut dyn Strategy, context: &mut StrategyContext) {
        loop {
            let orders = context.take_orders();
            if orders.is_empty() {
                break;
            }
            for order in orders {
                let event = self.execution.submit_order(order);
                self.record_event(strategy, context, event);
            }
        }
    }

    fn deliver(&mut self, strategy: &mut dyn Strategy, context: &mut StrategyContext, event: OrderEvent) {
        self.record_event(strategy, context, event);
        self.submit_queued(strategy, context);
    }

    fn record_event(
        &mut self,
        strategy: &mut dyn Strategy,
        context: &mut StrategyContext,
        event: OrderEvent,
    ) {
        strategy.on_order_event(context, &event);
        self.order_events.push(event);
    }

    fn book_fill(&mut self, slice: &DataSlice, fill: &Fill) {
        let contract = slice
            .bar(&fill.symbol)
            .and_then(|bar| self.contracts.get(&bar.root));

        match contract {
            Some(contract) => self.account.process_fill(fill.clone(), contract),
            None => warn!(symbol = %fill.symbol, "no contract spec for fill, not booked"),
        }
    }

    fn build_result(&self, log: Vec<LogEntry>) -> BacktestResult {
        let equity_curve = calculate_equity_curve(&self.equity_history, self.initial_cash);
        let fills = self.account.trade_log.clone();
        let orders = self.execution.orders().to_vec();

        let num_canceled = self
            .order_events
            .iter()
            .filter(|e| e.status == OrderStatus::Canceled)
            .count();
        let num_submitted = self
            .order_events
            .iter()
            .filter(|e| e.status == OrderStatus::Submitted)
            .count();

        let summary = SummaryMetrics::from_backtest(
            &equity_curve,
            &fills,
            num_submitted,
            num_canceled,
            self.initial_cash,
        );

        BacktestResult {
            summary,
            equity_curve,
            fills,
            orders,
            order_events: self.order_events.clone(),
            log,
        }
    }

    //returns a reference to the account
    pub fn account(&self) -> &Account {
        &self.account
    }
}
