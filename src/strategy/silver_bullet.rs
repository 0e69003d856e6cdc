use crate::config::SignalParams;
use crate::data::DataSlice;
use crate::engine::execution::{OrderEvent, OrderStatus};
use crate::indicators::{Indicator, IndicatorPair, IndicatorRegistry};
use crate::instrument::front_contract;
use crate::strategy::{Strategy, StrategyContext};

//direction of a mean-reversion entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntrySignal {
    //price above trend and overbought
    Short,
    //price below trend and oversold
    Long,
}

//threshold rule on price vs sma and rsi, strict comparisons
pub fn entry_signal(price: f64, sma: f64, rsi: f64, params: &SignalParams) -> Option<EntrySignal> {
    if sma < price && rsi > params.overbought {
        Some(EntrySignal::Short)
    } else if sma > price && rsi < params.oversold {
        Some(EntrySignal::Long)
    } else {
        None
    }
}

//setup gate; currently only requires both indicators to be ready
pub fn is_setup(pair: &IndicatorPair) -> bool {
    pair.sma.is_ready() && pair.rsi.is_ready()
}

//trades the front contract of every chain during scheduled sessions
//sells 1 when extended above the sma with rsi overbought,
//buys 1 when below the sma with rsi oversold
#[derive(Debug, Clone)]
pub struct SessionGatedSignalStrategy {
    params: SignalParams,
    indicators: IndicatorRegistry,
}

impl SessionGatedSignalStrategy {
    pub fn new(params: SignalParams) -> Self {
        SessionGatedSignalStrategy {
            indicators: IndicatorRegistry::new(params.lookback),
            params,
        }
    }

    pub fn indicators(&self) -> &IndicatorRegistry {
        &self.indicators
    }

    pub fn params(&self) -> &SignalParams {
        &self.params
    }
}

impl Strategy for SessionGatedSignalStrategy {
    fn on_init(&mut self, context: &mut StrategyContext) {
        context.debug(format!(
            "Initialized {} (lookback={}, oversold={}, overbought={}, qty={})",
            self.name(),
            self.params.lookback,
            self.params.oversold,
            self.params.overbought,
            self.params.qty
        ));
    }

    fn on_session_start(&mut self, context: &mut StrategyContext) {
        context.open_session();
        let time = context.time();
        context.debug(format!("Trading session started at {}", time));
    }

    fn on_session_end(&mut self, context: &mut StrategyContext) {
        context.close_session();
        let time = context.time();
        context.debug(format!("Trading session ended at {}", time));
    }

    fn on_data(&mut self, context: &mut StrategyContext, slice: &DataSlice) {
        if !context.in_session() {
            return;
        }

        let time = context.time();

        for chain in slice.chains.values() {
            let Some(front) = front_contract(chain) else {
                continue;
            };

            let symbol = front.symbol.clone();
            let price = front.last_price;

            let pair = self.indicators.get_or_create(&symbol);
            pair.update(price);

            let setup = is_setup(pair);
            let Some((sma, rsi)) = pair.values() else {
                context.debug(format!("Indicators not ready for {} at {}", symbol, time));
                continue;
            };

            context.debug(format!(
                "Price: {}, SMA: {}, RSI: {} at {}",
                price, sma, rsi, time
            ));

            if !setup {
                continue;
            }

            let Ok(qty) = i32::try_from(self.params.qty) else {
                context.debug(format!(
                    "Order quantity {} out of range for {}",
                    self.params.qty, symbol
                ));
                continue;
            };
            match entry_signal(price, sma, rsi, &self.params) {
                Some(EntrySignal::Short) => {
                    context.limit_order(symbol.clone(), -qty, price);
                    context.debug(format!("Entering short position for {} at {}", symbol, price));
                }
                Some(EntrySignal::Long) => {
                    context.limit_order(symbol.clone(), qty, price);
                    context.debug(format!("Entering long position for {} at {}", symbol, price));
                }
                None => {}
            }
        }
    }

    fn on_order_event(&mut self, context: &mut StrategyContext, event: &OrderEvent) {
        if event.status == OrderStatus::Filled {
            context.debug(format!(
                "Order filled at {} for {}",
                event.fill_price, event.symbol
            ));
        }
    }

    fn name(&self) -> &str {
        "Silver Bullet"
    }
}
