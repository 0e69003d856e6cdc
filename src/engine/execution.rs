use crate::data::DataSlice;
use crate::instrument::ContractSymbol;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

//order side (buy or sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    //converts to quantity sign (Buy = +1, Sell = -1)
    pub fn to_qty_sign(&self) -> i32 {
        match self {
            OrderSide::Buy => 1,
            OrderSide::Sell => -1,
        }
    }

    //side implied by a signed quantity
    pub fn from_signed_qty(qty: i32) -> Self {
        if qty < 0 {
            OrderSide::Sell
        } else {
            OrderSide::Buy
        }
    }
}

//lifecycle states reported back to the strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Submitted,
    PartiallyFilled,
    Filled,
    Canceled,
    Invalid,
}

//a limit order for one contract
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub symbol: ContractSymbol,
    pub qty: u32,
    pub side: OrderSide,
    pub limit_price: f64,
}

impl Order {
    //builds a limit order from a signed quantity (positive buys, negative sells)
    pub fn limit(
        id: u64,
        timestamp: DateTime<Utc>,
        symbol: ContractSymbol,
        signed_qty: i32,
        limit_price: f64,
    ) -> Self {
        Order {
            id,
            timestamp,
            symbol,
            qty: signed_qty.unsigned_abs(),
            side: OrderSide::from_signed_qty(signed_qty),
            limit_price,
        }
    }

    //returns the signed quantity (positive for buy, negative for sell)
    pub fn signed_qty(&self) -> i32 {
        (self.qty as i32) * self.side.to_qty_sign()
    }

    pub fn is_valid(&self) -> bool {
        self.qty > 0 && self.limit_price.is_finite() && self.limit_price > 0.0
    }

    //true if the bar's range reaches the limit
    pub fn crosses(&self, high: f64, low: f64) -> bool {
        match self.side {
            OrderSide::Buy => low <= self.limit_price,
            OrderSide::Sell => high >= self.limit_price,
        }
    }
}

//represents a filled order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fill {
    pub id: u64,
    pub order_id: u64,
    pub timestamp: DateTime<Utc>,
    pub symbol: ContractSymbol,
    pub qty: i32, //signed: positive for long, negative for short
    pub side: OrderSide,
    pub fill_price: f64,
}

impl Fill {
    pub fn from_order(
        fill_id: u64,
        order: &Order,
        timestamp: DateTime<Utc>,
        fill_price: f64,
    ) -> Self {
        Fill {
            id: fill_id,
            order_id: order.id,
            timestamp,
            symbol: order.symbol.clone(),
            qty: order.signed_qty(),
            side: order.side,
            fill_price,
        }
    }
}

//a change in an order's state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderEvent {
    pub order_id: u64,
    pub time: DateTime<Utc>,
    pub symbol: ContractSymbol,
    pub status: OrderStatus,
    pub fill_price: f64,
    pub fill_qty: i32,
}

impl OrderEvent {
    pub fn new(order: &Order, time: DateTime<Utc>, status: OrderStatus) -> Self {
        OrderEvent {
            order_id: order.id,
            time,
            symbol: order.symbol.clone(),
            status,
            fill_price: 0.0,
            fill_qty: 0,
        }
    }

    pub fn filled(fill: &Fill) -> Self {
        OrderEvent {
            order_id: fill.order_id,
            time: fill.timestamp,
            symbol: fill.symbol.clone(),
            status: OrderStatus::Filled,
            fill_price: fill.fill_price,
            fill_qty: fill.qty,
        }
    }
}

//simulates limit order execution against minute bars
pub struct ExecutionEngine {
    next_fill_id: u64,
    pending_orders: Vec<Order>,
    order_log: Vec<Order>,
}

impl ExecutionEngine {
    pub fn new() -> Self {
        ExecutionEngine {
            next_fill_id: 1,
            pending_orders: Vec::new(),
            order_log: Vec::new(),
        }
    }

    //accepts or rejects an order and reports the outcome
    pub fn submit_order(&mut self, order: Order) -> OrderEvent {
        let time = order.timestamp;

        if !order.is_valid() {
            warn!(
                order_id = order.id,
                symbol = %order.symbol,
                qty = order.qty,
                limit_price = order.limit_price,
                "rejecting invalid order"
            );
            let event = OrderEvent::new(&order, time, OrderStatus::Invalid);
            self.order_log.push(order);
            return event;
        }

        let event = OrderEvent::new(&order, time, OrderStatus::Submitted);
        self.order_log.push(order.clone());
        self.pending_orders.push(order);
        event
    }

    //fills pending orders whose contract traded through the limit in this slice
    //buy limits fill if low <= limit, sell limits if high >= limit, at the limit
    //orders without a bar in the slice stay pending
    pub fn process_orders(&mut self, slice: &DataSlice) -> Vec<Fill> {
        let mut fills = Vec::new();
        let mut orders_to_keep = Vec::new();

        for order in self.pending_orders.drain(..) {
            let filled = slice
                .bar(&order.symbol)
                .map(|bar| order.crosses(bar.high, bar.low))
                .unwrap_or(false);

            if filled {
                let fill = Fill::from_order(self.next_fill_id, &order, slice.time, order.limit_price);
                self.next_fill_id += 1;
                fills.push(fill);
            } else {
                orders_to_keep.push(order);
            }
        }

        self.pending_orders = orders_to_keep;
        fills
    }

    //returns the number of pending orders
    pub fn pending_order_count(&self) -> usize {
        self.pending_orders.len()
    }

    //every order ever submitted, including rejected ones
    pub fn orders(&self) -> &[Order] {
        &self.order_log
    }

    //cancels all pending orders
    pub fn cancel_all_orders(&mut self, time: DateTime<Utc>) -> Vec<OrderEvent> {
        self.pending_orders
            .drain(..)
            .map(|order| OrderEvent::new(&order, time, OrderStatus::Canceled))
            .collect()
    }
}

impl Default for ExecutionEngine {
    fn default() -> Self {
        Self::new()
    }
}
