use serde::{Deserialize, Serialize};

//contract terms shared by every month of one underlying
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuturesContract {
    //underlying root (eg es, nq)
    pub root: String,

    //minimum price fluctuation
    pub tick_size: f64,

    //dollar value of one tick
    pub tick_value: f64,
}

impl FuturesContract {
    pub fn new(root: String, tick_size: f64, tick_value: f64) -> Self {
        FuturesContract {
            root,
            tick_size,
            tick_value,
        }
    }

    //converts a price difference to ticks
    pub fn price_to_ticks(&self, price_diff: f64) -> f64 {
        price_diff / self.tick_size
    }

    //dollar pnl of a price move for a signed quantity
    pub fn pnl_from_price_move(&self, price_diff: f64, quantity: i32) -> f64 {
        self.price_to_ticks(price_diff) * self.tick_value * quantity as f64
    }

    //e-mini s&p 500, $50 per point
    pub fn es() -> Self {
        FuturesContract::new("ES".to_string(), 0.25, 12.50)
    }

    //e-mini nasdaq-100, $20 per point
    pub fn nq() -> Self {
        FuturesContract::new("NQ".to_string(), 0.25, 5.0)
    }

    //looks up a known underlying by root, case-insensitive
    pub fn for_root(root: &str) -> Option<Self> {
        match root.to_uppercase().as_str() {
            "ES" => Some(Self::es()),
            "NQ" => Some(Self::nq()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn es_point_move_is_fifty_dollars() {
        let es = FuturesContract::es();
        assert_eq!(es.pnl_from_price_move(1.0, 1), 50.0);
        assert_eq!(es.pnl_from_price_move(-2.0, -1), 100.0);
    }

    #[test]
    fn nq_point_move_is_twenty_dollars() {
        let nq = FuturesContract::nq();
        assert_eq!(nq.price_to_ticks(1.0), 4.0);
        assert_eq!(nq.pnl_from_price_move(10.0, -2), -400.0);
    }

    #[test]
    fn lookup_by_root() {
        assert_eq!(FuturesContract::for_root("es"), Some(FuturesContract::es()));
        assert_eq!(FuturesContract::for_root("NQ"), Some(FuturesContract::nq()));
        assert!(FuturesContract::for_root("CL").is_none());
    }
}
