use crate::instrument::{ContractSymbol, FuturesContract};
use serde::{Deserialize, Serialize};

//net holding in one contract month
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub symbol: ContractSymbol,

    //positive long, negative short, 0 flat
    pub net_qty: i32,

    pub avg_entry_price: f64,

    pub realized_pnl: f64,
}

impl Position {
    pub fn new(symbol: ContractSymbol) -> Self {
        Position {
            symbol,
            net_qty: 0,
            avg_entry_price: 0.0,
            realized_pnl: 0.0,
        }
    }

    pub fn unrealized_pnl(&self, mark_price: f64, contract: &FuturesContract) -> f64 {
        if self.net_qty == 0 {
            return 0.0;
        }
        contract.pnl_from_price_move(mark_price - self.avg_entry_price, self.net_qty)
    }

    pub fn is_flat(&self) -> bool {
        self.net_qty == 0
    }

    //applies a signed fill, returning the pnl realized by any closed portion
    pub fn apply_fill(&mut self, fill_qty: i32, fill_price: f64, contract: &FuturesContract) -> f64 {
        if self.net_qty == 0 {
            self.net_qty = fill_qty;
            self.avg_entry_price = fill_price;
            return 0.0;
        }

        let adding = self.net_qty.signum() == fill_qty.signum();

        if adding {
            let total_qty = self.net_qty + fill_qty;
            let cost = self.avg_entry_price * self.net_qty as f64 + fill_price * fill_qty as f64;
            self.avg_entry_price = cost / total_qty as f64;
            self.net_qty = total_qty;
            return 0.0;
        }

        let closed = fill_qty.abs().min(self.net_qty.abs());
        let per_unit = if self.net_qty > 0 {
            fill_price - self.avg_entry_price
        } else {
            self.avg_entry_price - fill_price
        };
        let realized = contract.pnl_from_price_move(per_unit, closed);
        self.realized_pnl += realized;

        let before = self.net_qty;
        self.net_qty += fill_qty;

        if self.net_qty == 0 {
            self.avg_entry_price = 0.0;
        } else if self.net_qty.signum() != before.signum() {
            //reversed through flat
            self.avg_entry_price = fill_price;
        }

        realized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos() -> Position {
        Position::new(ContractSymbol::new("ESZ22"))
    }

    #[test]
    fn open_and_close_long() {
        let es = FuturesContract::es();
        let mut p = pos();
        assert_eq!(p.apply_fill(1, 4000.0, &es), 0.0);
        assert_eq!(p.unrealized_pnl(4002.0, &es), 100.0);

        let realized = p.apply_fill(-1, 4004.0, &es);
        assert_eq!(realized, 200.0);
        assert!(p.is_flat());
        assert_eq!(p.avg_entry_price, 0.0);
    }

    #[test]
    fn short_gains_when_price_falls() {
        let es = FuturesContract::es();
        let mut p = pos();
        p.apply_fill(-1, 4000.0, &es);
        assert_eq!(p.unrealized_pnl(3990.0, &es), 500.0);
    }

    #[test]
    fn adding_averages_entry() {
        let es = FuturesContract::es();
        let mut p = pos();
        p.apply_fill(1, 4000.0, &es);
        p.apply_fill(1, 4010.0, &es);
        assert_eq!(p.net_qty, 2);
        assert_eq!(p.avg_entry_price, 4005.0);
    }

    #[test]
    fn reversal_resets_entry() {
        let es = FuturesContract::es();
        let mut p = pos();
        p.apply_fill(1, 4000.0, &es);
        let realized = p.apply_fill(-3, 3990.0, &es);
        assert_eq!(realized, -500.0);
        assert_eq!(p.net_qty, -2);
        assert_eq!(p.avg_entry_price, 3990.0);
    }
}
