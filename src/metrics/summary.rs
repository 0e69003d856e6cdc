use crate::engine::execution::{Fill, OrderSide};
use crate::metrics::timeseries::{calculate_returns, daily_closes, max_drawdown, EquityPoint};
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

//summary metrics for a backtest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub initial_balance: f64,
    pub final_balance: f64,
    pub total_return: f64,
    pub total_return_pct: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    pub num_orders: usize,
    pub num_fills: usize,
    pub num_long_fills: usize,
    pub num_short_fills: usize,
    pub num_canceled: usize,
}

impl SummaryMetrics {
    pub fn from_backtest(
        equity_curve: &[EquityPoint],
        fills: &[Fill],
        num_orders: usize,
        num_canceled: usize,
        initial_balance: f64,
    ) -> Self {
        let final_balance = equity_curve
            .last()
            .map(|p| p.equity)
            .unwrap_or(initial_balance);

        let total_return = final_balance - initial_balance;
        let total_return_pct = total_return / initial_balance;

        let daily: Vec<f64> = daily_closes(equity_curve).into_iter().map(|(_, e)| e).collect();
        let sharpe_ratio = calculate_sharpe_ratio(&calculate_returns(&daily));

        let num_long_fills = fills.iter().filter(|f| f.side == OrderSide::Buy).count();

        SummaryMetrics {
            initial_balance,
            final_balance,
            total_return,
            total_return_pct,
            max_drawdown: max_drawdown(equity_curve),
            sharpe_ratio,
            num_orders,
            num_fills: fills.len(),
            num_long_fills,
            num_short_fills: fills.len() - num_long_fills,
            num_canceled,
        }
    }

    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.add_row(Row::new(vec![Cell::new("Metric"), Cell::new("Value")]));

        let rows = [
            ("Initial Balance", format!("${:.2}", self.initial_balance)),
            ("Final Balance", format!("${:.2}", self.final_balance)),
            (
                "Total Return",
                format!(
                    "${:.2} ({:.2}%)",
                    self.total_return,
                    self.total_return_pct * 100.0
                ),
            ),
            ("Max Drawdown", format!("{:.2}%", self.max_drawdown * 100.0)),
            ("Sharpe Ratio", format!("{:.3}", self.sharpe_ratio)),
            ("Orders Submitted", self.num_orders.to_string()),
            ("Fills", self.num_fills.to_string()),
            ("Long Fills", self.num_long_fills.to_string()),
            ("Short Fills", self.num_short_fills.to_string()),
            ("Canceled", self.num_canceled.to_string()),
        ];

        for (name, value) in rows {
            table.add_row(Row::new(vec![Cell::new(name), Cell::new(&value)]));
        }

        table
    }

    //prints metrics in a formatted table
    pub fn pretty_print_table(&self) {
        self.to_table().printstd();
    }
}

//annualized from daily returns
fn calculate_sharpe_ratio(returns: &[f64]) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }

    let mean = returns.mean();
    let std_dev = returns.std_dev();

    if std_dev == 0.0 || std_dev.is_nan() {
        return 0.0;
    }

    (mean / std_dev) * (252.0_f64).sqrt()
}
