use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

//a point in the equity curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub timestamp: DateTime<Utc>,
    pub equity: f64,
    pub drawdown: f64,
    pub returns: f64,
}

//builds the equity curve with running drawdown and step returns
pub fn calculate_equity_curve(
    history: &[(DateTime<Utc>, f64)],
    initial_balance: f64,
) -> Vec<EquityPoint> {
    let mut peak = initial_balance;
    let mut prev_equity = initial_balance;

    history
        .iter()
        .map(|&(timestamp, equity)| {
            peak = peak.max(equity);

            let drawdown = if peak > 0.0 {
                (peak - equity) / peak
            } else {
                0.0
            };
            let returns = if prev_equity != 0.0 {
                (equity - prev_equity) / prev_equity
            } else {
                0.0
            };
            prev_equity = equity;

            EquityPoint {
                timestamp,
                equity,
                drawdown,
                returns,
            }
        })
        .collect()
}

//largest drawdown seen on the curve, as a fraction of the peak
pub fn max_drawdown(equity_curve: &[EquityPoint]) -> f64 {
    equity_curve
        .iter()
        .map(|point| point.drawdown)
        .fold(0.0, f64::max)
}

//last equity of each utc day, in order
pub fn daily_closes(equity_curve: &[EquityPoint]) -> Vec<(NaiveDate, f64)> {
    let mut days: Vec<(NaiveDate, f64)> = Vec::new();
    for point in equity_curve {
        let day = point.timestamp.date_naive();
        match days.last_mut() {
            Some(last) if last.0 == day => last.1 = point.equity,
            _ => days.push((day, point.equity)),
        }
    }
    days
}

//simple returns between consecutive values
pub fn calculate_returns(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect()
}
