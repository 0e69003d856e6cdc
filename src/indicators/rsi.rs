//relative strength index with wilder smoothing
//seeded with the plain mean of the first `period` changes, then
//avg = (avg * (period - 1) + x) / period
//ready after `period` changes; flat -> 50, no losses -> 100, no gains -> 0

use crate::indicators::Indicator;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    prev_price: Option<f64>,
    changes: usize,
    samples: usize,
    avg_gain: f64,
    avg_loss: f64,
    current: Option<f64>,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            prev_price: None,
            changes: 0,
            samples: 0,
            avg_gain: 0.0,
            avg_loss: 0.0,
            current: None,
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        "rsi"
    }

    fn period(&self) -> usize {
        self.period
    }

    fn update(&mut self, price: f64) {
        self.samples += 1;

        if let Some(prev) = self.prev_price {
            let change = price - prev;
            let gain = change.max(0.0);
            let loss = (-change).max(0.0);
            let period = self.period as f64;

            self.changes += 1;

            if self.changes <= self.period {
                //seed window: accumulate sums, divide once full
                self.avg_gain += gain;
                self.avg_loss += loss;
                if self.changes == self.period {
                    self.avg_gain /= period;
                    self.avg_loss /= period;
                    self.current = Some(compute_rsi(self.avg_gain, self.avg_loss));
                }
            } else {
                self.avg_gain = (self.avg_gain * (period - 1.0) + gain) / period;
                self.avg_loss = (self.avg_loss * (period - 1.0) + loss) / period;
                self.current = Some(compute_rsi(self.avg_gain, self.avg_loss));
            }
        }

        self.prev_price = Some(price);
    }

    fn is_ready(&self) -> bool {
        self.changes >= self.period
    }

    fn current(&self) -> Option<f64> {
        self.current
    }

    fn samples(&self) -> usize {
        self.samples
    }
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0
    } else if avg_loss == 0.0 {
        100.0
    } else if avg_gain == 0.0 {
        0.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
