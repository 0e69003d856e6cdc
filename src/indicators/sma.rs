//streaming mean of the last `period` prices

use crate::indicators::Indicator;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    window: VecDeque<f64>,
    sum: f64,
    samples: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            window: VecDeque::with_capacity(period),
            sum: 0.0,
            samples: 0,
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        "sma"
    }

    fn period(&self) -> usize {
        self.period
    }

    fn update(&mut self, price: f64) {
        self.samples += 1;

        if self.window.len() == self.period {
            if let Some(leaving) = self.window.pop_front() {
                self.sum -= leaving;
            }
        }
        self.window.push_back(price);
        self.sum += price;
    }

    fn is_ready(&self) -> bool {
        self.samples >= self.period
    }

    fn current(&self) -> Option<f64> {
        if !self.is_ready() {
            return None;
        }
        Some(self.sum / self.period as f64)
    }

    fn samples(&self) -> usize {
        self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn sma_5_rolls() {
        let mut sma = Sma::new(5);
        for p in [10.0, 11.0, 12.0, 13.0] {
            sma.update(p);
            assert!(!sma.is_ready());
            assert!(sma.current().is_none());
        }

        sma.update(14.0);
        assert!(sma.is_ready());
        assert_approx(sma.current().unwrap(), 12.0, DEFAULT_EPSILON);

        sma.update(15.0);
        assert_approx(sma.current().unwrap(), 13.0, DEFAULT_EPSILON);

        sma.update(16.0);
        assert_approx(sma.current().unwrap(), 14.0, DEFAULT_EPSILON);
        assert_eq!(sma.samples(), 7);
    }

    #[test]
    fn sma_1_is_last_price() {
        let mut sma = Sma::new(1);
        sma.update(100.0);
        sma.update(200.0);
        assert_approx(sma.current().unwrap(), 200.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_14_ready_after_14() {
        let mut sma = Sma::new(14);
        for i in 0..13 {
            sma.update(100.0 + i as f64);
        }
        assert!(!sma.is_ready());
        sma.update(113.0);
        assert!(sma.is_ready());
        assert_approx(sma.current().unwrap(), 106.5, DEFAULT_EPSILON);
    }

    #[test]
    #[should_panic(expected = "SMA period must be >= 1")]
    fn zero_period_panics() {
        Sma::new(0);
    }
}
