//! Replenishment calculation
//!
//! ```text
//! adjusted_forecast = forecast_usage * (1 + waste_factor) / yield_factor
//! safety_stock      = adjusted_forecast * safety_stock_pct
//! net_needed        = max(0, adjusted_forecast + safety_stock - on_hand - on_order)
//! recommended_packs = ceil(net_needed / pack_size_units)
//! ```

/// Relative tolerance for snapping a pack count onto a whole number
const PACK_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy)]
pub struct ReplenishmentInput<'a> {
    /// Daily usage forecast, only the first `coverage_days` entries count
    pub forecast_daily_usage: &'a [f64],
    pub coverage_days: usize,
    pub waste_factor: f64,
    pub yield_factor: f64,
    pub safety_stock_pct: f64,
    pub on_hand: f64,
    pub on_order: f64,
    pub pack_size_units: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Replenishment {
    pub forecast_usage: f64,
    pub adjusted_forecast: f64,
    pub safety_stock: f64,
    pub net_needed: f64,
    pub recommended_packs: i64,
}

/// Compute the recommendation. Never fails: a non-positive yield counts as
/// no trim loss and a non-positive pack size recommends zero packs.
pub fn calculate(input: &ReplenishmentInput<'_>) -> Replenishment {
    let forecast_usage: f64 = input
        .forecast_daily_usage
        .iter()
        .take(input.coverage_days)
        .filter(|u| u.is_finite() && **u > 0.0)
        .sum();

    let yield_factor = if input.yield_factor > 0.0 {
        input.yield_factor
    } else {
        1.0
    };
    let adjusted_forecast = forecast_usage * (1.0 + input.waste_factor.max(0.0)) / yield_factor;
    let safety_stock = adjusted_forecast * input.safety_stock_pct.max(0.0);
    let net_needed =
        (adjusted_forecast + safety_stock - input.on_hand - input.on_order).max(0.0);

    let recommended_packs = if input.pack_size_units > 0.0 && net_needed > 0.0 {
        packs_for(net_needed / input.pack_size_units)
    } else {
        0
    };

    Replenishment {
        forecast_usage,
        adjusted_forecast,
        safety_stock,
        net_needed,
        recommended_packs,
    }
}

/// Round a positive pack ratio up, absorbing float noise around whole
/// numbers. Any positive need orders at least one pack.
fn packs_for(ratio: f64) -> i64 {
    let nearest = ratio.round();
    if nearest >= 1.0 && (ratio - nearest).abs() <= PACK_EPSILON * nearest {
        nearest as i64
    } else {
        ratio.ceil() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(series: &[f64]) -> ReplenishmentInput<'_> {
        ReplenishmentInput {
            forecast_daily_usage: series,
            coverage_days: series.len(),
            waste_factor: 0.1,
            yield_factor: 0.9,
            safety_stock_pct: 0.2,
            on_hand: 20.0,
            on_order: 10.0,
            pack_size_units: 10.0,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn reference_case() {
        let r = calculate(&input(&[100.0]));
        assert!(close(r.adjusted_forecast, 122.22), "{}", r.adjusted_forecast);
        assert!(close(r.safety_stock, 24.44), "{}", r.safety_stock);
        assert!(close(r.net_needed, 116.67), "{}", r.net_needed);
        assert_eq!(r.recommended_packs, 12);
    }

    #[test]
    fn series_is_summed_over_horizon() {
        let series = [10.0, 20.0, 30.0, 40.0];
        let mut i = input(&series);
        i.coverage_days = 2;
        assert!(close(calculate(&i).forecast_usage, 30.0));
        i.coverage_days = 10;
        assert!(close(calculate(&i).forecast_usage, 100.0));
    }

    #[test]
    fn covered_stock_needs_nothing() {
        let mut i = input(&[10.0]);
        i.on_hand = 500.0;
        let r = calculate(&i);
        assert_eq!(r.net_needed, 0.0);
        assert_eq!(r.recommended_packs, 0);
    }

    #[test]
    fn exact_multiple_does_not_round_up() {
        let i = ReplenishmentInput {
            forecast_daily_usage: &[0.1, 0.2],
            coverage_days: 2,
            waste_factor: 0.0,
            yield_factor: 1.0,
            safety_stock_pct: 0.0,
            on_hand: 0.0,
            on_order: 0.0,
            pack_size_units: 0.1,
        };
        // 0.1 + 0.2 = 0.30000000000000004
        assert_eq!(calculate(&i).recommended_packs, 3);
    }

    #[test]
    fn tiny_need_still_orders_a_pack() {
        let i = ReplenishmentInput {
            forecast_daily_usage: &[1e-10],
            coverage_days: 1,
            waste_factor: 0.0,
            yield_factor: 1.0,
            safety_stock_pct: 0.0,
            on_hand: 0.0,
            on_order: 0.0,
            pack_size_units: 10.0,
        };
        let r = calculate(&i);
        assert!(r.net_needed > 0.0);
        assert_eq!(r.recommended_packs, 1);
    }

    #[test]
    fn large_exact_multiple_does_not_round_up() {
        let mut i = input(&[1_000_000.0]);
        i.waste_factor = 0.0;
        i.yield_factor = 1.0;
        i.safety_stock_pct = 0.0;
        i.on_hand = 0.0;
        i.on_order = 0.0;
        i.pack_size_units = 0.1;
        assert_eq!(calculate(&i).recommended_packs, 10_000_000);
    }

    #[test]
    fn degenerate_inputs_never_go_negative() {
        for (pack, yld, on_hand) in [(0.0, 0.9, 0.0), (-5.0, 0.0, 0.0), (10.0, -1.0, 1e9)] {
            let mut i = input(&[100.0]);
            i.pack_size_units = pack;
            i.yield_factor = yld;
            i.on_hand = on_hand;
            let r = calculate(&i);
            assert!(r.net_needed >= 0.0);
            assert!(r.recommended_packs >= 0);
        }
    }
}
