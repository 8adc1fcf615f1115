// Profitability Estimation
//
// Pure arithmetic over the hashrate share of the network. No bounds
// checking: a hashrate of 0 yields an all-zero payout and a net profit
// equal to minus the fixed daily electricity cost.

use crate::config::ProfitParameters;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfitEstimate {
    pub xmr_per_day: f64,
    pub usd_per_day: f64,
    pub net_profit_usd: f64,
}

/// Fixed daily electricity cost in USD for the assumed power draw
pub fn electricity_cost_per_day(params: &ProfitParameters) -> f64 {
    (params.power_draw_watts / 1000.0) * 24.0 * params.electricity_rate
}

/// Project daily yield for a given hashrate and reference XMR price
pub fn estimate(hashrate: f64, xmr_price: f64, params: &ProfitParameters) -> ProfitEstimate {
    let share_of_network = hashrate / params.network_hashrate;
    let xmr_per_day = share_of_network * params.block_reward * params.blocks_per_day;
    let usd_per_day = xmr_per_day * xmr_price;
    let net_profit_usd = usd_per_day - electricity_cost_per_day(params);

    ProfitEstimate {
        xmr_per_day,
        usd_per_day,
        net_profit_usd,
    }
}
