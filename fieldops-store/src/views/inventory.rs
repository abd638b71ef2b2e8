//! Low-stock detection and inventory valuation

use shared::models::Material;

/// Inventory valuation over the FULL material collection (never filtered)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StockValuation {
    pub total_items: usize,
    pub low_stock_items: usize,
    /// Σ qty·cost, missing cost treated as zero
    pub total_cost: f64,
    /// Σ qty·price, missing price treated as zero
    pub total_price: f64,
}

/// Materials at or below their reorder threshold, most depleted first
/// (ascending by signed slack `qty - min_qty`)
pub fn low_stock(materials: &[Material]) -> Vec<Material> {
    let mut low: Vec<Material> = materials
        .iter()
        .filter(|m| m.is_low_stock())
        .cloned()
        .collect();
    low.sort_by(|a, b| {
        let a_slack = a.qty - a.min_qty.unwrap_or(0.0);
        let b_slack = b.qty - b.min_qty.unwrap_or(0.0);
        a_slack.total_cmp(&b_slack)
    });
    low
}

/// Valuation across all materials
pub fn valuation(materials: &[Material]) -> StockValuation {
    StockValuation {
        total_items: materials.len(),
        low_stock_items: materials.iter().filter(|m| m.is_low_stock()).count(),
        total_cost: materials
            .iter()
            .map(|m| m.qty * m.cost.unwrap_or(0.0))
            .sum(),
        total_price: materials
            .iter()
            .map(|m| m.qty * m.price.unwrap_or(0.0))
            .sum(),
    }
}
