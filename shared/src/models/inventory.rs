//! Inventory and procurement models

use serde::{Deserialize, Serialize};

/// A purchasable pack of an ingredient
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct IngredientSku {
    pub id: i64,
    pub tenant_id: String,
    pub location_id: i64,
    pub name: String,
    pub supplier: String,
    /// Base unit (kg, l, ud)
    pub unit: String,
    /// Base units per pack
    pub pack_size_units: f64,
    pub pack_price: f64,
    /// Forecast usage per day in base units, starting today
    pub forecast_daily_usage: Vec<f64>,
    pub on_hand: f64,
    pub on_order: f64,
    /// Fraction lost to waste (0.1 = 10%)
    pub waste_factor: f64,
    /// Usable fraction after trimming (0.9 = 90%)
    pub yield_factor: f64,
    pub updated_at: i64,
}

/// Recommendation for a single SKU
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplenishmentLine {
    pub sku_id: i64,
    pub sku_name: String,
    pub supplier: String,
    pub unit: String,
    pub forecast_usage: f64,
    pub adjusted_forecast: f64,
    pub safety_stock: f64,
    pub net_needed: f64,
    pub recommended_packs: i64,
    pub pack_price: f64,
    pub estimated_cost: f64,
}

/// Query parameters for a replenishment run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplenishmentQuery {
    pub location_id: i64,
    /// Days of forecast covered by the order
    #[serde(default = "default_coverage_days")]
    pub coverage_days: u32,
    #[serde(default = "default_safety_stock_pct")]
    pub safety_stock_pct: f64,
}

pub const fn default_coverage_days() -> u32 {
    7
}

pub const fn default_safety_stock_pct() -> f64 {
    0.2
}

/// Purchase order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "purchase_order_status", rename_all = "lowercase"))]
pub enum PurchaseOrderStatus {
    Draft,
    Sent,
    Received,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PurchaseOrder {
    pub id: i64,
    pub tenant_id: String,
    pub location_id: i64,
    pub supplier: String,
    pub status: PurchaseOrderStatus,
    pub estimated_total: f64,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PurchaseOrderLine {
    pub id: i64,
    pub purchase_order_id: i64,
    pub sku_id: i64,
    pub sku_name: String,
    pub packs: i64,
    pub pack_price: f64,
    pub line_total: f64,
}

/// Purchase order with its lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrderDetail {
    #[serde(flatten)]
    pub order: PurchaseOrder,
    pub lines: Vec<PurchaseOrderLine>,
}
