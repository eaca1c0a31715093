// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

// Contagem de locais por situação
#[derive(Debug, Default, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationStats {
    pub total: usize,
    pub available: usize,
    pub occupied: usize,
    pub reserved: usize,
    pub maintenance: usize,
    /// Só faz sentido para estações; salas ficam sempre em zero.
    pub flex: usize,
    /// Ocupadas / total, de 0.0 a 1.0.
    pub occupancy_rate: f64,
}

// Cards do topo do painel
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub rooms: LocationStats,
    pub workstations: LocationStats,
    pub active_clients: usize,
    pub active_contracts: usize,
    #[schema(example = "48500.00")]
    pub monthly_revenue: Decimal,
}
