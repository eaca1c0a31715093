// src/models/catalog.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "service_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    FiscalAddress,
    FlexStation,
    FixedStation,
    PrivateRoom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "plan_period", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PlanPeriod {
    Monthly,
    Quarterly,
    Semiannual,
    Annual,
}

impl PlanPeriod {
    pub fn months(&self) -> u32 {
        match self {
            PlanPeriod::Monthly => 1,
            PlanPeriod::Quarterly => 3,
            PlanPeriod::Semiannual => 6,
            PlanPeriod::Annual => 12,
        }
    }
}

// Linha da tabela `services`
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ServiceRow {
    pub id: Uuid,
    pub name: String,
    pub kind: ServiceKind,
    pub description: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Faixa de preço de um plano (tabela `plan_prices`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanPrice {
    pub id: Uuid,
    #[schema(ignore)]
    pub service_id: Uuid,
    pub period: PlanPeriod,
    #[schema(example = "2400.00")]
    pub price: Decimal,
    #[schema(example = 3)]
    pub installments: Option<i32>,
    /// Desconto em percentual sobre o preço cheio.
    #[schema(example = "10.0")]
    pub discount: Option<Decimal>,
}

impl PlanPrice {
    /// Preço com desconto dividido pelos meses do período.
    pub fn monthly_equivalent(&self) -> Decimal {
        let hundred = Decimal::from(100);
        let net = match self.discount {
            Some(pct) => self.price * (hundred - pct) / hundred,
            None => self.price,
        };
        (net / Decimal::from(self.period.months())).round_dp(2)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Benefit {
    pub id: Uuid,
    #[schema(example = "Café e água à vontade")]
    pub description: String,
}

// Join `service_benefits` + `benefits`, usado para montar os serviços em lote
#[derive(Debug, Clone, FromRow)]
pub struct ServiceBenefitRow {
    pub service_id: Uuid,
    pub id: Uuid,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: Uuid,
    #[schema(example = "Estação Flex")]
    pub name: String,
    pub kind: ServiceKind,
    pub description: Option<String>,
    pub active: bool,
    pub prices: Vec<PlanPrice>,
    pub benefits: Vec<Benefit>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Service {
    pub fn assemble(
        rows: Vec<ServiceRow>,
        prices: Vec<PlanPrice>,
        benefits: Vec<ServiceBenefitRow>,
    ) -> Vec<Service> {
        rows.into_iter()
            .map(|row| Service {
                prices: prices.iter().filter(|p| p.service_id == row.id).cloned().collect(),
                benefits: benefits
                    .iter()
                    .filter(|b| b.service_id == row.id)
                    .map(|b| Benefit { id: b.id, description: b.description.clone() })
                    .collect(),
                id: row.id,
                name: row.name,
                kind: row.kind,
                description: row.description,
                active: row.active,
                created_at: row.created_at,
                updated_at: row.updated_at,
            })
            .collect()
    }
}

// --- Payloads ---

fn validate_discount(discount: &Decimal) -> Result<(), ValidationError> {
    if *discount < Decimal::ZERO || *discount > Decimal::from(100) {
        let mut err = ValidationError::new("range");
        err.message = Some("O desconto deve estar entre 0 e 100%.".into());
        return Err(err);
    }
    Ok(())
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price < Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.message = Some("O preço não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanPricePayload {
    pub period: PlanPeriod,
    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,
    #[validate(range(min = 1, max = 12, message = "O parcelamento deve ser de 1 a 12 vezes."))]
    pub installments: Option<i32>,
    #[validate(custom(function = "validate_discount"))]
    pub discount: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServicePayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    pub kind: ServiceKind,
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    #[validate(nested)]
    pub prices: Vec<PlanPricePayload>,
    #[serde(default)]
    pub benefit_ids: Vec<Uuid>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BenefitPayload {
    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(period: PlanPeriod, price: i64, discount: Option<i64>) -> PlanPrice {
        PlanPrice {
            id: Uuid::new_v4(),
            service_id: Uuid::nil(),
            period,
            price: Decimal::from(price),
            installments: None,
            discount: discount.map(Decimal::from),
        }
    }

    #[test]
    fn monthly_equivalent_applies_discount_and_period() {
        assert_eq!(price(PlanPeriod::Monthly, 900, None).monthly_equivalent(), Decimal::from(900));
        // 3000 com 10% = 2700 / 3 meses
        assert_eq!(price(PlanPeriod::Quarterly, 3000, Some(10)).monthly_equivalent(), Decimal::from(900));
        assert_eq!(price(PlanPeriod::Annual, 1200, None).monthly_equivalent(), Decimal::from(100));
    }

    #[test]
    fn service_kind_uses_snake_case() {
        let json = serde_json::to_string(&ServiceKind::FiscalAddress).unwrap();
        assert_eq!(json, "\"fiscal_address\"");
    }

    #[test]
    fn assemble_attaches_prices_and_benefits_to_their_service() {
        let now = Utc::now();
        let row = ServiceRow {
            id: Uuid::new_v4(),
            name: "Sala Privativa".into(),
            kind: ServiceKind::PrivateRoom,
            description: None,
            active: true,
            created_at: now,
            updated_at: now,
        };
        let mut p = price(PlanPeriod::Monthly, 2500, None);
        p.service_id = row.id;
        let other = price(PlanPeriod::Monthly, 1, None);
        let benefit = ServiceBenefitRow {
            service_id: row.id,
            id: Uuid::new_v4(),
            description: "Internet".into(),
        };

        let services = Service::assemble(vec![row], vec![p.clone(), other], vec![benefit]);
        assert_eq!(services[0].prices, vec![p]);
        assert_eq!(services[0].benefits[0].description, "Internet");
    }

    #[test]
    fn price_payload_rejects_discount_over_100() {
        let payload = PlanPricePayload {
            period: PlanPeriod::Monthly,
            price: Decimal::from(100),
            installments: Some(13),
            discount: Some(Decimal::from(120)),
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("discount"));
        assert!(errors.field_errors().contains_key("installments"));
    }
}
