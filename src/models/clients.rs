// src/models/clients.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// Linha da tabela `clients`
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ClientRow {
    pub id: Uuid,
    pub name: String,
    pub document: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub contact_name: Option<String>,
    pub notes: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Contrato de um serviço (tabela `client_services`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientService {
    pub id: Uuid,
    #[schema(ignore)]
    pub client_id: Uuid,
    pub service_id: Uuid,
    /// Salas ou estações contratadas.
    pub location_ids: Vec<Uuid>,
    #[schema(example = "2024-01-01")]
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[schema(example = "1200.00")]
    pub value: Decimal,
}

impl ClientService {
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.start_date <= date && self.end_date.is_none_or(|end| date <= end)
    }
}

// Cliente no formato da aplicação: dados + contratos
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    #[schema(example = "Acme Tecnologia Ltda")]
    pub name: String,
    #[schema(example = "12.345.678/0001-99")]
    pub document: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub contact_name: Option<String>,
    pub notes: Option<String>,
    pub active: bool,
    pub services: Vec<ClientService>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    pub fn from_rows(row: ClientRow, services: Vec<ClientService>) -> Self {
        Client {
            id: row.id,
            name: row.name,
            document: row.document,
            email: row.email,
            phone: row.phone,
            contact_name: row.contact_name,
            notes: row.notes,
            active: row.active,
            services,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }

    #[cfg(test)]
    pub fn into_rows(self) -> (ClientRow, Vec<ClientService>) {
        let row = ClientRow {
            id: self.id,
            name: self.name,
            document: self.document,
            email: self.email,
            phone: self.phone,
            contact_name: self.contact_name,
            notes: self.notes,
            active: self.active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        (row, self.services)
    }

    /// Agrupa os contratos carregados em lote por cliente.
    pub fn assemble(rows: Vec<ClientRow>, mut services: Vec<ClientService>) -> Vec<Client> {
        rows.into_iter()
            .map(|row| {
                let (mine, rest): (Vec<_>, Vec<_>) =
                    services.drain(..).partition(|s| s.client_id == row.id);
                services = rest;
                Client::from_rows(row, mine)
            })
            .collect()
    }
}

// --- Payloads ---

fn validate_contract_dates(payload: &ClientServicePayload) -> Result<(), ValidationError> {
    if let Some(end) = payload.end_date {
        if end < payload.start_date {
            let mut err = ValidationError::new("date_range");
            err.message = Some("A data final deve ser posterior à data inicial.".into());
            return Err(err);
        }
    }
    if payload.value < Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor do contrato não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_contract_dates"))]
pub struct ClientServicePayload {
    pub service_id: Uuid,
    #[serde(default)]
    pub location_ids: Vec<Uuid>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub value: Decimal,
}

// Criação e atualização usam o mesmo formulário (PUT substitui tudo)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    pub document: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub contact_name: Option<String>,
    pub notes: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    #[validate(nested)]
    pub services: Vec<ClientServicePayload>,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn contract(client_id: Uuid, end: Option<NaiveDate>) -> ClientService {
        ClientService {
            id: Uuid::new_v4(),
            client_id,
            service_id: Uuid::new_v4(),
            location_ids: vec![Uuid::new_v4()],
            start_date: date(2024, 1, 1),
            end_date: end,
            value: Decimal::new(150000, 2),
        }
    }

    #[test]
    fn row_round_trip_keeps_dates_and_optionals() {
        let now = Utc::now();
        let id = Uuid::new_v4();
        let row = ClientRow {
            id,
            name: "Acme".into(),
            document: Some("12.345.678/0001-99".into()),
            email: None,
            phone: Some("(11) 4000-0000".into()),
            contact_name: None,
            notes: Some("Prefere o 2º andar".into()),
            active: true,
            created_at: now,
            updated_at: now,
        };
        let services = vec![contract(id, Some(date(2024, 12, 31))), contract(id, None)];

        let client = Client::from_rows(row.clone(), services.clone());
        let (row_back, services_back) = client.into_rows();

        assert_eq!(row_back, row);
        assert_eq!(services_back, services);
    }

    #[test]
    fn assemble_groups_contracts_by_client() {
        let now = Utc::now();
        let make = |name: &str| ClientRow {
            id: Uuid::new_v4(),
            name: name.into(),
            document: None,
            email: None,
            phone: None,
            contact_name: None,
            notes: None,
            active: true,
            created_at: now,
            updated_at: now,
        };
        let a = make("A");
        let b = make("B");
        let services = vec![contract(a.id, None), contract(b.id, None), contract(a.id, None)];

        let clients = Client::assemble(vec![a, b], services);
        assert_eq!(clients[0].services.len(), 2);
        assert_eq!(clients[1].services.len(), 1);
    }

    #[test]
    fn contract_activity_respects_open_and_closed_ranges() {
        let id = Uuid::new_v4();
        let closed = contract(id, Some(date(2024, 6, 30)));
        assert!(closed.is_active_on(date(2024, 6, 30)));
        assert!(!closed.is_active_on(date(2024, 7, 1)));
        assert!(!closed.is_active_on(date(2023, 12, 31)));

        let open = contract(id, None);
        assert!(open.is_active_on(date(2030, 1, 1)));
    }

    #[test]
    fn payload_rejects_end_before_start() {
        let payload = ClientPayload {
            name: "Acme".into(),
            document: None,
            email: Some("contato@acme.com".into()),
            phone: None,
            contact_name: None,
            notes: None,
            active: true,
            services: vec![ClientServicePayload {
                service_id: Uuid::new_v4(),
                location_ids: vec![],
                start_date: date(2024, 5, 1),
                end_date: Some(date(2024, 4, 1)),
                value: Decimal::ONE,
            }],
        };
        assert!(payload.validate().is_err());
    }
}
