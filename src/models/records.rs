// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Entity records persisted by the CRM and their submit-time validation.
//!
//! Field names on the wire are the camelCase Portuguese keys the application
//! has always stored (`nome`, `dataCriacao`, ...), so existing backups and
//! spreadsheet exports keep decoding. Status and category enums serialize to
//! their display strings for the same reason.

use std::fmt;
use std::str::FromStr;

use anyhow::{Result, anyhow};
use email_address::EmailAddress;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::{Date, OffsetDateTime, format_description::well_known::Rfc3339, macros::format_description};
use uuid::Uuid;

use crate::models::identifier::{is_valid_individual, is_valid_organization};
use crate::models::lenient;

/// The six collections that make up the CRM database.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Clients,
    Dependents,
    Suppliers,
    Products,
    Quotes,
    Agenda,
}

impl Collection {
    /// Every collection, in backup document order.
    pub const ALL: [Collection; 6] = [
        Collection::Clients,
        Collection::Dependents,
        Collection::Suppliers,
        Collection::Products,
        Collection::Quotes,
        Collection::Agenda,
    ];

    /// Storage key and backup document key.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Clients => "clientes",
            Self::Dependents => "dependentes",
            Self::Suppliers => "fornecedores",
            Self::Products => "produtos",
            Self::Quotes => "cotacoes",
            Self::Agenda => "agenda",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Collection {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        let lower = raw.trim().to_ascii_lowercase();
        Collection::ALL
            .into_iter()
            .find(|c| c.key() == lower)
            .or(match lower.as_str() {
                "clients" => Some(Self::Clients),
                "dependents" => Some(Self::Dependents),
                "suppliers" => Some(Self::Suppliers),
                "products" => Some(Self::Products),
                "quotes" => Some(Self::Quotes),
                _ => None,
            })
            .ok_or_else(|| anyhow!("Unknown collection: {raw}"))
    }
}

/// Fresh record identifier.
pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

/// Creation timestamp in the RFC 3339 form stored in `dataCriacao`.
pub fn creation_timestamp(now: OffsetDateTime) -> String {
    now.format(&Rfc3339)
        .unwrap_or_else(|_| now.unix_timestamp().to_string())
}

/// Parse a stored `YYYY-MM-DD` date; anything else yields `None`.
pub fn parse_record_date(raw: &str) -> Option<Date> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]")).ok()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientStatus {
    #[default]
    #[serde(rename = "Ativo")]
    Active,
    #[serde(rename = "Inativo")]
    Inactive,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefone")]
    pub phone: String,
    pub cpf: String,
    #[serde(rename = "dataNascimento")]
    pub birth_date: String,
    #[serde(rename = "endereco")]
    pub address: String,
    #[serde(rename = "cidade")]
    pub city: String,
    #[serde(rename = "estado")]
    pub state: String,
    #[serde(rename = "cep")]
    pub postal_code: String,
    pub status: ClientStatus,
    #[serde(rename = "observacoes", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(rename = "dataCriacao")]
    pub created_at: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dependent {
    pub id: String,
    #[serde(rename = "clienteId")]
    pub client_id: String,
    #[serde(rename = "nome")]
    pub name: String,
    pub cpf: String,
    #[serde(rename = "dataNascimento")]
    pub birth_date: String,
    #[serde(rename = "parentesco")]
    pub relationship: String,
    #[serde(rename = "observacoes", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(rename = "dataCriacao")]
    pub created_at: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupplierKind {
    #[serde(rename = "Operadora")]
    TourOperator,
    #[serde(rename = "Cia Aérea", alias = "Companhia Aérea")]
    Airline,
    Hotel,
    #[serde(rename = "Seguro")]
    Insurance,
    #[serde(rename = "Transporte")]
    Transport,
    #[serde(rename = "Restaurante")]
    Restaurant,
    #[serde(rename = "Agência")]
    Agency,
    #[serde(rename = "Outro")]
    Other,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "tipo")]
    pub kind: SupplierKind,
    #[serde(rename = "contato")]
    pub contact: String,
    #[serde(rename = "telefone")]
    pub phone: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cnpj: Option<String>,
    #[serde(rename = "endereco", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "cidade", default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(rename = "estado", default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(rename = "cep", default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(rename = "observacoes", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(rename = "dataCriacao")]
    pub created_at: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductCategory {
    #[serde(rename = "Pacote")]
    Package,
    #[serde(rename = "Pacote Nacional")]
    DomesticPackage,
    #[serde(rename = "Pacote Internacional")]
    InternationalPackage,
    #[serde(rename = "Hospedagem")]
    Lodging,
    Hotel,
    #[serde(rename = "Passagem")]
    Ticket,
    #[serde(rename = "Transporte")]
    Transport,
    #[serde(rename = "Seguro")]
    Insurance,
    #[serde(rename = "Passeio")]
    Tour,
    #[serde(rename = "Outro")]
    Other,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "categoria")]
    pub category: ProductCategory,
    #[serde(rename = "destino", default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "preco", deserialize_with = "lenient::number")]
    pub price: f64,
    #[serde(rename = "duracao", default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(rename = "incluso", default, skip_serializing_if = "Option::is_none")]
    pub included: Option<String>,
    #[serde(rename = "naoIncluso", default, skip_serializing_if = "Option::is_none")]
    pub not_included: Option<String>,
    #[serde(rename = "fornecedorId", default, skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<String>,
    #[serde(rename = "observacoes", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(rename = "dataCriacao")]
    pub created_at: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QuoteStatus {
    #[serde(rename = "Pendente")]
    Pending,
    #[serde(rename = "Em Análise")]
    UnderReview,
    #[serde(rename = "Aprovada")]
    Approved,
    #[serde(rename = "Rejeitada")]
    Rejected,
    #[serde(rename = "Finalizada")]
    Finalized,
}

impl QuoteStatus {
    /// Display string, identical to the stored value.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pendente",
            Self::UnderReview => "Em Análise",
            Self::Approved => "Aprovada",
            Self::Rejected => "Rejeitada",
            Self::Finalized => "Finalizada",
        }
    }

    /// Approved and finalized quotes count as sales.
    pub fn is_closed_sale(&self) -> bool {
        matches!(self, Self::Approved | Self::Finalized)
    }

    /// Pending and under-review quotes count towards potential revenue.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Pending | Self::UnderReview)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub id: String,
    #[serde(rename = "clienteId")]
    pub client_id: String,
    #[serde(rename = "produtoId")]
    pub product_id: String,
    #[serde(rename = "produtos", deserialize_with = "lenient::string_list")]
    pub product_ids: Vec<String>,
    #[serde(rename = "dataViagem")]
    pub travel_date: String,
    #[serde(rename = "dataRetorno")]
    pub return_date: String,
    #[serde(rename = "numeroPassageiros", deserialize_with = "lenient::count")]
    pub passengers: u32,
    #[serde(rename = "valorTotal", deserialize_with = "lenient::number")]
    pub total: f64,
    pub status: QuoteStatus,
    #[serde(rename = "observacoes", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(rename = "cliente", default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(rename = "dataVencimento", default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(
        rename = "itens",
        default,
        deserialize_with = "lenient::optional_object_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub items: Option<Vec<Map<String, Value>>>,
    #[serde(
        rename = "comissao",
        default,
        deserialize_with = "lenient::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub commission: Option<f64>,
    #[serde(
        rename = "percentualComissao",
        default,
        deserialize_with = "lenient::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub commission_percent: Option<f64>,
    #[serde(rename = "dataCriacao")]
    pub created_at: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgendaStatus {
    #[default]
    #[serde(rename = "Agendado")]
    Scheduled,
    #[serde(rename = "Confirmado")]
    Confirmed,
    #[serde(rename = "Cancelado")]
    Cancelled,
    #[serde(rename = "Concluído")]
    Completed,
    #[serde(rename = "Reagendado")]
    Rescheduled,
}

impl AgendaStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Scheduled => "Agendado",
            Self::Confirmed => "Confirmado",
            Self::Cancelled => "Cancelado",
            Self::Completed => "Concluído",
            Self::Rescheduled => "Reagendado",
        }
    }
}

impl FromStr for AgendaStatus {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        serde_json::from_value(Value::String(raw.trim().to_string()))
            .map_err(|_| anyhow!("Unknown agenda status: {raw}"))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgendaItem {
    pub id: String,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao")]
    pub description: String,
    /// Event day as `YYYY-MM-DD`.
    #[serde(rename = "data")]
    pub date: String,
    /// Event time as `HH:MM`.
    #[serde(rename = "hora")]
    pub time: String,
    #[serde(rename = "local", default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(rename = "cliente")]
    pub client: String,
    pub status: AgendaStatus,
    #[serde(rename = "observacoes", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(rename = "dataCriacao")]
    pub created_at: String,
}

/// A record type stored as one of the six collections.
pub trait Record: Serialize + DeserializeOwned {
    const COLLECTION: Collection;

    fn id(&self) -> &str;

    /// Submit-time validation; `None` when the record may be saved.
    fn validate(&self) -> Option<&'static str>;
}

macro_rules! impl_record {
    ($($ty:ty => $collection:ident, $validate:ident);* $(;)?) => {
        $(
            impl Record for $ty {
                const COLLECTION: Collection = Collection::$collection;

                fn id(&self) -> &str {
                    &self.id
                }

                fn validate(&self) -> Option<&'static str> {
                    $validate(self)
                }
            }
        )*
    };
}

impl_record! {
    Client => Clients, validate_client;
    Dependent => Dependents, validate_dependent;
    Supplier => Suppliers, validate_supplier;
    Product => Products, validate_product;
    Quote => Quotes, validate_quote;
    AgendaItem => Agenda, validate_agenda_item;
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Email check shared by the validators; blank values are left to the required check.
pub fn is_valid_email(value: &str) -> bool {
    EmailAddress::parse_with_options(value.trim(), Default::default()).is_ok()
}

fn check_optional_email(value: &str) -> Option<&'static str> {
    (!is_blank(value) && !is_valid_email(value)).then_some("invalid_email")
}

/// Validate a client before it is saved; returns the first failing reason code.
pub fn validate_client(client: &Client) -> Option<&'static str> {
    if is_blank(&client.name) {
        return Some("required");
    }
    if !is_blank(&client.cpf) && !is_valid_individual(&client.cpf) {
        return Some("invalid_cpf");
    }
    check_optional_email(&client.email)
}

pub fn validate_dependent(dependent: &Dependent) -> Option<&'static str> {
    if is_blank(&dependent.name) || is_blank(&dependent.client_id) {
        return Some("required");
    }
    if !is_blank(&dependent.cpf) && !is_valid_individual(&dependent.cpf) {
        return Some("invalid_cpf");
    }
    None
}

pub fn validate_supplier(supplier: &Supplier) -> Option<&'static str> {
    if is_blank(&supplier.name) {
        return Some("required");
    }
    if let Some(cnpj) = supplier.cnpj.as_deref()
        && !is_blank(cnpj)
        && !is_valid_organization(cnpj)
    {
        return Some("invalid_cnpj");
    }
    check_optional_email(&supplier.email)
}

pub fn validate_product(product: &Product) -> Option<&'static str> {
    if is_blank(&product.name) {
        return Some("required");
    }
    if !product.price.is_finite() || product.price < 0.0 {
        return Some("invalid_price");
    }
    None
}

/// Quotes need a client, at least one passenger, and a non-negative total.
/// A return date, when both dates parse, may not precede the travel date.
pub fn validate_quote(quote: &Quote) -> Option<&'static str> {
    if is_blank(&quote.client_id) {
        return Some("required");
    }
    if quote.passengers == 0 {
        return Some("invalid_passengers");
    }
    if !quote.total.is_finite() || quote.total < 0.0 {
        return Some("invalid_amount");
    }
    if let (Some(travel), Some(back)) = (
        parse_record_date(&quote.travel_date),
        parse_record_date(&quote.return_date),
    ) && back < travel
    {
        return Some("invalid_return_date");
    }
    None
}

pub fn validate_agenda_item(item: &AgendaItem) -> Option<&'static str> {
    if is_blank(&item.title) {
        return Some("required");
    }
    if parse_record_date(&item.date).is_none() {
        return Some("invalid_date");
    }
    None
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn client(id: &str, name: &str) -> Client {
        Client {
            id: id.into(),
            name: name.into(),
            email: "ana@example.com".into(),
            phone: "(11) 99999-9999".into(),
            cpf: "111.444.777-35".into(),
            birth_date: "1990-01-01".into(),
            address: "Rua A, 10".into(),
            city: "São Paulo".into(),
            state: "SP".into(),
            postal_code: "01000-000".into(),
            status: ClientStatus::Active,
            notes: None,
            created_at: "2025-01-01T00:00:00Z".into(),
        }
    }

    pub fn quote(id: &str, status: QuoteStatus, total: f64, created_at: &str) -> Quote {
        Quote {
            id: id.into(),
            client_id: "c1".into(),
            product_id: "p1".into(),
            product_ids: vec!["p1".into()],
            travel_date: "2025-07-01".into(),
            return_date: "2025-07-10".into(),
            passengers: 2,
            total,
            status,
            notes: None,
            client_name: None,
            due_date: None,
            items: None,
            commission: Some(total / 10.0),
            commission_percent: Some(10.0),
            created_at: created_at.into(),
        }
    }

    pub fn agenda(id: &str, title: &str, date: &str, status: AgendaStatus) -> AgendaItem {
        AgendaItem {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            date: date.into(),
            time: "10:00".into(),
            location: None,
            client: "Ana".into(),
            status,
            notes: None,
            created_at: "2025-01-01T00:00:00Z".into(),
        }
    }
}
