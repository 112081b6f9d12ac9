//! Payment Model

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SchemaError;
use crate::money::round_money;
use crate::util::{datetime_opt, normalize_key};

/// Payment entity (pagamento)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    #[serde(rename = "pagamento_id", alias = "id", alias = "payment_id")]
    pub id: i64,
    #[serde(rename = "pedido_id", alias = "order_id")]
    pub order_id: i64,
    #[serde(rename = "metodo", alias = "method")]
    pub method: PaymentMethod,
    #[serde(rename = "valor", alias = "amount", with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Cash handed over by the customer
    #[serde(
        rename = "valor_pago",
        alias = "amount_paid",
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount_tendered: Option<Decimal>,
    #[serde(
        rename = "troco",
        alias = "change",
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub change: Option<Decimal>,
    #[serde(default)]
    pub status: PaymentStatus,
    #[serde(
        rename = "data_hora",
        alias = "created_at",
        default,
        with = "datetime_opt"
    )]
    pub created_at: Option<NaiveDateTime>,
}

/// Payment method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    DebitCard,
    Pix,
    Transfer,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 5] = [
        PaymentMethod::Cash,
        PaymentMethod::CreditCard,
        PaymentMethod::DebitCard,
        PaymentMethod::Pix,
        PaymentMethod::Transfer,
    ];

    /// Wire value, which doubles as the display label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "Dinheiro",
            Self::CreditCard => "Cartão de Crédito",
            Self::DebitCard => "Cartão de Débito",
            Self::Pix => "PIX",
            Self::Transfer => "Transferência",
        }
    }

    pub fn label(&self) -> &'static str {
        self.as_str()
    }

    pub fn is_cash(&self) -> bool {
        matches!(self, Self::Cash)
    }
}

impl FromStr for PaymentMethod {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_key(s).as_str() {
            "dinheiro" | "cash" => Ok(Self::Cash),
            "cartao_de_credito" | "credito" | "credit" | "credit_card" => Ok(Self::CreditCard),
            "cartao_de_debito" | "debito" | "debit" | "debit_card" => Ok(Self::DebitCard),
            "pix" => Ok(Self::Pix),
            "transferencia" | "transfer" => Ok(Self::Transfer),
            _ => Err(SchemaError::unknown("payment method", s)),
        }
    }
}

impl TryFrom<String> for PaymentMethod {
    type Error = SchemaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PaymentMethod> for String {
    fn from(method: PaymentMethod) -> Self {
        method.as_str().to_string()
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 3] = [
        PaymentStatus::Pending,
        PaymentStatus::Confirmed,
        PaymentStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pendente",
            Self::Confirmed => "confirmado",
            Self::Cancelled => "cancelado",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pendente",
            Self::Confirmed => "Confirmado",
            Self::Cancelled => "Cancelado",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_key(s).as_str() {
            "pendente" | "pending" => Ok(Self::Pending),
            "confirmado" | "confirmed" | "pago" | "paid" => Ok(Self::Confirmed),
            "cancelado" | "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(SchemaError::unknown("payment status", s)),
        }
    }
}

impl TryFrom<String> for PaymentStatus {
    type Error = SchemaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PaymentStatus> for String {
    fn from(status: PaymentStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Create payment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentCreate {
    #[serde(rename = "pedido_id", alias = "order_id")]
    pub order_id: i64,
    #[serde(rename = "metodo", alias = "method")]
    pub method: PaymentMethod,
    #[serde(rename = "valor", alias = "amount", with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(
        rename = "valor_pago",
        alias = "amount_paid",
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount_tendered: Option<Decimal>,
}

/// Update payment status payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentUpdateStatus {
    pub status: PaymentStatus,
}

/// Change owed for a cash payment, `None` when the tendered amount is short
pub fn cash_change(total: Decimal, tendered: Decimal) -> Option<Decimal> {
    if tendered < total {
        return None;
    }
    Some(round_money(tendered - total))
}
