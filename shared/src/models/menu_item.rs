//! Menu Item Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::default_true;
use crate::money::format_price;

/// Menu item entity (item do cardápio)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(rename = "item_id", alias = "id")]
    pub id: i64,
    #[serde(rename = "nome", alias = "name")]
    pub name: String,
    #[serde(
        rename = "descricao",
        alias = "description",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(rename = "preco", alias = "price", with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Category name, free text on the backend
    #[serde(
        rename = "categoria",
        alias = "category",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<String>,
    #[serde(rename = "disponivel", alias = "available", default = "default_true")]
    pub available: bool,
    #[serde(
        rename = "imagem_url",
        alias = "image_url",
        alias = "image",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<String>,
}

impl MenuItem {
    pub fn price_label(&self) -> String {
        format_price(self.price)
    }

    pub fn in_category(&self, category: &str) -> bool {
        self.category
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case(category))
    }
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    #[serde(rename = "nome", alias = "name")]
    pub name: String,
    #[serde(
        rename = "descricao",
        alias = "description",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(rename = "preco", alias = "price", with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(
        rename = "categoria",
        alias = "category",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<String>,
    #[serde(rename = "disponivel", alias = "available", default = "default_true")]
    pub available: bool,
    #[serde(
        rename = "imagem_url",
        alias = "image_url",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<String>,
}

/// Update menu item payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    #[serde(rename = "nome", alias = "name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        rename = "descricao",
        alias = "description",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(
        rename = "preco",
        alias = "price",
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    #[serde(
        rename = "categoria",
        alias = "category",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<String>,
    #[serde(
        rename = "disponivel",
        alias = "available",
        skip_serializing_if = "Option::is_none"
    )]
    pub available: Option<bool>,
    #[serde(
        rename = "imagem_url",
        alias = "image_url",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<String>,
}

impl MenuItemUpdate {
    /// Update that only flips availability
    pub fn availability(available: bool) -> Self {
        Self {
            available: Some(available),
            ..Default::default()
        }
    }
}
