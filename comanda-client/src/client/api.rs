// comanda-client/src/client/api.rs
// Typed REST API

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::models::{
    Category, CategoryCreate, Customer, CustomerCreate, DiningTable, DiningTableCreate,
    DiningTableUpdate, MenuItem, MenuItemCreate, MenuItemUpdate, Order, Payment, PaymentCreate,
    PaymentMethod, PaymentStatus, PaymentUpdateStatus,
};
use shared::order::{OrderCreate, OrderLineInput, OrderStatus, OrderUpdateStatus};
use shared::response::{AvailableTables, MessageResponse, unwrap_envelope};

use super::http::{HttpClient, NetworkHttpClient};
use crate::{ClientConfig, ClientError, ClientResult};

/// Typed client for the `/api` endpoints
///
/// Every call returns a decoded entity or a [`ClientError`]; nothing is
/// retried.
#[derive(Debug, Clone)]
pub struct ApiClient<H = NetworkHttpClient> {
    http: H,
}

impl ApiClient<NetworkHttpClient> {
    /// Build a network-backed client from config
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self::new(NetworkHttpClient::new(config)?))
    }
}

impl<H: HttpClient> ApiClient<H> {
    pub fn new(http: H) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &H {
        &self.http
    }

    // ========== Tables ==========

    pub async fn list_available_tables(&self) -> ClientResult<AvailableTables> {
        let body = self.http.get("api/mesas/disponiveis").await?;
        serde_json::from_value(body).map_err(invalid("mesas disponíveis"))
    }

    pub async fn list_tables(&self) -> ClientResult<Vec<DiningTable>> {
        let body = self.http.get("api/mesas").await?;
        decode(body, "mesas")
    }

    pub async fn get_table(&self, id: i64) -> ClientResult<DiningTable> {
        let body = self.http.get(&format!("api/mesas/{id}")).await?;
        decode(body, "mesa")
    }

    pub async fn create_table(&self, draft: &DiningTableCreate) -> ClientResult<DiningTable> {
        if draft.number <= 0 {
            return Err(ClientError::validation("Número da mesa inválido"));
        }
        let body = self.http.post("api/mesas", draft).await?;
        decode(body, "mesa")
    }

    pub async fn update_table(
        &self,
        id: i64,
        draft: &DiningTableUpdate,
    ) -> ClientResult<DiningTable> {
        let body = self.http.put(&format!("api/mesas/{id}"), draft).await?;
        decode(body, "mesa")
    }

    pub async fn delete_table(&self, id: i64) -> ClientResult<MessageResponse> {
        let body = self.http.delete(&format!("api/mesas/{id}")).await?;
        decode_message(body)
    }

    // ========== Customers ==========

    pub async fn create_customer(&self, name: &str, table_number: i32) -> ClientResult<Customer> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ClientError::validation("Informe seu nome"));
        }
        let draft = CustomerCreate {
            name: name.to_string(),
            table_number,
        };
        let body = self.http.post("api/cliente", &draft).await?;
        decode(body, "cliente")
    }

    pub async fn get_customer_by_table(&self, table_number: i32) -> ClientResult<Customer> {
        let body = self.http.get(&format!("api/cliente/{table_number}")).await?;
        decode(body, "cliente")
    }

    pub async fn remove_customer(&self, id: i64) -> ClientResult<MessageResponse> {
        let body = self.http.delete(&format!("api/cliente/{id}")).await?;
        decode_message(body)
    }

    // ========== Menu ==========

    pub async fn list_menu_items(&self) -> ClientResult<Vec<MenuItem>> {
        let body = self.http.get("api/itens").await?;
        decode(body, "itens")
    }

    pub async fn get_menu_item(&self, id: i64) -> ClientResult<MenuItem> {
        let body = self.http.get(&format!("api/itens/{id}")).await?;
        decode(body, "item")
    }

    pub async fn create_menu_item(&self, draft: &MenuItemCreate) -> ClientResult<MenuItem> {
        if draft.name.trim().is_empty() {
            return Err(ClientError::validation("Nome do item é obrigatório"));
        }
        if draft.price.is_sign_negative() {
            return Err(ClientError::validation("Preço inválido"));
        }
        let body = self.http.post("api/itens", draft).await?;
        decode(body, "item")
    }

    pub async fn update_menu_item(
        &self,
        id: i64,
        draft: &MenuItemUpdate,
    ) -> ClientResult<MenuItem> {
        let body = self.http.put(&format!("api/itens/{id}"), draft).await?;
        decode(body, "item")
    }

    pub async fn delete_menu_item(&self, id: i64) -> ClientResult<MessageResponse> {
        let body = self.http.delete(&format!("api/itens/{id}")).await?;
        decode_message(body)
    }

    pub async fn list_categories(&self) -> ClientResult<Vec<Category>> {
        let body = self.http.get("api/categorias").await?;
        decode(body, "categorias")
    }

    pub async fn create_category(&self, draft: &CategoryCreate) -> ClientResult<Category> {
        let body = self.http.post("api/categorias", draft).await?;
        decode(body, "categoria")
    }

    // ========== Orders ==========

    pub async fn list_orders(&self) -> ClientResult<Vec<Order>> {
        let body = self.http.get("api/pedidos").await?;
        decode(body, "pedidos")
    }

    pub async fn get_order(&self, id: i64) -> ClientResult<Order> {
        let body = self.http.get(&format!("api/pedidos/{id}")).await?;
        decode(body, "pedido")
    }

    pub async fn create_order(
        &self,
        customer_id: i64,
        lines: Vec<OrderLineInput>,
    ) -> ClientResult<Order> {
        if lines.is_empty() {
            return Err(ClientError::validation("Adicione itens ao carrinho"));
        }
        let draft = OrderCreate { customer_id, lines };
        let body = self.http.post("api/pedidos", &draft).await?;
        decode(body, "pedido")
    }

    pub async fn update_order_status(&self, id: i64, status: OrderStatus) -> ClientResult<Order> {
        let body = self
            .http
            .put(
                &format!("api/pedidos/{id}/status"),
                &OrderUpdateStatus { status },
            )
            .await?;
        decode(body, "pedido")
    }

    /// Close the tab: the order moves to awaiting payment
    pub async fn close_order(&self, id: i64) -> ClientResult<Order> {
        let body = self.http.post_empty(&format!("api/pedidos/{id}/fechar")).await?;
        decode(body, "pedido")
    }

    pub async fn list_customer_orders(&self, customer_id: i64) -> ClientResult<Vec<Order>> {
        let body = self
            .http
            .get(&format!("api/pedidos/cliente/{customer_id}"))
            .await?;
        decode(body, "pedidos")
    }

    /// Open order for a customer, `None` when there is none
    pub async fn get_active_order(&self, customer_id: i64) -> ClientResult<Option<Order>> {
        match self
            .http
            .get(&format!("api/pedidos/cliente/{customer_id}/ativo"))
            .await
        {
            Ok(body) => decode_optional(body, "pedido"),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    // ========== Payments ==========

    pub async fn create_payment(
        &self,
        order_id: i64,
        method: PaymentMethod,
        amount: Decimal,
    ) -> ClientResult<Payment> {
        self.submit_payment(&PaymentCreate {
            order_id,
            method,
            amount,
            amount_tendered: None,
        })
        .await
    }

    /// Register a payment with an explicit tendered amount (cash)
    pub async fn submit_payment(&self, draft: &PaymentCreate) -> ClientResult<Payment> {
        if draft.amount <= Decimal::ZERO {
            return Err(ClientError::validation("Valor do pagamento inválido"));
        }
        if let Some(tendered) = draft.amount_tendered
            && tendered < draft.amount
        {
            return Err(ClientError::validation("Valor pago é menor que o total"));
        }
        let body = self.http.post("api/pagamentos", draft).await?;
        decode(body, "pagamento")
    }

    pub async fn get_payment(&self, id: i64) -> ClientResult<Payment> {
        let body = self.http.get(&format!("api/pagamentos/{id}")).await?;
        decode(body, "pagamento")
    }

    pub async fn get_payment_for_order(&self, order_id: i64) -> ClientResult<Payment> {
        let body = self
            .http
            .get(&format!("api/pagamentos/pedido/{order_id}"))
            .await?;
        decode(body, "pagamento")
    }

    pub async fn update_payment_status(
        &self,
        id: i64,
        status: PaymentStatus,
    ) -> ClientResult<Payment> {
        let body = self
            .http
            .put(
                &format!("api/pagamentos/{id}/status"),
                &PaymentUpdateStatus { status },
            )
            .await?;
        decode(body, "pagamento")
    }

    // ========== Misc ==========

    /// Root of the API, used as a liveness check
    pub async fn health(&self) -> ClientResult<Value> {
        self.http.get("api").await
    }
}

fn decode<T: DeserializeOwned>(body: Value, key: &str) -> ClientResult<T> {
    Ok(unwrap_envelope(body, key)?)
}

fn decode_optional<T: DeserializeOwned>(body: Value, key: &str) -> ClientResult<Option<T>> {
    match &body {
        Value::Null => Ok(None),
        Value::Object(map) if map.get(key).is_some_and(Value::is_null) => Ok(None),
        _ => decode(body, key).map(Some),
    }
}

fn decode_message(body: Value) -> ClientResult<MessageResponse> {
    if body.is_null() {
        return Ok(MessageResponse::default());
    }
    serde_json::from_value(body).map_err(invalid("message"))
}

fn invalid(what: &'static str) -> impl Fn(serde_json::Error) -> ClientError {
    move |e| ClientError::InvalidResponse(format!("{what}: {e}"))
}
