//! Customer ordering flow
//!
//! Identify (name + table) → Menu → Order → Payment → Finished. The cart
//! lives here and only here; the active order is whatever the server last
//! reported.

use rust_decimal::Decimal;
use shared::models::{
    Customer, DiningTable, MenuItem, Order, Payment, PaymentCreate, PaymentMethod, cash_change,
};
use shared::money::format_price;
use std::sync::Arc;

use super::ScreenState;
use crate::cart::Cart;
use crate::client::{ApiClient, HttpClient};
use crate::{ClientError, ClientResult};

/// Step of the customer flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowStep {
    #[default]
    Identify,
    Menu,
    Order,
    Payment,
    Finished,
}

pub struct CustomerFlow<H: HttpClient> {
    api: Arc<ApiClient<H>>,
    step: FlowStep,
    available_tables: Vec<DiningTable>,
    name: String,
    selected_table: Option<DiningTable>,
    customer: Option<Customer>,
    menu: Vec<MenuItem>,
    category: Option<String>,
    cart: Cart,
    active_order: Option<Order>,
    payment: Option<Payment>,
    change: Option<Decimal>,
    pub screen: ScreenState,
}

impl<H: HttpClient> CustomerFlow<H> {
    pub fn new(api: Arc<ApiClient<H>>) -> Self {
        Self {
            api,
            step: FlowStep::Identify,
            available_tables: Vec::new(),
            name: String::new(),
            selected_table: None,
            customer: None,
            menu: Vec::new(),
            category: None,
            cart: Cart::new(),
            active_order: None,
            payment: None,
            change: None,
            screen: ScreenState::default(),
        }
    }

    // ========== Accessors ==========

    pub fn step(&self) -> FlowStep {
        self.step
    }

    pub fn available_tables(&self) -> &[DiningTable] {
        &self.available_tables
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn selected_table(&self) -> Option<&DiningTable> {
        self.selected_table.as_ref()
    }

    pub fn customer(&self) -> Option<&Customer> {
        self.customer.as_ref()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn active_order(&self) -> Option<&Order> {
        self.active_order.as_ref()
    }

    pub fn payment(&self) -> Option<&Payment> {
        self.payment.as_ref()
    }

    /// Change owed on the last cash payment
    pub fn change(&self) -> Option<Decimal> {
        self.change
    }

    // ========== Identify ==========

    pub async fn load_tables(&mut self) -> ClientResult<()> {
        self.screen.start();
        let result = self.api.list_available_tables().await;
        let available = self.screen.finish(result)?;
        self.available_tables = available.tables;
        // Drop a selection that is no longer free
        if let Some(selected) = &self.selected_table
            && !self.available_tables.iter().any(|t| t.id == selected.id)
        {
            self.selected_table = None;
        }
        Ok(())
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Select a free table by its number
    pub fn select_table(&mut self, number: i32) -> ClientResult<()> {
        match self.available_tables.iter().find(|t| t.number == number) {
            Some(table) => {
                self.selected_table = Some(table.clone());
                self.screen.clear_error();
                Ok(())
            }
            None => {
                let err = ClientError::validation(format!("Mesa {number} indisponível"));
                self.screen.fail(&err);
                Err(err)
            }
        }
    }

    /// Confirmation text for the current table selection
    pub fn selection_message(&self) -> Option<String> {
        self.selected_table
            .as_ref()
            .map(|t| format!("Mesa {} selecionada", t.number))
    }

    /// Both a name and a table are set
    pub fn can_submit(&self) -> bool {
        !self.name.trim().is_empty() && self.selected_table.is_some()
    }

    /// Register the customer and move on to the menu
    pub async fn identify(&mut self) -> ClientResult<()> {
        let Some(table) = self.selected_table.clone() else {
            let err = ClientError::validation("Selecione uma mesa");
            self.screen.fail(&err);
            return Err(err);
        };
        self.screen.start();
        let result = self.api.create_customer(&self.name, table.number).await;
        let customer = self.screen.finish(result)?;
        tracing::info!(customer_id = customer.id, table = table.number, "Customer identified");
        self.customer = Some(customer);
        self.step = FlowStep::Menu;
        self.refresh_active_order().await;
        self.load_menu().await
    }

    // ========== Menu & cart ==========

    pub async fn load_menu(&mut self) -> ClientResult<()> {
        self.screen.start();
        let result = self.api.list_menu_items().await;
        self.menu = self.screen.finish(result)?;
        Ok(())
    }

    pub fn set_category(&mut self, category: Option<&str>) {
        self.category = category.map(str::to_string);
    }

    /// Categories present in the loaded menu, in first-seen order
    pub fn categories(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for item in &self.menu {
            if let Some(c) = &item.category
                && !seen.iter().any(|s| s.eq_ignore_ascii_case(c))
            {
                seen.push(c.clone());
            }
        }
        seen
    }

    /// Available items in the selected category
    pub fn visible_menu(&self) -> Vec<&MenuItem> {
        self.menu
            .iter()
            .filter(|i| i.available)
            .filter(|i| match &self.category {
                Some(c) => i.in_category(c),
                None => true,
            })
            .collect()
    }

    pub fn add_to_cart(&mut self, item_id: i64) -> ClientResult<()> {
        let item = match self.menu.iter().find(|i| i.id == item_id) {
            Some(item) if item.available => item.clone(),
            Some(item) => {
                let err = ClientError::validation(format!("{} indisponível", item.name));
                self.screen.fail(&err);
                return Err(err);
            }
            None => {
                let err = ClientError::validation("Item não encontrado");
                self.screen.fail(&err);
                return Err(err);
            }
        };
        self.cart.add(&item);
        Ok(())
    }

    pub fn set_quantity(&mut self, item_id: i64, quantity: i32) -> bool {
        self.cart.set_quantity(item_id, quantity)
    }

    pub fn remove_from_cart(&mut self, item_id: i64) -> bool {
        self.cart.remove(item_id)
    }

    // ========== Order ==========

    /// Send the cart; on success the cart is emptied
    pub async fn submit_order(&mut self) -> ClientResult<Order> {
        if self.cart.is_empty() {
            let err = ClientError::validation("Adicione itens ao carrinho");
            self.screen.fail(&err);
            return Err(err);
        }
        let customer_id = self.require_customer()?;
        self.screen.start();
        let result = self
            .api
            .create_order(customer_id, self.cart.to_order_lines())
            .await;
        let order = self.screen.finish(result)?;
        tracing::info!(order_id = order.id, total = %order.total, "Order submitted");
        self.cart.clear();
        self.active_order = Some(order.clone());
        self.step = FlowStep::Order;
        Ok(order)
    }

    /// Back to the menu to order more
    pub async fn back_to_menu(&mut self) {
        self.step = FlowStep::Menu;
        self.refresh_active_order().await;
    }

    /// Ask for the bill: the order is closed and awaits payment
    pub async fn close_tab(&mut self) -> ClientResult<Order> {
        let order_id = self.require_order()?.id;
        self.screen.start();
        let result = self.api.close_order(order_id).await;
        let order = self.screen.finish(result)?;
        self.active_order = Some(order.clone());
        self.step = FlowStep::Payment;
        Ok(order)
    }

    /// Pay the active order
    ///
    /// Cash needs `tendered` ≥ total and yields the change; other methods pay
    /// the order total.
    pub async fn pay(
        &mut self,
        method: PaymentMethod,
        tendered: Option<Decimal>,
    ) -> ClientResult<Payment> {
        let order = self.require_order()?.clone();
        let (amount_tendered, change) = if method.is_cash() {
            let tendered = tendered.unwrap_or(Decimal::ZERO);
            match cash_change(order.total, tendered) {
                Some(change) => (Some(tendered), Some(change)),
                None => {
                    let missing = format_price(order.total - tendered);
                    let err = ClientError::validation(format!("Valor insuficiente: {missing}"));
                    self.screen.fail(&err);
                    return Err(err);
                }
            }
        } else {
            (None, None)
        };

        // Payment is only accepted on a closed order
        if !order.closed {
            self.close_tab().await?;
        }

        self.screen.start();
        let draft = PaymentCreate {
            order_id: order.id,
            method,
            amount: order.total,
            amount_tendered,
        };
        let result = self.api.submit_payment(&draft).await;
        let payment = self.screen.finish(result)?;
        tracing::info!(order_id = order.id, method = %method, "Payment registered");
        // Change only exists once the payment went through
        self.change = change;
        self.payment = Some(payment.clone());
        self.step = FlowStep::Finished;
        Ok(payment)
    }

    /// Preview of the change for a tendered cash amount, `None` if short
    pub fn change_for(&self, tendered: Decimal) -> Option<Decimal> {
        self.active_order
            .as_ref()
            .and_then(|o| cash_change(o.total, tendered))
    }

    /// Server snapshot of this customer's order (socket update)
    pub fn apply_order_update(&mut self, order: &Order) {
        if self.active_order.as_ref().is_some_and(|o| o.id == order.id) {
            self.active_order = Some(order.clone());
        }
    }

    /// Start over for the next customer
    pub fn reset(&mut self) {
        self.step = FlowStep::Identify;
        self.name.clear();
        self.selected_table = None;
        self.customer = None;
        self.category = None;
        self.cart.clear();
        self.active_order = None;
        self.payment = None;
        self.change = None;
        self.screen = ScreenState::default();
    }

    // ========== Helpers ==========

    async fn refresh_active_order(&mut self) {
        let Some(customer_id) = self.customer.as_ref().map(|c| c.id) else {
            return;
        };
        match self.api.get_active_order(customer_id).await {
            Ok(order) => self.active_order = order,
            // Missing history is not worth an error banner
            Err(e) => tracing::warn!(customer_id, error = %e, "Could not load active order"),
        }
    }

    fn require_customer(&mut self) -> ClientResult<i64> {
        match &self.customer {
            Some(c) => Ok(c.id),
            None => {
                let err = ClientError::validation("Identifique-se antes de pedir");
                self.screen.fail(&err);
                Err(err)
            }
        }
    }

    fn require_order(&mut self) -> ClientResult<&Order> {
        if self.active_order.is_none() {
            let err = ClientError::validation("Nenhum pedido ativo");
            self.screen.fail(&err);
            return Err(err);
        }
        self.active_order
            .as_ref()
            .ok_or_else(|| ClientError::validation("Nenhum pedido ativo"))
    }
}
