//! Order management (backoffice)
//!
//! Orders come from the API and are patched by socket snapshots. Status
//! changes are shown optimistically and settle on the server's answer.

use shared::message::{Notification, RealtimeEvent};
use shared::models::Order;
use shared::order::{OrderStatus, StatusAction};
use std::sync::Arc;

use super::{PendingUpdates, ScreenState, UPDATE_IN_FLIGHT};
use crate::client::{ApiClient, HttpClient};
use crate::{ClientError, ClientResult};

/// Label of the "no filter" option
pub const FILTER_ALL: &str = "Todos";

/// Status filter for the order list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(OrderStatus),
}

impl StatusFilter {
    /// `"Todos"` (or empty) is all; anything else must name a status
    pub fn parse(raw: &str) -> ClientResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case(FILTER_ALL) {
            return Ok(Self::All);
        }
        Ok(Self::Only(raw.parse()?))
    }

    pub fn matches(&self, order: &Order) -> bool {
        match self {
            Self::All => true,
            Self::Only(status) => order.status == *status,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => FILTER_ALL,
            Self::Only(status) => status.label(),
        }
    }

    /// Options offered by the filter dropdown
    pub fn options() -> Vec<StatusFilter> {
        std::iter::once(Self::All)
            .chain(OrderStatus::ALL.into_iter().map(Self::Only))
            .collect()
    }
}

pub struct OrderBoard<H: HttpClient> {
    api: Arc<ApiClient<H>>,
    orders: Vec<Order>,
    filter: StatusFilter,
    search: String,
    pending: PendingUpdates<Order>,
    notification: Option<Notification>,
    pub screen: ScreenState,
}

impl<H: HttpClient> OrderBoard<H> {
    pub fn new(api: Arc<ApiClient<H>>) -> Self {
        Self {
            api,
            orders: Vec::new(),
            filter: StatusFilter::All,
            search: String::new(),
            pending: PendingUpdates::new(),
            notification: None,
            screen: ScreenState::default(),
        }
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn get(&self, id: i64) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    pub fn is_pending(&self, id: i64) -> bool {
        self.pending.is_pending(id)
    }

    /// Last notification: a socket event or a failed status change
    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    pub async fn load(&mut self) -> ClientResult<()> {
        self.screen.start();
        let result = self.api.list_orders().await;
        self.orders = self.screen.finish(result)?;
        Ok(())
    }

    /// Set the filter from its label; an unknown label is an inline error
    pub fn set_status_filter(&mut self, raw: &str) -> ClientResult<()> {
        match StatusFilter::parse(raw) {
            Ok(filter) => {
                self.filter = filter;
                Ok(())
            }
            Err(e) => {
                self.screen.fail(&e);
                Err(e)
            }
        }
    }

    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
    }

    pub fn set_search(&mut self, query: &str) {
        self.search = query.to_string();
    }

    /// Orders passing the status filter and the search box
    pub fn visible_orders(&self) -> Vec<&Order> {
        self.orders
            .iter()
            .filter(|o| self.filter.matches(o))
            .filter(|o| o.matches_search(&self.search))
            .collect()
    }

    pub fn count(&self, status: OrderStatus) -> usize {
        self.orders.iter().filter(|o| o.status == status).count()
    }

    /// Buttons for an order; none while a change is in flight
    pub fn actions_for(&self, id: i64) -> Vec<StatusAction> {
        if self.pending.is_pending(id) {
            return Vec::new();
        }
        self.get(id).map(|o| o.status.actions()).unwrap_or_default()
    }

    /// Request a status change, showing the target status immediately
    pub async fn change_status(&mut self, id: i64, target: OrderStatus) -> ClientResult<Order> {
        let Some(current) = self.get(id).cloned() else {
            return Err(self.screen.reject(ClientError::validation(format!(
                "Pedido #{id} não encontrado"
            ))));
        };
        if !current.status.can_transition_to(target) {
            return Err(self.screen.reject(ClientError::validation(format!(
                "Não é possível passar de {} para {}",
                current.status.label(),
                target.label()
            ))));
        }
        if !self.pending.begin(id, current) {
            return Err(self.screen.reject(ClientError::validation(UPDATE_IN_FLIGHT)));
        }
        self.set_local_status(id, target);
        tracing::debug!(order_id = id, status = %target, "Optimistic status change");

        match self.api.update_order_status(id, target).await {
            Ok(order) => {
                self.pending.confirm(id);
                self.replace(order.clone());
                self.screen.clear_error();
                Ok(order)
            }
            Err(e) => {
                if let Some(previous) = self.pending.revert(id) {
                    self.replace(previous);
                }
                self.notification = Some(Notification::error(format!(
                    "Erro ao atualizar pedido #{id}: {}",
                    e.user_message()
                )));
                Err(self.screen.reject(e))
            }
        }
    }

    /// Close an order for payment
    pub async fn close_order(&mut self, id: i64) -> ClientResult<Order> {
        self.screen.start();
        let result = self.api.close_order(id).await;
        let order = self.screen.finish(result)?;
        self.replace(order.clone());
        Ok(order)
    }

    /// Apply a socket event; returns whether the list changed
    pub fn apply_event(&mut self, event: &RealtimeEvent) -> bool {
        let changed = match event {
            RealtimeEvent::OrderNew(order) => {
                self.pending.settle(order.id);
                self.orders.retain(|o| o.id != order.id);
                self.orders.insert(0, order.clone());
                true
            }
            RealtimeEvent::OrderUpdated(order) => {
                self.pending.settle(order.id);
                match self.orders.iter_mut().find(|o| o.id == order.id) {
                    Some(slot) => *slot = order.clone(),
                    None => self.orders.insert(0, order.clone()),
                }
                true
            }
            RealtimeEvent::PaymentReceived(payment) => {
                self.pending.settle(payment.order_id);
                self.set_local_status(payment.order_id, OrderStatus::Paid)
            }
            RealtimeEvent::TableStatus(_) => return false,
        };
        self.notification = Some(event.notification());
        changed
    }

    fn set_local_status(&mut self, id: i64, status: OrderStatus) -> bool {
        match self.orders.iter_mut().find(|o| o.id == id) {
            Some(order) => {
                order.status = status;
                true
            }
            None => false,
        }
    }

    fn replace(&mut self, order: Order) {
        match self.orders.iter_mut().find(|o| o.id == order.id) {
            Some(slot) => *slot = order,
            None => self.orders.insert(0, order),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientConfig;
    use serde_json::json;
    use shared::message::NotificationLevel;
    use shared::models::Payment;

    fn board_with(orders: serde_json::Value) -> OrderBoard<crate::NetworkHttpClient> {
        let api = ApiClient::from_config(&ClientConfig::default()).unwrap();
        let mut board = OrderBoard::new(Arc::new(api));
        board.orders = serde_json::from_value(orders).unwrap();
        board
    }

    #[test]
    fn test_filter_parse() {
        assert_eq!(StatusFilter::parse("Todos").unwrap(), StatusFilter::All);
        assert_eq!(StatusFilter::parse("").unwrap(), StatusFilter::All);
        assert_eq!(
            StatusFilter::parse("Pronto").unwrap(),
            StatusFilter::Only(OrderStatus::Ready)
        );
        assert!(StatusFilter::parse("Voando").is_err());
    }

    #[test]
    fn test_filter_matches_only_status() {
        let orders: Vec<Order> = serde_json::from_value(serde_json::json!([
            {"pedido_id": 1, "status": "Pendente"},
            {"pedido_id": 2, "status": "Pronto"},
            {"pedido_id": 3, "status": "Pendente"},
            {"pedido_id": 4, "status": "Pronto"}
        ]))
        .unwrap();
        let filter = StatusFilter::parse("Pronto").unwrap();
        let ids: Vec<i64> = orders
            .iter()
            .filter(|o| filter.matches(o))
            .map(|o| o.id)
            .collect();
        assert_eq!(ids, vec![2, 4]);
    }

    #[test]
    fn test_filter_options() {
        let options = StatusFilter::options();
        assert_eq!(options.len(), 10);
        assert_eq!(options[0].label(), "Todos");
        assert_eq!(options[4].label(), "Pronto");
    }

    #[test]
    fn test_new_order_goes_first() {
        let mut board = board_with(json!([
            {"pedido_id": 1, "status": "Pendente"},
            {"pedido_id": 2, "status": "Pronto"}
        ]));
        let order: Order =
            serde_json::from_value(json!({"pedido_id": 3, "status": "pendente"})).unwrap();
        assert!(board.apply_event(&RealtimeEvent::OrderNew(order)));

        let ids: Vec<i64> = board.orders().iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        let note = board.notification().unwrap();
        assert_eq!(note.level, NotificationLevel::Info);
        assert_eq!(note.message, "Novo pedido #3");

        board.dismiss_notification();
        assert!(board.notification().is_none());
    }

    #[test]
    fn test_payment_event_marks_order_paid() {
        let mut board = board_with(json!([
            {"pedido_id": 5, "status": "aguardando_pagamento", "fechado": true}
        ]));
        let payment: Payment = serde_json::from_value(json!({
            "pagamento_id": 40,
            "pedido_id": 5,
            "metodo": "PIX",
            "valor": 30.0,
            "status": "confirmado"
        }))
        .unwrap();
        assert!(board.apply_event(&RealtimeEvent::PaymentReceived(payment.clone())));
        assert_eq!(board.get(5).unwrap().status, OrderStatus::Paid);
        assert_eq!(
            board.notification().unwrap().message,
            "Pagamento confirmado para o pedido #5"
        );

        // Payment for an order this board never loaded
        let mut other = payment;
        other.order_id = 99;
        assert!(!board.apply_event(&RealtimeEvent::PaymentReceived(other)));
    }

    #[test]
    fn test_table_event_ignored() {
        let mut board = board_with(json!([]));
        let table = serde_json::from_value(
            json!({"mesa_id": 2, "numero": 2, "capacidade": 4, "status": "ocupada"}),
        )
        .unwrap();
        assert!(!board.apply_event(&RealtimeEvent::TableStatus(table)));
        assert!(board.notification().is_none());
    }

    #[tokio::test]
    async fn test_second_change_while_in_flight() {
        let mut board = board_with(json!([{"pedido_id": 1, "status": "preparando"}]));
        let current = board.get(1).cloned().unwrap();
        assert!(board.pending.begin(1, current));
        assert!(board.actions_for(1).is_empty());

        let err = board.change_status(1, OrderStatus::Ready).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert_eq!(board.screen.error.as_deref(), Some(UPDATE_IN_FLIGHT));
        assert_eq!(board.get(1).unwrap().status, OrderStatus::Preparing);
    }
}
