//! Backoffice dashboard

use rust_decimal::Decimal;
use shared::message::RealtimeEvent;
use shared::models::{DiningTable, Order, TableStatus};
use shared::money::format_price;
use shared::order::OrderStatus;
use std::sync::Arc;

use super::ScreenState;
use crate::ClientResult;
use crate::client::{ApiClient, HttpClient};

/// Orders listed under "recent"
pub const RECENT_ORDERS: usize = 5;

/// Figures shown on the dashboard cards
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSummary {
    /// Sum of paid and finished orders
    pub revenue: Decimal,
    pub order_count: usize,
    pub active_orders: usize,
    pub occupied_tables: usize,
    pub total_tables: usize,
    /// Orders waiting for payment
    pub pending_payments: usize,
    /// Newest first
    pub recent_orders: Vec<Order>,
}

impl DashboardSummary {
    pub fn compute(orders: &[Order], tables: &[DiningTable]) -> Self {
        let revenue = orders
            .iter()
            .filter(|o| o.status.is_settled())
            .map(|o| o.total)
            .sum();

        let mut recent: Vec<Order> = orders.to_vec();
        // Orders without a timestamp sink to the bottom; ties go to the higher id
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        recent.truncate(RECENT_ORDERS);

        Self {
            revenue,
            order_count: orders.len(),
            active_orders: orders.iter().filter(|o| o.status.is_open()).count(),
            occupied_tables: tables
                .iter()
                .filter(|t| t.status == TableStatus::Occupied)
                .count(),
            total_tables: tables.len(),
            pending_payments: orders
                .iter()
                .filter(|o| o.status == OrderStatus::AwaitingPayment)
                .count(),
            recent_orders: recent,
        }
    }

    pub fn revenue_label(&self) -> String {
        format_price(self.revenue)
    }

    /// "3/10" style occupancy
    pub fn occupancy_label(&self) -> String {
        format!("{}/{}", self.occupied_tables, self.total_tables)
    }
}

pub struct Dashboard<H: HttpClient> {
    api: Arc<ApiClient<H>>,
    orders: Vec<Order>,
    tables: Vec<DiningTable>,
    summary: DashboardSummary,
    pub screen: ScreenState,
}

impl<H: HttpClient> Dashboard<H> {
    pub fn new(api: Arc<ApiClient<H>>) -> Self {
        Self {
            api,
            orders: Vec::new(),
            tables: Vec::new(),
            summary: DashboardSummary::default(),
            screen: ScreenState::default(),
        }
    }

    pub fn summary(&self) -> &DashboardSummary {
        &self.summary
    }

    /// Reload orders and tables, then recompute
    pub async fn refresh(&mut self) -> ClientResult<&DashboardSummary> {
        self.screen.start();
        let result =
            futures::future::try_join(self.api.list_orders(), self.api.list_tables()).await;
        let (orders, tables) = self.screen.finish(result)?;
        self.orders = orders;
        self.tables = tables;
        self.recompute();
        Ok(&self.summary)
    }

    /// Keep the figures live between refreshes
    pub fn apply_event(&mut self, event: &RealtimeEvent) {
        match event {
            RealtimeEvent::OrderNew(order) | RealtimeEvent::OrderUpdated(order) => {
                match self.orders.iter_mut().find(|o| o.id == order.id) {
                    Some(slot) => *slot = order.clone(),
                    None => self.orders.push(order.clone()),
                }
            }
            RealtimeEvent::PaymentReceived(payment) => {
                if let Some(order) = self.orders.iter_mut().find(|o| o.id == payment.order_id) {
                    order.status = OrderStatus::Paid;
                }
            }
            RealtimeEvent::TableStatus(table) => {
                match self.tables.iter_mut().find(|t| t.id == table.id) {
                    Some(slot) => *slot = table.clone(),
                    None => self.tables.push(table.clone()),
                }
            }
        }
        self.recompute();
    }

    fn recompute(&mut self) {
        self.summary = DashboardSummary::compute(&self.orders, &self.tables);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn order(id: i64, status: OrderStatus, total: &str, at: &str) -> Order {
        serde_json::from_value(serde_json::json!({
            "pedido_id": id,
            "status": status.as_str(),
            "total": total.parse::<f64>().unwrap(),
            "data_hora": at,
        }))
        .unwrap()
    }

    fn table(id: i64, status: TableStatus) -> DiningTable {
        serde_json::from_value(serde_json::json!({
            "mesa_id": id,
            "numero": id,
            "status": status.as_str(),
        }))
        .unwrap()
    }

    #[test]
    fn test_summary_figures() {
        let orders = vec![
            order(1, OrderStatus::Paid, "20.00", "2024-05-01T12:00:00"),
            order(2, OrderStatus::Finished, "21.80", "2024-05-01T12:10:00"),
            order(3, OrderStatus::Preparing, "15.00", "2024-05-01T12:20:00"),
            order(4, OrderStatus::AwaitingPayment, "9.90", "2024-05-01T12:30:00"),
            order(5, OrderStatus::Cancelled, "50.00", "2024-05-01T12:40:00"),
            order(6, OrderStatus::Pending, "5.00", "2024-05-01T12:50:00"),
        ];
        let tables = vec![
            table(1, TableStatus::Occupied),
            table(2, TableStatus::Free),
            table(3, TableStatus::Occupied),
        ];
        let summary = DashboardSummary::compute(&orders, &tables);

        assert_eq!(summary.revenue, dec("41.80"));
        assert_eq!(summary.revenue_label(), "R$ 41.80");
        assert_eq!(summary.order_count, 6);
        assert_eq!(summary.pending_payments, 1);
        assert_eq!(summary.occupancy_label(), "2/3");
        let recent: Vec<i64> = summary.recent_orders.iter().map(|o| o.id).collect();
        assert_eq!(recent, vec![6, 5, 4, 3, 2]);
    }
}
