//! Payment tracking (backoffice)

use rust_decimal::Decimal;
use shared::models::{Payment, PaymentCreate, PaymentMethod, PaymentStatus};
use shared::money::format_price;
use std::sync::Arc;

use super::{PendingUpdates, ScreenState, UPDATE_IN_FLIGHT};
use crate::client::{ApiClient, HttpClient};
use crate::{ClientError, ClientResult};

pub struct PaymentBoard<H: HttpClient> {
    api: Arc<ApiClient<H>>,
    payments: Vec<Payment>,
    status_filter: Option<PaymentStatus>,
    pending: PendingUpdates<Payment>,
    pub screen: ScreenState,
}

impl<H: HttpClient> PaymentBoard<H> {
    pub fn new(api: Arc<ApiClient<H>>) -> Self {
        Self {
            api,
            payments: Vec::new(),
            status_filter: None,
            pending: PendingUpdates::new(),
            screen: ScreenState::default(),
        }
    }

    /// Newest first
    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn get(&self, id: i64) -> Option<&Payment> {
        self.payments.iter().find(|p| p.id == id)
    }

    pub fn for_order(&self, order_id: i64) -> Option<&Payment> {
        self.payments.iter().find(|p| p.order_id == order_id)
    }

    pub fn is_pending(&self, id: i64) -> bool {
        self.pending.is_pending(id)
    }

    /// Snapshot from `pagamento_recebido`
    pub fn record(&mut self, payment: Payment) {
        self.pending.settle(payment.id);
        self.upsert(payment);
    }

    pub async fn load_for_order(&mut self, order_id: i64) -> ClientResult<Payment> {
        self.screen.start();
        let result = self.api.get_payment_for_order(order_id).await;
        let payment = self.screen.finish(result)?;
        self.upsert(payment.clone());
        Ok(payment)
    }

    /// Register a payment at the counter
    pub async fn register(
        &mut self,
        order_id: i64,
        method: PaymentMethod,
        amount: Decimal,
        tendered: Option<Decimal>,
    ) -> ClientResult<Payment> {
        let draft = PaymentCreate {
            order_id,
            method,
            amount,
            amount_tendered: if method.is_cash() { tendered } else { None },
        };
        self.screen.start();
        let result = self.api.submit_payment(&draft).await;
        let payment = self.screen.finish(result)?;
        tracing::info!(payment_id = payment.id, order_id, method = %method, "Payment registered");
        self.upsert(payment.clone());
        Ok(payment)
    }

    pub fn set_status_filter(&mut self, status: Option<PaymentStatus>) {
        self.status_filter = status;
    }

    pub fn visible_payments(&self) -> Vec<&Payment> {
        self.payments
            .iter()
            .filter(|p| self.status_filter.is_none_or(|s| p.status == s))
            .collect()
    }

    pub async fn confirm(&mut self, id: i64) -> ClientResult<Payment> {
        self.set_status(id, PaymentStatus::Confirmed).await
    }

    pub async fn cancel(&mut self, id: i64) -> ClientResult<Payment> {
        self.set_status(id, PaymentStatus::Cancelled).await
    }

    /// Sum of confirmed payments
    pub fn confirmed_total(&self) -> Decimal {
        self.total_where(|p| p.status == PaymentStatus::Confirmed)
    }

    /// Sum of payments still awaiting confirmation
    pub fn pending_total(&self) -> Decimal {
        self.total_where(|p| p.status == PaymentStatus::Pending)
    }

    pub fn confirmed_total_label(&self) -> String {
        format_price(self.confirmed_total())
    }

    /// Confirmed amount per method, in [`PaymentMethod::ALL`] order
    pub fn totals_by_method(&self) -> Vec<(PaymentMethod, Decimal)> {
        PaymentMethod::ALL
            .iter()
            .map(|&m| {
                let total = self.total_where(|p| {
                    p.method == m && p.status == PaymentStatus::Confirmed
                });
                (m, total)
            })
            .collect()
    }

    async fn set_status(&mut self, id: i64, status: PaymentStatus) -> ClientResult<Payment> {
        let Some(current) = self.get(id).cloned() else {
            let err = ClientError::validation("Pagamento não encontrado");
            self.screen.fail(&err);
            return Err(err);
        };
        if !self.pending.begin(id, current) {
            return Err(self.screen.reject(ClientError::validation(UPDATE_IN_FLIGHT)));
        }
        if let Some(payment) = self.payments.iter_mut().find(|p| p.id == id) {
            payment.status = status;
        }

        match self.api.update_payment_status(id, status).await {
            Ok(payment) => {
                self.pending.confirm(id);
                self.upsert(payment.clone());
                self.screen.clear_error();
                Ok(payment)
            }
            Err(e) => {
                if let Some(previous) = self.pending.revert(id) {
                    self.upsert(previous);
                }
                self.screen.fail(&e);
                Err(e)
            }
        }
    }

    fn total_where(&self, pred: impl Fn(&Payment) -> bool) -> Decimal {
        self.payments
            .iter()
            .filter(|p| pred(p))
            .map(|p| p.amount)
            .sum()
    }

    fn upsert(&mut self, payment: Payment) {
        match self.payments.iter_mut().find(|p| p.id == payment.id) {
            Some(slot) => *slot = payment,
            None => self.payments.insert(0, payment),
        }
    }
}
