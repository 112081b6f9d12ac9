//! Order status and the transitions the client offers
//!
//! Transitions are decided by the server. The client only requests one (via
//! the API) or observes one (via a realtime snapshot); the table below is
//! what the backoffice offers as buttons from each displayed status.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SchemaError;
use crate::util::normalize_key;

/// Order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OrderStatus {
    #[default]
    Pending,
    Accepted,
    Preparing,
    Ready,
    Delivered,
    AwaitingPayment,
    Paid,
    Finished,
    Cancelled,
}

/// A transition offered from the current status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusAction {
    /// Status requested when the action is taken
    pub target: OrderStatus,
    /// Button label
    pub label: &'static str,
    /// Whether the action abandons the order
    pub destructive: bool,
}

impl OrderStatus {
    /// Every status, in lifecycle order
    pub const ALL: [OrderStatus; 9] = [
        OrderStatus::Pending,
        OrderStatus::Accepted,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Delivered,
        OrderStatus::AwaitingPayment,
        OrderStatus::Paid,
        OrderStatus::Finished,
        OrderStatus::Cancelled,
    ];

    /// Canonical wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pendente",
            Self::Accepted => "aceito",
            Self::Preparing => "preparando",
            Self::Ready => "pronto",
            Self::Delivered => "entregue",
            Self::AwaitingPayment => "aguardando_pagamento",
            Self::Paid => "pago",
            Self::Finished => "finalizado",
            Self::Cancelled => "cancelado",
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pendente",
            Self::Accepted => "Aceito",
            Self::Preparing => "Preparando",
            Self::Ready => "Pronto",
            Self::Delivered => "Entregue",
            Self::AwaitingPayment => "Aguardando Pagamento",
            Self::Paid => "Pago",
            Self::Finished => "Finalizado",
            Self::Cancelled => "Cancelado",
        }
    }

    /// Statuses reachable from this one
    pub fn next_statuses(&self) -> &'static [OrderStatus] {
        match self {
            Self::Pending => &[Self::Accepted, Self::Cancelled],
            Self::Accepted => &[Self::Preparing],
            Self::Preparing => &[Self::Ready],
            Self::Ready => &[Self::Delivered],
            Self::Delivered => &[Self::AwaitingPayment],
            Self::AwaitingPayment => &[Self::Paid],
            Self::Paid => &[Self::Finished],
            Self::Finished | Self::Cancelled => &[],
        }
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        self.next_statuses().contains(&next)
    }

    /// No transition leaves this status
    pub fn is_terminal(&self) -> bool {
        self.next_statuses().is_empty()
    }

    /// Order still running a tab (not yet settled or abandoned)
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Paid | Self::Finished | Self::Cancelled)
    }

    /// Order has been paid for
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Paid | Self::Finished)
    }

    /// Buttons offered from this status
    pub fn actions(&self) -> Vec<StatusAction> {
        self.next_statuses()
            .iter()
            .filter_map(|&target| {
                action_label(target).map(|label| StatusAction {
                    target,
                    label,
                    destructive: target == Self::Cancelled,
                })
            })
            .collect()
    }
}

/// Button label per transition target; Pending is never a target
const ACTION_LABELS: [(OrderStatus, &str); 8] = [
    (OrderStatus::Accepted, "Aceitar"),
    (OrderStatus::Cancelled, "Cancelar"),
    (OrderStatus::Preparing, "Iniciar Preparo"),
    (OrderStatus::Ready, "Marcar Pronto"),
    (OrderStatus::Delivered, "Entregar"),
    (OrderStatus::AwaitingPayment, "Solicitar Pagamento"),
    (OrderStatus::Paid, "Marcar Pago"),
    (OrderStatus::Finished, "Finalizar"),
];

fn action_label(target: OrderStatus) -> Option<&'static str> {
    ACTION_LABELS
        .iter()
        .find(|(status, _)| *status == target)
        .map(|(_, label)| *label)
}

impl FromStr for OrderStatus {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Older backends label freshly sent orders "Cozinha" and closed tabs "Fechado".
        match normalize_key(s).as_str() {
            "pendente" | "pending" | "cozinha" | "aguardando_selecao" => Ok(Self::Pending),
            "aceito" | "accepted" => Ok(Self::Accepted),
            "preparando" | "preparing" => Ok(Self::Preparing),
            "pronto" | "ready" => Ok(Self::Ready),
            "entregue" | "delivered" => Ok(Self::Delivered),
            "aguardando_pagamento" | "awaiting_payment" | "waiting_payment" => {
                Ok(Self::AwaitingPayment)
            }
            "pago" | "paid" => Ok(Self::Paid),
            "finalizado" | "fechado" | "finished" => Ok(Self::Finished),
            "cancelado" | "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(SchemaError::unknown("order status", s)),
        }
    }
}

impl TryFrom<String> for OrderStatus {
    type Error = SchemaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Accepted));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Accepted.can_transition_to(Preparing));
        assert!(Preparing.can_transition_to(Ready));
        assert!(Ready.can_transition_to(Delivered));
        assert!(Delivered.can_transition_to(AwaitingPayment));
        assert!(AwaitingPayment.can_transition_to(Paid));
        assert!(Paid.can_transition_to(Finished));

        assert!(!Accepted.can_transition_to(Cancelled));
        assert!(!Ready.can_transition_to(Preparing));
        assert!(!Pending.can_transition_to(Ready));
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(OrderStatus::Finished.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(OrderStatus::Finished.actions().is_empty());
        let terminal: Vec<_> = OrderStatus::ALL.iter().filter(|s| s.is_terminal()).collect();
        assert_eq!(terminal.len(), 2);
    }

    #[test]
    fn test_every_transition_has_a_button() {
        for status in OrderStatus::ALL {
            assert_eq!(status.actions().len(), status.next_statuses().len(), "{status:?}");
        }
    }

    #[test]
    fn test_actions_from_pending() {
        let actions = OrderStatus::Pending.actions();
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].label, "Aceitar");
        assert!(!actions[0].destructive);
        assert_eq!(actions[1].target, OrderStatus::Cancelled);
        assert!(actions[1].destructive);
    }

    #[test]
    fn test_parse_labels_and_legacy_spellings() {
        assert_eq!("Pronto".parse::<OrderStatus>().unwrap(), OrderStatus::Ready);
        assert_eq!("pronto".parse::<OrderStatus>().unwrap(), OrderStatus::Ready);
        assert_eq!("Cozinha".parse::<OrderStatus>().unwrap(), OrderStatus::Pending);
        assert_eq!(
            "Aguardando Pagamento".parse::<OrderStatus>().unwrap(),
            OrderStatus::AwaitingPayment
        );
        assert_eq!("Fechado".parse::<OrderStatus>().unwrap(), OrderStatus::Finished);
        assert_eq!("cancelled".parse::<OrderStatus>().unwrap(), OrderStatus::Cancelled);
        assert!("Voando".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_serde_uses_canonical_value() {
        let json = serde_json::to_string(&OrderStatus::AwaitingPayment).unwrap();
        assert_eq!(json, "\"aguardando_pagamento\"");
        let back: OrderStatus = serde_json::from_str("\"Preparando\"").unwrap();
        assert_eq!(back, OrderStatus::Preparing);
        assert!(serde_json::from_str::<OrderStatus>("\"???\"").is_err());
    }
}
