//! Screen state containers
//!
//! One container per screen. Each owns its data, a loading flag and the
//! inline error for that screen. Failed calls are recorded here and also
//! returned to the caller; nothing is shared between screens.

pub mod customer_flow;
pub mod dashboard;
pub mod menu;
pub mod orders;
pub mod payments;
pub mod pending;
pub mod tables;

pub use customer_flow::{CustomerFlow, FlowStep};
pub use dashboard::{Dashboard, DashboardSummary};
pub use menu::{AvailabilityFilter, MenuManager};
pub use orders::{OrderBoard, StatusFilter};
pub use payments::PaymentBoard;
pub use pending::PendingUpdates;
pub use tables::TableBoard;

use crate::{ClientError, ClientResult};

/// Message shown when a second change hits an entity still awaiting the server
pub const UPDATE_IN_FLIGHT: &str = "Atualização em andamento";

/// Loading flag and inline error shared by every screen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenState {
    pub loading: bool,
    pub error: Option<String>,
}

impl ScreenState {
    pub fn start(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Close a call: clear loading, record the error message if any
    pub fn finish<T>(&mut self, result: ClientResult<T>) -> ClientResult<T> {
        self.loading = false;
        if let Err(e) = &result {
            self.fail(e);
        }
        result
    }

    pub fn fail(&mut self, err: &ClientError) {
        tracing::warn!(error = %err, "Screen operation failed");
        self.error = Some(err.user_message());
    }

    /// Record an error raised before any call was made, and hand it back
    pub fn reject(&mut self, err: ClientError) -> ClientError {
        self.fail(&err);
        err
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}
