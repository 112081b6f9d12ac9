//! Table management (backoffice)

use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate, TableStatus};
use std::sync::Arc;

use super::{PendingUpdates, ScreenState, UPDATE_IN_FLIGHT};
use crate::client::{ApiClient, HttpClient};
use crate::{ClientError, ClientResult};

pub struct TableBoard<H: HttpClient> {
    api: Arc<ApiClient<H>>,
    tables: Vec<DiningTable>,
    pending: PendingUpdates<DiningTable>,
    pub screen: ScreenState,
}

impl<H: HttpClient> TableBoard<H> {
    pub fn new(api: Arc<ApiClient<H>>) -> Self {
        Self {
            api,
            tables: Vec::new(),
            pending: PendingUpdates::new(),
            screen: ScreenState::default(),
        }
    }

    /// Tables ordered by number
    pub fn tables(&self) -> &[DiningTable] {
        &self.tables
    }

    pub fn get(&self, id: i64) -> Option<&DiningTable> {
        self.tables.iter().find(|t| t.id == id)
    }

    pub fn is_pending(&self, id: i64) -> bool {
        self.pending.is_pending(id)
    }

    pub async fn load(&mut self) -> ClientResult<()> {
        self.screen.start();
        let result = self.api.list_tables().await;
        self.tables = self.screen.finish(result)?;
        self.sort();
        Ok(())
    }

    pub async fn create(&mut self, draft: &DiningTableCreate) -> ClientResult<DiningTable> {
        if self.tables.iter().any(|t| t.number == draft.number) {
            let err = ClientError::validation(format!("Mesa {} já existe", draft.number));
            self.screen.fail(&err);
            return Err(err);
        }
        self.screen.start();
        let result = self.api.create_table(draft).await;
        let table = self.screen.finish(result)?;
        self.upsert(table.clone());
        Ok(table)
    }

    pub async fn update(
        &mut self,
        id: i64,
        draft: &DiningTableUpdate,
    ) -> ClientResult<DiningTable> {
        self.screen.start();
        let result = self.api.update_table(id, draft).await;
        let table = self.screen.finish(result)?;
        self.upsert(table.clone());
        Ok(table)
    }

    pub async fn delete(&mut self, id: i64) -> ClientResult<()> {
        self.screen.start();
        let result = self.api.delete_table(id).await;
        self.screen.finish(result)?;
        self.tables.retain(|t| t.id != id);
        Ok(())
    }

    /// Change a table's status, showing it before the server answers
    pub async fn set_status(&mut self, id: i64, status: TableStatus) -> ClientResult<DiningTable> {
        let Some(current) = self.get(id).cloned() else {
            let err = ClientError::validation("Mesa não encontrada");
            self.screen.fail(&err);
            return Err(err);
        };
        if !self.pending.begin(id, current) {
            return Err(self.screen.reject(ClientError::validation(UPDATE_IN_FLIGHT)));
        }
        if let Some(table) = self.tables.iter_mut().find(|t| t.id == id) {
            table.status = status;
        }

        let draft = DiningTableUpdate {
            status: Some(status),
            ..Default::default()
        };
        match self.api.update_table(id, &draft).await {
            Ok(table) => {
                self.pending.confirm(id);
                self.upsert(table.clone());
                self.screen.clear_error();
                Ok(table)
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

    /// Apply a `mesa_status` snapshot
    pub fn apply_snapshot(&mut self, table: DiningTable) {
        self.pending.settle(table.id);
        self.upsert(table);
    }

    /// Count of tables per status, in [`TableStatus::ALL`] order
    pub fn counts(&self) -> Vec<(TableStatus, usize)> {
        TableStatus::ALL
            .iter()
            .map(|&s| (s, self.tables.iter().filter(|t| t.status == s).count()))
            .collect()
    }

    pub fn count(&self, status: TableStatus) -> usize {
        self.tables.iter().filter(|t| t.status == status).count()
    }

    fn upsert(&mut self, table: DiningTable) {
        match self.tables.iter_mut().find(|t| t.id == table.id) {
            Some(slot) => *slot = table,
            None => {
                self.tables.push(table);
                self.sort();
            }
        }
    }

    fn sort(&mut self) {
        self.tables.sort_by_key(|t| t.number);
    }
}
