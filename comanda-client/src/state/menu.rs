//! Menu management (backoffice)

use shared::models::{Category, CategoryCreate, MenuItem, MenuItemCreate, MenuItemUpdate};
use std::sync::Arc;

use super::{PendingUpdates, ScreenState, UPDATE_IN_FLIGHT};
use crate::client::{ApiClient, HttpClient};
use crate::{ClientError, ClientResult};

/// Availability filter for the item list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AvailabilityFilter {
    #[default]
    All,
    Available,
    Unavailable,
}

impl AvailabilityFilter {
    fn matches(&self, item: &MenuItem) -> bool {
        match self {
            Self::All => true,
            Self::Available => item.available,
            Self::Unavailable => !item.available,
        }
    }
}

pub struct MenuManager<H: HttpClient> {
    api: Arc<ApiClient<H>>,
    items: Vec<MenuItem>,
    categories: Vec<Category>,
    category_filter: Option<String>,
    availability: AvailabilityFilter,
    pending: PendingUpdates<MenuItem>,
    pub screen: ScreenState,
}

impl<H: HttpClient> MenuManager<H> {
    pub fn new(api: Arc<ApiClient<H>>) -> Self {
        Self {
            api,
            items: Vec::new(),
            categories: Vec::new(),
            category_filter: None,
            availability: AvailabilityFilter::All,
            pending: PendingUpdates::new(),
            screen: ScreenState::default(),
        }
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn is_pending(&self, item_id: i64) -> bool {
        self.pending.is_pending(item_id)
    }

    pub async fn load(&mut self) -> ClientResult<()> {
        self.screen.start();
        let items = self.api.list_menu_items().await;
        self.items = self.screen.finish(items)?;

        // Older backends have no category table; the item list still works
        match self.api.list_categories().await {
            Ok(categories) => self.categories = categories,
            Err(e) => tracing::warn!(error = %e, "Could not load categories"),
        }
        Ok(())
    }

    pub fn set_category_filter(&mut self, category: Option<&str>) {
        self.category_filter = category
            .filter(|c| !c.is_empty() && *c != "Todos")
            .map(str::to_string);
    }

    pub fn set_availability_filter(&mut self, filter: AvailabilityFilter) {
        self.availability = filter;
    }

    pub fn visible_items(&self) -> Vec<&MenuItem> {
        self.items
            .iter()
            .filter(|i| self.availability.matches(i))
            .filter(|i| match &self.category_filter {
                Some(c) => i.in_category(c),
                None => true,
            })
            .collect()
    }

    /// Category names: the category table plus any free-text item categories
    pub fn category_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.categories.iter().map(|c| c.name.clone()).collect();
        for item in &self.items {
            if let Some(c) = &item.category
                && !names.iter().any(|n| n.eq_ignore_ascii_case(c))
            {
                names.push(c.clone());
            }
        }
        names
    }

    pub async fn create_item(&mut self, draft: &MenuItemCreate) -> ClientResult<MenuItem> {
        self.screen.start();
        let result = self.api.create_menu_item(draft).await;
        let item = self.screen.finish(result)?;
        self.items.push(item.clone());
        Ok(item)
    }

    pub async fn update_item(&mut self, id: i64, draft: &MenuItemUpdate) -> ClientResult<MenuItem> {
        self.screen.start();
        let result = self.api.update_menu_item(id, draft).await;
        let item = self.screen.finish(result)?;
        self.replace(item.clone());
        Ok(item)
    }

    pub async fn delete_item(&mut self, id: i64) -> ClientResult<()> {
        self.screen.start();
        let result = self.api.delete_menu_item(id).await;
        self.screen.finish(result)?;
        self.items.retain(|i| i.id != id);
        Ok(())
    }

    pub async fn create_category(&mut self, draft: &CategoryCreate) -> ClientResult<Category> {
        self.screen.start();
        let result = self.api.create_category(draft).await;
        let category = self.screen.finish(result)?;
        self.categories.push(category.clone());
        Ok(category)
    }

    /// Flip availability, showing the new value before the server answers
    pub async fn toggle_availability(&mut self, id: i64) -> ClientResult<MenuItem> {
        let Some(current) = self.items.iter().find(|i| i.id == id).cloned() else {
            let err = ClientError::validation("Item não encontrado");
            self.screen.fail(&err);
            return Err(err);
        };
        if !self.pending.begin(id, current.clone()) {
            return Err(self.screen.reject(ClientError::validation(UPDATE_IN_FLIGHT)));
        }
        let target = !current.available;
        if let Some(item) = self.items.iter_mut().find(|i| i.id == id) {
            item.available = target;
        }

        let result = self
            .api
            .update_menu_item(id, &MenuItemUpdate::availability(target))
            .await;
        match result {
            Ok(item) => {
                self.pending.confirm(id);
                self.replace(item.clone());
                self.screen.clear_error();
                Ok(item)
            }
            Err(e) => {
                if let Some(previous) = self.pending.revert(id) {
                    self.replace(previous);
                }
                self.screen.fail(&e);
                Err(e)
            }
        }
    }

    fn replace(&mut self, item: MenuItem) {
        match self.items.iter_mut().find(|i| i.id == item.id) {
            Some(slot) => *slot = item,
            None => self.items.push(item),
        }
    }
}
