//! Shopping cart held in memory by the customer flow
//!
//! Lines keep insertion order. A line never has quantity ≤ 0: setting such a
//! quantity removes it. Quantities stop at `i32::MAX`.

use rust_decimal::Decimal;
use shared::models::MenuItem;
use shared::money::format_price;
use shared::order::OrderLineInput;

/// One cart line: item snapshot plus quantity
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub item: MenuItem,
    pub quantity: i32,
}

impl CartLine {
    pub fn subtotal(&self) -> Decimal {
        self.item.price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit, merging into an existing line for the same item
    pub fn add(&mut self, item: &MenuItem) {
        match self.lines.iter_mut().find(|l| l.item.id == item.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.lines.push(CartLine {
                item: item.clone(),
                quantity: 1,
            }),
        }
    }

    /// Set a line's quantity; ≤ 0 removes the line. Returns false if absent.
    pub fn set_quantity(&mut self, item_id: i64, quantity: i32) -> bool {
        if quantity <= 0 {
            return self.remove(item_id);
        }
        match self.lines.iter_mut().find(|l| l.item.id == item_id) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    pub fn increment(&mut self, item_id: i64) -> bool {
        match self.quantity_of(item_id) {
            0 => false,
            q => self.set_quantity(item_id, q.saturating_add(1)),
        }
    }

    pub fn decrement(&mut self, item_id: i64) -> bool {
        match self.quantity_of(item_id) {
            0 => false,
            q => self.set_quantity(item_id, q - 1),
        }
    }

    pub fn remove(&mut self, item_id: i64) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.item.id != item_id);
        self.lines.len() != before
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn quantity_of(&self, item_id: i64) -> i32 {
        self.lines
            .iter()
            .find(|l| l.item.id == item_id)
            .map_or(0, |l| l.quantity)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across lines
    pub fn item_count(&self) -> i32 {
        self.lines
            .iter()
            .fold(0i32, |n, l| n.saturating_add(l.quantity))
    }

    /// Σ price × quantity
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    pub fn total_label(&self) -> String {
        format_price(self.total())
    }

    /// Lines as sent to `POST /pedidos`
    pub fn to_order_lines(&self) -> Vec<OrderLineInput> {
        self.lines
            .iter()
            .map(|l| OrderLineInput {
                item_id: l.item.id,
                quantity: l.quantity,
            })
            .collect()
    }
}
