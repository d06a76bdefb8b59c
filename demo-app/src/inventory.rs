//! Demo model registered through `#[derive(SheetType)]`

#![allow(dead_code, reason = "fields are only described, never read")]

use sheet_mapper::SheetType;

/// Namespace of this module, scanned by default
pub const NAMESPACE: &str = module_path!();

/// Supplier referenced by products
#[derive(SheetType)]
pub struct Supplier {
    /// Display name
    pub name:    String,
    /// Supplier code used in spreadsheets
    #[sheet(id = "code")]
    pub code:    String,
    /// Country of registration
    #[sheet(id = "country")]
    pub country: String,
}

/// Storage location
#[derive(SheetType)]
pub struct Bin {
    /// Aisle label
    #[sheet(id)]
    pub aisle: String,
    /// Shelf number
    pub shelf: u16,
}

/// A stocked product
#[derive(SheetType)]
#[sheet(entity, operations(reorder_needed))]
pub struct Product {
    /// Stock keeping unit
    pub sku:      String,
    /// Unit price in cents
    pub price:    u64,
    /// Who delivers it
    pub supplier: Supplier,
    /// Where it is stored
    pub bin:      Bin,
    /// Units on hand
    pub quantity: u32,
}

impl Product {
    /// Whether stock fell below the reorder threshold
    #[must_use]
    pub const fn reorder_needed(&self) -> bool {
        self.quantity < 10
    }
}

/// A delivery received from a supplier
#[derive(SheetType)]
#[sheet(entity)]
pub struct Delivery {
    /// Delivery note number
    pub number:   String,
    /// Sender
    pub supplier: Supplier,
    /// ISO date the goods arrived
    pub received: String,
}
