//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod address;
pub mod category;
pub mod order;
pub mod order_item;
pub mod product;
pub mod session;
pub mod supplier;
pub mod user;

// Re-export specific types to avoid conflicts
pub use address::{Column as AddressColumn, Entity as Address, Model as AddressModel};
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use order::{Column as OrderColumn, Entity as Order, Model as OrderModel};
pub use order_item::{Column as OrderItemColumn, Entity as OrderItem, Model as OrderItemModel};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use session::{Column as SessionColumn, Entity as Session, Model as SessionModel};
pub use supplier::{Column as SupplierColumn, Entity as Supplier, Model as SupplierModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};

/// Human-readable singular name of an entity, used in error messages.
pub trait Named {
    /// Singular resource name, e.g. `"product"`
    const NAME: &'static str;
}

impl Named for Address {
    const NAME: &'static str = "address";
}

impl Named for Category {
    const NAME: &'static str = "category";
}

impl Named for Order {
    const NAME: &'static str = "order";
}

impl Named for OrderItem {
    const NAME: &'static str = "order item";
}

impl Named for Product {
    const NAME: &'static str = "product";
}

impl Named for Session {
    const NAME: &'static str = "session";
}

impl Named for Supplier {
    const NAME: &'static str = "supplier";
}

impl Named for User {
    const NAME: &'static str = "user";
}
