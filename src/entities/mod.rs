//! Entity types - the data model shared by the store, core logic and CLI

pub mod group;
pub mod line_item;
pub mod order;
pub mod unit;
pub mod user;

pub use group::{ClassGroup, Course, Term};
pub use line_item::{LineItem, LineStatus};
pub use order::{Order, OrderAttention};
pub use unit::{StockLine, Unit};
pub use user::{Role, User};
