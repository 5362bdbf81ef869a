// Application layer - the points ledger, the cart and the flows built on them.
// Every component is constructed and owned by GoodwillService; nothing here
// is a process-wide singleton.

mod cart;
pub mod error;
mod notify;
mod points;
mod service;
mod task;

pub use cart::*;
pub use error::*;
pub use notify::*;
pub use points::*;
pub use service::*;
pub use task::*;
