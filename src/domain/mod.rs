mod activity;
mod blood;
mod cart;
mod catalog;
mod money;
mod points;
mod registry;
mod stats;

pub use activity::*;
pub use blood::*;
pub use cart::*;
pub use catalog::*;
pub use money::*;
pub use points::*;
pub use registry::*;
pub use stats::*;
