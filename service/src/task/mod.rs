//! Background [`Task`]s definitions.

mod background;
pub mod clean_abandoned_carts;

pub use common::Handler as Task;

pub use self::{
    background::Background, clean_abandoned_carts::CleanAbandonedCarts,
};
