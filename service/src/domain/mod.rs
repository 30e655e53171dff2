//! Domain definitions.

pub mod cart;
pub mod category;
mod image;
pub mod order;
pub mod product;
pub mod user;

pub use self::{
    cart::Cart, category::Category, image::Image, order::Order,
    product::Product, user::User,
};
