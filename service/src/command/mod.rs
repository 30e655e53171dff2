//! [`Command`] definition.

pub mod add_cart_item;
pub mod authorize_user_session;
pub mod clear_cart;
pub mod create_category;
pub mod create_order;
pub mod create_product;
pub mod create_user;
pub mod create_user_session;
pub mod delete_product;
pub mod modify_cart;
pub mod remove_cart_item;
pub mod update_cart_item_quantity;
pub mod update_order_status;
pub mod update_product;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    add_cart_item::AddCartItem, authorize_user_session::AuthorizeUserSession,
    clear_cart::ClearCart, create_category::CreateCategory,
    create_order::CreateOrder, create_product::CreateProduct,
    create_user::CreateUser, create_user_session::CreateUserSession,
    delete_product::DeleteProduct, modify_cart::ModifyCart,
    remove_cart_item::RemoveCartItem,
    update_cart_item_quantity::UpdateCartItemQuantity,
    update_order_status::UpdateOrderStatus, update_product::UpdateProduct,
};
