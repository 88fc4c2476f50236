pub mod admin_auth;
pub mod admin_catalog;
pub mod admin_orders;
pub mod callback;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod payment;
pub mod uploads;

use serde::Deserialize;
use crave_core::types::DbId;

/// `?id=` query parameter shared by several pages.
#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: DbId,
}
