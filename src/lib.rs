//! stay-scout - state and data layer for a city-scoped rental browser
//!
//! Offers, favorites, reviews and the user session live in one [`store::Store`].
//! Network operations in [`store::thunks`] drive the store through the
//! [`api::RentalApi`] collaborator; pages read it through [`store::selectors`].

pub mod api;
pub mod error;
pub mod models;
pub mod store;

pub use error::{Error, Result};
