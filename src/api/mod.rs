pub mod client;
pub mod mock;
pub mod token;
pub mod traits;
pub mod types;

pub use client::HttpApi;
pub use mock::MockApi;
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use traits::RentalApi;
pub use types::ApiConfig;
