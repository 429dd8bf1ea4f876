//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure:
//! validate, call the store, classify the outcome.

pub mod authors;
pub mod config;
pub mod login;
pub mod posts;
pub mod themes;

// Re-exports
pub use authors::AuthorUseCases;
pub use config::HokkuConfig;
pub use login::LoginUseCase;
pub use posts::PostUseCases;
pub use themes::ThemeUseCases;
