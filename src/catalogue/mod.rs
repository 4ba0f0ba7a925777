pub mod error;
pub mod item;
pub mod query;
pub mod service;

pub use error::CatalogueError;
pub use item::CatalogueItem;
pub use service::CatalogueService;
