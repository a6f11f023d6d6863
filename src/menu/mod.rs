pub mod handlers;
pub mod repository;
pub mod service;
pub mod types;
pub mod validation;

pub use repository::MenuRepository;
pub use service::MenuService;
pub use types::{CreateMenuInput, MenuFilters, MenuRecord, UpdateMenuInput};
