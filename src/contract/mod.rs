pub mod handlers;
pub mod repository;
pub mod service;
pub mod types;
pub mod validation;

pub use repository::ContractRepository;
pub use service::ContractService;
pub use types::{ContractRecord, ContractStatus, CreateContractInput, UpdateContractInput};
