mod errors;

pub use errors::{ServiceError, ServiceResult};

pub mod catalog;
pub mod products;
