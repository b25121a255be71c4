pub mod error;
pub mod ids;

pub use error::AppError;
pub use ids::EntityId;
