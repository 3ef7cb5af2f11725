pub mod marker;
pub mod trainer;

pub use marker::MarkerHandler;
pub use trainer::TrainerHandler;
