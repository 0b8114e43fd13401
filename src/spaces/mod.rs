pub mod catalog;
pub mod filters;
pub mod registration;

pub use catalog::sample_spaces;
pub use filters::{nearest, SpaceFilters};
pub use registration::SpaceRegistration;
