mod common;
mod fieldvisits;
mod observations;
mod projects;

pub use fieldvisits::{load_fieldvisits, read_fieldvisits};
pub use observations::{load_observations, read_observations};
pub use projects::{load_projects, read_projects};
