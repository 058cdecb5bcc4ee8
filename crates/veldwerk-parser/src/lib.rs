pub mod errors;
pub mod model;
pub mod tables;

pub use errors::ExportError;
pub use model::{FieldVisitRow, ObservationRow, ProjectRow};
pub use tables::{
    load_fieldvisits, load_observations, load_projects, read_fieldvisits, read_observations,
    read_projects,
};

#[cfg(test)]
mod tests;
