pub mod faculty;
pub mod update;
