pub mod entities;
pub mod policy;
pub mod read_models;
pub mod repositories;
pub mod value_objects;
