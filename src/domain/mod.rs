// Domain layer - Core types, error taxonomy and option rules

pub mod errors;
pub mod model;
pub mod rules;
