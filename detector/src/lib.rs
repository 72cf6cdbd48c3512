pub mod errors;
pub mod liveness;
pub mod metrics;
pub mod model;
pub mod registry;
pub mod rest;
pub mod validate;
