pub mod assignment_service;
pub mod metadata_service;
pub mod roster_service;
