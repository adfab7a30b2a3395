pub mod assignment_routes;
pub mod health;
pub mod roster_routes;
