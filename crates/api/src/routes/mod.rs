/// Teacher availability and calendar endpoints
pub mod availability;
/// Enrollment validation, booking and cancellation endpoints
pub mod enrollment;
/// Liveness and version endpoints
pub mod health;
