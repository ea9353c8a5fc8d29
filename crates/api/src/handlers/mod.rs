/// Teacher availability listing, publishing and calendar rollups
pub mod availability;
/// Enrollment validation, booking and cancellation
pub mod enrollment;
