pub mod availability;
pub mod enrollment;
pub mod holiday;
pub mod teacher;
pub mod time_slot;
