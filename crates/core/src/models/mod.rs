pub mod enrollment;
pub mod teacher;
pub mod time_slot;
