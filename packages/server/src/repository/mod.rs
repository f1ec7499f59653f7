//! Data access. Each repository borrows a connection, so the same code runs
//! against the pool or inside a transaction.

pub mod avatar;
pub mod faculty;
pub mod student;

pub use avatar::AvatarRepository;
pub use faculty::FacultyRepository;
pub use student::StudentRepository;
