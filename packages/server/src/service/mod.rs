//! Business rules over the repositories. Services are built per request from
//! [`AppState`](crate::state::AppState) parts and borrow them.

pub mod avatar;
pub mod faculty;
pub mod student;

pub use avatar::AvatarService;
pub use faculty::FacultyService;
pub use student::StudentService;
