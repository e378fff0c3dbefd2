//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod course_repo;
pub mod custom_hour_repo;
pub mod exam_repo;
pub mod friendship_repo;
pub mod room_repo;
pub mod tenant_repo;
pub mod timetable_event_repo;
pub mod user_repo;
pub mod zenturie_repo;

pub use course_repo::CourseRepo;
pub use custom_hour_repo::CustomHourRepo;
pub use exam_repo::ExamRepo;
pub use friendship_repo::FriendshipRepo;
pub use room_repo::RoomRepo;
pub use tenant_repo::TenantRepo;
pub use timetable_event_repo::TimetableEventRepo;
pub use user_repo::UserRepo;
pub use zenturie_repo::ZenturieRepo;
