//! Repository layer for database access.

mod enrollment;
mod lecture_hall;
mod notification;
mod subject;
mod swap_request;
mod timetable;
mod user;

pub use enrollment::EnrollmentRepository;
pub use lecture_hall::LectureHallRepository;
pub use notification::NotificationRepository;
pub use subject::SubjectRepository;
pub use swap_request::{PendingSwapRow, SwapDetails, SwapRequestRepository};
pub use timetable::{Reschedule, ScheduleRow, TimetableRepository};
pub use user::UserRepository;
