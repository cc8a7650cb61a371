//! Database entities.

pub mod enrollment;
pub mod lecture_hall;
pub mod notification;
pub mod subject;
pub mod swap_request;
pub mod timetable;
pub mod user;

pub use enrollment::Entity as Enrollment;
pub use lecture_hall::Entity as LectureHall;
pub use notification::Entity as Notification;
pub use subject::Entity as Subject;
pub use swap_request::Entity as SwapRequest;
pub use timetable::Entity as Timetable;
pub use user::Entity as User;
