//! Business logic services.

#![allow(missing_docs)]

pub mod auth;
pub mod notification;
pub mod swap;
pub mod timetable;

pub use auth::{AuthService, Claims, SignInResponse, hash_password};
pub use notification::{NOTIFICATION_LIST_LIMIT, NotificationDraft, NotificationService};
pub use swap::{
    ApprovalStage, CreateSwapInput, SwapDecision, SwapOutcome, SwapResponder, SwapService,
    check_transition,
};
pub use timetable::{CreateTimetableInput, TimetableService};
