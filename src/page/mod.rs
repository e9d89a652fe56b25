//! Page objects for the attendance form: frame descent, field interaction
//! and failure snapshots.

pub mod diagnostics;
pub mod form;
pub mod frames;

pub use form::{AttendanceForm, Field, StatusUpdate};
pub use frames::FrameNavigator;
