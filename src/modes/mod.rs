pub mod headless;
pub mod human;

pub use headless::{HeadlessMode, HeadlessReport, StopReason};
pub use human::HumanMode;
