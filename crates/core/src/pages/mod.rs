//! Stage controllers for the renewal flow
//!
//! Control flows strictly forward: Login -> Verify -> Dashboard ->
//! Records. Each stage checks its page's expected content before it
//! exposes an action, and each action consumes the stage and constructs
//! the next one. A failure at any stage aborts the run.

mod dashboard;
mod login;
mod records;
mod verify;

pub use dashboard::DashboardPage;
pub use login::LoginPage;
pub use records::RecordsPage;
pub use verify::VerifyPage;
