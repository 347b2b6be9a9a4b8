pub mod auth;
pub mod panel;

pub use auth::{AdminUser, AuthUser};
pub use panel::{PanelAdmin, SESSION_COOKIE};
