pub mod controller;
pub mod profile;
pub mod state;

pub use self::controller::SessionController;
pub use self::profile::{MENU, MenuModule, Profile};
pub use self::state::{AuthEvent, Session, SessionHandle, SessionStatus};
