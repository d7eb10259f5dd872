pub mod claims;
pub mod identity;
pub mod password;
pub mod session_cookie;
pub mod token;

pub use claims::{Claims, Principal, Role};
pub use identity::{AuthenticatedUser, Identity};
pub use session_cookie::SessionCookies;
pub use token::{TokenError, TokenService};
