pub mod principals;

pub use principals::{InMemoryPrincipals, NewPrincipal, PrincipalStore};
