pub mod key;
pub mod locks;
pub mod store;

pub use key::{ClientReference, SessionKey};
pub use locks::SessionLocks;
pub use store::{FileSessionStore, InMemorySessionStore, SessionStore, DEFAULT_TTL_SECS};
