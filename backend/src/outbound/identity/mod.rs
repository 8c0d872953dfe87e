//! In-process identity adapters.

mod bootstrap;
mod in_memory;
mod password;

pub use bootstrap::InMemoryPrimaryStore;
pub use in_memory::InMemoryIdentityManager;
pub use password::PasswordPolicy;
