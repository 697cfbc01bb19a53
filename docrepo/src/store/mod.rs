//! Document-store collaborator contract and the in-memory backend.
//!
//! The toolkit does not implement storage; it talks to a store through the
//! [StoreProvider] and [CollectionProvider] traits and the [DocumentStore]
//! and [DocumentCollection] handles wrapping them. A backend adapter
//! implements the provider traits against a real driver; the bundled
//! [MemoryStore] implements them in process memory and is what the
//! integration tests run against.

mod find_options;
mod memory;
mod store;
mod update_options;

pub use find_options::*;
pub use memory::*;
pub use store::*;
pub use update_options::*;
