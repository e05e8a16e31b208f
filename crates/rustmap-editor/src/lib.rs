//! Headless map editing session.
//!
//! [`MapSession`] owns the layer store, the land and water heightfields and
//! the placed objects of one map, and exposes every layer and heightmap
//! operation in world units. Display and progress collaborators are injected
//! once at construction.

mod error;
mod session;
mod settings;

pub use error::EditorError;
pub use session::MapSession;
pub use settings::SessionSettings;
