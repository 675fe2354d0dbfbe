pub mod group;
pub mod preferences;
pub mod reactor;
pub mod registry;
pub mod server;
pub mod store;
pub mod window;

pub use group::{Arrangement, Group, GroupId, GroupManager};
pub use registry::{RegistrySettings, WindowRegistry};
pub use window::{ContentRef, LifecycleState, PlacementState, Window, WindowId};
