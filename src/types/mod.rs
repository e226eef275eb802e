// ABOUTME: Type-safe identifiers for remote GitHub objects.
// ABOUTME: Uses phantom types to prevent ID confusion at compile time.

mod id;

pub use id::{DeploymentId, RefId, RepositoryId, StatusId};
