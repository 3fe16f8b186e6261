// Library exports for lsdeps
pub mod config;
pub mod registry;
pub mod resolver;
pub mod version;

pub use registry::{NpmRegistry, PackageMetadata, Registry, RegistryError};
pub use resolver::{Failure, Resolution, ResolveError, ResolveOptions, Resolver};
pub use version::{PackageRef, normalize};
