#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod dispatcher;
pub mod huggingface;
pub mod object_storage;
pub mod registry;
pub mod transfer;

pub use dispatcher::SourceDispatcher;
pub use huggingface::HuggingFaceFetcher;
pub use object_storage::{ObjectLocation, ObjectStorageFetcher, ObjectStoreClient, R2Client, resolve_location};
pub use registry::{ModelRegistryFetcher, RegistryBackend, RegistryClientConfig, ReqwestRegistryBackend};
pub use transfer::{ByteStream, RemoteBody, commit_partial, partial_path, write_body};
