//! S3模块
//!
//! 该模块负责与对象存储的交互，包括客户端初始化、存储桶检查与创建、对象读取。

pub mod bucket;
pub mod config;
pub mod object;
pub mod store;

pub use bucket::{EnsureOutcome, WaitOptions, delete_bucket, ensure_bucket};
pub use config::create_s3_client;
pub use object::fetch_object;
pub use store::{ObjectStore, ObjectSummary, S3Store, StoreError};
