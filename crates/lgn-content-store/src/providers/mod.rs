#[cfg(feature = "aws")]
mod aws_aggregator;
#[cfg(feature = "aws")]
mod aws_dynamodb;
#[cfg(feature = "aws")]
mod aws_s3;
mod cache;
mod grpc;
mod local;
#[cfg(feature = "lru")]
mod lru;
mod memory;
mod monitor;
#[cfg(feature = "redis")]
mod redis;
mod small_content;
mod uploader;

#[cfg(feature = "lru")]
pub use self::lru::LruProvider;
#[cfg(feature = "redis")]
pub use self::redis::RedisProvider;
#[cfg(feature = "aws")]
pub use aws_aggregator::AwsAggregatorProvider;
#[cfg(feature = "aws")]
pub use aws_dynamodb::AwsDynamoDbProvider;
#[cfg(feature = "aws")]
pub use aws_s3::{AwsS3Provider, AwsS3Url};
pub use cache::CachingProvider;
pub use grpc::{GrpcProvider, GrpcProviderSet, GrpcService};
pub use local::LocalProvider;
pub use memory::MemoryProvider;
pub use monitor::{MonitorAsyncAdapter, MonitorProvider, TransferCallbacks};
pub use small_content::SmallContentProvider;
pub(crate) use uploader::{Uploader, UploaderImpl};
