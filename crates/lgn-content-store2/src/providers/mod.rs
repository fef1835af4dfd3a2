#[cfg(feature = "aws")]
mod aws_dynamodb;
#[cfg(feature = "aws")]
mod aws_s3;
mod grpc;
mod local;
#[cfg(feature = "redis")]
mod redis;
mod small_content;

#[cfg(feature = "redis")]
pub use self::redis::RedisProvider;
#[cfg(feature = "aws")]
pub use aws_dynamodb::AwsDynamoDbProvider;
#[cfg(feature = "aws")]
pub use aws_s3::{AwsS3Provider, AwsS3Url};
pub use grpc::{GrpcProvider, GrpcService};
pub use local::LocalProvider;
pub use small_content::SmallContentProvider;
