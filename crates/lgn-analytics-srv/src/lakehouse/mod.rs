pub mod bytes_chunk_reader;
pub mod column;
pub mod jit_lakehouse;
pub mod local_jit_lakehouse;
pub mod parquet_buffer;
pub mod remote_jit_lakehouse;
pub mod scope_table;
pub mod span_table;

#[cfg(feature = "deltalake-proto")]
pub mod span_table_partition;

#[cfg(feature = "deltalake-proto")]
pub mod span_delta_table;
