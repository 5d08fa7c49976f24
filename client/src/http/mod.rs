pub mod decoder;
pub mod executor;
pub mod query;

pub use self::decoder::ErrorContext;
pub use self::executor::{RawResponse, RequestExecutor};
pub use self::query::{Query, encode_segment};
