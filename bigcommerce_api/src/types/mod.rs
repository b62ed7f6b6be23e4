mod response;
pub use self::response::ApiResponse;
