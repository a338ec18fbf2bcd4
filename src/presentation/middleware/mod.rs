mod upload_limit;

pub use upload_limit::upload_limit_middleware;
