mod timing;

pub use timing::TimingMiddleware;
