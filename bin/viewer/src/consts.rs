pub const VIEWER_VERSION: &str = env!("CARGO_PKG_VERSION");
