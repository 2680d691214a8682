pub mod submission_guard;
pub mod username_cache;
pub mod username_filter;
