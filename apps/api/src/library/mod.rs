// Saved library: durable list of kept suggestions, one JSON blob under one key.
// The suggestion adapter never touches this module; they meet only in the routes.

pub mod handlers;
pub mod kv;
pub mod store;
