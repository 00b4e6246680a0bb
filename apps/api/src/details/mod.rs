// Detail views: an open suggestion plus the reviews typed against it.
// In-memory only.

pub mod handlers;
pub mod views;
