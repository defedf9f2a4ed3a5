//! Result type alias for POI Sync

use super::errors::SyncError;

/// Result type alias for importer operations
///
/// # Examples
///
/// ```
/// use poi_sync::domain::result::Result;
/// use poi_sync::domain::errors::SyncError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(SyncError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, SyncError>;
