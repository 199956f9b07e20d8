/// Returns true if `container` looks like an iCloud container identifier.
///
/// ```
/// assert!(icloud::is_icloud_container("iCloud.com.example.App"));
/// assert!(!icloud::is_icloud_container("com.example.App"));
/// ```
pub fn is_icloud_container(container: &str) -> bool {
    container.starts_with("iCloud.")
}
