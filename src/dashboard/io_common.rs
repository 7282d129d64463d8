use std::path::Path;

pub fn is_url(location: &str) -> bool {
    location.starts_with("https://") || location.starts_with("http://")
}

/// Relative paths are read from `root` when it is given.
pub fn resolve_path(root: Option<&Path>, file_path: &str) -> String {
    let p = Path::new(file_path);
    match root {
        Some(r) if p.is_relative() => r.join(p).display().to_string(),
        _ => file_path.to_string(),
    }
}

/// A short name for the logs: the file name or the host of the URL.
pub fn simplify_location(location: &str) -> String {
    if is_url(location) {
        location
            .split("://")
            .nth(1)
            .and_then(|rest| rest.split('/').next())
            .unwrap_or(location)
            .to_string()
    } else {
        Path::new(location)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(location)
            .to_string()
    }
}
