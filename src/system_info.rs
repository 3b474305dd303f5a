use git_version::git_version;

// include -modified if the working tree has uncommitted changes
const COMMIT: &str = git_version!(
    args = ["--abbrev=10", "--always", "--dirty=-modified"],
    fallback = "unknown"
);

/// Describe how far this build is from a release tag.
fn release_label() -> String {
    let latest = option_env!("LATEST_TAG").unwrap_or("");
    let ahead = option_env!("COMMITS_AHEAD").unwrap_or("");
    match option_env!("RELEASE_VERSION") {
        Some(tag) if !tag.is_empty() => format!("release {tag}"),
        _ if !latest.is_empty() && !ahead.is_empty() => {
            format!("{ahead} commits ahead of {latest}")
        }
        _ if !latest.is_empty() => format!("ahead of {latest}"),
        _ => "development".to_string(),
    }
}

/// One-line build description reported by `/health` and logged at startup.
pub fn get_system_info() -> String {
    let profile = if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    };
    format!(
        "{} {} ({}, commit {}, {} build)",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        release_label(),
        COMMIT,
        profile
    )
}
