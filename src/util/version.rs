//! Crate name and version, as stamped by `build.rs`.

pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GIT_TAG: Option<&str> = option_env!("GIT_TAG");

pub fn version_label() -> String {
    if let Some(tag) = GIT_TAG {
        tag.to_string()
    } else {
        format!("v{}", APP_VERSION)
    }
}

/// `okuru-navi/v1.0.0`, sent as the HTTP User-Agent.
pub fn user_agent() -> String {
    format!("{}/{}", CRATE_NAME, version_label())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_is_prefixed() {
        let label = version_label();
        assert!(label.starts_with('v') || GIT_TAG.is_some());
    }

    #[test]
    fn user_agent_names_the_crate_only() {
        let agent = user_agent();
        assert!(agent.starts_with("okuru-navi/"));
        assert!(!agent.contains("http"));
    }
}
