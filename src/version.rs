//! Build identity of the gateway, stamped from git at compile time.

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Branch the gateway was built from, or "unknown" outside a checkout.
pub const GIT_BRANCH: &str = match option_env!("VERGEN_GIT_BRANCH") {
    Some(branch) => branch,
    None => "unknown",
};

/// Commit the gateway was built from, or "unknown" outside a checkout.
pub const GIT_SHA: &str = match option_env!("VERGEN_GIT_SHA") {
    Some(sha) => sha,
    None => "unknown",
};

const SHORT_SHA_LEN: usize = 7;

/// Whether the checkout had uncommitted changes when built.
pub fn git_dirty() -> bool {
    option_env!("VERGEN_GIT_DIRTY") == Some("true")
}

/// Build tag shown in the `huginnd` startup log and the `version` field of
/// `GET /meta/anilist`, e.g. `0.1.0+main.3f9c2e1`, `0.1.0+main.3f9c2e1.dirty`,
/// or `0.1.0+unknown.unknown` for a build from a source tarball.
pub fn version_string() -> String {
    compose(PKG_VERSION, GIT_BRANCH, GIT_SHA, git_dirty())
}

fn compose(version: &str, branch: &str, sha: &str, dirty: bool) -> String {
    let short = sha.get(..SHORT_SHA_LEN).unwrap_or(sha);
    let suffix = if dirty { ".dirty" } else { "" };
    format!("{version}+{branch}.{short}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha_is_shortened() {
        assert_eq!(
            compose("0.1.0", "main", "3f9c2e1a8b7d6c5e", false),
            "0.1.0+main.3f9c2e1"
        );
    }

    #[test]
    fn dirty_tree_is_marked() {
        assert_eq!(
            compose("0.1.0", "feature/redis", "3f9c2e1a8b", true),
            "0.1.0+feature/redis.3f9c2e1.dirty"
        );
    }

    #[test]
    fn tarball_build_reports_unknown() {
        assert_eq!(
            compose("0.1.0", "unknown", "unknown", false),
            "0.1.0+unknown.unknown"
        );
    }

    #[test]
    fn version_string_leads_with_pkg_version() {
        let version = version_string();
        assert!(
            version.starts_with(&format!("{PKG_VERSION}+{GIT_BRANCH}.")),
            "unexpected version: {version}"
        );
    }
}
