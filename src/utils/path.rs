use std::path::{Path, PathBuf};
use uzers::os::unix::UserExt;

/// Home directory of the current user.
///
/// `$HOME` wins; otherwise the passwd entry for the current uid is used.
pub fn home_dir() -> Option<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        if !home.is_empty() {
            return Some(PathBuf::from(home));
        }
    }
    uzers::get_user_by_uid(uzers::get_current_uid()).map(|user| user.home_dir().to_path_buf())
}

/// Expand a leading `~` or `~user` in `path`.
///
/// Returns `None` when the home directory cannot be resolved.
///
/// ```
/// use qcli_agents::utils::path::expand_tilde;
///
/// let path = expand_tilde("/absolute/path").unwrap();
/// assert_eq!(path, std::path::PathBuf::from("/absolute/path"));
/// ```
pub fn expand_tilde<P: AsRef<Path>>(path: P) -> Option<PathBuf> {
    let path = path.as_ref();
    let path_str = path.to_str()?;

    let Some(after_tilde) = path_str.strip_prefix('~') else {
        return Some(path.to_path_buf());
    };

    if after_tilde.is_empty() || after_tilde.starts_with('/') {
        return Some(home_dir()?.join(after_tilde.trim_start_matches('/')));
    }

    let username_end = after_tilde.find('/').unwrap_or(after_tilde.len());
    let username = &after_tilde[..username_end];
    let rest = after_tilde[username_end..].trim_start_matches('/');

    let user = uzers::get_user_by_name(username)?;
    Some(user.home_dir().join(rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    #[serial]
    fn test_expand_tilde_current_user() {
        let original = env::var("HOME").ok();
        env::set_var("HOME", "/home/tester");

        assert_eq!(expand_tilde("~").unwrap(), PathBuf::from("/home/tester"));
        assert_eq!(
            expand_tilde("~/.aws/amazonq").unwrap(),
            PathBuf::from("/home/tester/.aws/amazonq")
        );

        match original {
            Some(home) => env::set_var("HOME", home),
            None => env::remove_var("HOME"),
        }
    }

    #[test]
    fn test_expand_tilde_nonexistent_user() {
        assert!(expand_tilde("~nonexistentuser12345/file").is_none());
    }

    #[test]
    fn test_expand_tilde_untouched() {
        assert_eq!(
            expand_tilde("relative/path").unwrap(),
            PathBuf::from("relative/path")
        );
        assert_eq!(
            expand_tilde("/path/~user/file").unwrap(),
            PathBuf::from("/path/~user/file")
        );
    }

    #[test]
    #[serial]
    fn test_home_dir_prefers_env() {
        let original = env::var("HOME").ok();
        env::set_var("HOME", "/tmp/somewhere");
        assert_eq!(home_dir(), Some(PathBuf::from("/tmp/somewhere")));
        match original {
            Some(home) => env::set_var("HOME", home),
            None => env::remove_var("HOME"),
        }
    }
}
