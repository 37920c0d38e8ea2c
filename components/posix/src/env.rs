//! Environment encoding for the host spawn call

use std::collections::BTreeMap;

use host_platform::HostValue;

/// Split `KEY=VALUE` strings into a mapping
///
/// Each string is split once, on the first `=`. A string without `=` maps to
/// an empty value. Later duplicates overwrite earlier ones.
pub fn split_env_pairs<S: AsRef<str>>(pairs: &[S]) -> BTreeMap<String, String> {
    let mut env = BTreeMap::new();
    for pair in pairs {
        let pair = pair.as_ref();
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        env.insert(key.to_string(), value.to_string());
    }
    env
}

/// Render an environment mapping as the host's `env` object
pub(crate) fn to_host_env(env: BTreeMap<String, String>) -> HostValue {
    HostValue::Object(
        env.into_iter()
            .map(|(key, value)| (key, HostValue::String(value)))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_split_env_pairs() {
        let env = split_env_pairs(&["A=1", "B=2", "NOEQ"]);
        assert_eq!(env, map(&[("A", "1"), ("B", "2"), ("NOEQ", "")]));
    }

    #[test]
    fn test_last_duplicate_wins() {
        assert_eq!(split_env_pairs(&["A=1", "A=2"]), map(&[("A", "2")]));
    }

    #[test]
    fn test_split_on_first_equals_only() {
        let env = split_env_pairs(&["OPTS=a=b=c", "=leading", "EMPTY="]);
        assert_eq!(env, map(&[("OPTS", "a=b=c"), ("", "leading"), ("EMPTY", "")]));
    }

    #[test]
    fn test_empty_input() {
        let none: [&str; 0] = [];
        assert!(split_env_pairs(&none).is_empty());
    }

    #[test]
    fn test_owned_strings() {
        let pairs = vec!["HOME=/home/me".to_string()];
        assert_eq!(split_env_pairs(&pairs), map(&[("HOME", "/home/me")]));
    }

    #[test]
    fn test_to_host_env() {
        let value = to_host_env(split_env_pairs(&["PATH=/bin", "X"]));
        assert_eq!(value, serde_json::json!({ "PATH": "/bin", "X": "" }));
    }
}
