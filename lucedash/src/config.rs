//! Where the metrics database lives by default.
//! $XDG_CONFIG_HOME/luced/database.sqlite (fallback ~/.config/luced/database.sqlite)

use std::path::PathBuf;

pub const DB_ENV: &str = "LUCEDASH_DB";
pub const PORT_ENV: &str = "LUCEDASH_PORT";
pub const DEFAULT_PORT: u16 = 8050;
pub const DEFAULT_BIND: &str = "127.0.0.1";

pub fn config_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("luced")
    } else {
        dirs_next::home_dir()
            .map(|h| h.join(".config"))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("luced")
    }
}

pub fn default_db_path() -> PathBuf {
    config_dir().join("database.sqlite")
}

/// Explicit path first, then $LUCEDASH_DB, then the config dir default.
pub fn resolve_db_path(explicit: Option<&str>) -> PathBuf {
    if let Some(p) = explicit.filter(|p| !p.is_empty()) {
        return PathBuf::from(p);
    }
    match std::env::var(DB_ENV) {
        Ok(v) if !v.is_empty() => PathBuf::from(v),
        _ => default_db_path(),
    }
}

/// Explicit port first, then $LUCEDASH_PORT, then 8050. Unparseable values are skipped.
pub fn resolve_port(explicit: Option<&str>) -> u16 {
    explicit
        .and_then(|s| s.parse::<u16>().ok())
        .or_else(|| {
            std::env::var(PORT_ENV)
                .ok()
                .and_then(|s| s.parse::<u16>().ok())
        })
        .unwrap_or(DEFAULT_PORT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_values_win() {
        assert_eq!(
            resolve_db_path(Some("/srv/metrics.sqlite")),
            PathBuf::from("/srv/metrics.sqlite")
        );
        assert_eq!(resolve_port(Some("9100")), 9100);
    }

    #[test]
    fn default_path_ends_in_luced_dir() {
        assert!(default_db_path().ends_with("luced/database.sqlite"));
    }
}
