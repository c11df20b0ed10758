/// base URL を読む環境変数
pub const BASE_URL_ENV: &str = "BASE_URL";

/// ルーターの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// アプリを配置するパス (例: "/", "/shop/")
    pub base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: "/".to_string(),
        }
    }
}

impl Config {
    /// 環境変数 `BASE_URL` から読む。未設定や空なら "/"
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意の取得関数から読む (テスト用に環境変数を差し替えられる)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(BASE_URL_ENV) {
            Some(base) if !base.trim().is_empty() => Config { base_url: base },
            _ => Config::default(),
        }
    }

    /// CLI などで指定された base URL で上書きする
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        if let Some(base) = base_url {
            self.base_url = base;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_blank_env_falls_back_to_root() {
        assert_eq!(Config::from_lookup(|_| None).base_url, "/");
        assert_eq!(Config::from_lookup(|_| Some("  ".to_string())).base_url, "/");
    }

    #[test]
    fn env_value_is_used_and_cli_overrides_it() {
        let config = Config::from_lookup(|key| {
            (key == BASE_URL_ENV).then(|| "/shop/".to_string())
        });
        assert_eq!(config.base_url, "/shop/");

        let config = config.with_base_url(Some("/admin".to_string()));
        assert_eq!(config.base_url, "/admin");

        assert_eq!(Config::default().with_base_url(None).base_url, "/");
    }
}
