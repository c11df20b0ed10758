use thiserror::Error;

/// ルーター操作のエラー
///
/// テーブルに無いパスへの遷移はここには含めない (`Resolution::NotFound` になる)。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    #[error("ルートのパスが重複しています: {0}")]
    DuplicatePath(String),

    #[error("ルート名が重複しています: {0}")]
    DuplicateName(String),

    #[error("名前 {0:?} のルートはありません")]
    UnknownRouteName(String),

    #[error("ルート {route:?} にはパラメータ {param:?} が必要です")]
    MissingParameter { route: String, param: String },

    #[error("パラメータ {param:?} の値 {value:?} は使えません")]
    InvalidParam { param: String, value: String },

    #[error("base URL {base:?} は使えません: {reason}")]
    InvalidBase { base: String, reason: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_offending_values() {
        let err = RouterError::MissingParameter {
            route: "Member".to_string(),
            param: "id".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("\"Member\""));
        assert!(msg.contains("\"id\""));

        assert_eq!(
            RouterError::DuplicatePath("/sale".to_string()).to_string(),
            "ルートのパスが重複しています: /sale"
        );
    }
}
