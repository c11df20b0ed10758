// src/model.rs
use serde::Serialize;
use std::collections::BTreeMap;

/// ルートが描画する画面コンポーネント
///
/// 画面はビルド時に確定する閉じた集合なので、文字列ではなく enum で持つ。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum View {
    Card,
    Member,
    Sale,
}

impl View {
    /// コンポーネント名 (例: "CardView")
    pub fn component_name(self) -> &'static str {
        match self {
            View::Card => "CardView",
            View::Member => "MemberView",
            View::Sale => "SaleView",
        }
    }
}

/// ルートテーブルの 1 行分
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteDescriptor {
    /// URL パターン (例: "/", "/member")。`:id` のようなパラメータ区間も書ける
    pub path: &'static str,

    /// 名前付きナビゲーション用の識別子
    pub name: &'static str,

    /// 解決先の画面
    pub component: View,

    /// true ならルートパラメータを画面の入力プロパティとして渡す
    pub props: bool,
}

/// パスがルートに一致したときの結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteMatch {
    /// 一致したルート定義
    pub route: RouteDescriptor,

    /// base を取り除いて正規化したパス
    pub path: String,

    /// `:name` 区間から取り出した値
    pub params: BTreeMap<String, String>,

    /// `?` 以降 (`?` は含まない)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,

    /// `#` 以降 (`#` は含まない)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

impl RouteMatch {
    pub fn name(&self) -> &'static str {
        self.route.name
    }

    pub fn view(&self) -> View {
        self.route.component
    }

    /// 画面に渡す入力プロパティ。props が無効なルートでは None
    pub fn props(&self) -> Option<&BTreeMap<String, String>> {
        self.route.props.then_some(&self.params)
    }
}

/// ルート解決の結果
///
/// テーブルに無いパスはエラーではなく `NotFound` という状態として扱う。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resolution {
    Matched(RouteMatch),
    NotFound { path: String },
}

impl Resolution {
    pub fn matched(&self) -> Option<&RouteMatch> {
        match self {
            Resolution::Matched(m) => Some(m),
            Resolution::NotFound { .. } => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Resolution::NotFound { .. })
    }

    pub fn name(&self) -> Option<&'static str> {
        self.matched().map(RouteMatch::name)
    }

    pub fn view(&self) -> Option<View> {
        self.matched().map(RouteMatch::view)
    }

    /// 正規化済みのパス (一致・不一致どちらでも)
    pub fn path(&self) -> &str {
        match self {
            Resolution::Matched(m) => &m.path,
            Resolution::NotFound { path } => path,
        }
    }
}
