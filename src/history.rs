use tracing::debug;

use crate::error::RouterError;
use crate::resolver::normalize_path;

/// `listen` が返すリスナーの識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

type Listener = Box<dyn FnMut(&str)>;

/// ブラウザのセッション履歴を模した履歴スタック
///
/// エントリは base を含んだ URL パス (例: "/shop/member?tab=2") で保持する。
/// `push` / `replace` はリスナーに通知しない (pushState / replaceState と同じ)。
/// `go` / `back` / `forward` / `open` は移動後のロケーションをリスナーに通知する。
pub struct WebHistory {
    base: String,
    entries: Vec<String>,
    position: usize,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: usize,
}

impl std::fmt::Debug for WebHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebHistory")
            .field("base", &self.base)
            .field("entries", &self.entries)
            .field("position", &self.position)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// base URL を正規化する
///
/// - "" / "." / "./" は "/" とみなす (ビルド設定の既定値)
/// - スキーム付きの絶対 URL、`?` や `#` を含むものは受け付けない
pub fn normalize_base(base: &str) -> Result<String, RouterError> {
    let trimmed = base.trim();
    if matches!(trimmed, "" | "." | "./") {
        return Ok("/".to_string());
    }
    if trimmed.contains("://") {
        return Err(RouterError::InvalidBase {
            base: base.to_string(),
            reason: "スキーム付きの URL は指定できません",
        });
    }
    if trimmed.contains(['?', '#']) {
        return Err(RouterError::InvalidBase {
            base: base.to_string(),
            reason: "query や hash は含められません",
        });
    }
    Ok(normalize_path(trimmed))
}

impl WebHistory {
    /// base URL を起点にした履歴を作る。最初のエントリは base のルート
    pub fn new(base: &str) -> Result<Self, RouterError> {
        let base = normalize_base(base)?;
        let start = Self::join(&base, "/");
        Ok(WebHistory {
            base,
            entries: vec![start],
            position: 0,
            listeners: Vec::new(),
            next_listener: 0,
        })
    }

    fn join(base: &str, path: &str) -> String {
        let prefix = if base == "/" { "" } else { base };
        if path.starts_with('/') {
            format!("{}{}", prefix, path)
        } else {
            format!("{}/{}", prefix, path)
        }
    }

    /// 正規化済みの base URL
    pub fn base(&self) -> &str {
        &self.base
    }

    /// アプリ内のパスから base 付きの URL を作る
    pub fn href(&self, path: &str) -> String {
        Self::join(&self.base, path)
    }

    /// 現在のロケーション (base 付き)
    pub fn location(&self) -> &str {
        &self.entries[self.position]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// 新しいエントリを積む。現在位置より先のエントリは捨てる
    pub fn push(&mut self, path: &str) {
        let url = self.href(path);
        self.entries.truncate(self.position + 1);
        self.entries.push(url);
        self.position = self.entries.len() - 1;
        debug!(location = %self.location(), position = self.position, "history push");
    }

    /// 現在のエントリを書き換える
    pub fn replace(&mut self, path: &str) {
        let url = self.href(path);
        self.entries[self.position] = url;
        debug!(location = %self.location(), position = self.position, "history replace");
    }

    /// 履歴を `delta` だけ移動してリスナーに通知する
    ///
    /// 範囲外への移動や `delta == 0` では何もせず None を返す。
    pub fn go(&mut self, delta: isize) -> Option<String> {
        if delta == 0 {
            return None;
        }
        let target = self.position.checked_add_signed(delta)?;
        if target >= self.entries.len() {
            return None;
        }
        self.position = target;
        let url = self.entries[target].clone();
        debug!(location = %url, position = target, "history pop");
        self.notify(&url);
        Some(url)
    }

    pub fn back(&mut self) -> Option<String> {
        self.go(-1)
    }

    pub fn forward(&mut self) -> Option<String> {
        self.go(1)
    }

    /// 外部から URL が直接開かれた (リンクやアドレスバー) ときの遷移
    ///
    /// `url` は base を含んだそのままのパスとして積み、リスナーに通知する。
    pub fn open(&mut self, url: &str) {
        self.entries.truncate(self.position + 1);
        self.entries.push(url.to_string());
        self.position = self.entries.len() - 1;
        debug!(location = %url, position = self.position, "history open");
        self.notify(url);
    }

    /// ロケーションが外部要因で変わったときに呼ばれるリスナーを登録する
    pub fn listen<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&str) + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// リスナーを外す。登録されていれば true
    pub fn unlisten(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(registered, _)| *registered != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, url: &str) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(url);
        }
    }
}
