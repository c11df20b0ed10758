use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::error::RouterError;
use crate::history::{ListenerId, WebHistory};
use crate::model::{Resolution, RouteDescriptor};
use crate::resolver;

/// ルートテーブルと履歴を束ねたルーター
///
/// テーブルは生成時に固定され、以後変更されない。
/// 履歴の pop (back / forward / 外部からの URL) はリスナー経由で現在のルートに反映される。
#[derive(Debug)]
pub struct Router {
    routes: Rc<[RouteDescriptor]>,
    history: WebHistory,
    current: Rc<RefCell<Resolution>>,
    listener: ListenerId,
}

/// パスと名前がそれぞれテーブル内で一意かを確かめる
///
/// パスは大文字小文字を区別せずに照合されるので、比較も小文字で行う。
pub fn validate_routes(routes: &[RouteDescriptor]) -> Result<(), RouterError> {
    let mut paths = HashSet::new();
    let mut names = HashSet::new();
    for route in routes {
        if !paths.insert(resolver::normalize_path(route.path).to_ascii_lowercase()) {
            return Err(RouterError::DuplicatePath(route.path.to_string()));
        }
        if !names.insert(route.name) {
            return Err(RouterError::DuplicateName(route.name.to_string()));
        }
    }
    Ok(())
}

impl Router {
    /// 任意のテーブルでルーターを作る
    pub fn with_routes(
        routes: Vec<RouteDescriptor>,
        mut history: WebHistory,
    ) -> Result<Self, RouterError> {
        // 1) テーブルの一意性チェック
        validate_routes(&routes)?;
        let routes: Rc<[RouteDescriptor]> = routes.into();

        // 2) 履歴の現在位置から初期ルートを解決
        let initial = resolver::resolve(&routes, history.base(), history.location());
        let current = Rc::new(RefCell::new(initial));

        // 3) pop のたびに現在のルートを解決し直すリスナーを登録
        let listener = {
            let routes = Rc::clone(&routes);
            let current = Rc::clone(&current);
            let base = history.base().to_string();
            history.listen(move |url| {
                let resolution = resolver::resolve(&routes, &base, url);
                log_resolution(url, &resolution);
                *current.borrow_mut() = resolution;
            })
        };

        info!(
            base = %history.base(),
            routes = routes.len(),
            "router created"
        );

        Ok(Router {
            routes,
            history,
            current,
            listener,
        })
    }

    pub fn routes(&self) -> &[RouteDescriptor] {
        &self.routes
    }

    pub fn history(&self) -> &WebHistory {
        &self.history
    }

    /// 現在のルート
    pub fn current(&self) -> Resolution {
        self.current.borrow().clone()
    }

    /// アプリ内のパス (base なし) を解決する。履歴は変えない
    pub fn resolve(&self, path: &str) -> Resolution {
        resolver::resolve(&self.routes, "/", path)
    }

    /// 名前付きルートを解決する。履歴は変えない
    pub fn resolve_name(
        &self,
        name: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<Resolution, RouterError> {
        let path = resolver::href_for(&self.routes, name, params)?;
        Ok(self.resolve(&path))
    }

    /// 名前付きルートの base 付き URL
    pub fn href_for(
        &self,
        name: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<String, RouterError> {
        let path = resolver::href_for(&self.routes, name, params)?;
        Ok(self.history.href(&path))
    }

    /// パスへ遷移する。テーブルに無いパスも履歴には積み、`NotFound` を返す
    ///
    /// 遷移先が現在のロケーション (path / query / hash) と同じなら履歴は積まない。
    pub fn navigate_to_path(&mut self, path: &str) -> Resolution {
        let href = self.history.href(path);
        let target = resolver::resolve(&self.routes, self.history.base(), &href);
        let current = self.current();
        if target == current {
            debug!(
                location = %self.history.location(),
                "navigation to current location skipped"
            );
            return current;
        }
        self.history.push(path);
        self.refresh()
    }

    /// 名前で遷移する。名前やパラメータが不正なら履歴は変えずにエラーを返す
    pub fn navigate_to_name(
        &mut self,
        name: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<Resolution, RouterError> {
        let path = resolver::href_for(&self.routes, name, params)?;
        Ok(self.navigate_to_path(&path))
    }

    /// 現在の履歴エントリを置き換えて遷移する
    pub fn replace(&mut self, path: &str) -> Resolution {
        self.history.replace(path);
        self.refresh()
    }

    /// 外部から URL (base 付き) が開かれたときの遷移
    pub fn open_url(&mut self, url: &str) -> Resolution {
        self.history.open(url);
        self.current()
    }

    /// 履歴を移動する。移動できなければ None
    pub fn go(&mut self, delta: isize) -> Option<Resolution> {
        self.history.go(delta).map(|_| self.current())
    }

    pub fn back(&mut self) -> Option<Resolution> {
        self.go(-1)
    }

    pub fn forward(&mut self) -> Option<Resolution> {
        self.go(1)
    }

    /// ルーターを破棄してリスナーを外した履歴を返す
    pub fn into_history(mut self) -> WebHistory {
        self.history.unlisten(self.listener);
        debug!("router detached from history");
        self.history
    }

    fn refresh(&self) -> Resolution {
        let location = self.history.location();
        let resolution = resolver::resolve(&self.routes, self.history.base(), location);
        log_resolution(location, &resolution);
        *self.current.borrow_mut() = resolution.clone();
        resolution
    }
}

fn log_resolution(location: &str, resolution: &Resolution) {
    match resolution {
        Resolution::Matched(m) => {
            debug!(location, route = m.name(), view = ?m.view(), "route resolved")
        }
        Resolution::NotFound { path } => warn!(location, path = %path, "no route matched"),
    }
}
