// src/routes.rs
use crate::error::RouterError;
use crate::history::WebHistory;
use crate::model::{RouteDescriptor, View};
use crate::router::Router;

/// アプリのルートテーブル (上から順に照合される)
///
/// | path      | name   | props |
/// |-----------|--------|-------|
/// | `/`       | Card   | yes   |
/// | `/member` | Member | yes   |
/// | `/sale`   | Sale   | yes   |
pub fn routes() -> Vec<RouteDescriptor> {
    vec![
        RouteDescriptor {
            path: "/",
            name: "Card",
            component: View::Card,
            props: true,
        },
        RouteDescriptor {
            path: "/member",
            name: "Member",
            component: View::Member,
            props: true,
        },
        RouteDescriptor {
            path: "/sale",
            name: "Sale",
            component: View::Sale,
            props: true,
        },
    ]
}

/// base URL を起点にした履歴を作る
pub fn create_web_history(base: &str) -> Result<WebHistory, RouterError> {
    WebHistory::new(base)
}

/// アプリのルーターを作る
///
/// グローバルには置かず、起動処理で作って必要なところへ渡すこと。
pub fn create_router(history: WebHistory) -> Result<Router, RouterError> {
    Router::with_routes(routes(), history)
}
