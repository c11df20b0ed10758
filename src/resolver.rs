use std::collections::BTreeMap;

use crate::error::RouterError;
use crate::model::{Resolution, RouteDescriptor, RouteMatch};

/// `?query` と `#hash` を切り離したロケーション
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location<'a> {
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub hash: Option<&'a str>,
}

/// 生のロケーション文字列 (例: "/member?tab=2#top") を path / query / hash に分ける
pub fn split_location(raw: &str) -> Location<'_> {
    // hash は query より後ろに来るので先に切る
    let (rest, hash) = match raw.split_once('#') {
        Some((rest, hash)) => (rest, Some(hash)),
        None => (raw, None),
    };
    let (path, query) = match rest.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (rest, None),
    };
    Location { path, query, hash }
}

/// パスを正規化する
///
/// - 連続した `/` はひとつにまとめる
/// - 末尾の `/` は落とす (ルート "/" を除く)
/// - 先頭には必ず `/` を付ける
pub fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

/// 正規化済みのパスから base を取り除く
///
/// 戻り値:
/// - Some(path) → base 配下のパス (base 自身なら "/")
/// - None       → base の外側
pub fn strip_base(path: &str, base: &str) -> Option<String> {
    if base == "/" {
        return Some(path.to_string());
    }
    if path == base {
        return Some("/".to_string());
    }
    path.strip_prefix(base)
        .filter(|rest| rest.starts_with('/'))
        .map(str::to_string)
}

/// 1 つのパターンとパスを区間ごとに突き合わせ、一致すればパラメータを返す
///
/// 固定区間は ASCII の大文字小文字を区別しない ("/MEMBER" は "/member" に一致)。
fn match_pattern(pattern: &str, path: &str) -> Option<BTreeMap<String, String>> {
    let pattern_segments: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    let path_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if pattern_segments.len() != path_segments.len() {
        return None;
    }

    let mut params = BTreeMap::new();
    for (expected, actual) in pattern_segments.iter().zip(&path_segments) {
        match expected.strip_prefix(':') {
            Some(param) => {
                params.insert(param.to_string(), actual.to_string());
            }
            None if expected.eq_ignore_ascii_case(actual) => {}
            None => return None,
        }
    }
    Some(params)
}

/// base 配下の正規化済みパスをテーブルで引く。先に並んでいるルートが優先
pub fn resolve_path(routes: &[RouteDescriptor], path: &str) -> Option<RouteMatch> {
    routes.iter().find_map(|route| {
        match_pattern(route.path, path).map(|params| RouteMatch {
            route: route.clone(),
            path: path.to_string(),
            params,
            query: None,
            hash: None,
        })
    })
}

/// ロケーション (base を含む URL パス) をルートテーブルで解決する
///
/// - `routes`: ルートテーブル
/// - `base`: 正規化済みの base URL (例: "/", "/shop")
/// - `location`: 例: "/shop/member?tab=2#top"
///
/// 一致しない場合や base の外側の場合は `Resolution::NotFound` を返す。
pub fn resolve(routes: &[RouteDescriptor], base: &str, location: &str) -> Resolution {
    // 1) path / query / hash に分けて path を正規化
    let loc = split_location(location);
    let normalized = normalize_path(loc.path);

    // 2) base を取り除く。base の外側なら NotFound
    let Some(relative) = strip_base(&normalized, base) else {
        return Resolution::NotFound { path: normalized };
    };

    // 3) テーブルを上から順に突き合わせる
    match resolve_path(routes, &relative) {
        Some(mut matched) => {
            matched.query = loc.query.map(str::to_string);
            matched.hash = loc.hash.map(str::to_string);
            Resolution::Matched(matched)
        }
        None => Resolution::NotFound { path: relative },
    }
}

/// 名前付きルートのパスを組み立てる (base は含まない)
///
/// `:name` 区間は `params` の値で埋める。値が空か `/` を含む場合はエラー。
pub fn href_for(
    routes: &[RouteDescriptor],
    name: &str,
    params: &BTreeMap<String, String>,
) -> Result<String, RouterError> {
    let route = routes
        .iter()
        .find(|r| r.name == name)
        .ok_or_else(|| RouterError::UnknownRouteName(name.to_string()))?;

    let mut segments: Vec<&str> = Vec::new();
    for segment in route.path.split('/').filter(|s| !s.is_empty()) {
        match segment.strip_prefix(':') {
            Some(param) => {
                let value = params.get(param).ok_or_else(|| RouterError::MissingParameter {
                    route: route.name.to_string(),
                    param: param.to_string(),
                })?;
                if value.is_empty() || value.contains(['/', '?', '#']) {
                    return Err(RouterError::InvalidParam {
                        param: param.to_string(),
                        value: value.clone(),
                    });
                }
                segments.push(value);
            }
            None => segments.push(segment),
        }
    }
    Ok(normalize_path(&segments.join("/")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::View;

    fn table() -> Vec<RouteDescriptor> {
        vec![
            RouteDescriptor {
                path: "/",
                name: "Card",
                component: View::Card,
                props: true,
            },
            RouteDescriptor {
                path: "/member/:id",
                name: "Member",
                component: View::Member,
                props: true,
            },
            RouteDescriptor {
                path: "/sale",
                name: "Sale",
                component: View::Sale,
                props: false,
            },
        ]
    }

    #[test]
    fn split_location_separates_query_and_hash() {
        let loc = split_location("/member?tab=2#top");
        assert_eq!(loc.path, "/member");
        assert_eq!(loc.query, Some("tab=2"));
        assert_eq!(loc.hash, Some("top"));

        // hash 内の '?' は query ではない
        let loc = split_location("/sale#a?b");
        assert_eq!(loc.path, "/sale");
        assert_eq!(loc.query, None);
        assert_eq!(loc.hash, Some("a?b"));
    }

    #[test]
    fn normalize_path_collapses_and_trims_slashes() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("//"), "/");
        assert_eq!(normalize_path("member/"), "/member");
        assert_eq!(normalize_path("//member//1/"), "/member/1");
    }

    #[test]
    fn strip_base_only_accepts_whole_segments() {
        assert_eq!(strip_base("/shop/sale", "/shop").as_deref(), Some("/sale"));
        assert_eq!(strip_base("/shop", "/shop").as_deref(), Some("/"));
        assert_eq!(strip_base("/shopping", "/shop"), None);
        assert_eq!(strip_base("/other", "/shop"), None);
    }

    #[test]
    fn resolve_extracts_params_query_and_hash() {
        let resolution = resolve(&table(), "/", "/member/42?tab=points#top");
        let matched = resolution.matched().expect("should match Member");
        assert_eq!(matched.name(), "Member");
        assert_eq!(matched.params.get("id").map(String::as_str), Some("42"));
        assert_eq!(matched.query.as_deref(), Some("tab=points"));
        assert_eq!(matched.hash.as_deref(), Some("top"));
    }

    #[test]
    fn props_are_withheld_when_forwarding_is_off() {
        let resolution = resolve(&table(), "/", "/sale");
        assert!(resolution.matched().unwrap().props().is_none());
    }

    #[test]
    fn outside_base_is_not_found_with_full_path() {
        let resolution = resolve(&table(), "/shop", "/elsewhere/sale");
        assert_eq!(
            resolution,
            Resolution::NotFound {
                path: "/elsewhere/sale".to_string()
            }
        );
    }

    #[test]
    fn href_for_fills_params() {
        let mut params = BTreeMap::new();
        params.insert("id".to_string(), "7".to_string());
        assert_eq!(href_for(&table(), "Member", &params).unwrap(), "/member/7");
        assert_eq!(href_for(&table(), "Card", &BTreeMap::new()).unwrap(), "/");
    }

    #[test]
    fn href_for_reports_missing_and_invalid_params() {
        assert_eq!(
            href_for(&table(), "Member", &BTreeMap::new()),
            Err(RouterError::MissingParameter {
                route: "Member".to_string(),
                param: "id".to_string()
            })
        );

        let mut params = BTreeMap::new();
        params.insert("id".to_string(), "a/b".to_string());
        assert!(matches!(
            href_for(&table(), "Member", &params),
            Err(RouterError::InvalidParam { .. })
        ));

        assert_eq!(
            href_for(&table(), "Nope", &BTreeMap::new()),
            Err(RouterError::UnknownRouteName("Nope".to_string()))
        );
    }
}
