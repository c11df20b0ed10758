// src/main.rs

use clap::{Parser, Subcommand};
use serde_json::json;
use std::collections::BTreeMap;
use tracing_subscriber::EnvFilter;

use card_router::{Config, create_router, create_web_history};

/// CLI 引数定義
#[derive(Parser, Debug)]
#[command(
    name = "card-router",
    version = "0.1.0",
    about = "カード / 会員 / セールの 3 画面のルートテーブルを解決して JSON 出力する CLI ツール"
)]
struct Cli {
    /// アプリを配置する base URL (未指定なら環境変数 BASE_URL、それも無ければ "/")
    #[arg(short = 'b', long = "base", value_name = "URL", global = true)]
    base: Option<String>,

    /// debug ログを出す (RUST_LOG が設定されていればそちらが優先)
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// ルートテーブルを出力する
    Table,

    /// ロケーション (base 付き URL パス) を解決する
    /// 例: `resolve /shop/member "/shop/sale?from=top"`
    Resolve {
        #[arg(value_name = "LOCATION", required = true)]
        locations: Vec<String>,
    },

    /// 名前付きルートの URL と解決結果を出力する
    Name {
        name: String,

        /// ルートパラメータ (key=value、複数指定可)
        #[arg(short = 'p', long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("key=value の形式で指定してください: {}", raw))
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1) CLI 引数をパースし、ログを初期化
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // 2) 環境変数 → CLI の順に base URL を決める
    let config = Config::from_env().with_base_url(cli.base);

    // 3) 履歴とルーターをここで作り、以降は参照で渡す
    let history = create_web_history(&config.base_url)?;
    let mut router = create_router(history)?;

    // 4) サブコマンドごとに JSON を標準出力へ
    let mut unmatched = false;
    let output = match cli.command {
        Command::Table => json!({
            "base": router.history().base(),
            "routes": router.routes(),
        }),
        Command::Resolve { locations } => {
            let mut results = Vec::new();
            for location in &locations {
                let resolution = router.open_url(location);
                unmatched |= resolution.is_not_found();
                results.push(json!({ "location": location, "resolution": resolution }));
            }
            json!(results)
        }
        Command::Name { name, params } => {
            let params: BTreeMap<String, String> = params.into_iter().collect();
            let href = router.href_for(&name, &params)?;
            let resolution = router.navigate_to_name(&name, &params)?;
            unmatched |= resolution.is_not_found();
            json!({ "name": name, "href": href, "resolution": resolution })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);

    // 一致しないロケーションがあれば終了コード 1
    if unmatched {
        eprintln!("Error: 一致するルートがないロケーションがありました。");
        std::process::exit(1);
    }

    Ok(())
}
