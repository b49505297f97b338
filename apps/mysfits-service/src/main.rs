//! # Mysfits Service サーバー
//!
//! Mythical Mysfits の静的サイトから呼び出される JSON API サーバー。
//!
//! ## 役割
//!
//! - **閲覧**: Mysfit の一覧・絞り込み・1 件取得
//! - **更新**: いいね数の加算、里親決定
//! - **ヘルスチェック**: `GET /` で固定メッセージを返す
//!
//! レコードの読み書きはすべて `MysfitRepository` に委譲する。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `MYSFITS_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `MYSFITS_PORT` | No | ポート番号（デフォルト: `8080`） |
//! | `MYSFITS_STORE_BACKEND` | No | `dynamodb` または `memory`（デフォルト: `dynamodb`） |
//! | `MYSFITS_TABLE_NAME` | No | DynamoDB テーブル名（デフォルト: `MysfitsTable`） |
//! | `DYNAMODB_ENDPOINT` | No | DynamoDB Local のエンドポイント |
//! | `AWS_REGION` | No | AWS リージョン（デフォルト: `us-east-1`） |
//! | `MYSFITS_BOOTSTRAP_TABLE` | No | 起動時にテーブルを作成し ACTIVE を待って空ならシード投入する（デフォルト: `false`） |
//! | `LOG_FORMAT` | No | `json` または `pretty`（デフォルト: `pretty`） |
//! | `RUST_LOG` | No | ログレベル（デフォルト: `info,mysfits=debug`） |
//!
//! ## 起動方法
//!
//! ```bash
//! # インメモリストアで起動
//! MYSFITS_STORE_BACKEND=memory cargo run -p mysfits-service
//!
//! # DynamoDB Local で起動（テーブルが無ければ作成し、空ならシード投入）
//! DYNAMODB_ENDPOINT=http://localhost:8000 MYSFITS_BOOTSTRAP_TABLE=true \
//!     cargo run -p mysfits-service
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use mysfits_infra::{
    MysfitRepository,
    dynamodb::{self, WaitConfig},
    repository::{DynamoDbMysfitRepository, InMemoryMysfitRepository},
    seed,
};
use mysfits_service::{
    app_builder::build_app,
    config::{MysfitsConfig, StoreBackend},
    handler::MysfitState,
};
use mysfits_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

/// Mysfits Service サーバーのエントリーポイント
///
/// 以下の順序で初期化を行う:
///
/// 1. 環境変数の読み込み（.env ファイル）
/// 2. トレーシングの初期化
/// 3. アプリケーション設定の読み込み
/// 4. レコードストアの初期化
/// 5. HTTP サーバーの起動
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    // トレーシング初期化
    init_tracing(TracingConfig::from_env("mysfits-service"));
    let _tracing_guard = tracing::info_span!("app", service = "mysfits-service").entered();

    // 設定読み込み
    let config = MysfitsConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!(
        "Mysfits Service サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    let repository = create_repository(&config).await?;
    let app = build_app(Arc::new(MysfitState { repository }));

    // サーバー起動
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("バインドアドレスが不正です")?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("{addr} へのバインドに失敗しました"))?;

    tracing::info!("Mysfits Service サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// 設定に応じたレコードストアを作成する
async fn create_repository(config: &MysfitsConfig) -> anyhow::Result<Arc<dyn MysfitRepository>> {
    match config.store_backend {
        StoreBackend::Memory => {
            let repository = InMemoryMysfitRepository::with_seed_data()
                .context("シードデータの読み込みに失敗しました")?;
            tracing::warn!("インメモリストアを使用します（再起動でデータは失われます）");
            Ok(Arc::new(repository))
        }
        StoreBackend::DynamoDb => {
            let client = dynamodb::create_client(
                config.dynamodb_endpoint.as_deref(),
                &config.aws_region,
            )
            .await;

            if config.bootstrap_table {
                let mysfits =
                    seed::load_seed_mysfits().context("シードデータの読み込みに失敗しました")?;
                dynamodb::bootstrap_mysfits_table(
                    &client,
                    &config.table_name,
                    &mysfits,
                    WaitConfig::default(),
                )
                .await
                .context("テーブルの準備に失敗しました")?;
            }

            tracing::info!(
                table_name = %config.table_name,
                endpoint = ?config.dynamodb_endpoint,
                "DynamoDB ストアを使用します"
            );
            Ok(Arc::new(DynamoDbMysfitRepository::new(
                client,
                config.table_name.clone(),
            )))
        }
    }
}
