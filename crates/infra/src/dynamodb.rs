//! # DynamoDB 接続管理
//!
//! Amazon DynamoDB への接続と Mysfit テーブルの準備を行う。
//!
//! ## 設計方針
//!
//! - **ローカル開発**: DynamoDB Local を使用（エンドポイントを明示）
//! - **本番環境**: デフォルトの認証情報チェーン（IAM ロール等）で Amazon DynamoDB に接続
//! - **テーブル自動作成**: `MYSFITS_BOOTSTRAP_TABLE` 有効時、起動時にテーブルが
//!   存在しなければ作成し、ACTIVE になるのを待ってから空のテーブルにだけ
//!   シードデータを投入する（冪等）
//!
//! ## テーブルスキーマ
//!
//! | 種別 | 名前 | キー |
//! |------|------|------|
//! | テーブル | `MysfitsTable` | HASH: `MysfitId` |
//! | GSI | `GoodEvilIndex` | HASH: `GoodEvil`, RANGE: `MysfitId` |
//! | GSI | `LawChaosIndex` | HASH: `LawChaos`, RANGE: `MysfitId` |

use std::time::Duration;

use aws_sdk_dynamodb::{
    Client,
    error::DisplayErrorContext,
    types::{
        AttributeDefinition,
        BillingMode,
        GlobalSecondaryIndex,
        IndexStatus,
        KeySchemaElement,
        KeyType,
        Projection,
        ProjectionType,
        ScalarAttributeType,
        TableDescription,
        TableStatus as SdkTableStatus,
    },
};
use mysfits_domain::mysfit::Mysfit;

use crate::{InfraError, repository::mysfit_repository::convert_mysfit_to_item};

/// フィルタ検索用のセカンダリインデックスを張る属性
const INDEXED_ATTRIBUTES: [&str; 2] = ["GoodEvil", "LawChaos"];

/// テーブルが ACTIVE になるまでの待機設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitConfig {
    /// DescribeTable のポーリング間隔
    pub interval:     Duration,
    /// ポーリング回数の上限
    pub max_attempts: u32,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            interval:     Duration::from_secs(2),
            max_attempts: 60,
        }
    }
}

/// テーブル作成の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStatus {
    /// 今回作成した
    Created,
    /// 既に存在していた（作成中を含む）
    AlreadyExists,
}

/// DynamoDB クライアントを作成する
///
/// `endpoint` を指定した場合は DynamoDB Local 用のクライアントを作成し、
/// ダミーの認証情報を使用する（DynamoDB Local は認証情報を検証しない）。
/// 未指定の場合は AWS のデフォルト設定チェーンに従う。
///
/// # 引数
///
/// * `endpoint` - DynamoDB エンドポイント URL（例: `http://localhost:8000`）
/// * `region` - AWS リージョン（例: `us-east-1`）
pub async fn create_client(endpoint: Option<&str>, region: &str) -> Client {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_string()));

    if let Some(endpoint) = endpoint {
        loader = loader
            .endpoint_url(endpoint)
            // DynamoDB Local はクレデンシャルを検証しないが、SDK はプロバイダが必要
            .credentials_provider(aws_sdk_dynamodb::config::Credentials::new(
                "local", "local", None, None, "local",
            ));
    }

    Client::new(&loader.load().await)
}

/// Mysfit テーブルが存在しなければ作成する（冪等）
///
/// # 引数
///
/// * `client` - DynamoDB クライアント
/// * `table_name` - テーブル名
pub async fn ensure_mysfits_table(
    client: &Client,
    table_name: &str,
) -> Result<TableStatus, InfraError> {
    // テーブルの存在確認
    match client.describe_table().table_name(table_name).send().await {
        Ok(_) => {
            tracing::debug!("テーブル '{}' は既に存在します", table_name);
            return Ok(TableStatus::AlreadyExists);
        }
        Err(err) => {
            // ResourceNotFoundException の場合のみテーブル作成に進む
            let is_not_found = err
                .as_service_error()
                .is_some_and(|e| e.is_resource_not_found_exception());
            if !is_not_found {
                return Err(InfraError::dynamo_db(format!(
                    "テーブル '{}' の確認に失敗: {}",
                    table_name,
                    DisplayErrorContext(&err)
                )));
            }
        }
    }

    tracing::info!("テーブル '{}' を作成します", table_name);

    let mut request = client
        .create_table()
        .table_name(table_name)
        .key_schema(key_schema("MysfitId", KeyType::Hash)?)
        .attribute_definitions(string_attribute("MysfitId")?)
        .billing_mode(BillingMode::PayPerRequest);

    for attribute in INDEXED_ATTRIBUTES {
        request = request
            .attribute_definitions(string_attribute(attribute)?)
            .global_secondary_indexes(
                GlobalSecondaryIndex::builder()
                    .index_name(format!("{attribute}Index"))
                    .key_schema(key_schema(attribute, KeyType::Hash)?)
                    .key_schema(key_schema("MysfitId", KeyType::Range)?)
                    .projection(
                        Projection::builder()
                            .projection_type(ProjectionType::All)
                            .build(),
                    )
                    .build()
                    .map_err(|e| InfraError::dynamo_db(format!("GSI 構築エラー: {e}")))?,
            );
    }

    match request.send().await {
        Ok(_) => {
            tracing::info!("テーブル '{}' を作成しました", table_name);
            Ok(TableStatus::Created)
        }
        Err(err) => {
            // ResourceInUseException は並行呼び出し時に発生しうる（テーブルが作成中）
            // この場合は冪等として成功扱いにする
            let is_resource_in_use = err
                .as_service_error()
                .is_some_and(|e| e.is_resource_in_use_exception());
            if !is_resource_in_use {
                return Err(InfraError::dynamo_db(format!(
                    "テーブル '{}' の作成に失敗: {}",
                    table_name,
                    DisplayErrorContext(&err)
                )));
            }
            tracing::debug!(
                "テーブル '{}' は既に作成中または存在します（ResourceInUseException）",
                table_name
            );
            Ok(TableStatus::AlreadyExists)
        }
    }
}

/// テーブルとすべての GSI が ACTIVE か
///
/// CreateTable 直後は `CREATING` のため、この間の PutItem は
/// ResourceNotFoundException になる。
pub fn is_table_ready(table: &TableDescription) -> bool {
    table.table_status() == Some(&SdkTableStatus::Active)
        && table
            .global_secondary_indexes()
            .iter()
            .all(|gsi| gsi.index_status() == Some(&IndexStatus::Active))
}

/// テーブルが ACTIVE になるまで DescribeTable をポーリングする
pub async fn wait_until_table_active(
    client: &Client,
    table_name: &str,
    config: WaitConfig,
) -> Result<(), InfraError> {
    for attempt in 1..=config.max_attempts {
        let output = client
            .describe_table()
            .table_name(table_name)
            .send()
            .await
            .map_err(|e| {
                InfraError::dynamo_db(format!(
                    "テーブル '{}' の状態確認に失敗: {}",
                    table_name,
                    DisplayErrorContext(&e)
                ))
            })?;

        if output.table().is_some_and(is_table_ready) {
            tracing::debug!("テーブル '{}' が ACTIVE になりました", table_name);
            return Ok(());
        }

        tracing::debug!(
            attempt,
            "テーブル '{}' の作成完了を待機しています",
            table_name
        );
        tokio::time::sleep(config.interval).await;
    }

    Err(InfraError::dynamo_db(format!(
        "テーブル '{}' が {} 回の確認で ACTIVE になりませんでした",
        table_name, config.max_attempts
    )))
}

/// テーブルにアイテムが 1 件も無いか
pub async fn is_table_empty(client: &Client, table_name: &str) -> Result<bool, InfraError> {
    let output = client
        .scan()
        .table_name(table_name)
        .limit(1)
        .send()
        .await
        .map_err(|e| {
            InfraError::dynamo_db(format!(
                "テーブル '{}' の件数確認に失敗: {}",
                table_name,
                DisplayErrorContext(&e)
            ))
        })?;

    Ok(output.items().is_empty())
}

/// テーブルを準備し、空であればシードデータを投入する
///
/// 1. テーブルが無ければ作成する
/// 2. テーブルと GSI が ACTIVE になるまで待つ
/// 3. アイテムが無ければ `mysfits` を投入する
///
/// 投入済みのテーブルには触れないため、再起動しても既存データは上書きされない。
/// 作成直後に投入が失敗した場合も、次回起動時に再投入される。
/// 投入した件数を返す。
pub async fn bootstrap_mysfits_table(
    client: &Client,
    table_name: &str,
    mysfits: &[Mysfit],
    wait: WaitConfig,
) -> Result<usize, InfraError> {
    ensure_mysfits_table(client, table_name).await?;
    wait_until_table_active(client, table_name, wait).await?;

    if !is_table_empty(client, table_name).await? {
        tracing::info!("テーブル '{}' は投入済みのためシードを省略します", table_name);
        return Ok(0);
    }

    seed_mysfits_table(client, table_name, mysfits).await
}

/// Mysfit をテーブルに投入する
///
/// 同じ `MysfitId` のアイテムは上書きされる。投入件数を返す。
pub async fn seed_mysfits_table(
    client: &Client,
    table_name: &str,
    mysfits: &[Mysfit],
) -> Result<usize, InfraError> {
    for mysfit in mysfits {
        client
            .put_item()
            .table_name(table_name)
            .set_item(Some(convert_mysfit_to_item(mysfit)))
            .send()
            .await
            .map_err(|e| {
                InfraError::dynamo_db(format!(
                    "Mysfit '{}' の投入に失敗: {}",
                    mysfit.mysfit_id,
                    DisplayErrorContext(&e)
                ))
            })?;
    }

    tracing::info!(
        "テーブル '{}' に {} 件の Mysfit を投入しました",
        table_name,
        mysfits.len()
    );

    Ok(mysfits.len())
}

fn key_schema(attribute: &str, key_type: KeyType) -> Result<KeySchemaElement, InfraError> {
    KeySchemaElement::builder()
        .attribute_name(attribute)
        .key_type(key_type)
        .build()
        .map_err(|e| InfraError::dynamo_db(format!("KeySchema 構築エラー: {e}")))
}

fn string_attribute(attribute: &str) -> Result<AttributeDefinition, InfraError> {
    AttributeDefinition::builder()
        .attribute_name(attribute)
        .attribute_type(ScalarAttributeType::S)
        .build()
        .map_err(|e| InfraError::dynamo_db(format!("AttributeDefinition 構築エラー: {e}")))
}

#[cfg(test)]
mod tests {
    use aws_sdk_dynamodb::types::GlobalSecondaryIndexDescription;
    use rstest::rstest;

    use super::*;

    fn table(status: SdkTableStatus, index_statuses: &[IndexStatus]) -> TableDescription {
        TableDescription::builder()
            .table_status(status)
            .set_global_secondary_indexes(Some(
                index_statuses
                    .iter()
                    .map(|s| {
                        GlobalSecondaryIndexDescription::builder()
                            .index_status(s.clone())
                            .build()
                    })
                    .collect(),
            ))
            .build()
    }

    #[rstest]
    #[case(SdkTableStatus::Active, &[IndexStatus::Active, IndexStatus::Active], true)]
    #[case(SdkTableStatus::Active, &[], true)]
    #[case(SdkTableStatus::Creating, &[IndexStatus::Creating, IndexStatus::Creating], false)]
    #[case(SdkTableStatus::Active, &[IndexStatus::Active, IndexStatus::Creating], false)]
    #[case(SdkTableStatus::Updating, &[IndexStatus::Active], false)]
    fn test_テーブルとgsiが全てactiveの場合のみ準備完了(
        #[case] status: SdkTableStatus,
        #[case] index_statuses: &[IndexStatus],
        #[case] expected: bool,
    ) {
        assert_eq!(is_table_ready(&table(status, index_statuses)), expected);
    }

    #[test]
    fn test_状態が不明なテーブルは準備未完了() {
        assert!(!is_table_ready(&TableDescription::builder().build()));
    }
}
