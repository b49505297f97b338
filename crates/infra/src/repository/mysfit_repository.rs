//! # MysfitRepository
//!
//! Mysfit テーブル（レコードストア）の契約と DynamoDB 実装。
//!
//! ## 設計方針
//!
//! - **シリアライズ済みで返す**: 各操作はそのままレスポンスボディにできる
//!   [`JsonPayload`] を返す。HTTP 層はペイロードをパースしない
//! - **DynamoDB**: PK = `MysfitId`。フィルタ検索は `{項目名}Index` という
//!   名前のグローバルセカンダリインデックスで行う
//! - **更新の原子性**: いいね数の加算は `UpdateItem` の式で行い、
//!   同時更新の整合性は DynamoDB に任せる

use std::{collections::HashMap, str::FromStr};

use async_trait::async_trait;
use aws_sdk_dynamodb::{
    Client,
    error::{DisplayErrorContext, ProvideErrorMetadata, SdkError},
    operation::update_item::UpdateItemError,
    types::AttributeValue,
};
use bytes::Bytes;
use mysfits_domain::{
    mysfit::{Mysfit, MysfitId, MysfitList, UpdateOutcome},
    query::MysfitFilter,
};
use serde::Serialize;

use crate::InfraError;

/// 送信可能なシリアライズ済み JSON
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPayload(Bytes);

impl JsonPayload {
    /// 値を JSON にシリアライズしてペイロードを作成する
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, InfraError> {
        Ok(Self(Bytes::from(serde_json::to_vec(value)?)))
    }

    /// シリアライズ済みのバイト列からペイロードを作成する（検証しない）
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

/// レコードストア契約
///
/// 別のストアに差し替える場合は、この 5 操作を満たせばよい。
#[async_trait]
pub trait MysfitRepository: Send + Sync {
    /// 全件を `{"mysfits": [...]}` として返す
    async fn list_all(&self) -> Result<JsonPayload, InfraError>;

    /// 条件に一致するレコードを `{"mysfits": [...]}` として返す
    async fn query(&self, filter: &MysfitFilter) -> Result<JsonPayload, InfraError>;

    /// 1 件を返す
    async fn get_by_id(&self, id: &MysfitId) -> Result<JsonPayload, InfraError>;

    /// いいね数を 1 増やし `{"Update": "Success"}` を返す
    async fn increment_like(&self, id: &MysfitId) -> Result<JsonPayload, InfraError>;

    /// 里親決定済みにし `{"Update": "Success"}` を返す
    async fn mark_adopted(&self, id: &MysfitId) -> Result<JsonPayload, InfraError>;
}

/// DynamoDB 実装の MysfitRepository
pub struct DynamoDbMysfitRepository {
    client:     Client,
    table_name: String,
}

impl DynamoDbMysfitRepository {
    pub fn new(client: Client, table_name: String) -> Self {
        Self { client, table_name }
    }

    /// 主キーの条件付き更新を実行する
    ///
    /// 存在しない ID に対する更新でレコードが作られないよう
    /// `attribute_exists(MysfitId)` を条件にする。
    async fn update_existing(
        &self,
        id: &MysfitId,
        update_expression: &str,
        values: HashMap<String, AttributeValue>,
    ) -> Result<(), InfraError> {
        self.client
            .update_item()
            .table_name(&self.table_name)
            .key("MysfitId", AttributeValue::S(id.as_str().to_string()))
            .update_expression(update_expression)
            .condition_expression("attribute_exists(MysfitId)")
            .set_expression_attribute_values(Some(values))
            .send()
            .await
            .map_err(|e| convert_update_error(e, id))?;

        Ok(())
    }
}

#[async_trait]
impl MysfitRepository for DynamoDbMysfitRepository {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn list_all(&self) -> Result<JsonPayload, InfraError> {
        let mut mysfits = Vec::new();
        let mut start_key: Option<HashMap<String, AttributeValue>> = None;

        loop {
            let output = self
                .client
                .scan()
                .table_name(&self.table_name)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| {
                    InfraError::dynamo_db(format!(
                        "Mysfit 一覧の取得に失敗: {}",
                        DisplayErrorContext(&e)
                    ))
                })?;

            for item in output.items() {
                mysfits.push(convert_item_to_mysfit(item)?);
            }

            match output.last_evaluated_key() {
                Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                _ => break,
            }
        }

        JsonPayload::from_serialize(&MysfitList::new(mysfits))
    }

    #[tracing::instrument(skip_all, level = "debug", fields(filter = %filter.field, value = %filter.value))]
    async fn query(&self, filter: &MysfitFilter) -> Result<JsonPayload, InfraError> {
        let mut mysfits = Vec::new();
        let mut start_key: Option<HashMap<String, AttributeValue>> = None;

        loop {
            let output = self
                .client
                .query()
                .table_name(&self.table_name)
                .index_name(format!("{}Index", filter.field))
                .key_condition_expression("#filter = :value")
                .expression_attribute_names("#filter", filter.field.as_str())
                .expression_attribute_values(
                    ":value",
                    AttributeValue::S(filter.value.as_str().to_string()),
                )
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| {
                    // 存在しないインデックスは ValidationException になる
                    let is_validation = e
                        .as_service_error()
                        .and_then(|se| se.code())
                        .is_some_and(|code| code == "ValidationException");
                    if is_validation {
                        InfraError::invalid_input(format!(
                            "フィルタ項目 '{}' では検索できません",
                            filter.field
                        ))
                    } else {
                        InfraError::dynamo_db(format!(
                            "Mysfit の検索に失敗: {}",
                            DisplayErrorContext(&e)
                        ))
                    }
                })?;

            for item in output.items() {
                mysfits.push(convert_item_to_mysfit(item)?);
            }

            match output.last_evaluated_key() {
                Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                _ => break,
            }
        }

        JsonPayload::from_serialize(&MysfitList::new(mysfits))
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn get_by_id(&self, id: &MysfitId) -> Result<JsonPayload, InfraError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("MysfitId", AttributeValue::S(id.as_str().to_string()))
            .send()
            .await
            .map_err(|e| {
                InfraError::dynamo_db(format!(
                    "Mysfit の取得に失敗: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        let item = output
            .item()
            .ok_or_else(|| InfraError::not_found("Mysfit", id.as_str()))?;

        JsonPayload::from_serialize(&convert_item_to_mysfit(item)?)
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn increment_like(&self, id: &MysfitId) -> Result<JsonPayload, InfraError> {
        // Likes 属性が無いレコードは 0 から数える
        let values = HashMap::from([
            (":n".to_string(), AttributeValue::N("1".to_string())),
            (":zero".to_string(), AttributeValue::N("0".to_string())),
        ]);
        self.update_existing(id, "SET Likes = if_not_exists(Likes, :zero) + :n", values)
            .await?;

        JsonPayload::from_serialize(&UpdateOutcome::success())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn mark_adopted(&self, id: &MysfitId) -> Result<JsonPayload, InfraError> {
        let values = HashMap::from([(":b".to_string(), AttributeValue::Bool(true))]);
        self.update_existing(id, "SET Adopted = :b", values).await?;

        JsonPayload::from_serialize(&UpdateOutcome::success())
    }
}

/// UpdateItem のエラーを変換する
///
/// 条件（`attribute_exists`）不成立はレコード不在として扱う。
fn convert_update_error<R>(err: SdkError<UpdateItemError, R>, id: &MysfitId) -> InfraError
where
    R: std::fmt::Debug + 'static,
{
    let is_condition_failed = err
        .as_service_error()
        .is_some_and(|e| e.is_conditional_check_failed_exception());
    if is_condition_failed {
        return InfraError::not_found("Mysfit", id.as_str());
    }

    InfraError::dynamo_db(format!(
        "Mysfit の更新に失敗: {}",
        DisplayErrorContext(&err)
    ))
}

/// DynamoDB アイテムを Mysfit に変換する
///
/// 属性の欠落や型の不一致は再試行しても解消しないため `Unexpected` とする。
pub(crate) fn convert_item_to_mysfit(
    item: &HashMap<String, AttributeValue>,
) -> Result<Mysfit, InfraError> {
    let likes = match item.get("Likes") {
        Some(_) => get_n(item, "Likes")?,
        None => 0,
    };
    let adopted = match item.get("Adopted") {
        Some(value) => *value
            .as_bool()
            .map_err(|_| InfraError::unexpected("真偽値属性 'Adopted' の型が不正です"))?,
        None => false,
    };

    Ok(Mysfit {
        mysfit_id: MysfitId::new(get_s(item, "MysfitId")?),
        name: get_s(item, "Name")?,
        species: get_s(item, "Species")?,
        description: get_s(item, "Description")?,
        age: get_n(item, "Age")?,
        good_evil: get_s(item, "GoodEvil")?,
        law_chaos: get_s(item, "LawChaos")?,
        thumb_image_uri: get_s(item, "ThumbImageUri")?,
        profile_image_uri: get_s(item, "ProfileImageUri")?,
        likes,
        adopted,
    })
}

/// Mysfit を DynamoDB アイテムに変換する
pub(crate) fn convert_mysfit_to_item(mysfit: &Mysfit) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (
            "MysfitId".to_string(),
            AttributeValue::S(mysfit.mysfit_id.as_str().to_string()),
        ),
        ("Name".to_string(), AttributeValue::S(mysfit.name.clone())),
        (
            "Species".to_string(),
            AttributeValue::S(mysfit.species.clone()),
        ),
        (
            "Description".to_string(),
            AttributeValue::S(mysfit.description.clone()),
        ),
        ("Age".to_string(), AttributeValue::N(mysfit.age.to_string())),
        (
            "GoodEvil".to_string(),
            AttributeValue::S(mysfit.good_evil.clone()),
        ),
        (
            "LawChaos".to_string(),
            AttributeValue::S(mysfit.law_chaos.clone()),
        ),
        (
            "ThumbImageUri".to_string(),
            AttributeValue::S(mysfit.thumb_image_uri.clone()),
        ),
        (
            "ProfileImageUri".to_string(),
            AttributeValue::S(mysfit.profile_image_uri.clone()),
        ),
        (
            "Likes".to_string(),
            AttributeValue::N(mysfit.likes.to_string()),
        ),
        ("Adopted".to_string(), AttributeValue::Bool(mysfit.adopted)),
    ])
}

/// DynamoDB アイテムから文字列属性を取得する
fn get_s(item: &HashMap<String, AttributeValue>, key: &str) -> Result<String, InfraError> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .cloned()
        .ok_or_else(|| InfraError::unexpected(format!("属性 '{key}' が見つかりません")))
}

/// DynamoDB アイテムから数値属性を取得してパースする
fn get_n<T>(item: &HashMap<String, AttributeValue>, key: &str) -> Result<T, InfraError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = item
        .get(key)
        .and_then(|v| v.as_n().ok())
        .ok_or_else(|| InfraError::unexpected(format!("数値属性 '{key}' が見つかりません")))?;

    raw.parse()
        .map_err(|e| InfraError::unexpected(format!("{key} のパースに失敗: {e}")))
}
