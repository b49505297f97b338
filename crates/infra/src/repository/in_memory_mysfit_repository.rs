//! # InMemoryMysfitRepository
//!
//! プロセス内に Mysfit を保持する MysfitRepository 実装。
//! DynamoDB を用意できないローカル開発とテストで使用する。
//!
//! ## DynamoDB 実装との違い
//!
//! - フィルタ検索はインデックスではなく線形走査で行う
//! - `GoodEvil` / `LawChaos` に加えて `Species` / `Name` でも絞り込める
//! - プロセス終了でデータは失われる

use std::sync::RwLock;

use async_trait::async_trait;
use mysfits_domain::{
    mysfit::{Mysfit, MysfitId, MysfitList, UpdateOutcome, is_filterable_field},
    query::MysfitFilter,
};

use crate::{
    InfraError,
    repository::{JsonPayload, MysfitRepository},
    seed,
};

/// インメモリ実装の MysfitRepository
///
/// 挿入順を保持する。更新は書き込みロック下で行うため、
/// 同一レコードへの同時いいねも取りこぼさない。
#[derive(Debug, Default)]
pub struct InMemoryMysfitRepository {
    mysfits: RwLock<Vec<Mysfit>>,
}

impl InMemoryMysfitRepository {
    pub fn new(mysfits: Vec<Mysfit>) -> Self {
        Self {
            mysfits: RwLock::new(mysfits),
        }
    }

    /// 同梱のシードデータで初期化する
    pub fn with_seed_data() -> Result<Self, InfraError> {
        Ok(Self::new(seed::load_seed_mysfits()?))
    }

    /// 読み取りロックを取って処理する
    fn read<T>(&self, f: impl FnOnce(&[Mysfit]) -> T) -> Result<T, InfraError> {
        let mysfits = self
            .mysfits
            .read()
            .map_err(|_| InfraError::unexpected("Mysfit ストアのロックが汚染されています"))?;
        Ok(f(&mysfits))
    }

    /// 書き込みロックを取って対象レコードを更新する
    fn update(&self, id: &MysfitId, f: impl FnOnce(&mut Mysfit)) -> Result<(), InfraError> {
        let mut mysfits = self
            .mysfits
            .write()
            .map_err(|_| InfraError::unexpected("Mysfit ストアのロックが汚染されています"))?;
        let mysfit = mysfits
            .iter_mut()
            .find(|m| &m.mysfit_id == id)
            .ok_or_else(|| InfraError::not_found("Mysfit", id.as_str()))?;
        f(mysfit);
        Ok(())
    }
}

#[async_trait]
impl MysfitRepository for InMemoryMysfitRepository {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn list_all(&self) -> Result<JsonPayload, InfraError> {
        let list = self.read(|mysfits| MysfitList::new(mysfits.to_vec()))?;
        JsonPayload::from_serialize(&list)
    }

    #[tracing::instrument(skip_all, level = "debug", fields(filter = %filter.field, value = %filter.value))]
    async fn query(&self, filter: &MysfitFilter) -> Result<JsonPayload, InfraError> {
        if !is_filterable_field(filter.field.as_str()) {
            return Err(InfraError::invalid_input(format!(
                "フィルタ項目 '{}' では検索できません",
                filter.field
            )));
        }

        let list = self.read(|mysfits| {
            MysfitList::new(
                mysfits
                    .iter()
                    .filter(|m| {
                        m.filter_attribute(filter.field.as_str()) == Some(filter.value.as_str())
                    })
                    .cloned()
                    .collect(),
            )
        })?;
        JsonPayload::from_serialize(&list)
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn get_by_id(&self, id: &MysfitId) -> Result<JsonPayload, InfraError> {
        let mysfit = self
            .read(|mysfits| mysfits.iter().find(|m| &m.mysfit_id == id).cloned())?
            .ok_or_else(|| InfraError::not_found("Mysfit", id.as_str()))?;
        JsonPayload::from_serialize(&mysfit)
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn increment_like(&self, id: &MysfitId) -> Result<JsonPayload, InfraError> {
        self.update(id, Mysfit::like)?;
        JsonPayload::from_serialize(&UpdateOutcome::success())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn mark_adopted(&self, id: &MysfitId) -> Result<JsonPayload, InfraError> {
        self.update(id, Mysfit::adopt)?;
        JsonPayload::from_serialize(&UpdateOutcome::success())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mysfits_domain::query::{FilterField, FilterValue};
    use pretty_assertions::assert_eq;
    use serde_json::Value as JsonValue;

    use super::*;
    use crate::InfraErrorKind;

    fn mysfit(id: &str, name: &str, good_evil: &str, law_chaos: &str) -> Mysfit {
        Mysfit {
            mysfit_id:         MysfitId::new(id),
            name:              name.to_string(),
            species:           "Troll".to_string(),
            description:       format!("{name} の説明"),
            age:               10,
            good_evil:         good_evil.to_string(),
            law_chaos:         law_chaos.to_string(),
            thumb_image_uri:   format!("https://example.com/{id}_thumb.png"),
            profile_image_uri: format!("https://example.com/{id}.png"),
            likes:             0,
            adopted:           false,
        }
    }

    fn repository() -> InMemoryMysfitRepository {
        InMemoryMysfitRepository::new(vec![
            mysfit("1", "Pauly", "Neutral", "Lawful"),
            mysfit("2", "Gretta", "Evil", "Chaotic"),
            mysfit("3", "Rujin", "Good", "Lawful"),
        ])
    }

    fn parse(payload: JsonPayload) -> JsonValue {
        serde_json::from_slice(payload.as_bytes()).unwrap()
    }

    fn filter(field: &str, value: &str) -> MysfitFilter {
        MysfitFilter::new(
            FilterField::new(field).unwrap(),
            FilterValue::new(value).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_list_allは挿入順で全件を返す() {
        let json = parse(repository().list_all().await.unwrap());

        let ids: Vec<&str> = json["mysfits"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["mysfitId"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn test_queryは項目と値が一致するレコードだけを返す() {
        let json = parse(
            repository()
                .query(&filter("LawChaos", "Lawful"))
                .await
                .unwrap(),
        );

        let names: Vec<&str> = json["mysfits"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Pauly", "Rujin"]);
    }

    #[tokio::test]
    async fn test_queryで一致なしは空配列を返す() {
        let json = parse(repository().query(&filter("GoodEvil", "Chaotic")).await.unwrap());

        assert_eq!(json, serde_json::json!({"mysfits": []}));
    }

    #[tokio::test]
    async fn test_queryで検索できない項目は入力エラー() {
        let err = repository()
            .query(&filter("likes", "0"))
            .await
            .unwrap_err();

        assert!(matches!(err.kind(), InfraErrorKind::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_get_by_idは該当レコードを返す() {
        let json = parse(repository().get_by_id(&MysfitId::new("2")).await.unwrap());

        assert_eq!(json["name"], "Gretta");
        assert_eq!(json["goodevil"], "Evil");
    }

    #[tokio::test]
    async fn test_get_by_idで存在しないidはnot_found() {
        let err = repository()
            .get_by_id(&MysfitId::new("999"))
            .await
            .unwrap_err();

        assert!(matches!(
            err.kind(),
            InfraErrorKind::NotFound { entity, id } if entity == "Mysfit" && id == "999"
        ));
    }

    #[tokio::test]
    async fn test_increment_likeは呼び出しごとに加算される() {
        let repo = repository();
        let id = MysfitId::new("1");

        let outcome = parse(repo.increment_like(&id).await.unwrap());
        repo.increment_like(&id).await.unwrap();

        assert_eq!(outcome, serde_json::json!({"Update": "Success"}));
        let json = parse(repo.get_by_id(&id).await.unwrap());
        assert_eq!(json["likes"], 2);
    }

    #[tokio::test]
    async fn test_mark_adoptedで里親決定済みになる() {
        let repo = repository();
        let id = MysfitId::new("3");

        let outcome = parse(repo.mark_adopted(&id).await.unwrap());

        assert_eq!(outcome, serde_json::json!({"Update": "Success"}));
        let json = parse(repo.get_by_id(&id).await.unwrap());
        assert_eq!(json["adopted"], true);
    }

    #[tokio::test]
    async fn test_更新系で存在しないidはnot_found() {
        let repo = repository();
        let id = MysfitId::new("missing");

        let like_err = repo.increment_like(&id).await.unwrap_err();
        let adopt_err = repo.mark_adopted(&id).await.unwrap_err();

        assert!(matches!(like_err.kind(), InfraErrorKind::NotFound { .. }));
        assert!(matches!(adopt_err.kind(), InfraErrorKind::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_同時いいねを取りこぼさない() {
        let repo = Arc::new(repository());
        let id = MysfitId::new("2");

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let repo = repo.clone();
                let id = id.clone();
                tokio::spawn(async move { repo.increment_like(&id).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let json = parse(repo.get_by_id(&id).await.unwrap());
        assert_eq!(json["likes"], 50);
    }

    #[tokio::test]
    async fn test_with_seed_dataでシードデータが読み込まれる() {
        let repo = InMemoryMysfitRepository::with_seed_data().unwrap();

        let json = parse(repo.list_all().await.unwrap());

        assert!(!json["mysfits"].as_array().unwrap().is_empty());
    }
}
