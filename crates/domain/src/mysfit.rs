//! # Mysfit
//!
//! 里親募集カタログに掲載される 1 体のキャラクター（Mysfit）のレコード。
//!
//! ## 所有関係
//!
//! レコードの形状はレコードストアが所有する。HTTP 層はストアが返す
//! シリアライズ済み JSON をそのまま返すだけで、この型を直接扱わない。
//! この型を使うのはストア実装（DynamoDB / インメモリ）とシードデータのみ。
//!
//! ## JSON 形状
//!
//! ```json
//! {
//!   "mysfitId": "4e53920c-505a-4a90-a694-b9300791f0ae",
//!   "name": "Evangeline",
//!   "species": "Chimera",
//!   "description": "...",
//!   "age": 43,
//!   "goodevil": "Evil",
//!   "lawchaos": "Lawful",
//!   "thumbImageUri": "https://...",
//!   "profileImageUri": "https://...",
//!   "likes": 0,
//!   "adopted": false
//! }
//! ```

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// フィルタ検索に使える項目名（小文字化済み）
pub const FILTERABLE_FIELDS: [&str; 4] = ["goodevil", "lawchaos", "species", "name"];

/// 項目名がフィルタ検索に使えるかを判定する（大文字小文字を区別しない）
pub fn is_filterable_field(field: &str) -> bool {
    let field = field.to_ascii_lowercase();
    FILTERABLE_FIELDS.contains(&field.as_str())
}

/// Mysfit の識別子
///
/// 形式の検証はストア側の責務とし、この層では任意の文字列を受け付ける。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display("{_0}")]
pub struct MysfitId(String);

impl MysfitId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Mysfit レコード
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mysfit {
    #[serde(rename = "mysfitId")]
    pub mysfit_id:         MysfitId,
    pub name:              String,
    pub species:           String,
    pub description:       String,
    pub age:               u32,
    #[serde(rename = "goodevil")]
    pub good_evil:         String,
    #[serde(rename = "lawchaos")]
    pub law_chaos:         String,
    #[serde(rename = "thumbImageUri")]
    pub thumb_image_uri:   String,
    #[serde(rename = "profileImageUri")]
    pub profile_image_uri: String,
    #[serde(default)]
    pub likes:             u64,
    #[serde(default)]
    pub adopted:           bool,
}

impl Mysfit {
    /// いいね数を 1 増やす
    pub fn like(&mut self) {
        self.likes = self.likes.saturating_add(1);
    }

    /// 里親決定済みにする（冪等）
    pub fn adopt(&mut self) {
        self.adopted = true;
    }

    /// フィルタ項目名に対応する属性値を返す
    ///
    /// 項目名は DynamoDB の属性名（`GoodEvil`）と JSON のキー名（`goodevil`）の
    /// どちらでも指定できるよう、大文字小文字を区別せずに照合する。
    /// 検索に使えない項目の場合は `None`。
    pub fn filter_attribute(&self, field: &str) -> Option<&str> {
        match field.to_ascii_lowercase().as_str() {
            "goodevil" => Some(&self.good_evil),
            "lawchaos" => Some(&self.law_chaos),
            "species" => Some(&self.species),
            "name" => Some(&self.name),
            _ => None,
        }
    }
}

/// 一覧取得・フィルタ検索のペイロード
///
/// `{"mysfits": [...]}` の形状でシリアライズされる。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MysfitList {
    pub mysfits: Vec<Mysfit>,
}

impl MysfitList {
    pub fn new(mysfits: Vec<Mysfit>) -> Self {
        Self { mysfits }
    }
}

/// 更新系操作（いいね / 里親決定）のペイロード
///
/// `{"Update": "Success"}` の形状でシリアライズされる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOutcome {
    #[serde(rename = "Update")]
    pub update: String,
}

impl UpdateOutcome {
    pub fn success() -> Self {
        Self {
            update: "Success".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn sample_mysfit() -> Mysfit {
        Mysfit {
            mysfit_id:         MysfitId::new("4e53920c-505a-4a90-a694-b9300791f0ae"),
            name:              "Evangeline".to_string(),
            species:           "Chimera".to_string(),
            description:       "A chimera with a taste for lawful evil.".to_string(),
            age:               43,
            good_evil:         "Evil".to_string(),
            law_chaos:         "Lawful".to_string(),
            thumb_image_uri:   "https://example.com/thumb.png".to_string(),
            profile_image_uri: "https://example.com/profile.png".to_string(),
            likes:             0,
            adopted:           false,
        }
    }

    #[test]
    fn test_mysfitのserializeでストアのjsonキー名を使う() {
        let json = serde_json::to_value(sample_mysfit()).unwrap();

        assert_eq!(json["mysfitId"], "4e53920c-505a-4a90-a694-b9300791f0ae");
        assert_eq!(json["goodevil"], "Evil");
        assert_eq!(json["lawchaos"], "Lawful");
        assert_eq!(json["thumbImageUri"], "https://example.com/thumb.png");
        assert_eq!(json["profileImageUri"], "https://example.com/profile.png");
        assert_eq!(json["likes"], 0);
        assert_eq!(json["adopted"], false);
    }

    #[test]
    fn test_likes_adoptedが欠けたjsonはデフォルト値で復元される() {
        let mut json = serde_json::to_value(sample_mysfit()).unwrap();
        let object = json.as_object_mut().unwrap();
        object.remove("likes");
        object.remove("adopted");

        let mysfit: Mysfit = serde_json::from_value(json).unwrap();

        assert_eq!(mysfit.likes, 0);
        assert!(!mysfit.adopted);
    }

    #[test]
    fn test_likeは呼び出しごとに1ずつ増える() {
        let mut mysfit = sample_mysfit();

        mysfit.like();
        mysfit.like();

        assert_eq!(mysfit.likes, 2);
    }

    #[test]
    fn test_likeは上限でオーバーフローしない() {
        let mut mysfit = sample_mysfit();
        mysfit.likes = u64::MAX;

        mysfit.like();

        assert_eq!(mysfit.likes, u64::MAX);
    }

    #[test]
    fn test_adoptは冪等() {
        let mut mysfit = sample_mysfit();

        mysfit.adopt();
        mysfit.adopt();

        assert!(mysfit.adopted);
    }

    #[rstest]
    #[case("GoodEvil", Some("Evil"))]
    #[case("goodevil", Some("Evil"))]
    #[case("LawChaos", Some("Lawful"))]
    #[case("species", Some("Chimera"))]
    #[case("Name", Some("Evangeline"))]
    #[case("age", None)]
    #[case("unknown", None)]
    fn test_filter_attributeは項目名を大文字小文字無視で照合する(
        #[case] field: &str,
        #[case] expected: Option<&str>,
    ) {
        let mysfit = sample_mysfit();
        assert_eq!(mysfit.filter_attribute(field), expected);
    }

    #[rstest]
    #[case("GoodEvil", true)]
    #[case("LAWCHAOS", true)]
    #[case("species", true)]
    #[case("likes", false)]
    fn test_is_filterable_field(#[case] field: &str, #[case] expected: bool) {
        assert_eq!(is_filterable_field(field), expected);
    }

    #[test]
    fn test_mysfit_listはmysfitsキーでラップされる() {
        let list = MysfitList::new(vec![sample_mysfit()]);
        let json = serde_json::to_value(&list).unwrap();

        assert_eq!(json["mysfits"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_update_outcome_successの形状() {
        let json = serde_json::to_value(UpdateOutcome::success()).unwrap();
        assert_eq!(json, serde_json::json!({"Update": "Success"}));
    }
}
