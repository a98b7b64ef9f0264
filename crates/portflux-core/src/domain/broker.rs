//! 증권사(브로커).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{slugify, Entity, Resource};
use crate::ports::FilterValue;
use crate::validation::FieldOrder;

/// 증권사.
///
/// `slug`는 이름에서 파생되며 `/v1/broker/slug/{slug}` 조회에 사용됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Broker {
    #[serde(rename = "brokerid")]
    pub id: Uuid,
    /// 외부 시스템 ID
    pub extid: String,
    pub name: String,
    pub description: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 증권사 생성 요청.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct CreateBrokerRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "external id cannot be empty"))]
    pub extid: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "name cannot be empty"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "description cannot be empty"))]
    pub description: String,
}

impl FieldOrder for CreateBrokerRequest {
    const FIELDS: &'static [&'static str] = &["extid", "name", "description"];
}

/// 증권사 수정 요청. 외부 ID는 변경할 수 없습니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct UpdateBrokerRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "name cannot be empty"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "description cannot be empty"))]
    pub description: String,
}

impl FieldOrder for UpdateBrokerRequest {
    const FIELDS: &'static [&'static str] = &["name", "description"];
}

impl Entity for Broker {
    const NAME: &'static str = "broker";
    const FILTERABLE: &'static [&'static str] = &["extid", "name", "slug"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn filter_value(&self, column: &str) -> Option<FilterValue> {
        match column {
            "extid" => Some(self.extid.as_str().into()),
            "name" => Some(self.name.as_str().into()),
            "slug" => Some(self.slug.as_str().into()),
            _ => None,
        }
    }
}

impl Resource for Broker {
    type Create = CreateBrokerRequest;
    type Update = UpdateBrokerRequest;
    type Response = Broker;

    fn from_create(id: Uuid, request: CreateBrokerRequest, now: DateTime<Utc>) -> Self {
        Self {
            id,
            slug: slugify(&request.name),
            extid: request.extid,
            name: request.name,
            description: request.description,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, request: UpdateBrokerRequest, now: DateTime<Utc>) {
        self.slug = slugify(&request.name);
        self.name = request.name;
        self.description = request.description;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_request;
    use chrono::Duration;

    fn degiro() -> Broker {
        Broker::from_create(
            Uuid::new_v4(),
            CreateBrokerRequest {
                extid: "ext-1".into(),
                name: "Degiro Online".into(),
                description: "Dutch broker".into(),
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_slug_derived_on_create() {
        assert_eq!(degiro().slug, "degiro-online");
    }

    #[test]
    fn test_update_rederives_slug_and_keeps_extid() {
        let mut broker = degiro();
        let created_at = broker.created_at;
        let later = created_at + Duration::seconds(5);

        broker.apply_update(
            UpdateBrokerRequest {
                name: "Flatex Degiro".into(),
                description: "renamed".into(),
            },
            later,
        );

        assert_eq!(broker.slug, "flatex-degiro");
        assert_eq!(broker.extid, "ext-1");
        assert_eq!(broker.created_at, created_at);
        assert_eq!(broker.updated_at, later);
    }

    #[test]
    fn test_create_validation_messages() {
        let err = validate_request(&CreateBrokerRequest {
            extid: String::new(),
            name: "x".into(),
            description: String::new(),
        })
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "external id cannot be empty | description cannot be empty"
        );
    }
}
