//! Posts: the record service specialized for `models::post`.
//!
//! The hooks keep `slug` in step with `title` and maintain the timestamps.

use chrono::Utc;
use sea_orm::{
    prelude::DateTimeWithTimeZone, ActiveValue, ColumnTrait, Condition, ConnectionTrait,
    IntoActiveModel, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};

use models::post;
use crate::crud::{FromModel, ModelKind, ModelService, RecordId, UpdatePayload};
use crate::errors::ServiceError;
use crate::pagination::{PaginatedList, Pagination};

#[derive(Clone, Debug, Deserialize)]
pub struct CreatePost {
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub published: bool,
}

impl IntoActiveModel<post::ActiveModel> for CreatePost {
    fn into_active_model(self) -> post::ActiveModel {
        post::ActiveModel {
            title: Set(self.title),
            body: Set(self.body),
            published: Set(self.published),
            ..Default::default()
        }
    }
}

/// Absent fields keep their stored value.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdatePost {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub published: Option<bool>,
}

impl UpdatePayload<post::ActiveModel> for UpdatePost {
    fn set_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.title.is_some() { fields.push("title"); }
        if self.body.is_some() { fields.push("body"); }
        if self.published.is_some() { fields.push("published"); }
        fields
    }

    fn apply(self, active: &mut post::ActiveModel) {
        if let Some(t) = self.title { active.title = Set(t); }
        if let Some(b) = self.body { active.body = Set(b); }
        if let Some(p) = self.published { active.published = Set(p); }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PostListItem {
    pub id: RecordId,
    pub title: String,
    pub slug: String,
    pub published: bool,
}

impl FromModel<post::Model> for PostListItem {
    fn from_model(m: &post::Model) -> Result<Self, ServiceError> {
        Ok(Self { id: m.id, title: m.title.clone(), slug: m.slug.clone(), published: m.published })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PostDetail {
    pub id: RecordId,
    pub title: String,
    pub slug: String,
    pub body: String,
    pub published: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl FromModel<post::Model> for PostDetail {
    fn from_model(m: &post::Model) -> Result<Self, ServiceError> {
        Ok(Self {
            id: m.id,
            title: m.title.clone(),
            slug: m.slug.clone(),
            body: m.body.clone(),
            published: m.published,
            created_at: m.created_at,
            updated_at: m.updated_at,
        })
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PostKind;

impl PostKind {
    fn slug_for(title: &str) -> String {
        let slug = post::slugify(title);
        if slug.is_empty() { "post".to_string() } else { slug }
    }
}

impl ModelKind for PostKind {
    type Entity = post::Entity;
    type PrimaryKey = post::PrimaryKey;
    type Model = post::Model;
    type ActiveModel = post::ActiveModel;
    type ListItem = PostListItem;
    type Detail = PostDetail;
    type Create = CreatePost;
    type Update = UpdatePost;

    const NAME: &'static str = "post";

    fn id(model: &post::Model) -> RecordId { model.id }

    fn id_column() -> post::Column { post::Column::Id }

    fn on_after_create(&self, active: &mut post::ActiveModel) -> Result<(), ServiceError> {
        let title = match &active.title {
            ActiveValue::Set(t) | ActiveValue::Unchanged(t) => t.clone(),
            ActiveValue::NotSet => return Err(ServiceError::Validation("title required".into())),
        };
        post::validate_title(&title)?;
        let now: DateTimeWithTimeZone = Utc::now().into();
        active.slug = Set(Self::slug_for(&title));
        active.created_at = Set(now);
        active.updated_at = Set(now);
        Ok(())
    }

    fn on_after_update(&self, active: &mut post::ActiveModel) -> Result<(), ServiceError> {
        if let ActiveValue::Set(title) = &active.title {
            post::validate_title(title)?;
            let slug = Self::slug_for(title);
            active.slug = Set(slug);
        }
        active.updated_at = Set(Utc::now().into());
        Ok(())
    }
}

pub type PostService<'c, C> = ModelService<'c, C, PostKind>;

pub fn post_service<C>(db: &C, autocommit: bool) -> PostService<'_, C>
where
    C: ConnectionTrait + TransactionTrait,
{
    ModelService::new(db, PostKind, autocommit)
}

impl<'c, C> ModelService<'c, C, PostKind>
where
    C: ConnectionTrait + TransactionTrait,
{
    /// Published posts only, ordered by id.
    pub async fn list_published(&self, pagination: Pagination) -> Result<PaginatedList<PostListItem>, ServiceError> {
        self.list_where(Condition::all().add(post::Column::Published.eq(true)), pagination).await
    }
}
