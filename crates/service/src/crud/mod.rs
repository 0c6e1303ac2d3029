//! Generic CRUD service over a single SeaORM entity.
//!
//! A [`ModelKind`] binds one entity to its list-item view, detail view,
//! creation payload and update payload, and may hook into create/update.
//! [`ModelService`] runs the operations against a connection or a
//! caller-owned transaction.

mod service;

pub use service::ModelService;

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, EntityTrait, FromQueryResult, IntoActiveModel,
    ModelTrait, PrimaryKeyTrait,
};

use crate::errors::ServiceError;

/// Numeric record identifier shared by every managed entity.
pub type RecordId = i32;

/// Read-only projection of a persisted model.
pub trait FromModel<M>: Sized {
    fn from_model(model: &M) -> Result<Self, ServiceError>;
}

/// Partial update: only fields the caller set are written.
pub trait UpdatePayload<A> {
    /// Names of the explicitly set fields.
    fn set_fields(&self) -> Vec<&'static str>;

    /// Copy the explicitly set fields onto `active`, marking them changed.
    fn apply(self, active: &mut A);
}

/// Everything [`ModelService`] needs to know about one entity.
pub trait ModelKind: Send + Sync {
    type Entity: EntityTrait<Model = Self::Model, PrimaryKey = Self::PrimaryKey>;
    type PrimaryKey: PrimaryKeyTrait<ValueType = RecordId>;
    type Model: ModelTrait<Entity = Self::Entity>
        + FromQueryResult
        + IntoActiveModel<Self::ActiveModel>
        + Send
        + Sync
        + 'static;
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity>
        + ActiveModelBehavior
        + Send
        + Sync
        + 'static;
    type ListItem: FromModel<Self::Model>;
    type Detail: FromModel<Self::Model>;
    type Create: IntoActiveModel<Self::ActiveModel> + Send;
    type Update: UpdatePayload<Self::ActiveModel> + Send;

    /// Entity name used in errors and logs.
    const NAME: &'static str;

    fn id(model: &Self::Model) -> RecordId;

    /// Primary key column, used for the default listing order.
    fn id_column() -> <Self::Entity as EntityTrait>::Column;

    /// Runs on a freshly built record before it is written.
    fn on_after_create(&self, _active: &mut Self::ActiveModel) -> Result<(), ServiceError> {
        Ok(())
    }

    /// Runs after the update payload was applied, before the record is written.
    fn on_after_update(&self, _active: &mut Self::ActiveModel) -> Result<(), ServiceError> {
        Ok(())
    }
}
