use sea_orm::{
    ActiveModelTrait, Condition, ConnectionTrait, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, TransactionTrait,
};
use tracing::{debug, info, instrument};

use super::{FromModel, ModelKind, RecordId, UpdatePayload};
use crate::errors::ServiceError;
use crate::pagination::{PageWindow, PaginatedList, Pagination, PerPage};

/// CRUD operations for the entity described by `K`.
///
/// With `autocommit` every mutation runs in its own transaction opened on
/// `db` and committed before the record is reloaded. When `db` is itself a
/// transaction that inner transaction is a savepoint, so the outer one still
/// decides. Without `autocommit` statements run directly on `db` and the
/// caller commits or rolls back.
pub struct ModelService<'c, C, K> {
    db: &'c C,
    kind: K,
    autocommit: bool,
}

impl<'c, C, K> ModelService<'c, C, K>
where
    C: ConnectionTrait + TransactionTrait,
    K: ModelKind,
{
    pub fn new(db: &'c C, kind: K, autocommit: bool) -> Self {
        Self { db, kind, autocommit }
    }

    /// Look up one record. A missing record is `NotFound` when `required`,
    /// `Ok(None)` otherwise.
    #[instrument(skip(self), fields(kind = K::NAME))]
    pub async fn fetch(
        &self,
        id: RecordId,
        required: bool,
    ) -> Result<Option<K::Model>, ServiceError> {
        let found = Self::find_on(self.db, id).await?;
        debug!(found = found.is_some(), "fetch");
        match found {
            None if required => Err(ServiceError::not_found(K::NAME)),
            other => Ok(other),
        }
    }

    /// `fetch(id, true)` without the `Option`.
    pub async fn get_instance(&self, id: RecordId) -> Result<K::Model, ServiceError> {
        Self::find_on(self.db, id)
            .await?
            .ok_or_else(|| ServiceError::not_found(K::NAME))
    }

    pub fn to_list_item(&self, model: &K::Model) -> Result<K::ListItem, ServiceError> {
        <K::ListItem as FromModel<K::Model>>::from_model(model)
    }

    pub fn to_detail(&self, model: &K::Model) -> Result<K::Detail, ServiceError> {
        <K::Detail as FromModel<K::Model>>::from_model(model)
    }

    /// Count everything `select` matches, then load the requested page.
    /// Order comes from `select`; without one page boundaries are unstable.
    /// Pages past the end come back empty without a second query.
    #[instrument(skip(self, select), fields(kind = K::NAME))]
    pub async fn list(
        &self,
        select: Select<K::Entity>,
        pagination: Pagination,
    ) -> Result<PaginatedList<K::ListItem>, ServiceError> {
        let total_count = select.clone().count(self.db).await?;
        let rows = match pagination.window() {
            PageWindow::All => select.all(self.db).await?,
            PageWindow::Slice { offset, limit } if limit > 0 && offset < total_count => {
                select.offset(offset).limit(limit).all(self.db).await?
            }
            PageWindow::Slice { .. } | PageWindow::Beyond => Vec::new(),
        };
        let per_page = match pagination.per_page {
            PerPage::Limit(n) => n,
            PerPage::Unbounded => total_count,
        };
        let results = rows
            .iter()
            .map(|row| self.to_list_item(row))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(total_count, returned = results.len(), "list");
        Ok(PaginatedList { total_count, results, page: pagination.page, per_page })
    }

    /// [`list`](Self::list) over rows matching `condition`, ordered by id.
    pub async fn list_where(
        &self,
        condition: Condition,
        pagination: Pagination,
    ) -> Result<PaginatedList<K::ListItem>, ServiceError> {
        let select = <K::Entity as EntityTrait>::find()
            .filter(condition)
            .order_by_asc(K::id_column());
        self.list(select, pagination).await
    }

    pub async fn list_all(
        &self,
        pagination: Pagination,
    ) -> Result<PaginatedList<K::ListItem>, ServiceError> {
        self.list_where(Condition::all(), pagination).await
    }

    pub async fn get_detail(&self, id: RecordId) -> Result<K::Detail, ServiceError> {
        let model = self.get_instance(id).await?;
        self.to_detail(&model)
    }

    /// Insert a record built from `payload` and return its stored state.
    #[instrument(skip(self, payload), fields(kind = K::NAME, autocommit = self.autocommit))]
    pub async fn create(&self, payload: K::Create) -> Result<K::Model, ServiceError> {
        let id = if self.autocommit {
            let txn = self.db.begin().await?;
            let id = self.insert_on(&txn, payload).await?;
            txn.commit().await?;
            id
        } else {
            self.insert_on(self.db, payload).await?
        };
        info!(id, "record created");
        self.get_instance(id).await
    }

    /// Apply the fields set in `payload` to record `id` and return its stored state.
    #[instrument(skip(self, payload), fields(kind = K::NAME, autocommit = self.autocommit))]
    pub async fn update(&self, id: RecordId, payload: K::Update) -> Result<K::Model, ServiceError> {
        debug!(fields = ?payload.set_fields(), "update payload");
        if self.autocommit {
            let txn = self.db.begin().await?;
            self.update_on(&txn, id, payload).await?;
            txn.commit().await?;
        } else {
            self.update_on(self.db, id, payload).await?;
        }
        info!(id, "record updated");
        self.get_instance(id).await
    }

    /// Delete record `id`. Deleting a missing record succeeds.
    #[instrument(skip(self), fields(kind = K::NAME, autocommit = self.autocommit))]
    pub async fn delete(&self, id: RecordId) -> Result<(), ServiceError> {
        let rows_affected = if self.autocommit {
            let txn = self.db.begin().await?;
            let rows = Self::delete_on(&txn, id).await?;
            txn.commit().await?;
            rows
        } else {
            Self::delete_on(self.db, id).await?
        };
        info!(id, rows_affected, "record deleted");
        Ok(())
    }

    async fn find_on<T: ConnectionTrait>(
        conn: &T,
        id: RecordId,
    ) -> Result<Option<K::Model>, ServiceError> {
        Ok(<K::Entity as EntityTrait>::find_by_id(id).one(conn).await?)
    }

    async fn insert_on<T: ConnectionTrait>(
        &self,
        conn: &T,
        payload: K::Create,
    ) -> Result<RecordId, ServiceError> {
        let mut active: K::ActiveModel = payload.into_active_model();
        self.kind.on_after_create(&mut active)?;
        let model = active.insert(conn).await?;
        Ok(K::id(&model))
    }

    async fn update_on<T: ConnectionTrait>(
        &self,
        conn: &T,
        id: RecordId,
        payload: K::Update,
    ) -> Result<(), ServiceError> {
        let model = Self::find_on(conn, id)
            .await?
            .ok_or_else(|| ServiceError::not_found(K::NAME))?;
        let mut active: K::ActiveModel = model.into_active_model();
        payload.apply(&mut active);
        self.kind.on_after_update(&mut active)?;
        if active.is_changed() {
            active.update(conn).await?;
        }
        Ok(())
    }

    async fn delete_on<T: ConnectionTrait>(conn: &T, id: RecordId) -> Result<u64, ServiceError> {
        let res = <K::Entity as EntityTrait>::delete_by_id(id).exec(conn).await?;
        Ok(res.rows_affected)
    }
}
