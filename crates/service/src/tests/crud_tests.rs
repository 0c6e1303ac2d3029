use std::collections::HashSet;

use anyhow::Result;
use sea_orm::{ConnectionTrait, EntityTrait};
use uuid::Uuid;

use models::post;
use crate::errors::ServiceError;
use crate::pagination::{Pagination, PerPage};
use crate::post_service::{post_service, CreatePost, UpdatePost};
use crate::test_support::get_db;

fn new_post(title: &str) -> CreatePost {
    CreatePost { title: title.to_string(), body: format!("body of {title}"), published: false }
}

/// Create then fetch returns every payload field
#[tokio::test]
async fn test_create_then_fetch() -> Result<()> {
    let db = get_db().await?;
    let svc = post_service(&db, true);

    let title = format!("Post {}", Uuid::new_v4());
    let created = svc
        .create(CreatePost { title: title.clone(), body: "hello".into(), published: true })
        .await?;
    assert!(created.id > 0);
    assert_eq!(created.title, title);
    assert_eq!(created.body, "hello");
    assert!(created.published);
    // filled by the create hook
    assert!(created.slug.starts_with("post-"));
    assert_eq!(created.created_at, created.updated_at);

    let found = svc.fetch(created.id, true).await?.expect("required fetch returns the record");
    assert_eq!(found, created);

    let detail = svc.get_detail(created.id).await?;
    assert_eq!(detail.title, title);
    assert_eq!(detail.body, "hello");
    Ok(())
}

/// Required lookups fail with NotFound, optional ones return None
#[tokio::test]
async fn test_fetch_missing_record() -> Result<()> {
    let db = get_db().await?;
    let svc = post_service(&db, true);

    let err = svc.fetch(4242, true).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(svc.fetch(4242, false).await?.is_none());

    assert!(svc.get_detail(4242).await.unwrap_err().is_not_found());
    let err = svc.update(4242, UpdatePost { title: Some("x".into()), ..Default::default() }).await.unwrap_err();
    assert!(err.is_not_found());
    Ok(())
}

/// Update writes only the fields present in the payload
#[tokio::test]
async fn test_partial_update() -> Result<()> {
    let db = get_db().await?;
    let svc = post_service(&db, true);

    let original = svc.create(new_post("Partial Update")).await?;
    let updated = svc
        .update(original.id, UpdatePost { body: Some("rewritten".into()), ..Default::default() })
        .await?;

    assert_eq!(updated.body, "rewritten");
    assert_eq!(updated.title, original.title);
    assert_eq!(updated.slug, original.slug);
    assert_eq!(updated.published, original.published);
    assert_eq!(updated.created_at, original.created_at);

    let renamed = svc
        .update(original.id, UpdatePost { title: Some("Renamed Post".into()), published: Some(true), ..Default::default() })
        .await?;
    assert_eq!(renamed.title, "Renamed Post");
    assert_eq!(renamed.slug, "renamed-post");
    assert!(renamed.published);
    assert_eq!(renamed.body, "rewritten");
    Ok(())
}

/// An empty update payload leaves content untouched
#[tokio::test]
async fn test_empty_update() -> Result<()> {
    let db = get_db().await?;
    let svc = post_service(&db, false);

    let original = svc.create(new_post("Untouched")).await?;
    let after = svc.update(original.id, UpdatePost::default()).await?;
    assert_eq!(after.title, original.title);
    assert_eq!(after.body, original.body);
    assert_eq!(after.published, original.published);
    Ok(())
}

/// Deleting twice, or deleting an id that never existed, is not an error
#[tokio::test]
async fn test_delete_is_idempotent() -> Result<()> {
    let db = get_db().await?;
    let svc = post_service(&db, true);

    let p = svc.create(new_post("Short Lived")).await?;
    svc.delete(p.id).await?;
    assert!(svc.fetch(p.id, false).await?.is_none());

    svc.delete(p.id).await?;
    svc.delete(99_999).await?;
    Ok(())
}

/// Walking pages covers every record exactly once
#[tokio::test]
async fn test_pages_have_no_gaps_or_duplicates() -> Result<()> {
    let db = get_db().await?;
    let svc = post_service(&db, true);

    let mut expected = HashSet::new();
    for i in 0..7 {
        expected.insert(svc.create(new_post(&format!("Paged {i}"))).await?.id);
    }

    let mut seen = Vec::new();
    let mut page = 0;
    loop {
        let list = svc.list_all(Pagination::new(page, 3)).await?;
        assert_eq!(list.total_count, 7);
        assert_eq!(list.per_page, 3);
        assert_eq!(list.page, page);
        assert_eq!(list.total_pages(), 3);
        if list.results.is_empty() {
            break;
        }
        seen.extend(list.results.iter().map(|item| item.id));
        page += 1;
    }

    assert_eq!(page, 3);
    assert_eq!(seen.len(), 7);
    assert_eq!(seen.iter().copied().collect::<HashSet<_>>(), expected);
    let mut sorted = seen.clone();
    sorted.sort_unstable();
    assert_eq!(seen, sorted);
    Ok(())
}

/// Unbounded listing returns everything and reports per_page as the total
#[tokio::test]
async fn test_unbounded_listing() -> Result<()> {
    let db = get_db().await?;
    let svc = post_service(&db, true);

    for i in 0..5 {
        svc.create(new_post(&format!("All {i}"))).await?;
    }

    let list = svc.list_all(Pagination::from_raw(0, -1)?).await?;
    assert_eq!(list.total_count, 5);
    assert_eq!(list.results.len(), 5);
    assert_eq!(list.per_page, 5);
    assert_eq!(list.page, 0);

    let empty_db = get_db().await?;
    let list = post_service(&empty_db, true).list_all(Pagination::unbounded()).await?;
    assert_eq!(list.total_count, 0);
    assert_eq!(list.per_page, 0);
    assert!(list.results.is_empty());
    Ok(())
}

/// Pages far past the end come back empty with the real total
#[tokio::test]
async fn test_huge_page_index_is_empty() -> Result<()> {
    let db = get_db().await?;
    let svc = post_service(&db, true);
    svc.create(new_post("Lonely")).await?;

    let list = svc.list_all(Pagination::new(1 << 62, 4)).await?;
    assert_eq!(list.total_count, 1);
    assert!(list.results.is_empty());
    assert_eq!(list.page, 1 << 62);
    assert_eq!(list.per_page, 4);

    let list = svc.list_all(Pagination::from_raw(1 << 40, 1 << 30)?).await?;
    assert_eq!(list.total_count, 1);
    assert!(list.results.is_empty());

    let list = svc.list_all(Pagination::new(0, u64::MAX)).await?;
    assert_eq!(list.results.len(), 1);
    assert_eq!(list.per_page, u64::MAX);
    Ok(())
}

/// A zero page size returns no rows but still counts them
#[tokio::test]
async fn test_zero_page_size() -> Result<()> {
    let db = get_db().await?;
    let svc = post_service(&db, true);
    for i in 0..3 {
        svc.create(new_post(&format!("Zero {i}"))).await?;
    }

    let list = svc.list_all(Pagination::new(0, 0)).await?;
    assert_eq!(list.total_count, 3);
    assert!(list.results.is_empty());
    assert_eq!(list.per_page, 0);
    assert_eq!(list.total_pages(), 0);
    assert!(!list.has_next());
    Ok(())
}

/// Filters apply to both the count and the page
#[tokio::test]
async fn test_filtered_listing() -> Result<()> {
    let db = get_db().await?;
    let svc = post_service(&db, true);

    for i in 0..4 {
        let published = i % 2 == 0;
        svc.create(CreatePost { title: format!("Filtered {i}"), body: String::new(), published }).await?;
    }

    let list = svc.list_published(Pagination { page: 0, per_page: PerPage::Limit(10) }).await?;
    assert_eq!(list.total_count, 2);
    assert!(list.results.iter().all(|item| item.published));

    let select = post::Entity::find();
    let raw = svc.list(select, Pagination::new(1, 3)).await?;
    assert_eq!(raw.total_count, 4);
    assert_eq!(raw.results.len(), 1);
    Ok(())
}

/// A rejected payload stores nothing
#[tokio::test]
async fn test_invalid_create_is_rejected() -> Result<()> {
    let db = get_db().await?;
    let svc = post_service(&db, true);

    let err = svc.create(new_post("   ")).await.unwrap_err();
    assert!(matches!(err, ServiceError::Model(_)));
    assert_eq!(svc.list_all(Pagination::default()).await?.total_count, 0);
    Ok(())
}

/// Database failures surface as the original DbErr
#[tokio::test]
async fn test_db_errors_pass_through() -> Result<()> {
    let db = get_db().await?;
    db.execute_unprepared("DROP TABLE post").await?;

    let err = post_service(&db, true).list_all(Pagination::default()).await.unwrap_err();
    assert!(matches!(err, ServiceError::Db(_)));
    Ok(())
}

/// Paginated results serialize with the documented keys
#[tokio::test]
async fn test_paginated_list_json_shape() -> Result<()> {
    let db = get_db().await?;
    let svc = post_service(&db, true);
    let p = svc.create(new_post("Json Shape")).await?;

    let list = svc.list_all(Pagination::new(0, 10)).await?;
    let json = serde_json::to_value(&list)?;
    assert_eq!(json["total_count"], 1);
    assert_eq!(json["page"], 0);
    assert_eq!(json["per_page"], 10);
    assert_eq!(json["results"][0]["id"], p.id);
    assert_eq!(json["results"][0]["slug"], "json-shape");
    assert!(json["results"][0].get("body").is_none());
    Ok(())
}
