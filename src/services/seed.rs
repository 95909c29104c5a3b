use crate::{
    db::CatalogStore,
    error::AppResult,
    models::{MediaKind, NewComment, NewContent},
};

fn demo_content() -> NewContent {
    NewContent {
        tmdb_id: "demo-1".to_string(),
        title: "Sample Recommendation".to_string(),
        overview: "Seed data for local development.".to_string(),
        release_date: "2024-01-01".to_string(),
        genre_ids: vec![18],
        popularity: Some(1.0),
        vote_average: Some(7.5),
        vote_count: Some(10),
        adult: Some(false),
        media_type: MediaKind::Film,
        year: "2024".to_string(),
        my_note: "Great starter content.".to_string(),
        my_rating: 4.5,
        tags: vec!["seed".to_string(), "demo".to_string()],
        ..Default::default()
    }
}

/// Inserts one demo record with one comment into an empty store
///
/// Returns whether anything was written.
pub async fn seed_demo(store: &dyn CatalogStore) -> AppResult<bool> {
    if !store.list_contents().await?.is_empty() {
        tracing::debug!(store = store.name(), "Store not empty, skipping demo seed");
        return Ok(false);
    }

    let content = store.create_content(demo_content()).await?;
    store
        .create_comment(
            content.id,
            NewComment {
                nickname: "Seeder".to_string(),
                text: "Looks good!".to_string(),
            },
        )
        .await?;

    tracing::info!(content_id = %content.id, store = store.name(), "Seeded demo content");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryCatalogStore;

    #[tokio::test]
    async fn test_seed_populates_empty_store_once() {
        let store = MemoryCatalogStore::new();

        assert!(seed_demo(&store).await.unwrap());
        assert!(!seed_demo(&store).await.unwrap());

        let contents = store.list_contents().await.unwrap();
        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0].title, "Sample Recommendation");
        assert_eq!(contents[0].genre_ids, vec![18]);

        let comments = store.list_comments(contents[0].id).await.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].nickname, "Seeder");
    }
}
