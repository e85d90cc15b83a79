/// 관심 목록 커맨드 처리
/// 관심 목록은 사용자별 경매 집합이며 처음 추가할 때 만들어진다.
// region:    --- Imports
use super::bidding::AUCTION_NOT_FOUND;
use crate::auction::model::Auction;
use crate::error::{AppError, Result};
use crate::session::CurrentUser;
use crate::store::{AuctionRepository, Store, WatchlistRepository};
use tracing::info;

// endregion: --- Imports

// region:    --- Commands
pub const ALREADY_WATCHING: &str = "이미 관심 목록에 추가된 상품입니다.";
pub const NOT_WATCHING: &str = "관심 목록에 없는 상품은 삭제할 수 없습니다.";

async fn find_auction(store: &dyn Store, auction_id: i64) -> Result<Auction> {
    store
        .find_auction(auction_id)
        .await?
        .ok_or_else(|| AppError::NotFound(AUCTION_NOT_FOUND.to_string()))
}

/// 관심 목록 추가. 이미 있으면 변경 없이 오류.
pub async fn handle_add_to_watchlist(
    store: &dyn Store,
    auction_id: i64,
    user: &CurrentUser,
) -> Result<Auction> {
    let auction = find_auction(store, auction_id).await?;
    if !store.add_to_watchlist(user.id, auction.id).await? {
        return Err(AppError::BusinessRule(ALREADY_WATCHING.to_string()));
    }
    info!(
        "{:<12} --> 관심 목록 추가: auction={}, user={}",
        "Command", auction.id, user.username
    );
    Ok(auction)
}

/// 관심 목록 삭제. 없으면 변경 없이 오류.
pub async fn handle_remove_from_watchlist(
    store: &dyn Store,
    auction_id: i64,
    user: &CurrentUser,
) -> Result<Auction> {
    let auction = find_auction(store, auction_id).await?;
    if !store.remove_from_watchlist(user.id, auction.id).await? {
        return Err(AppError::BusinessRule(NOT_WATCHING.to_string()));
    }
    info!(
        "{:<12} --> 관심 목록 삭제: auction={}, user={}",
        "Command", auction.id, user.username
    );
    Ok(auction)
}

// endregion: --- Commands

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;
    use crate::auction::model::NewAuction;
    use crate::store::MemoryStore;

    fn watcher() -> CurrentUser {
        CurrentUser {
            id: 5,
            username: "watcher".to_string(),
        }
    }

    async fn auction(store: &MemoryStore) -> Auction {
        store
            .create_auction(
                1,
                NewAuction {
                    title: "시계".to_string(),
                    description: "손목시계".to_string(),
                    starting_bid: 30,
                    category_id: None,
                    image_url: None,
                },
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn adding_twice_reports_conflict() {
        let store = MemoryStore::new();
        let auction = auction(&store).await;

        handle_add_to_watchlist(&store, auction.id, &watcher()).await.unwrap();
        let err = handle_add_to_watchlist(&store, auction.id, &watcher())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BusinessRule(ref m) if m == ALREADY_WATCHING));
        assert_eq!(
            store.list_watchlist(5).await.unwrap().map(|w| w.len()),
            Some(1)
        );
    }

    #[tokio::test]
    async fn removing_absent_reports_conflict() {
        let store = MemoryStore::new();
        let auction = auction(&store).await;

        let err = handle_remove_from_watchlist(&store, auction.id, &watcher())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BusinessRule(ref m) if m == NOT_WATCHING));

        handle_add_to_watchlist(&store, auction.id, &watcher()).await.unwrap();
        handle_remove_from_watchlist(&store, auction.id, &watcher())
            .await
            .unwrap();
        assert!(!store.is_watching(5, auction.id).await.unwrap());
    }

    #[tokio::test]
    async fn unknown_auction_is_not_found() {
        let store = MemoryStore::new();

        let err = handle_add_to_watchlist(&store, 77, &watcher()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
// endregion: --- Tests
