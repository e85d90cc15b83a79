// region:    --- Imports
use super::pages::{
    CategoriesPage, CategoryPage, CommentView, CreatePage, IndexPage, ListingPage, WatchlistPage,
};
use crate::auction::forms::FieldErrors;
use crate::auction::rules;
use crate::error::{AppError, Result};
use crate::session::{CurrentUser, Flash};
use crate::store::{
    AuctionRepository, BidRepository, CategoryRepository, CommentRepository, Store,
    UserRepository, WatchlistRepository,
};
use std::collections::HashMap;
use tracing::info;

// endregion: --- Imports

// region:    --- Query Handlers

/// 진행 중인 경매 조회 (최신순)
pub async fn get_index(store: &dyn Store) -> Result<IndexPage> {
    info!("{:<12} --> 진행 중인 경매 조회", "Query");
    Ok(IndexPage {
        auctions: store.list_open_auctions().await?,
    })
}

/// 카테고리 조회
pub async fn get_categories(store: &dyn Store) -> Result<CategoriesPage> {
    info!("{:<12} --> 카테고리 조회", "Query");
    Ok(CategoriesPage {
        categories: store.list_categories().await?,
    })
}

/// 카테고리별 진행 중인 경매 조회
pub async fn get_category(store: &dyn Store, category_id: i64) -> Result<CategoryPage> {
    info!("{:<12} --> 카테고리 경매 조회 id: {}", "Query", category_id);
    let category = store
        .find_category(category_id)
        .await?
        .ok_or_else(|| AppError::NotFound("카테고리가 존재하지 않습니다.".to_string()))?;
    let auctions = store.list_open_by_category(category.id).await?;
    Ok(CategoryPage { category, auctions })
}

/// 관심 목록 조회
pub async fn get_watchlist(store: &dyn Store, user_id: i64) -> Result<WatchlistPage> {
    info!("{:<12} --> 관심 목록 조회 user: {}", "Query", user_id);
    let page = match store.list_watchlist(user_id).await? {
        Some(auctions) => WatchlistPage {
            watchlist_exists: true,
            count: auctions.len(),
            auctions,
        },
        None => WatchlistPage {
            watchlist_exists: false,
            count: 0,
            auctions: Vec::new(),
        },
    };
    Ok(page)
}

/// 상품 등록 폼
pub async fn get_create_form(store: &dyn Store, errors: Option<FieldErrors>) -> Result<CreatePage> {
    Ok(CreatePage {
        categories: store.list_categories().await?,
        errors,
    })
}

/// 상품 상세 조회
/// 종료 여부와 상관없이 조회할 수 있으며, 종료된 경매는 낙찰 배너를 함께 보여준다.
pub async fn get_listing(
    store: &dyn Store,
    auction_id: i64,
    viewer: Option<&CurrentUser>,
) -> Result<ListingPage> {
    info!("{:<12} --> 상품 상세 조회 id: {}", "Query", auction_id);
    let auction = store
        .find_auction(auction_id)
        .await?
        .ok_or_else(|| AppError::NotFound("경매가 존재하지 않거나 삭제되었습니다.".to_string()))?;

    let watching = match viewer {
        Some(viewer) => store.is_watching(viewer.id, auction.id).await?,
        None => false,
    };
    let is_seller = viewer.is_some_and(|v| v.id == auction.seller_id);

    let bid_count = store.count_bids(auction.id).await?;
    let highest = store.highest_bid(auction.id).await?;
    let minimum_bid =
        rules::bid_threshold(&auction, highest.as_ref().map(|b| b.bid_price)).saturating_add(1);

    let mut usernames: HashMap<i64, Option<String>> = HashMap::new();
    let seller = lookup_username(store, &mut usernames, auction.seller_id).await?;
    let category = match auction.category_id {
        Some(id) => store.find_category(id).await?,
        None => None,
    };

    let mut comments = Vec::new();
    for comment in store.list_comments_for_auction(auction.id).await? {
        let author = lookup_username(store, &mut usernames, comment.user_id).await?;
        comments.push(CommentView {
            kind: comment.kind(),
            author,
            comment,
        });
    }

    let (highest_bidder, banner) = if auction.closed {
        match &highest {
            Some(bid) => {
                let winner = lookup_username(store, &mut usernames, bid.bidder_id).await?;
                let banner = if viewer.is_some_and(|v| v.id == bid.bidder_id) {
                    Flash::info("축하합니다. 이 상품을 낙찰받았습니다.")
                } else {
                    Flash::info(format!(
                        "이 경매의 낙찰자는 {} 입니다.",
                        winner.as_deref().unwrap_or("알 수 없음")
                    ))
                };
                (winner, Some(banner))
            }
            None => (
                None,
                Some(Flash::info("입찰 없이 경매가 종료되었습니다.")),
            ),
        }
    } else {
        (None, None)
    };

    Ok(ListingPage {
        state: auction.state(),
        auction,
        seller,
        category,
        bid_count,
        minimum_bid,
        comments,
        watching,
        is_seller,
        highest_bidder,
        banner,
    })
}

async fn lookup_username(
    store: &dyn Store,
    cache: &mut HashMap<i64, Option<String>>,
    user_id: i64,
) -> Result<Option<String>> {
    if let Some(name) = cache.get(&user_id) {
        return Ok(name.clone());
    }
    let name = store.find_user_by_id(user_id).await?.map(|u| u.username);
    cache.insert(user_id, name.clone());
    Ok(name)
}

// endregion: --- Query Handlers

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;
    use crate::auction::model::{NewAuction, NewUser};
    use crate::store::{BidPlacement, MemoryStore};

    async fn user(store: &MemoryStore, username: &str) -> CurrentUser {
        let user = store
            .create_user(NewUser {
                username: username.to_string(),
                email: String::new(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();
        CurrentUser {
            id: user.id,
            username: user.username,
        }
    }

    #[tokio::test]
    async fn listing_with_largest_bid_still_renders() {
        let store = MemoryStore::new();
        let seller = user(&store, "seller").await;
        let bidder = user(&store, "bidder").await;
        let auction = store
            .create_auction(
                seller.id,
                NewAuction {
                    title: "금괴".to_string(),
                    description: "1kg".to_string(),
                    starting_bid: 100,
                    category_id: None,
                    image_url: None,
                },
            )
            .await
            .unwrap();

        let placement = store.place_bid(auction.id, bidder.id, i64::MAX).await.unwrap();
        assert!(matches!(placement, BidPlacement::Accepted(_)));

        let page = get_listing(&store, auction.id, Some(&bidder)).await.unwrap();
        assert_eq!(page.auction.current_bid, i64::MAX);
        assert_eq!(page.minimum_bid, i64::MAX);
    }

    #[tokio::test]
    async fn closed_listing_names_the_winner() {
        let store = MemoryStore::new();
        let seller = user(&store, "seller").await;
        let bidder = user(&store, "bidder").await;
        let auction = store
            .create_auction(
                seller.id,
                NewAuction {
                    title: "시계".to_string(),
                    description: "손목시계".to_string(),
                    starting_bid: 10,
                    category_id: None,
                    image_url: None,
                },
            )
            .await
            .unwrap();
        store.place_bid(auction.id, bidder.id, 20).await.unwrap();
        store.close_auction(auction.id).await.unwrap();

        let page = get_listing(&store, auction.id, Some(&seller)).await.unwrap();
        assert_eq!(page.highest_bidder.as_deref(), Some("bidder"));
        assert_eq!(
            page.banner.map(|b| b.message),
            Some("이 경매의 낙찰자는 bidder 입니다.".to_string())
        );
    }
}
// endregion: --- Tests
