//! Postgres 저장소 테스트. DATABASE_URL 이 설정된 경우에만 실행된다.
use auction_house::auction::model::{NewAuction, NewUser, User};
use auction_house::auction::rules::BidRejection;
use auction_house::database::DatabaseManager;
use auction_house::store::{
    AuctionRepository, BidPlacement, BidRepository, PgStore, UserRepository, WatchlistRepository,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// 트레이싱 초기화
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .without_time()
        .with_target(false)
        .with_test_writer()
        .try_init();
}

/// 저장소 설정. DATABASE_URL 이 없으면 None
async fn setup() -> Option<Arc<PgStore>> {
    init_tracing();
    let Ok(url) = std::env::var("DATABASE_URL") else {
        info!("{:<12} --> DATABASE_URL 이 없어 건너뜁니다", "Test");
        return None;
    };
    let db = DatabaseManager::connect(&url, 10).await.unwrap();
    db.initialize_database(false).await.unwrap();
    Some(Arc::new(PgStore::new(Arc::new(db))))
}

/// 테스트마다 겹치지 않는 사용자 생성
async fn create_test_user(store: &PgStore, prefix: &str) -> User {
    store
        .create_user(NewUser {
            username: format!("{}-{}", prefix, Uuid::new_v4()),
            email: String::new(),
            password_hash: "hash".to_string(),
        })
        .await
        .unwrap()
}

async fn create_test_auction(store: &PgStore, seller_id: i64, starting_bid: i64) -> i64 {
    store
        .create_auction(
            seller_id,
            NewAuction {
                title: "테스트 상품".to_string(),
                description: "Postgres 저장소 테스트".to_string(),
                starting_bid,
                category_id: None,
                image_url: None,
            },
        )
        .await
        .unwrap()
        .id
}

/// 입찰 순서 테스트: 90, 100 거절 / 150 수락 / 120 거절
#[tokio::test]
async fn test_pg_bid_sequence() {
    let Some(store) = setup().await else { return };
    let seller = create_test_user(&store, "seller").await;
    let bidder = create_test_user(&store, "bidder").await;
    let auction_id = create_test_auction(&store, seller.id, 100).await;

    for (price, accepted) in [(90, false), (100, false), (150, true), (120, false)] {
        let placement = store.place_bid(auction_id, bidder.id, price).await.unwrap();
        assert_eq!(
            matches!(placement, BidPlacement::Accepted(_)),
            accepted,
            "bid {}",
            price
        );
    }

    let auction = store.find_auction(auction_id).await.unwrap().unwrap();
    assert_eq!(auction.current_bid, 150);
    assert_eq!(store.count_bids(auction_id).await.unwrap(), 1);
    assert_eq!(
        store.highest_bid(auction_id).await.unwrap().map(|b| b.bid_price),
        Some(150)
    );

    store.close_auction(auction_id).await.unwrap();
    let placement = store.place_bid(auction_id, bidder.id, 500).await.unwrap();
    assert_eq!(placement, BidPlacement::Rejected(BidRejection::Closed));
}

/// 동시 입찰 테스트: 행 잠금으로 갱신이 유실되지 않는다.
#[tokio::test]
async fn test_pg_concurrent_bids() {
    let Some(store) = setup().await else { return };
    let seller = create_test_user(&store, "seller").await;
    let auction_id = create_test_auction(&store, seller.id, 100).await;

    let mut bidders = Vec::new();
    for _ in 0..20 {
        bidders.push(create_test_user(&store, "racer").await.id);
    }

    let handles: Vec<_> = bidders
        .into_iter()
        .enumerate()
        .map(|(i, bidder_id)| {
            let store = Arc::clone(&store);
            let price = 110 + i as i64 * 10;
            tokio::spawn(async move { store.place_bid(auction_id, bidder_id, price).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let bids = store.list_bids_for_auction(auction_id).await.unwrap();
    let highest = bids.iter().map(|b| b.bid_price).max().unwrap();
    let current = store.find_auction(auction_id).await.unwrap().unwrap().current_bid;
    assert_eq!(current, highest);
    assert_eq!(current, 300);

    // 수락된 입찰은 기록 순서대로 항상 증가한다.
    let mut recorded: Vec<(i64, i64)> = bids.iter().map(|b| (b.id, b.bid_price)).collect();
    recorded.sort();
    assert!(recorded.windows(2).all(|w| w[0].1 < w[1].1));
}

/// 관심 목록 추가/삭제 충돌 테스트
#[tokio::test]
async fn test_pg_watchlist_conflicts() {
    let Some(store) = setup().await else { return };
    let seller = create_test_user(&store, "seller").await;
    let watcher = create_test_user(&store, "watcher").await;
    let auction_id = create_test_auction(&store, seller.id, 10).await;

    assert!(store.list_watchlist(watcher.id).await.unwrap().is_none());
    assert!(!store.remove_from_watchlist(watcher.id, auction_id).await.unwrap());

    assert!(store.add_to_watchlist(watcher.id, auction_id).await.unwrap());
    assert!(!store.add_to_watchlist(watcher.id, auction_id).await.unwrap());
    assert!(store.is_watching(watcher.id, auction_id).await.unwrap());
    assert_eq!(
        store.list_watchlist(watcher.id).await.unwrap().map(|w| w.len()),
        Some(1)
    );

    assert!(store.remove_from_watchlist(watcher.id, auction_id).await.unwrap());
    assert!(!store.remove_from_watchlist(watcher.id, auction_id).await.unwrap());
    assert!(!store.is_watching(watcher.id, auction_id).await.unwrap());
    assert_eq!(
        store.list_watchlist(watcher.id).await.unwrap().map(|w| w.len()),
        Some(0)
    );
}

/// 중복 아이디는 Duplicate 오류
#[tokio::test]
async fn test_pg_duplicate_username() {
    let Some(store) = setup().await else { return };
    let user = create_test_user(&store, "alice").await;

    let err = store
        .create_user(NewUser {
            username: user.username.clone(),
            email: String::new(),
            password_hash: "hash".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, auction_house::store::StoreError::Duplicate(_)));
}
