// region:    --- Imports
use super::{
    AuctionRepository, BidPlacement, BidRepository, CategoryRepository, CommentRepository,
    StoreError, UserRepository, WatchlistRepository,
};
use crate::auction::model::{
    Auction, Bid, Category, Comment, NewAuction, NewComment, NewUser, User,
};
use crate::auction::rules;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard};

// endregion: --- Imports

// region:    --- Memory Store
#[derive(Default)]
struct Tables {
    next_id: i64,
    users: BTreeMap<i64, User>,
    categories: BTreeMap<i64, Category>,
    auctions: BTreeMap<i64, Auction>,
    bids: BTreeMap<i64, Bid>,
    comments: BTreeMap<i64, Comment>,
    watchlists: HashMap<i64, BTreeSet<i64>>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn auction_bids(&self, auction_id: i64) -> Vec<Bid> {
        self.bids
            .values()
            .filter(|b| b.auction_id == auction_id)
            .cloned()
            .collect()
    }
}

/// 메모리 저장소 구현체
/// 하나의 잠금으로 모든 테이블을 보호하므로 입찰 검증과 기록이 원자적으로 이루어진다.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn newest_first(mut auctions: Vec<Auction>) -> Vec<Auction> {
    auctions.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
    auctions
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables();
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(StoreError::Duplicate(user.username));
        }
        let id = tables.next_id();
        let user = User {
            id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.tables().users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .tables()
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.tables().users.values().cloned().collect())
    }
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn create_category(&self, name: &str) -> Result<Category, StoreError> {
        let mut tables = self.tables();
        if tables.categories.values().any(|c| c.name == name) {
            return Err(StoreError::Duplicate(name.to_string()));
        }
        let id = tables.next_id();
        let category = Category {
            id,
            name: name.to_string(),
        };
        tables.categories.insert(id, category.clone());
        Ok(category)
    }

    async fn find_category(&self, id: i64) -> Result<Option<Category>, StoreError> {
        Ok(self.tables().categories.get(&id).cloned())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let mut categories: Vec<Category> = self.tables().categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }
}

#[async_trait]
impl AuctionRepository for MemoryStore {
    async fn create_auction(
        &self,
        seller_id: i64,
        auction: NewAuction,
    ) -> Result<Auction, StoreError> {
        let mut tables = self.tables();
        let id = tables.next_id();
        let auction = Auction {
            id,
            title: auction.title,
            description: auction.description,
            starting_bid: auction.starting_bid,
            current_bid: auction.starting_bid,
            image_url: auction.image_url,
            category_id: auction.category_id,
            seller_id,
            closed: false,
            created_at: Utc::now(),
        };
        tables.auctions.insert(id, auction.clone());
        Ok(auction)
    }

    async fn find_auction(&self, id: i64) -> Result<Option<Auction>, StoreError> {
        Ok(self.tables().auctions.get(&id).cloned())
    }

    async fn list_open_auctions(&self) -> Result<Vec<Auction>, StoreError> {
        let open = self
            .tables()
            .auctions
            .values()
            .filter(|a| !a.closed)
            .cloned()
            .collect();
        Ok(newest_first(open))
    }

    async fn list_open_by_category(&self, category_id: i64) -> Result<Vec<Auction>, StoreError> {
        let open = self
            .tables()
            .auctions
            .values()
            .filter(|a| !a.closed && a.category_id == Some(category_id))
            .cloned()
            .collect();
        Ok(newest_first(open))
    }

    async fn list_auctions(&self) -> Result<Vec<Auction>, StoreError> {
        Ok(self.tables().auctions.values().cloned().collect())
    }

    async fn close_auction(&self, id: i64) -> Result<Auction, StoreError> {
        let mut tables = self.tables();
        let auction = tables
            .auctions
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound("경매가 존재하지 않습니다.".to_string()))?;
        auction.closed = true;
        Ok(auction.clone())
    }
}

#[async_trait]
impl BidRepository for MemoryStore {
    async fn place_bid(
        &self,
        auction_id: i64,
        bidder_id: i64,
        bid_price: i64,
    ) -> Result<BidPlacement, StoreError> {
        let mut tables = self.tables();
        let auction = tables
            .auctions
            .get(&auction_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("경매가 존재하지 않습니다.".to_string()))?;

        let highest = tables
            .bids
            .values()
            .filter(|b| b.auction_id == auction_id)
            .map(|b| b.bid_price)
            .max();

        if let Err(rejection) = rules::evaluate_bid(&auction, highest, bid_price) {
            return Ok(BidPlacement::Rejected(rejection));
        }

        let id = tables.next_id();
        let bid = Bid {
            id,
            auction_id,
            bidder_id,
            bid_price,
            created_at: Utc::now(),
        };
        tables.bids.insert(id, bid.clone());
        if let Some(auction) = tables.auctions.get_mut(&auction_id) {
            auction.current_bid = bid_price;
        }
        Ok(BidPlacement::Accepted(bid))
    }

    async fn list_bids_for_auction(&self, auction_id: i64) -> Result<Vec<Bid>, StoreError> {
        let mut bids = self.tables().auction_bids(auction_id);
        bids.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(bids)
    }

    async fn highest_bid(&self, auction_id: i64) -> Result<Option<Bid>, StoreError> {
        let bids = self.tables().auction_bids(auction_id);
        Ok(rules::select_winner(&bids).cloned())
    }

    async fn count_bids(&self, auction_id: i64) -> Result<i64, StoreError> {
        let count = self
            .tables()
            .bids
            .values()
            .filter(|b| b.auction_id == auction_id)
            .count();
        Ok(count as i64)
    }

    async fn list_bids(&self) -> Result<Vec<Bid>, StoreError> {
        Ok(self.tables().bids.values().cloned().collect())
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn add_comment(
        &self,
        auction_id: i64,
        user_id: i64,
        comment: NewComment,
    ) -> Result<Comment, StoreError> {
        let mut tables = self.tables();
        let id = tables.next_id();
        let comment = Comment {
            id,
            auction_id,
            user_id,
            headline: comment.headline,
            message: comment.message,
            created_at: Utc::now(),
        };
        tables.comments.insert(id, comment.clone());
        Ok(comment)
    }

    async fn list_comments_for_auction(
        &self,
        auction_id: i64,
    ) -> Result<Vec<Comment>, StoreError> {
        let mut comments: Vec<Comment> = self
            .tables()
            .comments
            .values()
            .filter(|c| c.auction_id == auction_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(comments)
    }

    async fn list_comments(&self) -> Result<Vec<Comment>, StoreError> {
        Ok(self.tables().comments.values().cloned().collect())
    }
}

#[async_trait]
impl WatchlistRepository for MemoryStore {
    async fn add_to_watchlist(&self, user_id: i64, auction_id: i64) -> Result<bool, StoreError> {
        Ok(self
            .tables()
            .watchlists
            .entry(user_id)
            .or_default()
            .insert(auction_id))
    }

    async fn remove_from_watchlist(
        &self,
        user_id: i64,
        auction_id: i64,
    ) -> Result<bool, StoreError> {
        Ok(self
            .tables()
            .watchlists
            .get_mut(&user_id)
            .map(|watched| watched.remove(&auction_id))
            .unwrap_or(false))
    }

    async fn is_watching(&self, user_id: i64, auction_id: i64) -> Result<bool, StoreError> {
        Ok(self
            .tables()
            .watchlists
            .get(&user_id)
            .is_some_and(|watched| watched.contains(&auction_id)))
    }

    async fn list_watchlist(&self, user_id: i64) -> Result<Option<Vec<Auction>>, StoreError> {
        let tables = self.tables();
        Ok(tables.watchlists.get(&user_id).map(|watched| {
            watched
                .iter()
                .rev()
                .filter_map(|id| tables.auctions.get(id).cloned())
                .collect()
        }))
    }
}

// endregion: --- Memory Store

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;
    use crate::auction::rules::BidRejection;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password_hash: "hash".to_string(),
        }
    }

    fn new_auction(title: &str, starting_bid: i64, category_id: Option<i64>) -> NewAuction {
        NewAuction {
            title: title.to_string(),
            description: "테스트 경매".to_string(),
            starting_bid,
            category_id,
            image_url: None,
        }
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let store = MemoryStore::new();
        store.create_user(new_user("alice")).await.unwrap();

        let err = store.create_user(new_user("alice")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn auction_starts_at_starting_bid() {
        let store = MemoryStore::new();
        let auction = store
            .create_auction(1, new_auction("카메라", 100, None))
            .await
            .unwrap();

        assert_eq!(auction.current_bid, 100);
        assert!(!auction.closed);
    }

    #[tokio::test]
    async fn rejected_bid_changes_nothing() {
        let store = MemoryStore::new();
        let auction = store
            .create_auction(1, new_auction("카메라", 100, None))
            .await
            .unwrap();

        let placement = store.place_bid(auction.id, 2, 100).await.unwrap();
        assert_eq!(
            placement,
            BidPlacement::Rejected(BidRejection::BelowStartingBid { starting_bid: 100 })
        );
        assert_eq!(store.count_bids(auction.id).await.unwrap(), 0);
        assert_eq!(
            store.find_auction(auction.id).await.unwrap().unwrap().current_bid,
            100
        );
    }

    #[tokio::test]
    async fn accepted_bid_raises_current_bid() {
        let store = MemoryStore::new();
        let auction = store
            .create_auction(1, new_auction("카메라", 100, None))
            .await
            .unwrap();

        let placement = store.place_bid(auction.id, 2, 150).await.unwrap();
        assert!(matches!(placement, BidPlacement::Accepted(ref b) if b.bid_price == 150));
        assert_eq!(
            store.find_auction(auction.id).await.unwrap().unwrap().current_bid,
            150
        );
        assert_eq!(
            store.highest_bid(auction.id).await.unwrap().map(|b| b.bidder_id),
            Some(2)
        );
    }

    #[tokio::test]
    async fn concurrent_bids_never_lose_updates() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let auction = store
            .create_auction(1, new_auction("카메라", 100, None))
            .await
            .unwrap();
        let auction_id = auction.id;

        let handles: Vec<_> = (1..=20)
            .map(|i: i64| {
                let store = std::sync::Arc::clone(&store);
                tokio::spawn(async move { store.place_bid(auction_id, i, 100 + i * 10).await })
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
    }

    #[tokio::test]
    async fn closed_auctions_are_hidden_from_open_listings() {
        let store = MemoryStore::new();
        let fashion = store.create_category("Fashion").await.unwrap();
        let open = store
            .create_auction(1, new_auction("재킷", 50, Some(fashion.id)))
            .await
            .unwrap();
        let closed = store
            .create_auction(1, new_auction("모자", 20, Some(fashion.id)))
            .await
            .unwrap();
        store.close_auction(closed.id).await.unwrap();

        let ids: Vec<i64> = store
            .list_open_auctions()
            .await
            .unwrap()
            .iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec![open.id]);

        let ids: Vec<i64> = store
            .list_open_by_category(fashion.id)
            .await
            .unwrap()
            .iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec![open.id]);
    }

    #[tokio::test]
    async fn open_listings_are_newest_first() {
        let store = MemoryStore::new();
        let first = store.create_auction(1, new_auction("첫번째", 10, None)).await.unwrap();
        let second = store.create_auction(1, new_auction("두번째", 10, None)).await.unwrap();

        let ids: Vec<i64> = store
            .list_open_auctions()
            .await
            .unwrap()
            .iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn watchlist_is_a_set_created_on_first_use() {
        let store = MemoryStore::new();
        assert_eq!(store.list_watchlist(7).await.unwrap(), None);

        assert!(store.add_to_watchlist(7, 1).await.unwrap());
        assert!(!store.add_to_watchlist(7, 1).await.unwrap());
        assert!(store.is_watching(7, 1).await.unwrap());

        assert!(store.remove_from_watchlist(7, 1).await.unwrap());
        assert!(!store.remove_from_watchlist(7, 1).await.unwrap());
        assert!(!store.remove_from_watchlist(8, 1).await.unwrap());
        assert_eq!(store.list_watchlist(7).await.unwrap(), Some(vec![]));
    }

    #[tokio::test]
    async fn comments_are_newest_first() {
        let store = MemoryStore::new();
        let comment = |headline: &str| NewComment {
            headline: headline.to_string(),
            message: "메시지".to_string(),
        };
        store.add_comment(1, 2, comment("4")).await.unwrap();
        store.add_comment(1, 3, comment("0")).await.unwrap();
        store.add_comment(2, 3, comment("5")).await.unwrap();

        let headlines: Vec<String> = store
            .list_comments_for_auction(1)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.headline)
            .collect();
        assert_eq!(headlines, vec!["0", "4"]);
    }
}
// endregion: --- Tests
