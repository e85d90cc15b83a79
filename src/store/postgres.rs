// region:    --- Imports
use super::{
    queries, AuctionRepository, BidPlacement, BidRepository, CategoryRepository,
    CommentRepository, StoreError, UserRepository, WatchlistRepository,
};
use crate::auction::model::{
    Auction, Bid, Category, Comment, NewAuction, NewComment, NewUser, User,
};
use crate::auction::rules;
use crate::database::DatabaseManager;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

// endregion: --- Imports

// region:    --- Postgres Store
/// Postgres 저장소 구현체
pub struct PgStore {
    db: Arc<DatabaseManager>,
}

impl PgStore {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }
}

/// 유니크 제약 위반을 중복 오류로 변환
fn map_unique(err: sqlx::Error, what: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StoreError::Duplicate(what.to_string())
        }
        _ => StoreError::Database(err),
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        info!("{:<12} --> 사용자 생성: {}", "Store", user.username);
        let username = user.username.clone();
        sqlx::query_as::<_, User>(queries::INSERT_USER)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(Utc::now())
            .fetch_one(self.db.pool())
            .await
            .map_err(|e| map_unique(e, &username))
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(sqlx::query_as::<_, User>(queries::GET_USER)
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(sqlx::query_as::<_, User>(queries::GET_USER_BY_USERNAME)
            .bind(username)
            .fetch_optional(self.db.pool())
            .await?)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(sqlx::query_as::<_, User>(queries::GET_ALL_USERS)
            .fetch_all(self.db.pool())
            .await?)
    }
}

#[async_trait]
impl CategoryRepository for PgStore {
    async fn create_category(&self, name: &str) -> Result<Category, StoreError> {
        info!("{:<12} --> 카테고리 생성: {}", "Store", name);
        sqlx::query_as::<_, Category>(queries::INSERT_CATEGORY)
            .bind(name)
            .fetch_one(self.db.pool())
            .await
            .map_err(|e| map_unique(e, name))
    }

    async fn find_category(&self, id: i64) -> Result<Option<Category>, StoreError> {
        Ok(sqlx::query_as::<_, Category>(queries::GET_CATEGORY)
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(sqlx::query_as::<_, Category>(queries::GET_ALL_CATEGORIES)
            .fetch_all(self.db.pool())
            .await?)
    }
}

#[async_trait]
impl AuctionRepository for PgStore {
    async fn create_auction(
        &self,
        seller_id: i64,
        auction: NewAuction,
    ) -> Result<Auction, StoreError> {
        info!("{:<12} --> 경매 생성: {}", "Store", auction.title);
        Ok(sqlx::query_as::<_, Auction>(queries::INSERT_AUCTION)
            .bind(&auction.title)
            .bind(&auction.description)
            .bind(auction.starting_bid)
            .bind(&auction.image_url)
            .bind(auction.category_id)
            .bind(seller_id)
            .bind(Utc::now())
            .fetch_one(self.db.pool())
            .await?)
    }

    async fn find_auction(&self, id: i64) -> Result<Option<Auction>, StoreError> {
        Ok(sqlx::query_as::<_, Auction>(queries::GET_AUCTION)
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?)
    }

    async fn list_open_auctions(&self) -> Result<Vec<Auction>, StoreError> {
        Ok(sqlx::query_as::<_, Auction>(queries::GET_OPEN_AUCTIONS)
            .fetch_all(self.db.pool())
            .await?)
    }

    async fn list_open_by_category(&self, category_id: i64) -> Result<Vec<Auction>, StoreError> {
        Ok(
            sqlx::query_as::<_, Auction>(queries::GET_OPEN_AUCTIONS_BY_CATEGORY)
                .bind(category_id)
                .fetch_all(self.db.pool())
                .await?,
        )
    }

    async fn list_auctions(&self) -> Result<Vec<Auction>, StoreError> {
        Ok(sqlx::query_as::<_, Auction>(queries::GET_ALL_AUCTIONS)
            .fetch_all(self.db.pool())
            .await?)
    }

    async fn close_auction(&self, id: i64) -> Result<Auction, StoreError> {
        info!("{:<12} --> 경매 종료 id: {}", "Store", id);
        sqlx::query_as::<_, Auction>(queries::CLOSE_AUCTION)
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or_else(|| StoreError::NotFound("경매가 존재하지 않습니다.".to_string()))
    }
}

#[async_trait]
impl BidRepository for PgStore {
    async fn place_bid(
        &self,
        auction_id: i64,
        bidder_id: i64,
        bid_price: i64,
    ) -> Result<BidPlacement, StoreError> {
        info!(
            "{:<12} --> 입찰 기록 시도: auction={}, price={}",
            "Store", auction_id, bid_price
        );
        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    // 경매 행을 잠가 같은 경매의 입찰을 직렬화
                    let auction = sqlx::query_as::<_, Auction>(queries::LOCK_AUCTION)
                        .bind(auction_id)
                        .fetch_optional(&mut **tx)
                        .await?
                        .ok_or_else(|| {
                            StoreError::NotFound("경매가 존재하지 않습니다.".to_string())
                        })?;

                    let highest = sqlx::query_scalar::<_, Option<i64>>(
                        queries::GET_HIGHEST_BID_PRICE,
                    )
                    .bind(auction_id)
                    .fetch_one(&mut **tx)
                    .await?;

                    if let Err(rejection) = rules::evaluate_bid(&auction, highest, bid_price) {
                        return Ok(BidPlacement::Rejected(rejection));
                    }

                    let bid = sqlx::query_as::<_, Bid>(queries::INSERT_BID)
                        .bind(auction_id)
                        .bind(bidder_id)
                        .bind(bid_price)
                        .bind(Utc::now())
                        .fetch_one(&mut **tx)
                        .await?;

                    sqlx::query(queries::UPDATE_CURRENT_BID)
                        .bind(bid_price)
                        .bind(auction_id)
                        .execute(&mut **tx)
                        .await?;

                    Ok::<_, StoreError>(BidPlacement::Accepted(bid))
                })
            })
            .await
    }

    async fn list_bids_for_auction(&self, auction_id: i64) -> Result<Vec<Bid>, StoreError> {
        Ok(sqlx::query_as::<_, Bid>(queries::GET_BIDS_FOR_AUCTION)
            .bind(auction_id)
            .fetch_all(self.db.pool())
            .await?)
    }

    async fn highest_bid(&self, auction_id: i64) -> Result<Option<Bid>, StoreError> {
        Ok(sqlx::query_as::<_, Bid>(queries::GET_HIGHEST_BID)
            .bind(auction_id)
            .fetch_optional(self.db.pool())
            .await?)
    }

    async fn count_bids(&self, auction_id: i64) -> Result<i64, StoreError> {
        Ok(sqlx::query_scalar::<_, i64>(queries::COUNT_BIDS)
            .bind(auction_id)
            .fetch_one(self.db.pool())
            .await?)
    }

    async fn list_bids(&self) -> Result<Vec<Bid>, StoreError> {
        Ok(sqlx::query_as::<_, Bid>(queries::GET_ALL_BIDS)
            .fetch_all(self.db.pool())
            .await?)
    }
}

#[async_trait]
impl CommentRepository for PgStore {
    async fn add_comment(
        &self,
        auction_id: i64,
        user_id: i64,
        comment: NewComment,
    ) -> Result<Comment, StoreError> {
        Ok(sqlx::query_as::<_, Comment>(queries::INSERT_COMMENT)
            .bind(auction_id)
            .bind(user_id)
            .bind(&comment.headline)
            .bind(&comment.message)
            .bind(Utc::now())
            .fetch_one(self.db.pool())
            .await?)
    }

    async fn list_comments_for_auction(
        &self,
        auction_id: i64,
    ) -> Result<Vec<Comment>, StoreError> {
        Ok(sqlx::query_as::<_, Comment>(queries::GET_COMMENTS_FOR_AUCTION)
            .bind(auction_id)
            .fetch_all(self.db.pool())
            .await?)
    }

    async fn list_comments(&self) -> Result<Vec<Comment>, StoreError> {
        Ok(sqlx::query_as::<_, Comment>(queries::GET_ALL_COMMENTS)
            .fetch_all(self.db.pool())
            .await?)
    }
}

#[async_trait]
impl WatchlistRepository for PgStore {
    async fn add_to_watchlist(&self, user_id: i64, auction_id: i64) -> Result<bool, StoreError> {
        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    let watchlist_id = sqlx::query_scalar::<_, i64>(queries::UPSERT_WATCHLIST)
                        .bind(user_id)
                        .fetch_one(&mut **tx)
                        .await?;

                    let inserted = sqlx::query(queries::INSERT_WATCHLIST_AUCTION)
                        .bind(watchlist_id)
                        .bind(auction_id)
                        .execute(&mut **tx)
                        .await?
                        .rows_affected();

                    Ok::<_, StoreError>(inserted == 1)
                })
            })
            .await
    }

    async fn remove_from_watchlist(
        &self,
        user_id: i64,
        auction_id: i64,
    ) -> Result<bool, StoreError> {
        let removed = sqlx::query(queries::DELETE_WATCHLIST_AUCTION)
            .bind(user_id)
            .bind(auction_id)
            .execute(self.db.pool())
            .await?
            .rows_affected();
        Ok(removed > 0)
    }

    async fn is_watching(&self, user_id: i64, auction_id: i64) -> Result<bool, StoreError> {
        Ok(sqlx::query_scalar::<_, bool>(queries::IS_WATCHING)
            .bind(user_id)
            .bind(auction_id)
            .fetch_one(self.db.pool())
            .await?)
    }

    async fn list_watchlist(&self, user_id: i64) -> Result<Option<Vec<Auction>>, StoreError> {
        let watchlist_id = sqlx::query_scalar::<_, i64>(queries::GET_WATCHLIST_ID)
            .bind(user_id)
            .fetch_optional(self.db.pool())
            .await?;

        let Some(watchlist_id) = watchlist_id else {
            return Ok(None);
        };

        let auctions = sqlx::query_as::<_, Auction>(queries::GET_WATCHLIST_AUCTIONS)
            .bind(watchlist_id)
            .fetch_all(self.db.pool())
            .await?;
        Ok(Some(auctions))
    }
}

// endregion: --- Postgres Store
