/// 저장소 인터페이스
/// 엔티티별 저장소 트레이트와, 이를 모두 구현한 `Store` 로 구성된다.
/// 구현체는 Postgres(`PgStore`)와 메모리(`MemoryStore`) 두 가지.
// region:    --- Imports
use crate::auction::model::{
    Auction, Bid, Category, Comment, NewAuction, NewComment, NewUser, User,
};
use crate::auction::rules::BidRejection;
use async_trait::async_trait;
use thiserror::Error;

// endregion: --- Imports

// region:    --- Modules
pub mod memory;
pub mod postgres;
pub mod queries;

pub use memory::MemoryStore;
pub use postgres::PgStore;

// endregion: --- Modules

// region:    --- Store Error
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("이미 존재합니다: {0}")]
    Duplicate(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// 입찰 처리 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BidPlacement {
    Accepted(Bid),
    Rejected(BidRejection),
}

// endregion: --- Store Error

// region:    --- Repositories
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 아이디 중복 시 `StoreError::Duplicate`
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;
    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create_category(&self, name: &str) -> Result<Category, StoreError>;
    async fn find_category(&self, id: i64) -> Result<Option<Category>, StoreError>;
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;
}

#[async_trait]
pub trait AuctionRepository: Send + Sync {
    /// 현재가는 시작가로 초기화된다.
    async fn create_auction(&self, seller_id: i64, auction: NewAuction)
        -> Result<Auction, StoreError>;
    async fn find_auction(&self, id: i64) -> Result<Option<Auction>, StoreError>;
    /// 진행 중인 경매, 최신순
    async fn list_open_auctions(&self) -> Result<Vec<Auction>, StoreError>;
    /// 카테고리의 진행 중인 경매, 최신순
    async fn list_open_by_category(&self, category_id: i64) -> Result<Vec<Auction>, StoreError>;
    async fn list_auctions(&self) -> Result<Vec<Auction>, StoreError>;
    async fn close_auction(&self, id: i64) -> Result<Auction, StoreError>;
}

#[async_trait]
pub trait BidRepository: Send + Sync {
    /// 경매 단위로 원자적인 입찰: 검증과 기록, 현재가 갱신이 한 번에 이루어진다.
    async fn place_bid(
        &self,
        auction_id: i64,
        bidder_id: i64,
        bid_price: i64,
    ) -> Result<BidPlacement, StoreError>;
    /// 최신순
    async fn list_bids_for_auction(&self, auction_id: i64) -> Result<Vec<Bid>, StoreError>;
    /// 최고가 입찰 (동일가는 먼저 들어온 입찰)
    async fn highest_bid(&self, auction_id: i64) -> Result<Option<Bid>, StoreError>;
    async fn count_bids(&self, auction_id: i64) -> Result<i64, StoreError>;
    async fn list_bids(&self) -> Result<Vec<Bid>, StoreError>;
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn add_comment(
        &self,
        auction_id: i64,
        user_id: i64,
        comment: NewComment,
    ) -> Result<Comment, StoreError>;
    /// 최신순
    async fn list_comments_for_auction(&self, auction_id: i64)
        -> Result<Vec<Comment>, StoreError>;
    async fn list_comments(&self) -> Result<Vec<Comment>, StoreError>;
}

#[async_trait]
pub trait WatchlistRepository: Send + Sync {
    /// 관심 목록이 없으면 만든다. 이미 있던 경매면 false.
    async fn add_to_watchlist(&self, user_id: i64, auction_id: i64) -> Result<bool, StoreError>;
    /// 목록에 없던 경매면 false.
    async fn remove_from_watchlist(&self, user_id: i64, auction_id: i64)
        -> Result<bool, StoreError>;
    async fn is_watching(&self, user_id: i64, auction_id: i64) -> Result<bool, StoreError>;
    /// 관심 목록이 아직 없으면 None. 경매 id 역순.
    async fn list_watchlist(&self, user_id: i64) -> Result<Option<Vec<Auction>>, StoreError>;
}

pub trait Store:
    UserRepository
    + CategoryRepository
    + AuctionRepository
    + BidRepository
    + CommentRepository
    + WatchlistRepository
{
}

impl<T> Store for T where
    T: UserRepository
        + CategoryRepository
        + AuctionRepository
        + BidRepository
        + CommentRepository
        + WatchlistRepository
{
}

// endregion: --- Repositories
