use crate::auction::forms::FieldErrors;
use crate::auction::model::{Auction, AuctionState, Category, Comment, CommentKind};
use crate::session::{CurrentUser, Flash};
use serde::Serialize;

// 공통 페이지: 로그인 사용자와 플래시 메시지를 담는다.
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub user: Option<CurrentUser>,
    pub messages: Vec<Flash>,
    #[serde(flatten)]
    pub body: T,
}

// 진행 중인 경매 목록
#[derive(Debug, Serialize)]
pub struct IndexPage {
    pub auctions: Vec<Auction>,
}

// 카테고리 목록
#[derive(Debug, Serialize)]
pub struct CategoriesPage {
    pub categories: Vec<Category>,
}

// 카테고리별 진행 중인 경매
#[derive(Debug, Serialize)]
pub struct CategoryPage {
    pub category: Category,
    pub auctions: Vec<Auction>,
}

// 관심 목록. 아직 만들어지지 않았다면 watchlist_exists = false
#[derive(Debug, Serialize)]
pub struct WatchlistPage {
    pub watchlist_exists: bool,
    pub count: usize,
    pub auctions: Vec<Auction>,
}

#[derive(Debug, Serialize)]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: Comment,
    pub author: Option<String>,
    pub kind: CommentKind,
}

// 상품 상세
#[derive(Debug, Serialize)]
pub struct ListingPage {
    pub auction: Auction,
    pub state: AuctionState,
    pub seller: Option<String>,
    pub category: Option<Category>,
    pub bid_count: i64,
    pub minimum_bid: i64,
    pub comments: Vec<CommentView>,
    pub watching: bool,
    pub is_seller: bool,
    pub highest_bidder: Option<String>,
    pub banner: Option<Flash>,
}

// 상품 등록 폼
#[derive(Debug, Serialize)]
pub struct CreatePage {
    pub categories: Vec<Category>,
    pub errors: Option<FieldErrors>,
}

// 로그인 폼
#[derive(Debug, Default, Serialize)]
pub struct LoginPage {
    pub message: Option<String>,
    pub next: Option<String>,
}

// 회원가입 폼
#[derive(Debug, Default, Serialize)]
pub struct RegisterPage {
    pub message: Option<String>,
    pub errors: Option<FieldErrors>,
}
