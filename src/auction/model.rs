use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 사용자 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

// 카테고리 모델
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

// 경매 모델
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Auction {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub starting_bid: i64,
    pub current_bid: i64,
    pub image_url: Option<String>,
    pub category_id: Option<i64>,
    pub seller_id: i64,
    pub closed: bool,
    pub created_at: DateTime<Utc>,
}

/// 경매 상태. CLOSED 는 종료 상태이며 OPEN 으로 돌아가지 않는다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuctionState {
    Open,
    Closed,
}

impl Auction {
    pub fn state(&self) -> AuctionState {
        if self.closed {
            AuctionState::Closed
        } else {
            AuctionState::Open
        }
    }
}

// 입찰 모델
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bid {
    pub id: i64,
    pub auction_id: i64,
    pub bidder_id: i64,
    pub bid_price: i64,
    pub created_at: DateTime<Utc>,
}

// 댓글 모델
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub auction_id: i64,
    pub user_id: i64,
    pub headline: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// 댓글 헤드라인 해석: 1~5 는 평점, 0 은 신고, 그 외는 일반 댓글
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "rating", rename_all = "snake_case")]
pub enum CommentKind {
    Rating(u8),
    Flag,
    Remark,
}

impl Comment {
    pub fn kind(&self) -> CommentKind {
        match self.headline.trim().parse::<u8>() {
            Ok(0) => CommentKind::Flag,
            Ok(n @ 1..=5) => CommentKind::Rating(n),
            _ => CommentKind::Remark,
        }
    }
}

// 신규 레코드 (검증을 통과한 입력)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuction {
    pub title: String,
    pub description: String,
    pub starting_bid: i64,
    pub category_id: Option<i64>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub headline: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(headline: &str) -> Comment {
        Comment {
            id: 1,
            auction_id: 1,
            user_id: 1,
            headline: headline.to_string(),
            message: "좋은 물건".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn comment_headline_is_rating_flag_or_remark() {
        assert_eq!(comment("5").kind(), CommentKind::Rating(5));
        assert_eq!(comment(" 1 ").kind(), CommentKind::Rating(1));
        assert_eq!(comment("0").kind(), CommentKind::Flag);
        assert_eq!(comment("6").kind(), CommentKind::Remark);
        assert_eq!(comment("훌륭함").kind(), CommentKind::Remark);
    }
}
