/// 경매 비즈니스 규칙
/// 1. 입찰 수락 조건
/// 2. 경매 종료 권한
/// 3. 낙찰자 결정
// region:    --- Imports
use super::model::{Auction, Bid};
use std::fmt;

// endregion: --- Imports

// region:    --- Bid Acceptance
/// 입찰 거절 사유
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BidRejection {
    /// 종료된 경매
    Closed,
    /// 시작가 이하
    BelowStartingBid { starting_bid: i64 },
    /// 현재가 이하
    BelowCurrentBid { current_bid: i64 },
}

impl BidRejection {
    pub fn code(&self) -> &'static str {
        match self {
            BidRejection::Closed => "ALREADY_ENDED",
            BidRejection::BelowStartingBid { .. } => "BELOW_STARTING_BID",
            BidRejection::BelowCurrentBid { .. } => "LOW_BID",
        }
    }
}

impl fmt::Display for BidRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BidRejection::Closed => write!(f, "경매가 이미 종료되었습니다."),
            BidRejection::BelowStartingBid { starting_bid } => {
                write!(f, "입찰 금액이 시작가({})보다 높아야 합니다.", starting_bid)
            }
            BidRejection::BelowCurrentBid { current_bid } => {
                write!(f, "입찰 금액이 현재가({})보다 높아야 합니다.", current_bid)
            }
        }
    }
}

/// 입찰 기준가: 현재가. 기록된 최고 입찰가가 더 높다면 그 값을 쓴다.
pub fn bid_threshold(auction: &Auction, highest_recorded: Option<i64>) -> i64 {
    match highest_recorded {
        Some(highest) if highest > auction.current_bid => highest,
        _ => auction.current_bid,
    }
}

/// 입찰 가능 여부 검증
/// 시작가와 현재가를 모두 초과해야 하며, 종료된 경매는 금액과 상관없이 거절한다.
pub fn evaluate_bid(
    auction: &Auction,
    highest_recorded: Option<i64>,
    bid_price: i64,
) -> Result<(), BidRejection> {
    if auction.closed {
        return Err(BidRejection::Closed);
    }
    if bid_price <= auction.starting_bid {
        return Err(BidRejection::BelowStartingBid {
            starting_bid: auction.starting_bid,
        });
    }
    let current_bid = bid_threshold(auction, highest_recorded);
    if bid_price <= current_bid {
        return Err(BidRejection::BelowCurrentBid { current_bid });
    }
    Ok(())
}

// endregion: --- Bid Acceptance

// region:    --- Close
/// 경매 종료 거절 사유
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseRejection {
    NotSeller,
}

impl fmt::Display for CloseRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloseRejection::NotSeller => write!(f, "허용되지 않은 요청입니다."),
        }
    }
}

/// 판매자만 경매를 종료할 수 있다. 이미 종료된 경매를 다시 종료해도 거절하지 않는다.
pub fn authorize_close(auction: &Auction, user_id: i64) -> Result<(), CloseRejection> {
    if auction.seller_id != user_id {
        return Err(CloseRejection::NotSeller);
    }
    Ok(())
}

/// 낙찰 입찰: 최고가, 동일가는 먼저 들어온 입찰
pub fn select_winner(bids: &[Bid]) -> Option<&Bid> {
    bids.iter().reduce(|best, bid| {
        let earlier = (bid.created_at, bid.id) < (best.created_at, best.id);
        if bid.bid_price > best.bid_price || (bid.bid_price == best.bid_price && earlier) {
            bid
        } else {
            best
        }
    })
}

// endregion: --- Close

// endregion: --- Tests
