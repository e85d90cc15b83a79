/// 입찰 관련 커맨드 처리
/// 1. 입찰
/// 2. 경매 종료(낙찰)
// region:    --- Imports
use crate::auction::forms::{self, BidInput};
use crate::auction::model::{Auction, Bid, User};
use crate::auction::rules::{self, BidRejection};
use crate::error::{AppError, Result};
use crate::session::CurrentUser;
use crate::store::{AuctionRepository, BidPlacement, BidRepository, Store, UserRepository};
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Commands
pub const AUCTION_NOT_FOUND: &str = "경매가 존재하지 않습니다.";
pub const AUCTION_CLOSED: &str = "이 상품의 경매는 종료되었습니다.";
pub const INVALID_BID: &str =
    "올바른 입찰가를 입력하세요. 입찰가는 시작가와 현재가보다 높아야 합니다.";

/// 경매 종료 결과
#[derive(Debug, Clone)]
pub struct CloseOutcome {
    pub auction: Auction,
    pub winning_bid: Option<Bid>,
    pub winner: Option<User>,
}

/// 1. 입찰
/// 수락되면 입찰이 기록되고 현재가가 입찰가로 갱신된다. 거절되면 아무것도 바뀌지 않는다.
pub async fn handle_place_bid(
    store: &dyn Store,
    auction_id: i64,
    bidder: &CurrentUser,
    input: &BidInput,
) -> Result<Bid> {
    info!(
        "{:<12} --> 입찰 요청 처리 시작: auction={}, bidder={}",
        "Command", auction_id, bidder.username
    );

    let auction = store
        .find_auction(auction_id)
        .await?
        .ok_or_else(|| AppError::NotFound(AUCTION_NOT_FOUND.to_string()))?;

    if auction.closed {
        return Err(AppError::BusinessRule(AUCTION_CLOSED.to_string()));
    }

    let bid_price = forms::validate_bid(input).map_err(|errors| {
        warn!("{:<12} --> 입찰 폼 오류: {}", "Command", errors);
        AppError::BusinessRule(INVALID_BID.to_string())
    })?;

    match store.place_bid(auction.id, bidder.id, bid_price).await? {
        BidPlacement::Accepted(bid) => {
            info!(
                "{:<12} --> 입찰 성공: 현재 가격 {}",
                "Command", bid.bid_price
            );
            Ok(bid)
        }
        BidPlacement::Rejected(BidRejection::Closed) => {
            Err(AppError::BusinessRule(AUCTION_CLOSED.to_string()))
        }
        BidPlacement::Rejected(rejection) => {
            info!(
                "{:<12} --> 입찰 실패({}): {}",
                "Command",
                rejection.code(),
                rejection
            );
            Err(AppError::BusinessRule(INVALID_BID.to_string()))
        }
    }
}

/// 2. 경매 종료(낙찰)
/// 판매자만 종료할 수 있으며 최고 입찰자가 낙찰자가 된다. 대금 정산은 하지 않는다.
pub async fn handle_close_auction(
    store: &dyn Store,
    auction_id: i64,
    user: &CurrentUser,
) -> Result<CloseOutcome> {
    info!(
        "{:<12} --> 경매 종료 요청: auction={}, user={}",
        "Command", auction_id, user.username
    );

    let auction = store
        .find_auction(auction_id)
        .await?
        .ok_or_else(|| AppError::NotFound(AUCTION_NOT_FOUND.to_string()))?;

    rules::authorize_close(&auction, user.id).map_err(|rejection| {
        warn!(
            "{:<12} --> 판매자가 아닌 사용자의 종료 시도: user={}",
            "Command", user.username
        );
        AppError::AuthorizationDenied(rejection.to_string())
    })?;

    let auction = store.close_auction(auction.id).await?;
    let winning_bid = store.highest_bid(auction.id).await?;
    let winner = match &winning_bid {
        Some(bid) => store.find_user_by_id(bid.bidder_id).await?,
        None => None,
    };

    match &winner {
        Some(winner) => info!(
            "{:<12} --> 경매 종료: 낙찰자 {} (정산 미구현)",
            "Command", winner.username
        ),
        None => info!("{:<12} --> 경매 종료: 입찰 없음", "Command"),
    }

    Ok(CloseOutcome {
        auction,
        winning_bid,
        winner,
    })
}

// endregion: --- Commands

// endregion: --- Tests
