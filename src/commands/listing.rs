/// 상품 등록 및 댓글 커맨드 처리
// region:    --- Imports
use super::bidding::AUCTION_NOT_FOUND;
use crate::auction::forms::{self, CommentInput, FieldErrors, ListingInput};
use crate::auction::model::{Auction, Comment};
use crate::error::{AppError, Result};
use crate::session::CurrentUser;
use crate::store::{AuctionRepository, CategoryRepository, CommentRepository, Store};
use tracing::info;

// endregion: --- Imports

// region:    --- Commands
pub const INVALID_COMMENT: &str = "올바른 댓글을 입력하세요.";

/// 상품 등록. 판매자는 요청자이며 현재가는 시작가로 시작한다.
pub async fn handle_create_listing(
    store: &dyn Store,
    seller: &CurrentUser,
    input: &ListingInput,
) -> Result<Auction> {
    let new_auction = forms::validate_listing(input).map_err(AppError::ValidationFailed)?;

    if let Some(category_id) = new_auction.category_id {
        if store.find_category(category_id).await?.is_none() {
            return Err(AppError::ValidationFailed(FieldErrors::single(
                "category",
                "올바른 카테고리를 선택하세요.",
            )));
        }
    }

    let auction = store.create_auction(seller.id, new_auction).await?;
    info!(
        "{:<12} --> 상품 등록: id={}, seller={}",
        "Command", auction.id, seller.username
    );
    Ok(auction)
}

/// 댓글 작성 (평점 1-5, 신고 0)
pub async fn handle_add_comment(
    store: &dyn Store,
    auction_id: i64,
    user: &CurrentUser,
    input: &CommentInput,
) -> Result<Comment> {
    let auction = store
        .find_auction(auction_id)
        .await?
        .ok_or_else(|| AppError::NotFound(AUCTION_NOT_FOUND.to_string()))?;

    let new_comment = forms::validate_comment(input)
        .map_err(|_| AppError::BusinessRule(INVALID_COMMENT.to_string()))?;

    let comment = store.add_comment(auction.id, user.id, new_comment).await?;
    info!(
        "{:<12} --> 댓글 작성: auction={}, user={}",
        "Command", auction.id, user.username
    );
    Ok(comment)
}

// endregion: --- Commands

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;
    use crate::auction::model::CommentKind;
    use crate::store::MemoryStore;

    fn seller() -> CurrentUser {
        CurrentUser {
            id: 1,
            username: "seller".to_string(),
        }
    }

    fn listing(category: &str) -> ListingInput {
        ListingInput {
            title: "재킷".to_string(),
            description: "가죽 재킷".to_string(),
            starting_bid: "80".to_string(),
            category: category.to_string(),
            image_url: String::new(),
        }
    }

    #[tokio::test]
    async fn listing_belongs_to_requester_and_starts_at_starting_bid() {
        let store = MemoryStore::new();
        let fashion = store.create_category("Fashion").await.unwrap();

        let auction = handle_create_listing(&store, &seller(), &listing(&fashion.id.to_string()))
            .await
            .unwrap();
        assert_eq!(auction.seller_id, 1);
        assert_eq!(auction.current_bid, 80);
        assert_eq!(auction.category_id, Some(fashion.id));
    }

    #[tokio::test]
    async fn unknown_category_is_a_field_error() {
        let store = MemoryStore::new();

        let err = handle_create_listing(&store, &seller(), &listing("42"))
            .await
            .unwrap_err();
        match err {
            AppError::ValidationFailed(errors) => assert!(errors.get("category").is_some()),
            other => panic!("unexpected: {:?}", other),
        }
        assert!(store.list_auctions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn comment_is_attached_to_auction() {
        let store = MemoryStore::new();
        let auction = handle_create_listing(&store, &seller(), &listing(""))
            .await
            .unwrap();

        let input = CommentInput {
            headline: "0".to_string(),
            message: "도난품으로 의심됩니다".to_string(),
        };
        let comment = handle_add_comment(&store, auction.id, &seller(), &input)
            .await
            .unwrap();
        assert_eq!(comment.kind(), CommentKind::Flag);
        assert_eq!(
            store.list_comments_for_auction(auction.id).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn empty_comment_is_rejected() {
        let store = MemoryStore::new();
        let auction = handle_create_listing(&store, &seller(), &listing(""))
            .await
            .unwrap();

        let err = handle_add_comment(&store, auction.id, &seller(), &CommentInput::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BusinessRule(_)));
    }
}
// endregion: --- Tests
