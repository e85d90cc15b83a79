// region:    --- Users
/// 사용자 생성
pub const INSERT_USER: &str = r#"
    INSERT INTO users (username, email, password_hash, created_at)
    VALUES ($1, $2, $3, $4)
    RETURNING id, username, email, password_hash, created_at
"#;

/// 사용자 조회
pub const GET_USER: &str =
    "SELECT id, username, email, password_hash, created_at FROM users WHERE id = $1";

/// 아이디로 사용자 조회
pub const GET_USER_BY_USERNAME: &str =
    "SELECT id, username, email, password_hash, created_at FROM users WHERE username = $1";

/// 모든 사용자 조회
pub const GET_ALL_USERS: &str =
    "SELECT id, username, email, password_hash, created_at FROM users ORDER BY id";

// endregion: --- Users

// region:    --- Categories
/// 카테고리 생성
pub const INSERT_CATEGORY: &str = "INSERT INTO categories (name) VALUES ($1) RETURNING id, name";

/// 카테고리 조회
pub const GET_CATEGORY: &str = "SELECT id, name FROM categories WHERE id = $1";

/// 모든 카테고리 조회
pub const GET_ALL_CATEGORIES: &str = "SELECT id, name FROM categories ORDER BY name";

// endregion: --- Categories

// region:    --- Auctions
/// 경매 생성 (현재가 = 시작가)
pub const INSERT_AUCTION: &str = r#"
    INSERT INTO auctions (title, description, starting_bid, current_bid, image_url, category_id, seller_id, closed, created_at)
    VALUES ($1, $2, $3, $3, $4, $5, $6, FALSE, $7)
    RETURNING id, title, description, starting_bid, current_bid, image_url, category_id, seller_id, closed, created_at
"#;

/// 경매 조회
pub const GET_AUCTION: &str = "SELECT id, title, description, starting_bid, current_bid, image_url, category_id, seller_id, closed, created_at FROM auctions WHERE id = $1";

/// 경매 조회 (행 잠금)
pub const LOCK_AUCTION: &str = "SELECT id, title, description, starting_bid, current_bid, image_url, category_id, seller_id, closed, created_at FROM auctions WHERE id = $1 FOR UPDATE";

/// 진행 중인 경매 조회
pub const GET_OPEN_AUCTIONS: &str = r#"
    SELECT id, title, description, starting_bid, current_bid, image_url, category_id, seller_id, closed, created_at
    FROM auctions
    WHERE closed = FALSE
    ORDER BY created_at DESC, id DESC
"#;

/// 카테고리별 진행 중인 경매 조회
pub const GET_OPEN_AUCTIONS_BY_CATEGORY: &str = r#"
    SELECT id, title, description, starting_bid, current_bid, image_url, category_id, seller_id, closed, created_at
    FROM auctions
    WHERE closed = FALSE AND category_id = $1
    ORDER BY created_at DESC, id DESC
"#;

/// 모든 경매 조회
pub const GET_ALL_AUCTIONS: &str = "SELECT id, title, description, starting_bid, current_bid, image_url, category_id, seller_id, closed, created_at FROM auctions ORDER BY id";

/// 경매 종료
pub const CLOSE_AUCTION: &str = r#"
    UPDATE auctions SET closed = TRUE WHERE id = $1
    RETURNING id, title, description, starting_bid, current_bid, image_url, category_id, seller_id, closed, created_at
"#;

/// 현재가 갱신
pub const UPDATE_CURRENT_BID: &str = "UPDATE auctions SET current_bid = $1 WHERE id = $2";

// endregion: --- Auctions

// region:    --- Bids
/// 입찰 기록
pub const INSERT_BID: &str = r#"
    INSERT INTO bids (auction_id, bidder_id, bid_price, created_at)
    VALUES ($1, $2, $3, $4)
    RETURNING id, auction_id, bidder_id, bid_price, created_at
"#;

/// 입찰 이력 조회
pub const GET_BIDS_FOR_AUCTION: &str = r#"
    SELECT id, auction_id, bidder_id, bid_price, created_at
    FROM bids
    WHERE auction_id = $1
    ORDER BY created_at DESC, id DESC
"#;

/// 최고 입찰 조회
pub const GET_HIGHEST_BID: &str = r#"
    SELECT id, auction_id, bidder_id, bid_price, created_at
    FROM bids
    WHERE auction_id = $1
    ORDER BY bid_price DESC, created_at ASC, id ASC
    LIMIT 1
"#;

/// 최고 입찰가 조회
pub const GET_HIGHEST_BID_PRICE: &str =
    "SELECT MAX(bid_price) AS highest_bid FROM bids WHERE auction_id = $1";

/// 입찰 수 조회
pub const COUNT_BIDS: &str = "SELECT COUNT(*) FROM bids WHERE auction_id = $1";

/// 모든 입찰 조회
pub const GET_ALL_BIDS: &str =
    "SELECT id, auction_id, bidder_id, bid_price, created_at FROM bids ORDER BY id";

// endregion: --- Bids

// region:    --- Comments
/// 댓글 작성
pub const INSERT_COMMENT: &str = r#"
    INSERT INTO comments (auction_id, user_id, headline, message, created_at)
    VALUES ($1, $2, $3, $4, $5)
    RETURNING id, auction_id, user_id, headline, message, created_at
"#;

/// 경매 댓글 조회
pub const GET_COMMENTS_FOR_AUCTION: &str = r#"
    SELECT id, auction_id, user_id, headline, message, created_at
    FROM comments
    WHERE auction_id = $1
    ORDER BY created_at DESC, id DESC
"#;

/// 모든 댓글 조회
pub const GET_ALL_COMMENTS: &str =
    "SELECT id, auction_id, user_id, headline, message, created_at FROM comments ORDER BY id";

// endregion: --- Comments

// region:    --- Watchlists
/// 관심 목록 생성 또는 조회
pub const UPSERT_WATCHLIST: &str = r#"
    INSERT INTO watchlists (user_id) VALUES ($1)
    ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
    RETURNING id
"#;

/// 관심 목록 id 조회
pub const GET_WATCHLIST_ID: &str = "SELECT id FROM watchlists WHERE user_id = $1";

/// 관심 경매 추가
pub const INSERT_WATCHLIST_AUCTION: &str = r#"
    INSERT INTO watchlist_auctions (watchlist_id, auction_id) VALUES ($1, $2)
    ON CONFLICT (watchlist_id, auction_id) DO NOTHING
"#;

/// 관심 경매 삭제
pub const DELETE_WATCHLIST_AUCTION: &str = r#"
    DELETE FROM watchlist_auctions wa
    USING watchlists w
    WHERE wa.watchlist_id = w.id AND w.user_id = $1 AND wa.auction_id = $2
"#;

/// 관심 경매 여부
pub const IS_WATCHING: &str = r#"
    SELECT EXISTS (
        SELECT 1 FROM watchlist_auctions wa
        JOIN watchlists w ON wa.watchlist_id = w.id
        WHERE w.user_id = $1 AND wa.auction_id = $2
    )
"#;

/// 관심 경매 조회
pub const GET_WATCHLIST_AUCTIONS: &str = r#"
    SELECT a.id, a.title, a.description, a.starting_bid, a.current_bid, a.image_url, a.category_id, a.seller_id, a.closed, a.created_at
    FROM auctions a
    JOIN watchlist_auctions wa ON wa.auction_id = a.id
    WHERE wa.watchlist_id = $1
    ORDER BY a.id DESC
"#;

// endregion: --- Watchlists
