/// 폼 입력 및 검증
/// url-encoded 요청 본문을 그대로 받는 입력 구조체와, 입력별 순수 검증 함수로 구성된다.
// region:    --- Imports
use super::model::{NewAuction, NewComment};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// endregion: --- Imports

// region:    --- Field Errors
const MAX_USERNAME_LEN: usize = 150;
const MAX_TITLE_LEN: usize = 64;
const MAX_HEADLINE_LEN: usize = 64;
/// 금액 상한. 다음 입찰가(현재가 + 1)도 i64 범위 안에 있다.
pub const MAX_PRICE: i64 = 1_000_000_000_000;

/// 필드별 오류 메시지
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
        write!(f, "{}", parts.join(", "))
    }
}

// endregion: --- Field Errors

// region:    --- Inputs
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// 로그인 후 이동할 경로
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterInput {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirmation: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub starting_bid: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, rename = "imageURL", alias = "image_url")]
    pub image_url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BidInput {
    #[serde(default)]
    pub bid_price: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentInput {
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub message: String,
}

// endregion: --- Inputs

// region:    --- Validation
/// 회원가입 검증 결과 (비밀번호는 해시 전 원문)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

pub fn validate_login(input: &LoginInput) -> Result<(String, String), FieldErrors> {
    let mut errors = FieldErrors::new();
    let username = input.username.trim();
    if username.is_empty() {
        errors.add("username", "아이디를 입력하세요.");
    }
    if input.password.is_empty() {
        errors.add("password", "비밀번호를 입력하세요.");
    }
    errors.into_result((username.to_string(), input.password.clone()))
}

pub fn validate_registration(input: &RegisterInput) -> Result<Registration, FieldErrors> {
    let mut errors = FieldErrors::new();

    let username = input.username.trim();
    if username.is_empty() {
        errors.add("username", "아이디를 입력하세요.");
    } else if username.chars().count() > MAX_USERNAME_LEN {
        errors.add("username", format!("아이디는 {}자 이하여야 합니다.", MAX_USERNAME_LEN));
    }

    let email = input.email.trim();
    if !email.is_empty() && !email.contains('@') {
        errors.add("email", "올바른 이메일 주소를 입력하세요.");
    }

    if input.password.is_empty() {
        errors.add("password", "비밀번호를 입력하세요.");
    } else if input.password != input.confirmation {
        errors.add("confirmation", "비밀번호가 일치해야 합니다.");
    }

    errors.into_result(Registration {
        username: username.to_string(),
        email: email.to_string(),
        password: input.password.clone(),
    })
}

pub fn validate_listing(input: &ListingInput) -> Result<NewAuction, FieldErrors> {
    let mut errors = FieldErrors::new();

    let title = input.title.trim();
    if title.is_empty() {
        errors.add("title", "제목을 입력하세요.");
    } else if title.chars().count() > MAX_TITLE_LEN {
        errors.add("title", format!("제목은 {}자 이하여야 합니다.", MAX_TITLE_LEN));
    }

    let description = input.description.trim();
    if description.is_empty() {
        errors.add("description", "설명을 입력하세요.");
    }

    let starting_bid = parse_price(&input.starting_bid).unwrap_or_else(|message| {
        errors.add("starting_bid", message);
        0
    });

    let category = input.category.trim();
    let category_id = if category.is_empty() {
        None
    } else {
        match category.parse::<i64>() {
            Ok(id) => Some(id),
            Err(_) => {
                errors.add("category", "올바른 카테고리를 선택하세요.");
                None
            }
        }
    };

    let image_url = input.image_url.trim();
    let image_url = if image_url.is_empty() {
        None
    } else {
        match url::Url::parse(image_url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Some(image_url.to_string()),
            _ => {
                errors.add("imageURL", "올바른 이미지 URL 을 입력하세요.");
                None
            }
        }
    };

    errors.into_result(NewAuction {
        title: title.to_string(),
        description: description.to_string(),
        starting_bid,
        category_id,
        image_url,
    })
}

pub fn validate_bid(input: &BidInput) -> Result<i64, FieldErrors> {
    parse_price(&input.bid_price).map_err(|message| FieldErrors::single("bid_price", message))
}

pub fn validate_comment(input: &CommentInput) -> Result<NewComment, FieldErrors> {
    let mut errors = FieldErrors::new();

    let headline = input.headline.trim();
    if headline.is_empty() {
        errors.add("headline", "평점(1-5) 또는 0 을 입력하세요.");
    } else if headline.chars().count() > MAX_HEADLINE_LEN {
        errors.add("headline", format!("헤드라인은 {}자 이하여야 합니다.", MAX_HEADLINE_LEN));
    }

    let message = input.message.trim();
    if message.is_empty() {
        errors.add("message", "내용을 입력하세요.");
    }

    errors.into_result(NewComment {
        headline: headline.to_string(),
        message: message.to_string(),
    })
}

fn parse_price(raw: &str) -> Result<i64, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("금액을 입력하세요.");
    }
    match raw.parse::<i64>() {
        Ok(price) if price > MAX_PRICE => Err("금액이 허용 범위를 넘었습니다."),
        Ok(price) if price >= 1 => Ok(price),
        Ok(_) => Err("금액은 1 이상이어야 합니다."),
        Err(_) => Err("금액은 정수여야 합니다."),
    }
}

// endregion: --- Validation

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> ListingInput {
        ListingInput {
            title: "빈티지 카메라".to_string(),
            description: "1970년대 필름 카메라".to_string(),
            starting_bid: "100".to_string(),
            category: "".to_string(),
            image_url: "".to_string(),
        }
    }

    #[test]
    fn registration_requires_matching_passwords() {
        let input = RegisterInput {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "secret".to_string(),
            confirmation: "secrets".to_string(),
        };

        let errors = validate_registration(&input).unwrap_err();
        assert_eq!(errors.get("confirmation"), Some("비밀번호가 일치해야 합니다."));
    }

    #[test]
    fn registration_trims_username() {
        let input = RegisterInput {
            username: "  alice ".to_string(),
            email: "".to_string(),
            password: "secret".to_string(),
            confirmation: "secret".to_string(),
        };

        let valid = validate_registration(&input).unwrap();
        assert_eq!(valid.username, "alice");
        assert_eq!(valid.email, "");
    }

    #[test]
    fn listing_with_optional_fields_left_blank() {
        let valid = validate_listing(&listing()).unwrap();

        assert_eq!(valid.starting_bid, 100);
        assert_eq!(valid.category_id, None);
        assert_eq!(valid.image_url, None);
    }

    #[test]
    fn listing_collects_every_field_error() {
        let input = ListingInput {
            title: "".to_string(),
            description: " ".to_string(),
            starting_bid: "열 개".to_string(),
            category: "fashion".to_string(),
            image_url: "ftp://example.com/a.png".to_string(),
        };

        let errors = validate_listing(&input).unwrap_err();
        for field in ["title", "description", "starting_bid", "category", "imageURL"] {
            assert!(errors.get(field).is_some(), "missing error for {}", field);
        }
    }

    #[test]
    fn listing_accepts_http_image_url() {
        let mut input = listing();
        input.image_url = "https://example.com/camera.png".to_string();
        input.category = "3".to_string();

        let valid = validate_listing(&input).unwrap();
        assert_eq!(valid.image_url.as_deref(), Some("https://example.com/camera.png"));
        assert_eq!(valid.category_id, Some(3));
    }

    #[test]
    fn bid_price_must_be_positive_integer() {
        let bid = |raw: &str| BidInput {
            bid_price: raw.to_string(),
        };

        assert_eq!(validate_bid(&bid("150")), Ok(150));
        assert!(validate_bid(&bid("0")).is_err());
        assert!(validate_bid(&bid("-5")).is_err());
        assert!(validate_bid(&bid("12.5")).is_err());
        assert!(validate_bid(&bid("")).is_err());
    }

    #[test]
    fn prices_above_the_cap_are_rejected() {
        let bid = |raw: String| BidInput { bid_price: raw };

        assert_eq!(validate_bid(&bid(MAX_PRICE.to_string())), Ok(MAX_PRICE));
        assert!(validate_bid(&bid((MAX_PRICE + 1).to_string())).is_err());
        assert!(validate_bid(&bid(i64::MAX.to_string())).is_err());

        let mut input = listing();
        input.starting_bid = i64::MAX.to_string();
        let errors = validate_listing(&input).unwrap_err();
        assert!(errors.get("starting_bid").is_some());
    }

    #[test]
    fn comment_requires_headline_and_message() {
        let errors = validate_comment(&CommentInput::default()).unwrap_err();
        assert!(errors.get("headline").is_some());
        assert!(errors.get("message").is_some());

        let valid = validate_comment(&CommentInput {
            headline: "5".to_string(),
            message: "빠른 배송".to_string(),
        })
        .unwrap();
        assert_eq!(valid.headline, "5");
    }
}
// endregion: --- Tests
