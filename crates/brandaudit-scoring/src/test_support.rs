//! Profile builders for scorer tests.

use brandaudit_core::{InfluencerProfile, Post, PostType};
use chrono::{DateTime, TimeZone, Utc};

pub(crate) fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
}

pub(crate) fn post(likes: u64, comments: u64) -> Post {
    Post {
        post_id: format!("p{likes}-{comments}"),
        post_type: PostType::Image,
        caption: String::new(),
        likes_count: likes,
        comments_count: comments,
        timestamp: None,
        hashtags: Vec::new(),
    }
}

pub(crate) fn post_at(likes: u64, comments: u64, at: DateTime<Utc>) -> Post {
    Post {
        timestamp: Some(at),
        ..post(likes, comments)
    }
}

pub(crate) fn profile(followers: u64, following: u64, posts: Vec<Post>) -> InfluencerProfile {
    InfluencerProfile {
        username: "test.creator".to_string(),
        full_name: None,
        biography: None,
        followers_count: Some(followers),
        following_count: Some(following),
        posts_count: None,
        profile_pic_url: None,
        is_verified: false,
        is_business: false,
        recent_posts: posts,
        raw_data: serde_json::Value::Null,
    }
}
