//! Show detection from free text.
//!
//! The table is ordered: more specific spellings come first so that
//! 나솔사계 is not taken for 나는솔로 and 미스터트롯 not for 미스트롯.

use pick_server::domain::catalog::{ShowCategory, normalize_show_id, show_by_id};

/// Ordered `(patterns, show)` pairs. Patterns are lowercase.
const SHOW_KEYWORDS: &[(&[&str], &str)] = &[
    (&["합숙맞선", "합숙 맞선"], "합숙맞선"),
    (&["쇼미더머니", "show me the money", "smtm", "쇼미"], "쇼미더머니12"),
    (
        &[
            "골때녀",
            "골때리는 그녀",
            "골때리는그녀",
            "goal girls",
            "골때리는 그녀들",
            "fc탑걸",
            "발라드림",
            "액셔니스타",
            "구척장신",
            "개벤져스",
            "월드클라쓰",
        ],
        "골때녀8",
    ),
    (&["나솔사계", "나는 솔로 그 후", "사랑은 계속된다"], "나솔사계"),
    (&["나는솔로", "나는 솔로", "i am solo", "나솔"], "nasolo"),
    (&["환승연애", "환연"], "환승연애4"),
    (&["돌싱글즈", "돌싱"], "dolsingles6"),
    (&["솔로지옥"], "solojihuk5"),
    (&["끝사랑"], "kkeut-sarang"),
    (&["연애남매"], "yeonae-nammae"),
    (&["최강야구", "최강 몬스터즈", "최강몬스터즈"], "choegang-yagu-2025"),
    (&["강철부대"], "steel-troops-w"),
    (&["피의게임", "피의 게임"], "blood-game3"),
    (&["대학전쟁"], "univ-war2"),
    (&["흑백요리사"], "culinary-class-wars2"),
    (&["뭉쳐야찬다", "뭉쳐야 찬다"], "kick-together3"),
    (&["무쇠소녀단"], "iron-girls"),
    (&["노엑싯게임룸", "노엑싯"], "no-exit-gameroom"),
    (&["미스터트롯", "미스터 트롯"], "mr-trot3"),
    (&["미스트롯"], "mistrot4"),
    (&["현역가왕"], "active-king2"),
    (&["프로젝트7", "project 7"], "project7"),
    (&["유니버스리그", "유니버스 리그"], "universe-league"),
    (&["싱어게인"], "sing-again"),
    (&["랩퍼블릭", "랩:퍼블릭"], "rap-public"),
];

/// First show keyword mentioned in the video title, channel name or description.
#[must_use]
pub fn extract_show_keyword(
    title: &str,
    channel_name: &str,
    description: &str,
) -> Option<&'static str> {
    let text = format!("{title} {channel_name} {description}").to_lowercase();
    SHOW_KEYWORDS
        .iter()
        .find(|(patterns, _)| patterns.iter().any(|p| text.contains(p)))
        .map(|(_, show)| *show)
}

/// A show resolved against the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShowMatch {
    /// Canonical show id.
    pub show_id: &'static str,
    /// Category of the show; `LOVE` when the catalog has none.
    pub category: ShowCategory,
}

/// Canonical show and category for a detected keyword or raw show id.
#[must_use]
pub fn resolve_show(keyword: &str) -> Option<ShowMatch> {
    let show_id = normalize_show_id(keyword)?;
    let category = show_by_id(show_id).map_or(ShowCategory::Love, |s| s.category);
    Some(ShowMatch { show_id, category })
}

/// Detect and resolve the show of a video.
#[must_use]
pub fn detect_show(title: &str, channel_name: &str, description: &str) -> Option<ShowMatch> {
    extract_show_keyword(title, channel_name, description).and_then(resolve_show)
}
