//! Static catalog of supported shows and name resolution.

use serde::Serialize;

use super::category::ShowCategory;

/// A reality-TV program missions can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Show {
    /// Stable English identifier.
    pub id: &'static str,
    /// Korean name including the season.
    pub name: &'static str,
    /// Korean name shown to viewers.
    pub display_name: &'static str,
    /// Genre bucket.
    pub category: ShowCategory,
    /// Broadcaster page, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub official_url: Option<&'static str>,
    /// Whether the show is currently airing.
    pub is_active: bool,
}

const fn show(
    id: &'static str,
    name: &'static str,
    display_name: &'static str,
    category: ShowCategory,
    official_url: Option<&'static str>,
    is_active: bool,
) -> Show {
    Show {
        id,
        name,
        display_name,
        category,
        official_url,
        is_active,
    }
}

use ShowCategory::{Love, Star, Victory};

/// Every known show, grouped by category in display order.
pub static SHOWS: &[Show] = &[
    show("nasolo", "나는솔로", "나는 솔로", Love, Some("https://prismstudios.sbs.co.kr/"), true),
    show("nasolsagye", "나솔사계", "나솔사계", Love, Some("https://programs.sbs.co.kr/plus/iamsolo_loveforever"), true),
    show("dolsingles6", "돌싱글즈6", "돌싱글즈", Love, Some("https://www.mbn.co.kr/vod/programMain/966"), true),
    show("solojihuk5", "솔로지옥5", "솔로지옥", Love, Some("https://www.netflix.com/kr/title/81436209"), true),
    show("kkeut-sarang", "끝사랑", "끝사랑", Love, Some("https://tv.jtbc.co.kr/lastlove"), false),
    show("hwanseung4", "환승연애4", "환승연애", Love, Some("https://www.tving.com/contents/P001724962"), true),
    show("yeonae-nammae", "연애남매", "연애남매", Love, Some("https://tv.jtbc.co.kr/love_siblings"), false),
    show("habsuk-matseon", "합숙맞선", "합숙맞선", Love, None, true),
    show("choegang-yagu-2025", "최강야구2025", "최강야구", Victory, Some("https://tv.jtbc.co.kr/ckmonsters"), true),
    show("goal-girls-8", "골때녀8", "골 때리는 그녀들", Victory, Some("https://programs.sbs.co.kr/enter/goal"), true),
    show("steel-troops-w", "강철부대W", "강철부대", Victory, Some("https://www.ichannela.com/program/template/program_refinement.do?cateCode=0502&subCateCode=050236&pgm_id=WPG2140182D"), true),
    show("blood-game3", "피의게임3", "피의 게임", Victory, Some("https://www.wavve.com/player/vod?programid=C9901_C99000000115"), true),
    show("univ-war2", "대학전쟁2", "대학전쟁", Victory, Some("https://www.coupangplay.com/"), true),
    show("culinary-class-wars2", "흑백요리사2", "흑백요리사", Victory, Some("https://www.netflix.com/kr/title/81726701"), true),
    show("kick-together3", "뭉쳐야찬다3", "뭉쳐야 찬다", Victory, Some("https://tv.jtbc.co.kr/gentlemen3"), true),
    show("iron-girls", "무쇠소녀단", "무쇠소녀단", Victory, Some("https://tvn.cjenm.com/ko/iron-girls/"), false),
    show("no-exit-gameroom", "노엑싯게임룸", "노엑싯게임룸", Victory, None, true),
    show("mr-trot3", "미스터트롯3", "미스터트롯", Star, Some("http://broadcast.tvchosun.com/broadcast/program/2/C202400150.cstv"), true),
    show("mistrot4", "미스트롯4", "미스트롯", Star, None, true),
    show("active-king2", "현역가왕2", "현역가왕", Star, Some("https://www.mbn.co.kr/vod/programMain/967"), true),
    show("project7", "프로젝트7", "프로젝트", Star, Some("https://project7.jtbc.co.kr/"), true),
    show("universe-league", "유니버스리그", "유니버스 리그", Star, Some("https://programs.sbs.co.kr/enter/universeleague"), true),
    show("show-me-the-money-12", "쇼미더머니12", "쇼미더머니", Star, Some("https://www.mnetplus.world/c/smtm11"), false),
    show("sing-again", "싱어게인", "싱어게인", Star, Some("https://tv.jtbc.co.kr/singagain3"), false),
    show("rap-public", "랩퍼블릭", "랩:퍼블릭", Star, Some("https://www.tving.com/contents/P001763784"), true),
];

/// Abbreviations viewers use for show names, keyed by normalized spelling.
const ALIASES: &[(&str, &str)] = &[
    ("환글", "환승연애"),
    ("나솔", "나는솔로"),
    ("돌싱", "돌싱글즈"),
    ("쇼미더머니", "쇼미더머니12"),
    ("골때리는그녀들", "골때녀8"),
    ("골때리는그녀", "골때녀8"),
    ("골때녀", "골때녀8"),
];

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// All shows currently on air.
pub fn active_shows() -> impl Iterator<Item = &'static Show> {
    SHOWS.iter().filter(|s| s.is_active)
}

/// Shows of one category.
pub fn shows_in(category: ShowCategory) -> impl Iterator<Item = &'static Show> {
    SHOWS.iter().filter(move |s| s.category == category)
}

/// Look a show up by its stable id.
#[must_use]
pub fn show_by_id(id: &str) -> Option<&'static Show> {
    SHOWS.iter().find(|s| s.id == id)
}

/// Look a show up by a loosely written name.
///
/// Whitespace and case are ignored and common abbreviations are expanded.
/// Within each category an exact match on name, display name or id wins over
/// a containment match in either direction.
#[must_use]
pub fn show_by_name(name: &str) -> Option<&'static Show> {
    let target = normalize(name);
    if target.is_empty() {
        return None;
    }
    let resolved = ALIASES
        .iter()
        .find(|(alias, _)| *alias == target)
        .map_or_else(|| target.clone(), |(_, full)| normalize(full));

    for category in ShowCategory::ALL {
        let exact = shows_in(category).find(|s| {
            let n_name = normalize(s.name);
            let n_display = normalize(s.display_name);
            [&resolved, &target]
                .iter()
                .any(|t| n_name == **t || n_display == **t || s.id == t.as_str())
        });
        if exact.is_some() {
            return exact;
        }

        let contained = shows_in(category).find(|s| {
            let n_name = normalize(s.name);
            let n_display = normalize(s.display_name);
            [&resolved, &target].iter().any(|t| {
                n_name.contains(t.as_str())
                    || n_display.contains(t.as_str())
                    || t.contains(n_name.as_str())
            })
        });
        if contained.is_some() {
            return contained;
        }
    }
    None
}

/// Canonical show id for an id or a Korean show name.
#[must_use]
pub fn normalize_show_id(raw: &str) -> Option<&'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Some(show) = show_by_id(raw) {
        return Some(show.id);
    }
    if let Some(show) = show_by_name(raw) {
        tracing::debug!(raw, show_id = show.id, "Resolved show id from name");
        return Some(show.id);
    }
    tracing::warn!(raw, "No registered show matches");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn ids_are_unique() {
        let mut ids: Vec<_> = SHOWS.iter().map(|s| s.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), SHOWS.len());
    }

    #[test]
    fn lookup_by_id() {
        let show = show_by_id("hwanseung4").unwrap();
        assert_eq!(show.display_name, "환승연애");
        assert_eq!(show.category, ShowCategory::Love);
        assert!(show_by_id("unknown").is_none());
    }

    #[test_case("나는솔로", "nasolo"; "exact name")]
    #[test_case("나는 솔로", "nasolo"; "display name with space")]
    #[test_case("나솔", "nasolo"; "alias")]
    #[test_case("환글", "hwanseung4"; "slang alias")]
    #[test_case("돌싱글즈", "dolsingles6"; "season-less name")]
    #[test_case("골 때리는 그녀들", "goal-girls-8"; "display name")]
    #[test_case("골때녀", "goal-girls-8"; "abbreviation")]
    #[test_case("쇼미더머니", "show-me-the-money-12"; "alias to season")]
    #[test_case("Mr-Trot3", "mr-trot3"; "id ignores case")]
    #[test_case("최강야구2025 몬스터즈", "choegang-yagu-2025"; "name contained in query")]
    fn lookup_by_name(name: &str, expected: &str) {
        assert_eq!(show_by_name(name).map(|s| s.id), Some(expected));
    }

    #[test]
    fn lookup_by_name_misses() {
        assert!(show_by_name("").is_none());
        assert!(show_by_name("무한도전").is_none());
    }

    #[test]
    fn normalize_prefers_id_then_name() {
        assert_eq!(normalize_show_id("solojihuk5"), Some("solojihuk5"));
        assert_eq!(normalize_show_id("솔로지옥"), Some("solojihuk5"));
        assert_eq!(normalize_show_id(" "), None);
        assert_eq!(normalize_show_id("무한도전"), None);
    }

    #[test]
    fn active_shows_excludes_ended_ones() {
        assert!(active_shows().all(|s| s.is_active));
        assert!(active_shows().all(|s| s.id != "sing-again"));
    }
}
