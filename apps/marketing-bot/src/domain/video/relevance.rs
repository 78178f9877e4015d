//! Does a search hit actually talk about the show that was searched for?

/// Spellings each program goes by, keyed by its whitespace-free Korean name.
const PROGRAM_KEYWORDS: &[(&str, &[&str])] = &[
    ("나는솔로", &["나는솔로", "나는 솔로", "나솔", "I am SOLO", "아이엠솔로"]),
    ("나솔사계", &["나솔사계", "사랑은 계속된다"]),
    ("솔로지옥", &["솔로지옥", "Single's Inferno", "싱글즈 인페르노"]),
    ("환승연애", &["환승연애", "환연", "Transit Love", "트랜짓 러브"]),
    ("합숙맞선", &["합숙맞선", "합숙 맞선"]),
    ("최강야구", &["최강야구", "몬스터즈", "김성근"]),
    ("골때리는그녀들", &["골때녀", "골 때리는 그녀들", "골때리는그녀들"]),
    ("뭉쳐야찬다", &["뭉쳐야찬다", "뭉쳐야 찬다"]),
    ("미스터트롯", &["미스터트롯", "미스터 트롯", "Mr. Trot"]),
    ("현역가왕", &["현역가왕"]),
    ("쇼미더머니", &["쇼미더머니", "Show Me The Money", "SMTM"]),
];

/// Keywords that mark a 솔로지옥 video.
const SOLO_HELL_MARKERS: &[&str] = &["솔로지옥", "single's inferno", "싱글즈 인페르노"];

/// Keywords that mark a 나는솔로 video.
const I_AM_SOLO_MARKERS: &[&str] = &["나는솔로", "나는 솔로", "나솔", "i am solo"];

fn squash(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Spellings to look for when searching `keyword`.
///
/// Unknown keywords only match themselves.
#[must_use]
pub fn program_keywords(keyword: &str) -> Vec<String> {
    let key = squash(keyword);
    PROGRAM_KEYWORDS
        .iter()
        .find(|(program, _)| *program == key)
        .map_or_else(
            || vec![keyword.trim().to_string()],
            |(_, spellings)| spellings.iter().map(|s| (*s).to_string()).collect(),
        )
}

/// Whether a video with `title` and `description` belongs to the `keyword` search.
///
/// The two solo shows share vocabulary, so a 나는솔로 search drops 솔로지옥
/// videos and the other way round.
#[must_use]
pub fn is_relevant(keyword: &str, title: &str, description: &str) -> bool {
    let text = format!("{} {}", title.to_lowercase(), description.to_lowercase());
    let mentions = |needle: &str| text.contains(&needle.to_lowercase());

    if !program_keywords(keyword).iter().any(|k| mentions(k)) {
        return false;
    }
    match squash(keyword).as_str() {
        "나는솔로" => !SOLO_HELL_MARKERS.iter().any(|m| mentions(m)),
        "솔로지옥" => !I_AM_SOLO_MARKERS.iter().any(|m| mentions(m)),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("나는솔로", "나솔 24기 옥순 근황", "", true; "alias in title")]
    #[test_case("나는 솔로", "I AM SOLO 리뷰", "", true; "display name and english")]
    #[test_case("나는솔로", "솔로지옥 vs 나는솔로", "", false; "rival show excluded")]
    #[test_case("솔로지옥", "솔로지옥5 최종회", "나솔 출연자도 등장", false; "rival in description")]
    #[test_case("솔로지옥", "Single's Inferno 5 ep1", "", true; "english title")]
    #[test_case("최강야구", "김성근 감독 인터뷰", "", true; "program person")]
    #[test_case("흑백요리사", "흑백요리사2 셰프 반응", "", true; "unknown program uses itself")]
    #[test_case("흑백요리사", "오늘의 요리", "맛있다", false; "no mention")]
    fn relevance(keyword: &str, title: &str, description: &str, expected: bool) {
        assert_eq!(is_relevant(keyword, title, description), expected);
    }

    #[test]
    fn program_keywords_ignore_spacing() {
        assert!(program_keywords("골 때리는 그녀들").contains(&"골때녀".to_string()));
        assert_eq!(program_keywords(" 피의게임 "), vec!["피의게임".to_string()]);
    }
}
