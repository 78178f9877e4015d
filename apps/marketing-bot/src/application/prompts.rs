//! Gemini prompts and reply parsing.
//!
//! Replies are free text; the first `{` through the last `}` is taken as the
//! JSON payload.

use serde::{Deserialize, Serialize};

use pick_server::domain::mission::{MissionForm, MissionKind};

use crate::domain::draft::DraftContent;

/// Description characters shown to the screening prompt.
pub const SCREENING_DESCRIPTION_CHARS: usize = 500;

/// Characters of the video text excerpt shown to the drafting prompt.
pub const DRAFT_EXCERPT_CHARS: usize = 3000;

/// Drafts kept from one reply.
pub const MAX_DRAFTS_PER_VIDEO: usize = 3;

/// Post characters shown to the comment prompt.
pub const COMMENT_CONTENT_CHARS: usize = 1000;

/// Longest suggested comment.
pub const MAX_COMMENT_CHARS: usize = 50;

/// Comment used when generation fails.
pub const FALLBACK_COMMENT: &str = "재미있는 글이네요! 저도 궁금했던 내용이에요 😊";

/// Reason reported for an unreadable screening reply.
pub const PARSE_FAILURE_REASON: &str = "파싱 실패";

fn take_chars(text: &str, n: usize) -> String {
    text.chars().take(n).collect()
}

fn json_object(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (end > start).then(|| &reply[start..=end])
}

// =============================================================================
// Screening
// =============================================================================

/// Prompt asking whether viewers would vote on a video.
#[must_use]
pub fn screening_prompt(title: &str, description: &str) -> String {
    format!(
        r#"당신은 예능/리얼리티 투표 앱의 콘텐츠 선정자입니다.
다음 YouTube 영상 정보를 보고, 시청자들이 이 영상의 내용을 바탕으로 투표(A vs B, 찬성 vs 반대 등)를 하고 싶어할지 판단해주세요.

[선정 기준]
- 투표 가치 있음 (true): 인물 간의 갈등, 삼각관계, 선택의 순간, 의견이 갈릴 만한 행동, 결과 발표나 고백 같은 주요 장면
- 가치 없음 (false): 단순 광고, 짧은 예고편, 뉴스 보도, 관련 없는 일상 브이로그

제목: {title}
설명(일부): {description}

반드시 아래 JSON 형식으로만 응답하세요.
{{"voteWorthy": true 또는 false, "reason": "선정 또는 제외 이유 (한 줄)"}}"#,
        description = take_chars(description, SCREENING_DESCRIPTION_CHARS),
    )
}

/// Screening decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreeningVerdict {
    /// Whether the video is worth a mission.
    #[serde(default)]
    pub vote_worthy: bool,
    /// One-line reason.
    #[serde(default)]
    pub reason: String,
}

/// Parse a screening reply. Unreadable replies are not vote-worthy.
#[must_use]
pub fn parse_screening(reply: &str) -> ScreeningVerdict {
    json_object(reply)
        .and_then(|json| serde_json::from_str(json).ok())
        .unwrap_or_else(|| {
            tracing::warn!(reply = %take_chars(reply, 200), "Screening reply is not JSON");
            ScreeningVerdict {
                vote_worthy: false,
                reason: PARSE_FAILURE_REASON.to_string(),
            }
        })
}

// =============================================================================
// Draft generation
// =============================================================================

/// Prompt asking for mission drafts about a video.
#[must_use]
pub fn draft_prompt(title: &str, description: &str, keyword: Option<&str>) -> String {
    let program = keyword
        .filter(|k| !k.trim().is_empty())
        .map_or_else(String::new, |k| format!("\n프로그램 키워드: {k}"));
    format!(
        r#"당신은 리얼리티 예능 투표 앱 '리얼픽'의 미션 작가입니다.
아래 YouTube 영상을 보고 시청자가 참여하고 싶어할 투표 미션을 최대 {max}개 만들어주세요.

제목: {title}{program}
영상 내용(일부): {excerpt}

[규칙]
- kind: 다수결 투표는 "majority", 결과 예측은 "predict"
- form: 두 개 선택지는 "binary", 세 개 이상은 "multi", 자유 답변은 "subjective"
- options: binary/multi일 때 선택지 목록
- showId: 영상이 다루는 프로그램

반드시 아래 JSON 형식으로만 응답하세요.
{{"missions": [{{"title": "...", "description": "...", "kind": "majority", "form": "binary", "options": ["A", "B"], "category": "LOVE", "showId": "nasolo"}}]}}"#,
        max = MAX_DRAFTS_PER_VIDEO,
        excerpt = take_chars(description, DRAFT_EXCERPT_CHARS),
    )
}

/// One mission proposed by the model, before show resolution.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftProposal {
    /// Question.
    #[serde(default)]
    pub title: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Raw kind.
    #[serde(default)]
    pub kind: String,
    /// Raw form.
    #[serde(default)]
    pub form: String,
    /// Options.
    #[serde(default)]
    pub options: Vec<String>,
    /// Category suggested by the model.
    #[serde(default)]
    pub category: Option<String>,
    /// Show suggested by the model.
    #[serde(default)]
    pub show_id: Option<String>,
}

#[derive(Deserialize)]
struct DraftReply {
    #[serde(default)]
    missions: Vec<DraftProposal>,
}

/// `predict` and `prediction` are predictions; anything else is a majority vote.
#[must_use]
pub fn parse_kind(raw: &str) -> MissionKind {
    match raw.trim().to_ascii_lowercase().as_str() {
        "predict" | "prediction" => MissionKind::Predict,
        _ => MissionKind::Majority,
    }
}

/// Form from the model, falling back on the option count.
#[must_use]
pub fn parse_form(raw: &str, option_count: usize) -> MissionForm {
    match raw.trim().to_ascii_lowercase().as_str() {
        "binary" => MissionForm::Binary,
        "multi" | "multiple" => MissionForm::Multi,
        "subjective" => MissionForm::Subjective,
        _ if option_count == 2 => MissionForm::Binary,
        _ if option_count == 0 => MissionForm::Subjective,
        _ => MissionForm::Multi,
    }
}

impl DraftProposal {
    /// Typed mission content.
    #[must_use]
    pub fn content(&self) -> DraftContent {
        DraftContent {
            title: self.title.clone(),
            description: self.description.clone(),
            kind: parse_kind(&self.kind),
            form: parse_form(&self.form, self.options.len()),
            options: self.options.clone(),
        }
    }
}

/// Parse a drafting reply into at most three titled proposals.
#[must_use]
pub fn parse_drafts(reply: &str) -> Vec<DraftProposal> {
    let Some(json) = json_object(reply) else {
        tracing::warn!(reply = %take_chars(reply, 200), "Draft reply is not JSON");
        return Vec::new();
    };
    match serde_json::from_str::<DraftReply>(json) {
        Ok(parsed) => parsed
            .missions
            .into_iter()
            .filter(|m| !m.title.trim().is_empty())
            .take(MAX_DRAFTS_PER_VIDEO)
            .collect(),
        Err(e) => {
            tracing::warn!(error = %e, "Draft reply could not be decoded");
            Vec::new()
        }
    }
}

// =============================================================================
// Cafe comments
// =============================================================================

/// Prompt asking for a natural comment on a cafe post.
#[must_use]
pub fn comment_prompt(content: &str) -> String {
    format!(
        r"다음은 네이버 카페 게시글의 본문 내용입니다.
이 게시글에 달 자연스러운 댓글을 작성해주세요.

게시글 본문:
{content}

댓글 작성 규칙:
1. 진성 유저의 톤앤매너를 유지할 것 (과도한 칭찬이나 홍보 금지)
2. 공감과 의견을 자연스럽게 표현
3. 리얼픽을 은근하게 언급하되 직접 홍보는 금지
4. {max}자 이내로 간결하게 작성
5. 이모티콘 사용 가능

댓글만 출력하세요:",
        content = take_chars(content, COMMENT_CONTENT_CHARS),
        max = MAX_COMMENT_CHARS,
    )
}

/// Trim a comment reply and cut it to the length limit.
#[must_use]
pub fn clean_comment(reply: &str) -> String {
    let trimmed = reply.trim().trim_matches('"').trim();
    take_chars(trimmed, MAX_COMMENT_CHARS)
}
