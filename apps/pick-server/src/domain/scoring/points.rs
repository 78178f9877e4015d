//! Point rules for settled missions.

use crate::domain::mission::{MissionForm, MissionKind};

/// Reward for a correct binary pick.
pub const BINARY_CORRECT_POINTS: i64 = 10;
/// Reward per option for a correct multi pick.
pub const MULTI_POINTS_PER_OPTION: i64 = 10;
/// Score of a couple prediction on the first episode.
pub const MATCH_FIRST_EPISODE_SCORE: i64 = 100;
/// Score lost per later episode.
pub const MATCH_EPISODE_DECAY: i64 = 10;
/// Lowest score a couple prediction can be worth.
pub const MATCH_MIN_SCORE: i64 = 30;

/// Points for a binary, multi or subjective pick.
///
/// Wrong picks and subjective answers earn nothing.
#[must_use]
pub fn option_pick_points(form: MissionForm, option_count: usize, correct: bool) -> i64 {
    if !correct {
        return 0;
    }
    match form {
        MissionForm::Binary => BINARY_CORRECT_POINTS,
        MissionForm::Multi => option_count as i64 * MULTI_POINTS_PER_OPTION,
        MissionForm::Match | MissionForm::Subjective => 0,
    }
}

/// Stake of a couple prediction made for `episode_no`.
///
/// Earlier predictions are riskier and worth more.
#[must_use]
pub fn episode_score(episode_no: u32) -> i64 {
    let decay = i64::from(episode_no.saturating_sub(1)) * MATCH_EPISODE_DECAY;
    (MATCH_FIRST_EPISODE_SCORE - decay).max(MATCH_MIN_SCORE)
}

/// Signed points for a match pick: the episode stake won or lost.
#[must_use]
pub fn match_pick_points(episode_no: u32, correct: bool) -> i64 {
    let score = episode_score(episode_no);
    if correct { score } else { -score }
}

/// Ledger reason for an option mission.
#[must_use]
pub fn option_reason(kind: MissionKind, form: MissionForm, correct: bool) -> String {
    if !correct {
        return "미션 오답".to_string();
    }
    let label = match kind {
        MissionKind::Majority => "다수픽",
        MissionKind::Predict => "정답",
    };
    format!("미션 {label} 보상 ({})", form.reason_label())
}

/// Ledger reason for a match pick.
#[must_use]
pub fn match_reason(episode_no: u32, correct: bool) -> String {
    if correct {
        format!("커플 매칭 정답 보상 ({episode_no}회차)")
    } else {
        format!("커플 매칭 오답 ({episode_no}회차)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test]
    fn option_points() {
        assert_eq!(option_pick_points(MissionForm::Binary, 2, true), 10);
        assert_eq!(option_pick_points(MissionForm::Multi, 4, true), 40);
        assert_eq!(option_pick_points(MissionForm::Multi, 4, false), 0);
        assert_eq!(option_pick_points(MissionForm::Subjective, 0, true), 0);
    }

    #[test_case(1, 100)]
    #[test_case(2, 90)]
    #[test_case(7, 40)]
    #[test_case(8, 30)]
    #[test_case(12, 30)]
    fn episode_scores(episode: u32, expected: i64) {
        assert_eq!(episode_score(episode), expected);
    }

    #[test]
    fn match_points_are_signed() {
        assert_eq!(match_pick_points(3, true), 80);
        assert_eq!(match_pick_points(3, false), -80);
    }

    #[test]
    fn reasons() {
        assert_eq!(
            option_reason(MissionKind::Majority, MissionForm::Binary, true),
            "미션 다수픽 보상 (이진)"
        );
        assert_eq!(
            option_reason(MissionKind::Predict, MissionForm::Multi, true),
            "미션 정답 보상 (다중)"
        );
        assert_eq!(match_reason(2, false), "커플 매칭 오답 (2회차)");
    }

    proptest! {
        #[test]
        fn episode_score_is_bounded_and_non_increasing(ep in 1u32..1000) {
            let score = episode_score(ep);
            prop_assert!((MATCH_MIN_SCORE..=MATCH_FIRST_EPISODE_SCORE).contains(&score));
            prop_assert!(episode_score(ep + 1) <= score);
        }
    }
}
