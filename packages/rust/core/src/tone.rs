//! Age-group tone policy.

/// Tone for the youngest learners.
pub const PLAYFUL_TONE: &str = "Use short, playful sentences with vivid analogies.";
/// Tone for teenage makers.
pub const MAKER_TONE: &str = "Use encouraging maker language with quick technical explanations.";
/// Tone for every other age group.
pub const GENERAL_TONE: &str = "Use clear and supportive educational language.";

/// Age groups (exact tags) and the tone each set receives.
pub const AGE_GROUP_TONES: &[(&[&str], &str)] = &[
    (&["10-14", "8-12"], PLAYFUL_TONE),
    (&["12-16", "14-18"], MAKER_TONE),
];

/// Tone hint for an age-group tag. Unknown tags get [`GENERAL_TONE`].
pub fn age_tuned_tone(age_group: &str) -> &'static str {
    AGE_GROUP_TONES
        .iter()
        .find(|(groups, _)| groups.iter().any(|g| *g == age_group))
        .map(|(_, tone)| *tone)
        .unwrap_or(GENERAL_TONE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_groups() {
        assert_eq!(age_tuned_tone("10-14"), PLAYFUL_TONE);
        assert_eq!(age_tuned_tone("8-12"), PLAYFUL_TONE);
        assert_eq!(age_tuned_tone("12-16"), MAKER_TONE);
        assert_eq!(age_tuned_tone("14-18"), MAKER_TONE);
    }

    #[test]
    fn unknown_or_inexact_groups_fall_back() {
        assert_eq!(age_tuned_tone("99-100"), GENERAL_TONE);
        assert_eq!(age_tuned_tone(""), GENERAL_TONE);
        assert_eq!(age_tuned_tone(" 10-14"), GENERAL_TONE);
        assert_eq!(age_tuned_tone("11"), GENERAL_TONE);
    }
}
