use serde::{Deserialize, Serialize};

/// A single cell of the score matrix. Always within `0..=100`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Score(u8);

impl Score {
    pub const MIN: Score = Score(0);
    pub const MAX: Score = Score(100);

    pub fn new(value: i64) -> Option<Self> {
        if (0..=i64::from(Self::MAX.0)).contains(&value) {
            Some(Self(value as u8))
        } else {
            None
        }
    }

    pub fn saturating(value: i64) -> Self {
        Self(value.clamp(0, i64::from(Self::MAX.0)) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Score {
    type Error = ScoreRejection;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(ScoreRejection::OutOfRange(value))
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> Self {
        score.0
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a raw score string was not accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScoreRejection {
    #[error("not a whole number")]
    NotANumber,
    #[error("{0} is outside 0..=100")]
    OutOfRange(i64),
}

/// How raw score text is turned into a stored score.
///
/// The same policy is applied to the provisional matrix while editing and to the
/// normalized matrix while reviewing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorePolicy {
    /// Leave the cell untouched and report the rejection.
    #[default]
    Reject,
    /// Store 0 for anything that is not a valid score.
    Zero,
    /// Clamp out-of-range numbers to the bounds, store 0 for non-numbers.
    Clamp,
}

/// Result of interpreting one raw cell edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellInput {
    /// Empty input.
    Clear,
    Set(Score),
}

impl ScorePolicy {
    pub fn interpret(self, raw: &str) -> Result<CellInput, ScoreRejection> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(CellInput::Clear);
        }
        let parsed = parse_whole_number(trimmed);
        let rejection = match parsed.and_then(Score::try_from) {
            Ok(score) => return Ok(CellInput::Set(score)),
            Err(rejection) => rejection,
        };
        match (self, rejection) {
            (ScorePolicy::Reject, rejection) => Err(rejection),
            (ScorePolicy::Zero, _) => Ok(CellInput::Set(Score::MIN)),
            (ScorePolicy::Clamp, ScoreRejection::OutOfRange(value)) => {
                Ok(CellInput::Set(Score::saturating(value)))
            }
            (ScorePolicy::Clamp, ScoreRejection::NotANumber) => Ok(CellInput::Set(Score::MIN)),
        }
    }
}

fn parse_whole_number(text: &str) -> Result<i64, ScoreRejection> {
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ScoreRejection::NotANumber);
    }
    match text.parse::<i64>() {
        Ok(value) => Ok(value),
        // digits only, so the only failure left is overflow
        Err(_) if negative => Err(ScoreRejection::OutOfRange(i64::MIN)),
        Err(_) => Err(ScoreRejection::OutOfRange(i64::MAX)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(v: i64) -> CellInput {
        CellInput::Set(Score::new(v).unwrap())
    }

    #[test]
    fn accepts_bounds_and_signs() {
        let policy = ScorePolicy::Reject;
        assert_eq!(policy.interpret("0"), Ok(set(0)));
        assert_eq!(policy.interpret(" 100 "), Ok(set(100)));
        assert_eq!(policy.interpret("+42"), Ok(set(42)));
        assert_eq!(policy.interpret("-0"), Ok(set(0)));
    }

    #[test]
    fn empty_input_clears_under_every_policy() {
        for policy in [ScorePolicy::Reject, ScorePolicy::Zero, ScorePolicy::Clamp] {
            assert_eq!(policy.interpret("   "), Ok(CellInput::Clear));
        }
    }

    #[test]
    fn reject_policy_reports_reason() {
        let policy = ScorePolicy::Reject;
        assert_eq!(policy.interpret("abc"), Err(ScoreRejection::NotANumber));
        assert_eq!(policy.interpret("12abc"), Err(ScoreRejection::NotANumber));
        assert_eq!(policy.interpret("4.5"), Err(ScoreRejection::NotANumber));
        assert_eq!(policy.interpret("101"), Err(ScoreRejection::OutOfRange(101)));
        assert_eq!(policy.interpret("-1"), Err(ScoreRejection::OutOfRange(-1)));
    }

    #[test]
    fn zero_policy_stores_zero() {
        assert_eq!(ScorePolicy::Zero.interpret("abc"), Ok(set(0)));
        assert_eq!(ScorePolicy::Zero.interpret("250"), Ok(set(0)));
    }

    #[test]
    fn clamp_policy_saturates() {
        assert_eq!(ScorePolicy::Clamp.interpret("250"), Ok(set(100)));
        assert_eq!(ScorePolicy::Clamp.interpret("-7"), Ok(set(0)));
        assert_eq!(ScorePolicy::Clamp.interpret("99999999999999999999999"), Ok(set(100)));
        assert_eq!(ScorePolicy::Clamp.interpret("x"), Ok(set(0)));
    }

    #[test]
    fn score_rejects_out_of_range_on_deserialize() {
        assert!(serde_json::from_str::<Score>("101").is_err());
        assert_eq!(serde_json::from_str::<Score>("55").unwrap().value(), 55);
        assert_eq!(serde_json::to_string(&Score::MAX).unwrap(), "100");
    }
}
