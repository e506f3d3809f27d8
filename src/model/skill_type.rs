//! Classification of who may perform the task behind a node.

use std::fmt;
use std::str::FromStr;

/// Keyword for [SkillType::Human] in the text format.
pub const HUMAN_KEYWORD: &str = "human";
/// Keyword for [SkillType::Robot] in the text format.
pub const ROBOT_KEYWORD: &str = "robot";
/// Keyword for [SkillType::Mixed] in the text format.
pub const MIXED_KEYWORD: &str = "mixed";

// =#========================================================================#=
// SKILL TYPE
// =#========================================================================#=
/// Who can perform the action associated with a node.
///
/// Leaves carry an explicit type (from the input or set by a caller),
/// internal nodes get theirs computed by
/// [assign_labels](crate::model::SkillTree::assign_labels).
#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash, Default)]
pub enum SkillType {
    /// Action can only be performed by humans
    Human,
    /// Action can only be performed by robots
    Robot,
    /// Either a robot or a human can perform the action
    Mixed,
    /// Node was not given a label yet
    #[default]
    Unlabeled,
}

impl SkillType {
    /// Returns `true` unless this is [SkillType::Unlabeled].
    pub fn is_labeled(&self) -> bool {
        !matches!(self, SkillType::Unlabeled)
    }

    /// Returns `true` if a human is involved, i.e. `Human` or `Mixed`.
    pub fn has_human(&self) -> bool {
        matches!(self, SkillType::Human | SkillType::Mixed)
    }

    /// Returns `true` if a robot is involved, i.e. `Robot` or `Mixed`.
    pub fn has_robot(&self) -> bool {
        matches!(self, SkillType::Robot | SkillType::Mixed)
    }

    /// Combines the presence of human and robot actors into a type.
    ///
    /// Returns `None` if neither is present, since no labeled type
    /// describes an empty set of actors.
    ///
    /// # Example
    /// ```
    /// use skilltree::model::SkillType;
    ///
    /// assert_eq!(SkillType::combine(true, true), Some(SkillType::Mixed));
    /// assert_eq!(SkillType::combine(false, true), Some(SkillType::Robot));
    /// assert_eq!(SkillType::combine(false, false), None);
    /// ```
    pub fn combine(human_present: bool, robot_present: bool) -> Option<SkillType> {
        match (human_present, robot_present) {
            (true, true) => Some(SkillType::Mixed),
            (false, true) => Some(SkillType::Robot),
            (true, false) => Some(SkillType::Human),
            (false, false) => None,
        }
    }

    /// Matches a type keyword case-insensitively.
    ///
    /// Only the three labeled types have a keyword; `Unlabeled` cannot
    /// be written in the text format.
    pub fn from_keyword(word: &str) -> Option<SkillType> {
        if word.eq_ignore_ascii_case(HUMAN_KEYWORD) {
            Some(SkillType::Human)
        } else if word.eq_ignore_ascii_case(ROBOT_KEYWORD) {
            Some(SkillType::Robot)
        } else if word.eq_ignore_ascii_case(MIXED_KEYWORD) {
            Some(SkillType::Mixed)
        } else {
            None
        }
    }
}

/// Error returned when a string is not a skill type keyword.
#[derive(PartialEq, Eq, Debug, Clone, thiserror::Error)]
#[error("'{0}' is not one of human, robot, mixed")]
pub struct UnknownSkillType(pub String);

impl FromStr for SkillType {
    type Err = UnknownSkillType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SkillType::from_keyword(s).ok_or_else(|| UnknownSkillType(s.to_string()))
    }
}

impl fmt::Display for SkillType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkillType::Human => write!(f, "{HUMAN_KEYWORD}"),
            SkillType::Robot => write!(f, "{ROBOT_KEYWORD}"),
            SkillType::Mixed => write!(f, "{MIXED_KEYWORD}"),
            SkillType::Unlabeled => write!(f, "unlabeled"),
        }
    }
}

// =#========================================================================#=
// TESTS
// =#========================================================================#=
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_case_insensitive() {
        assert_eq!(SkillType::from_keyword("human"), Some(SkillType::Human));
        assert_eq!(SkillType::from_keyword("HUMAN"), Some(SkillType::Human));
        assert_eq!(SkillType::from_keyword("RoBoT"), Some(SkillType::Robot));
        assert_eq!(SkillType::from_keyword("Mixed"), Some(SkillType::Mixed));
        assert_eq!(SkillType::from_keyword("unlabeled"), None);
        assert_eq!(SkillType::from_keyword("humans"), None);
        assert_eq!(SkillType::from_keyword(""), None);
    }

    #[test]
    fn test_from_str_error() {
        let err = "banana".parse::<SkillType>().unwrap_err();
        assert_eq!(err, UnknownSkillType("banana".to_string()));
        assert_eq!("MIXED".parse::<SkillType>(), Ok(SkillType::Mixed));
    }

    #[test]
    fn test_presence() {
        assert!(SkillType::Mixed.has_human());
        assert!(SkillType::Mixed.has_robot());
        assert!(SkillType::Human.has_human());
        assert!(!SkillType::Human.has_robot());
        assert!(!SkillType::Unlabeled.has_human());
        assert!(!SkillType::Unlabeled.has_robot());
        assert!(!SkillType::Unlabeled.is_labeled());
        assert_eq!(SkillType::default(), SkillType::Unlabeled);
    }

    #[test]
    fn test_display_round_trips_keyword() {
        for t in [SkillType::Human, SkillType::Robot, SkillType::Mixed] {
            assert_eq!(SkillType::from_keyword(&t.to_string()), Some(t));
        }
    }
}
