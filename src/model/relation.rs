//! Acquaintance relation (directed, weighted edge) and its strength scale.

use serde::{Deserialize, Serialize};

use super::PersonId;

/// How well one person knows another, on the 1..=10 scale.
///
/// 10 means the closest possible acquaintance. The scale never reaches 0:
/// strangers simply have no relation at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Strength(u8);

impl Strength {
    pub const MIN: Strength = Strength(1);
    pub const MAX: Strength = Strength(10);

    /// Returns `None` for values outside 1..=10.
    pub fn new(value: u8) -> Option<Strength> {
        (Self::MIN.0..=Self::MAX.0).contains(&value).then_some(Strength(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Strength {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Strength::new(value).ok_or_else(|| format!("strength {value} is outside 1..=10"))
    }
}

impl From<Strength> for u8 {
    fn from(s: Strength) -> u8 {
        s.0
    }
}

impl std::fmt::Display for Strength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One directed acquaintance edge: how well the owning person knows `target`.
///
/// Relations always come in pairs — if A's list names B, B's list names A —
/// but the two strengths are independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub target: PersonId,
    pub strength: Strength,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strength_accepts_the_full_scale() {
        assert_eq!(Strength::new(1), Some(Strength::MIN));
        assert_eq!(Strength::new(10), Some(Strength::MAX));
        assert_eq!(Strength::new(5).map(Strength::get), Some(5));
    }

    #[test]
    fn strength_rejects_out_of_scale() {
        assert_eq!(Strength::new(0), None);
        assert_eq!(Strength::new(11), None);
        assert!(Strength::try_from(42).is_err());
    }

    #[test]
    fn strength_serde_rejects_bad_values() {
        let ok: Strength = serde_json::from_str("7").unwrap();
        assert_eq!(ok.get(), 7);
        assert!(serde_json::from_str::<Strength>("0").is_err());
    }
}
