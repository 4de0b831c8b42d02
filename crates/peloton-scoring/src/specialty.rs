//! Rider specialty classification.
//!
//! Used by the advisor reports to label a roster's composition and to
//! flag races without an elite-level leader.

use peloton_core::{Rider, SkillId};

/// Rating at or above which a rider counts as elite in a discipline.
pub const ELITE_THRESHOLD: u8 = 85;

/// What a rider is good at, relative to a set of core disciplines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Specialty {
    /// Elite in one or more of the core disciplines (all listed).
    Elite(Vec<SkillId>),
    /// No elite rating; the strongest rated skill instead.
    Strongest(SkillId),
    /// No usable ratings at all.
    Unknown,
}

impl Specialty {
    /// Classifies a rider against the given core disciplines.
    ///
    /// # Example
    ///
    /// ```
    /// use peloton_core::{Rider, SkillId};
    /// use peloton_scoring::Specialty;
    ///
    /// let disciplines = [SkillId::new("cobbles"), SkillId::new("sprint")];
    /// let rider = Rider::new("w-van-aert", "Wout van Aert", 5_000_000)
    ///     .with_skill("cobbles", 92)
    ///     .with_skill("sprint", 88);
    /// assert_eq!(
    ///     Specialty::of(&rider, &disciplines),
    ///     Specialty::Elite(disciplines.to_vec())
    /// );
    /// ```
    pub fn of(rider: &Rider, disciplines: &[SkillId]) -> Specialty {
        let elite: Vec<SkillId> = disciplines
            .iter()
            .filter(|d| rider.skill(d).is_some_and(|v| v >= ELITE_THRESHOLD))
            .cloned()
            .collect();
        if !elite.is_empty() {
            return Specialty::Elite(elite);
        }
        rider
            .skills()
            .iter()
            .filter(|(_, &v)| v > 0)
            .max_by_key(|(skill, &v)| (v, std::cmp::Reverse(skill.clone())))
            .map(|(skill, _)| Specialty::Strongest(skill.clone()))
            .unwrap_or(Specialty::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disciplines() -> Vec<SkillId> {
        vec![
            SkillId::new("cobbles"),
            SkillId::new("hills"),
            SkillId::new("sprint"),
        ]
    }

    #[test]
    fn multi_specialist_lists_every_elite_discipline() {
        let rider = Rider::new("a", "A", 1)
            .with_skill("cobbles", 90)
            .with_skill("hills", 86)
            .with_skill("sprint", 60);
        assert_eq!(
            Specialty::of(&rider, &disciplines()),
            Specialty::Elite(vec![SkillId::new("cobbles"), SkillId::new("hills")])
        );
    }

    #[test]
    fn below_threshold_falls_back_to_strongest_skill() {
        let rider = Rider::new("a", "A", 1)
            .with_skill("cobbles", 60)
            .with_skill("climbing", 80);
        assert_eq!(
            Specialty::of(&rider, &disciplines()),
            Specialty::Strongest(SkillId::new("climbing"))
        );
    }

    #[test]
    fn all_zero_ratings_are_unknown() {
        let rider = Rider::new("a", "A", 1).with_skill("cobbles", 0);
        assert_eq!(Specialty::of(&rider, &disciplines()), Specialty::Unknown);
    }
}
