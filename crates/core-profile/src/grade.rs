//! Contrast grade enumeration — spec.md GLOSSARY, §3.

/// One of the twelve contrast grades the system understands, ordered
/// from softest (`G00`) to hardest (`G5`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ContrastGrade {
    G00 = 0,
    G0,
    G0Half,
    G1,
    G1Half,
    G2,
    G2Half,
    G3,
    G3Half,
    G4,
    G4Half,
    G5,
}

pub const GRADE_COUNT: usize = 12;

impl ContrastGrade {
    pub const ALL: [ContrastGrade; GRADE_COUNT] = [
        ContrastGrade::G00,
        ContrastGrade::G0,
        ContrastGrade::G0Half,
        ContrastGrade::G1,
        ContrastGrade::G1Half,
        ContrastGrade::G2,
        ContrastGrade::G2Half,
        ContrastGrade::G3,
        ContrastGrade::G3Half,
        ContrastGrade::G4,
        ContrastGrade::G4Half,
        ContrastGrade::G5,
    ];

    pub fn index(self) -> usize {
        self as u8 as usize
    }

    pub fn from_index(i: usize) -> Option<ContrastGrade> {
        Self::ALL.get(i).copied()
    }

    pub fn is_half_grade(self) -> bool {
        matches!(
            self,
            ContrastGrade::G0Half
                | ContrastGrade::G1Half
                | ContrastGrade::G2Half
                | ContrastGrade::G3Half
                | ContrastGrade::G4Half
        )
    }

    /// The two whole-grade neighbors a half grade is derived from.
    /// Returns `None` for whole grades.
    pub fn half_grade_neighbors(self) -> Option<(ContrastGrade, ContrastGrade)> {
        use ContrastGrade::*;
        match self {
            G0Half => Some((G0, G1)),
            G1Half => Some((G1, G2)),
            G2Half => Some((G2, G3)),
            G3Half => Some((G3, G4)),
            G4Half => Some((G4, G5)),
            _ => None,
        }
    }

    pub fn next(self) -> Option<ContrastGrade> {
        Self::from_index(self.index() + 1)
    }

    pub fn prev(self) -> Option<ContrastGrade> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    pub fn name(self) -> &'static str {
        use ContrastGrade::*;
        match self {
            G00 => "00",
            G0 => "0",
            G0Half => "0 1/2",
            G1 => "1",
            G1Half => "1 1/2",
            G2 => "2",
            G2Half => "2 1/2",
            G3 => "3",
            G3Half => "3 1/2",
            G4 => "4",
            G4Half => "4 1/2",
            G5 => "5",
        }
    }
}

impl std::fmt::Display for ContrastGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_grade_neighbors_are_whole() {
        for g in ContrastGrade::ALL {
            if let Some((a, b)) = g.half_grade_neighbors() {
                assert!(!a.is_half_grade());
                assert!(!b.is_half_grade());
            }
        }
    }

    #[test]
    fn ordering_is_soft_to_hard() {
        assert!(ContrastGrade::G00 < ContrastGrade::G5);
        assert!(ContrastGrade::G2 < ContrastGrade::G2Half);
    }
}
