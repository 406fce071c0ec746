use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::error::{Result, ValuationError};

/// Weight applied to a match against an opponent the table does not know.
pub const NEUTRAL_WEIGHT: f64 = 1.0;

/// What to do when an opponent is absent from the classification table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownOpponentPolicy {
    /// Weight the match at 1.0 and leave it out of the classes-faced set.
    #[default]
    NeutralWeight,
    /// Fail the whole computation.
    Reject,
}

/// Opponent strength classes, 1 (strongest) to 5 (weakest). Passed into the
/// metrics calculator explicitly so tests and callers can substitute their
/// own league tables.
#[derive(Debug, Clone, Default)]
pub struct ClassTable {
    classes: HashMap<String, u8>,
}

impl ClassTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, u8)>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for (name, class) in pairs {
            table.insert(name, class);
        }
        table
    }

    pub fn insert<S: Into<String>>(&mut self, name: S, class: u8) {
        self.classes.insert(name.into(), class.clamp(1, 5));
    }

    pub fn class_of(&self, opponent: &str) -> Option<u8> {
        self.classes.get(opponent).copied()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Class weight for one opponent under the given policy, or `None` when
    /// the opponent is unclassified and the policy is neutral.
    pub fn weight_of(
        &self,
        opponent: &str,
        policy: UnknownOpponentPolicy,
    ) -> Result<Option<(u8, f64)>> {
        match self.class_of(opponent) {
            Some(class) => Ok(Some((class, class_weight(class)))),
            None => match policy {
                UnknownOpponentPolicy::NeutralWeight => Ok(None),
                UnknownOpponentPolicy::Reject => Err(ValuationError::ConfigurationGap {
                    opponent: opponent.to_string(),
                }),
            },
        }
    }

    /// The 2021-22 La Liga table the original analysis shipped with.
    pub fn la_liga_2021() -> Self {
        LA_LIGA_2021.clone()
    }
}

pub fn class_weight(class: u8) -> f64 {
    match class {
        1 => 2.0,
        2 => 1.5,
        3 => 1.2,
        4 => 0.8,
        _ => 0.5,
    }
}

static LA_LIGA_2021: Lazy<ClassTable> = Lazy::new(|| {
    ClassTable::from_pairs([
        ("Atletico Madrid", 1),
        ("Real Madrid", 1),
        ("Barcelona", 1),
        ("Sevilla", 2),
        ("Betis", 2),
        ("Real Sociedad", 2),
        ("Athletic Club", 2),
        ("Villarreal", 2),
        ("Valencia", 3),
        ("Osasuna", 3),
        ("Celta Vigo", 3),
        ("Rayo Vallecano", 4),
        ("Elche", 4),
        ("Espanyol", 4),
        ("Getafe", 4),
        ("Mallorca", 5),
        ("Cadiz", 5),
        ("Granada CF", 5),
        ("Levante", 5),
        ("Alavés", 5),
    ])
});
