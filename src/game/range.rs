use crate::BOMB_MAX;
use crate::BOMB_MIN;
use crate::Number;
use serde::Serialize;

/// Inclusive range of numbers that may still hide the bomb.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Range {
    pub min: Number,
    pub max: Number,
}

impl Default for Range {
    fn default() -> Self {
        Self {
            min: BOMB_MIN,
            max: BOMB_MAX,
        }
    }
}

impl Range {
    pub fn contains(&self, n: Number) -> bool {
        self.min <= n && n <= self.max
    }
    /// Shrinks the range so that every guess which missed `bomb` falls outside it.
    /// The bomb itself always stays inside.
    pub fn narrow<I>(self, bomb: Number, guesses: I) -> Self
    where
        I: IntoIterator<Item = Number>,
    {
        guesses.into_iter().fold(self, |range, g| match g.cmp(&bomb) {
            std::cmp::Ordering::Less => Self {
                min: range.min.max(g + 1),
                ..range
            },
            std::cmp::Ordering::Greater => Self {
                max: range.max.min(g - 1),
                ..range
            },
            std::cmp::Ordering::Equal => range,
        })
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}
