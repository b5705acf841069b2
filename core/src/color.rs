use core::fmt;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
}

impl Color {
    /// Full palette, in the order colors unlock.
    pub const ALL: [Color; 5] = [
        Color::Red,
        Color::Green,
        Color::Blue,
        Color::Yellow,
        Color::Purple,
    ];

    pub const fn name(self) -> &'static str {
        use Color::*;
        match self {
            Red => "red",
            Green => "green",
            Blue => "blue",
            Yellow => "yellow",
            Purple => "purple",
        }
    }

    pub const fn initial(self) -> char {
        use Color::*;
        match self {
            Red => 'R',
            Green => 'G',
            Blue => 'B',
            Yellow => 'Y',
            Purple => 'P',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How many palette entries are in play at `level`.
pub const fn colors_for_level(level: Level) -> usize {
    if level <= 10 {
        3
    } else if level <= 100 {
        4
    } else {
        5
    }
}

pub fn palette_for_level(level: Level) -> &'static [Color] {
    &Color::ALL[..colors_for_level(level)]
}

/// Uniform pick among the first `n` palette entries.
pub fn random_color(rng: &mut StdRng, n: usize) -> Color {
    let n = n.clamp(1, Color::ALL.len());
    Color::ALL[rng.random_range(0..n)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_grows_with_level() {
        assert_eq!(palette_for_level(1), [Color::Red, Color::Green, Color::Blue]);
        assert_eq!(palette_for_level(10).len(), 3);
        assert_eq!(palette_for_level(11).len(), 4);
        assert_eq!(palette_for_level(100).len(), 4);
        assert_eq!(palette_for_level(101).len(), 5);
    }

    #[test]
    fn random_color_stays_in_palette() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let color = random_color(&mut rng, 3);
            assert!(palette_for_level(1).contains(&color));
        }
    }
}
