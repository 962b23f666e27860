//! The arcade mini-game engines.
//!
//! Each engine is pure state + rules, driven by the front end's timer and
//! key events. The falling-block engine lives in [`crate::core`]; the
//! registry here is what the hub menu lists.

pub mod dodge;
pub mod merge;
pub mod snake;

pub use dodge::DodgeGame;
pub use merge::MergeGame;
pub use snake::{SnakeConfig, SnakeGame};

/// Menu entry for one game.
pub struct GameDescriptor {
    pub name: &'static str,
    pub description: &'static str,
}

/// Everything the hub can launch, in menu order.
pub fn registry() -> Vec<GameDescriptor> {
    vec![
        GameDescriptor {
            name: "blocks",
            description: "Falling-block puzzle: clear lines, chase levels",
        },
        GameDescriptor {
            name: "snake",
            description: "Grow the snake, dodge the walls and yourself",
        },
        GameDescriptor {
            name: "merge",
            description: "Slide and double tiles until 2048",
        },
        GameDescriptor {
            name: "dodge",
            description: "Flap through the pipe gaps",
        },
        GameDescriptor {
            name: "crossword",
            description: "A bite-size daily crossword",
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_names_are_unique() {
        let games = registry();
        for (i, a) in games.iter().enumerate() {
            for b in games.iter().skip(i + 1) {
                assert_ne!(a.name, b.name);
            }
        }
        assert_eq!(games.len(), 5);
    }
}
