use crate::models::Wish;

pub const COMPOSER_SYSTEM: &str = include_str!("../data/prompts/composer_system.txt");
pub const COMPOSER_USER: &str = include_str!("../data/prompts/composer_user.txt");

/// Soft length target the composer is instructed to respect.
pub const PROMPT_CHAR_TARGET: usize = 1000;

/// Build the user turn: the fixed scene-setting prefix followed by one
/// `– {name}: {wish}` line per wish, in input order.
///
/// Wish text is interpolated as-is.
pub fn compose_user_turn(wishes: &[Wish]) -> String {
    let mut turn = COMPOSER_USER.to_string();
    for wish in wishes {
        turn.push_str(&format!("– {}: {}\n", wish.name, wish.wish));
    }
    turn
}
