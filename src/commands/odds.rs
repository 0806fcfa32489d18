//! "Odds Are": the player names odds and a guess, the bot draws its own guess.

use std::fmt;
use std::num::{IntErrorKind, ParseIntError};
use std::str::FromStr;

use rand::Rng;

pub const MAX_ODDS: i64 = 100;

/// A whole-number argument of any size. Values outside `i64` saturate for
/// range checks but are still shown as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Whole {
    value: i64,
    shown: String,
}

impl Whole {
    pub fn value(&self) -> i64 {
        self.value
    }
}

impl From<i64> for Whole {
    fn from(value: i64) -> Self {
        Self {
            value,
            shown: value.to_string(),
        }
    }
}

impl FromStr for Whole {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<i64>() {
            Ok(value) => Ok(value.into()),
            Err(e) => {
                let value = match e.kind() {
                    IntErrorKind::PosOverflow => i64::MAX,
                    IntErrorKind::NegOverflow => i64::MIN,
                    _ => return Err(e),
                };
                // Overflow means the text was a valid sign plus digits
                let (sign, digits) = match s.strip_prefix('-') {
                    Some(digits) => ("-", digits),
                    None => ("", s.trim_start_matches('+')),
                };
                Ok(Self {
                    value,
                    shown: format!("{}{}", sign, digits.trim_start_matches('0')),
                })
            }
        }
    }
}

impl fmt::Display for Whole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.shown)
    }
}

pub fn parse_args(odds: &str, guess: &str) -> Result<(Whole, Whole), ParseIntError> {
    Ok((odds.parse()?, guess.parse()?))
}

/// Draw from `[1, odds)`. The upper bound itself is never drawn; odds of 1 always draws 1.
pub fn draw<R: Rng + ?Sized>(odds: i64, rng: &mut R) -> i64 {
    if odds <= 1 {
        1
    } else {
        rng.gen_range(1..odds)
    }
}

/// Validate the round and, when valid, play it. Returns the full reply text.
pub fn play<R: Rng + ?Sized>(odds: &Whole, guess: &Whole, bot_name: &str, rng: &mut R) -> String {
    let mut msg = format!("Odds: 1 to {}, Your Guess: {}\n", odds, guess);
    let (odds, guess) = (odds.value(), guess.value());

    if !(1..=MAX_ODDS).contains(&odds) {
        msg.push_str("Error: Your odds have to be between 1 and 100!");
    } else if !(1..=odds).contains(&guess) {
        msg.push_str(&format!(
            "Error: Your guess has to be between 1 and the odds ({})!",
            odds
        ));
    } else {
        let bot_guess = draw(odds, rng);
        msg.push_str(&format!("{}'s guess is.... {}!\n\n", bot_name, bot_guess));

        if guess == bot_guess {
            msg.push_str("They match! Now you gotta do it.");
        } else {
            msg.push_str("They don't match! You don't have to do it.");
        }
    }

    msg
}
