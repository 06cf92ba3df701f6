//! Coin flipping

use std::num::IntErrorKind;
use rand::Rng;
use crate::application::errors::{PluginError, PluginResult};
use crate::domain::entities::{CommandDescriptor, Invocation, Response};
use crate::plugins::trait_def::CommandPlugin;

/// Upper bound on flips per command
pub const MAX_COIN_FLIPS: u64 = 1_000_000;

/// Flips one or many coins
pub struct CoinFlip {
    desc: CommandDescriptor,
}

impl CoinFlip {
    pub fn new(prefix: &str) -> Self {
        Self {
            desc: CommandDescriptor::new("coin")
                .with_trigger("coin")
                .with_trigger("coinflip")
                .with_short_help("Flip a coin")
                .with_help("Flip a coin or number of coins")
                .with_example(format!("{}coin", prefix))
                .with_example(format!("{}coinflip 5", prefix)),
        }
    }
}

impl CommandPlugin for CoinFlip {
    fn descriptor(&self) -> &CommandDescriptor {
        &self.desc
    }

    fn on_command(&self, invocation: &Invocation, response: Response) -> PluginResult<Option<Response>> {
        let mut rng = rand::thread_rng();

        let text = if !invocation.has_args() {
            let side = if rng.gen::<bool>() { "Heads" } else { "Tails" };
            format!("A coin is flipped and it is *_{}_*!", side)
        } else {
            let tosses = parse_tosses(&invocation.args, &invocation.prefix)?;
            let (heads, tails) = flip_coins(&mut rng, tosses);
            format!(
                "*_{}_* coins are flipped and the result is *_{} Heads_* and *_{} Tails_*!",
                tosses, heads, tails
            )
        };

        Ok(Some(response.with_text(text).with_markdown()))
    }
}

/// Validate the requested number of flips. Surrounding whitespace is
/// tolerated, whitespace alone is not a number.
fn parse_tosses(args: &str, prefix: &str) -> PluginResult<u64> {
    let too_large = || {
        PluginError::validation(format!(
            "Invalid argument! Number of coins to flip is too large! Max flips is `{}`.",
            MAX_COIN_FLIPS
        ))
    };
    let none_to_flip = || PluginError::validation("Invalid argument! No coins to flip!");

    let tosses = match args.trim().parse::<i64>() {
        Ok(n) => n,
        Err(e) => {
            return Err(match e.kind() {
                IntErrorKind::PosOverflow => too_large(),
                IntErrorKind::NegOverflow => none_to_flip(),
                _ => PluginError::validation(format!(
                    "Invalid argument! Specify a *number* of coins to flip. E.g. `{}coin 5`",
                    prefix
                )),
            });
        }
    };

    if tosses <= 0 {
        return Err(none_to_flip());
    }
    let tosses = tosses as u64;
    if tosses > MAX_COIN_FLIPS {
        return Err(too_large());
    }
    Ok(tosses)
}

/// Flip `tosses` fair coins, returning `(heads, tails)`
pub fn flip_coins<R: Rng + ?Sized>(rng: &mut R, tosses: u64) -> (u64, u64) {
    let mut tails = 0u64;
    let mut remaining = tosses;

    while remaining >= 64 {
        tails += u64::from(rng.gen::<u64>().count_ones());
        remaining -= 64;
    }
    if remaining > 0 {
        let mask = (1u64 << remaining) - 1;
        tails += u64::from((rng.gen::<u64>() & mask).count_ones());
    }

    (tosses - tails, tails)
}
