//! Magic 8-ball

use rand::seq::SliceRandom;
use crate::application::errors::{PluginError, PluginResult};
use crate::domain::entities::{CommandDescriptor, Invocation, Response};
use crate::plugins::trait_def::CommandPlugin;

pub const ANSWERS: [&str; 20] = [
    "It is certain",
    "It is decidedly so",
    "Without a doubt",
    "Yes, definitely",
    "You may rely on it",
    "As I see it, yes",
    "Most likely",
    "Outlook good",
    "Yes",
    "Signs point to yes",
    "Reply hazy try again",
    "Ask again later",
    "Better not tell you now",
    "Cannot predict now",
    "Concentrate and ask again",
    "Don't count on it",
    "My reply is no",
    "My sources say no",
    "Outlook not so good",
    "Very doubtful",
];

/// Answers yes/no questions at random
pub struct Ball8 {
    desc: CommandDescriptor,
}

impl Ball8 {
    pub fn new(prefix: &str) -> Self {
        Self {
            desc: CommandDescriptor::new("8ball")
                .with_trigger("8ball")
                .with_short_help("Ask me a question")
                .with_help(
                    "Ask me a question and I'll decide what the answer should be. \
                     Based on https://en.wikipedia.org/wiki/Magic_8-Ball",
                )
                .with_example(format!("{}8ball Is linux better than windows?", prefix)),
        }
    }
}

impl CommandPlugin for Ball8 {
    fn descriptor(&self) -> &CommandDescriptor {
        &self.desc
    }

    fn on_command(&self, invocation: &Invocation, response: Response) -> PluginResult<Option<Response>> {
        if !invocation.args.ends_with('?') {
            return Err(PluginError::validation("Invalid argument! Ask me a question!"));
        }

        let answer = ANSWERS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(ANSWERS[0]);
        Ok(Some(response.with_text(format!(":8ball: says *_{}_*!", answer))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::errors::PluginErrorKind;
    use crate::domain::entities::Event;

    fn ask(args: &str) -> PluginResult<Option<Response>> {
        let invocation = Invocation {
            event: Event::message("U1", "C1", format!("!8ball {}", args)),
            prefix: "!".to_string(),
            trigger: "8ball".to_string(),
            args: args.to_string(),
        };
        Ball8::new("!").on_command(&invocation, Response::to("C1"))
    }

    #[test]
    fn rejects_statements() {
        let err = ask("are you real").unwrap_err();
        assert_eq!(err.kind(), PluginErrorKind::Validation);
        assert_eq!(err.message(), "Invalid argument! Ask me a question!");
    }

    #[test]
    fn rejects_empty_question() {
        assert!(ask("").is_err());
    }

    #[test]
    fn answers_questions_with_a_canned_phrase() {
        let response = ask("are you real?").unwrap().unwrap();
        let answer = response
            .text
            .strip_prefix(":8ball: says *_")
            .and_then(|rest| rest.strip_suffix("_*!"))
            .unwrap();
        assert!(ANSWERS.contains(&answer), "unexpected answer {answer}");
        assert_eq!(response.channel, "C1");
    }

    #[test]
    fn a_lone_question_mark_counts_as_a_question() {
        assert!(ask("?").is_ok());
    }
}
