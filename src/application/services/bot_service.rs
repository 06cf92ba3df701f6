use std::sync::Arc;
use tokio::sync::mpsc;
use crate::application::errors::BotError;
use crate::domain::entities::{Event, Response};
use crate::domain::traits::Bot;
use crate::plugins::PluginManager;

/// Events buffered between the listener and the handler loop
const EVENT_BUFFER: usize = 64;

/// Host bot - feeds events to plugins and posts what they produce
pub struct BotService<B: Bot> {
    bot: Arc<B>,
    plugins: PluginManager,
}

impl<B: Bot + 'static> BotService<B> {
    pub fn new(bot: Arc<B>, plugins: PluginManager) -> Self {
        Self { bot, plugins }
    }

    pub fn bot(&self) -> &B {
        &self.bot
    }

    pub fn plugins(&self) -> &PluginManager {
        &self.plugins
    }

    /// Edits, bot messages and our own posts are not commands
    fn should_skip(&self, event: &Event) -> bool {
        if event.is_message() && event.subtype.is_some() {
            return true;
        }
        event.user == self.bot.bot_info().id
    }

    /// Handle one event and return how many messages were posted.
    ///
    /// Plugin errors are reported back to the channel the event came from.
    pub async fn handle_event(&self, event: &Event) -> usize {
        if self.should_skip(event) {
            tracing::debug!("Skipping event from {} ({:?})", event.user, event.subtype);
            return 0;
        }

        let mut posted = 0;
        for outcome in self.plugins.handle_event(event, self.bot.as_ref()).await {
            let response = match outcome {
                Ok(response) => response,
                Err(e) => {
                    tracing::warn!("[{}] {} failed: {}", event.channel, event.user, e);
                    Response::to(&event.channel).with_text(e.message()).with_markdown()
                }
            };

            match self.bot.post_message(&response).await {
                Ok(()) => posted += 1,
                Err(e) => tracing::error!("Failed to post to {}: {}", response.channel, e),
            }
        }
        posted
    }

    /// Process events sequentially until the sender side closes
    pub async fn run(&self, mut rx: mpsc::Receiver<Event>) {
        while let Some(event) = rx.recv().await {
            self.handle_event(&event).await;
        }
        tracing::info!("Event stream closed");
    }

    /// Listen on the platform and handle events until the listener stops
    pub async fn start(&self) -> Result<(), BotError> {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let bot = Arc::clone(&self.bot);
        let listener = tokio::spawn(async move { bot.listen(tx).await });

        self.run(rx).await;

        listener
            .await
            .map_err(|e| BotError::Internal(format!("Listener task failed: {}", e)))?
    }
}
