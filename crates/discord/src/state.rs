use std::sync::Arc;

use {
    sigil_config::ConfigStore, sigil_nlu::NluClient, sigil_skills::Dispatcher,
};

use crate::{starboard::RecentSet, webhook::WebhookNotifier};

/// Shared runtime state for the gateway handler.
pub type SharedState = Arc<BotState>;

pub struct BotState {
    pub dispatcher: Dispatcher,
    pub nlu: Arc<dyn NluClient>,
    pub config: ConfigStore,
    pub notifier: WebhookNotifier,
    /// Messages the starboard has already reposted this process.
    pub starboard_posted: RecentSet,
}

impl BotState {
    pub fn new(dispatcher: Dispatcher, nlu: Arc<dyn NluClient>, config: ConfigStore) -> Self {
        Self {
            dispatcher,
            nlu,
            config,
            notifier: WebhookNotifier::new(),
            starboard_posted: RecentSet::default(),
        }
    }
}
