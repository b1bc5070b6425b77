//! Gateway client bootstrap.

use tracing::info;

use crate::{
    error::Error,
    handler::{Handler, required_intents},
    state::SharedState,
};

/// Connect to the gateway and serve events until the connection ends.
pub async fn run(state: SharedState, token: &str) -> Result<(), Error> {
    if token.is_empty() {
        return Err(Error::Config("discord bot token is required".into()));
    }

    info!(
        skills = ?state.dispatcher.registry().intents(),
        "starting gateway client"
    );

    let mut client = serenity::Client::builder(token, required_intents())
        .event_handler(Handler { state })
        .await?;
    client.start().await?;
    Ok(())
}
