use {
    serenity::{
        all::{
            Context, EventHandler, GatewayIntents, Guild, Message, Permissions, Reaction, Ready,
            UnavailableGuild,
        },
        async_trait,
    },
    tracing::{debug, info, warn},
};

use sigil_skills::{PermissionSnapshot, Response, SkillEvent};

use crate::{
    messaging,
    server::{self, GuildFacts},
    starboard,
    state::SharedState,
    webhook::WebhookIdentity,
};

/// Required gateway intents for the bot.
pub fn required_intents() -> GatewayIntents {
    GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_MESSAGE_REACTIONS
}

/// Reply when the NLU collaborator is unreachable or confused.
const NLU_TROUBLE: &str = "I'm having trouble understanding right now, try again later!";

/// Strip the bot mention (e.g. `<@123456789>`) from the beginning of a message.
pub fn strip_bot_mention(text: &str, bot_id: u64) -> String {
    let mention = format!("<@{bot_id}>");
    let mention_nick = format!("<@!{bot_id}>");
    let stripped = text
        .trim()
        .strip_prefix(&mention)
        .or_else(|| text.trim().strip_prefix(&mention_nick))
        .unwrap_or(text);
    stripped.trim().to_string()
}

/// Serenity event handler: one task per gateway event, everything inside is
/// sequential.
pub struct Handler {
    pub state: SharedState,
}

/// Compute the event's permission snapshot from the cache, in one pass and
/// with no suspension points.
fn permission_snapshot(ctx: &Context, msg: &Message) -> PermissionSnapshot {
    let Some(guild_id) = msg.guild_id else {
        return PermissionSnapshot::direct_message();
    };
    let bot_id = ctx.cache.current_user().id;
    let Some(guild) = ctx.cache.guild(guild_id) else {
        // An uncached guild grants nothing; gated skills reply with what is
        // missing rather than failing mid-action.
        return PermissionSnapshot::guild(Permissions::empty(), Permissions::empty());
    };

    let permissions_for = |user_id| {
        guild
            .members
            .get(&user_id)
            .and_then(|member| {
                guild
                    .channels
                    .get(&msg.channel_id)
                    .map(|channel| guild.user_permissions_in(channel, member))
            })
            .unwrap_or_else(Permissions::empty)
    };
    PermissionSnapshot::guild(permissions_for(bot_id), permissions_for(msg.author.id))
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        // Ignore messages from bots (including ourselves).
        if msg.author.bot {
            return;
        }

        let is_guild = msg.guild_id.is_some();
        let bot_id = ctx.cache.current_user().id;
        let mentioned = msg.mentions.iter().any(|user| user.id == bot_id);

        // Guild messages are only ours when they lead with a mention; DMs
        // always are.
        let text = if is_guild {
            if !mentioned {
                return;
            }
            strip_bot_mention(&msg.content, bot_id.get())
        } else {
            msg.content.trim().to_string()
        };
        if text.is_empty() {
            return;
        }

        info!(
            message_id = %msg.id,
            channel = %msg.channel_id,
            user = %msg.author.id,
            is_guild,
            text_len = text.len(),
            "inbound message"
        );

        let session_id = msg.author.id.to_string();
        let intent = match self.state.nlu.classify(&session_id, &text).await {
            Ok(intent) => intent,
            Err(e) => {
                warn!(user = %msg.author.id, "nlu classification failed: {e}");
                let notice = Response::persistent(NLU_TROUBLE);
                if let Err(send_err) =
                    messaging::deliver(&ctx.http, msg.channel_id, notice).await
                {
                    warn!(channel = %msg.channel_id, "failed to send NLU notice: {send_err}");
                }
                return;
            },
        };

        let perms = permission_snapshot(&ctx, &msg);
        let guild_config = msg
            .guild_id
            .map(|guild_id| self.state.config.guild(guild_id.get()))
            .unwrap_or_default();
        let event = SkillEvent {
            ctx: &ctx,
            message: &msg,
            perms,
            guild_config,
            audit: &self.state.notifier,
        };

        let Some(response) = self.state.dispatcher.dispatch(&event, &intent).await else {
            debug!(intent = %intent.intent, confidence = intent.confidence, "intent ignored");
            return;
        };
        if let Err(e) = messaging::deliver(&ctx.http, msg.channel_id, response).await {
            warn!(
                channel = %msg.channel_id,
                intent = %intent.intent,
                "response delivery failed: {e}"
            );
        }
    }

    async fn reaction_add(&self, ctx: Context, reaction: Reaction) {
        // The bot marking a boarded message fires this event too.
        let bot_id = ctx.cache.current_user().id;
        if reaction.user_id == Some(bot_id) {
            return;
        }
        starboard::handle_reaction(&self.state, &ctx, &reaction).await;
    }

    async fn guild_create(&self, ctx: Context, guild: Guild, is_new: Option<bool>) {
        // Startup replays every guild through guild_create; only genuinely
        // new memberships count as joins.
        if is_new != Some(true) {
            return;
        }
        let facts = GuildFacts {
            name: guild.name.clone(),
            id: guild.id.get(),
            member_count: guild.member_count,
            icon_url: guild.icon_url(),
        };
        server::guild_joined(&self.state, &ctx, facts).await;
    }

    async fn guild_delete(&self, ctx: Context, incomplete: UnavailableGuild, full: Option<Guild>) {
        // An unavailable guild is an outage, not a removal.
        if incomplete.unavailable {
            return;
        }
        let facts = full
            .map(|guild| GuildFacts {
                name: guild.name.clone(),
                id: guild.id.get(),
                member_count: guild.member_count,
                icon_url: guild.icon_url(),
            })
            .unwrap_or_else(|| GuildFacts {
                name: "unknown".into(),
                id: incomplete.id.get(),
                ..GuildFacts::default()
            });
        server::guild_left(&self.state, &ctx, facts).await;
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(
            bot_user = %ready.user.name,
            guilds = ready.guilds.len(),
            skills = self.state.dispatcher.registry().len(),
            "connected to discord as {}",
            ready.user.name,
        );
        self.state.notifier.set_identity(WebhookIdentity {
            username: ready.user.name.clone(),
            avatar_url: ready.user.avatar_url(),
        });
        server::update_server_count(&self.state, &ctx).await;
    }
}
