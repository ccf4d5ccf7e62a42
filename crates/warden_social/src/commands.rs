//! Slash command definitions and dispatch.

use crate::embeds::{self, page_controls, render_log_dump, EMBED_COLOR};
use crate::error::{DiscordError, DiscordErrorKind, DiscordResult};
use crate::handler::WardenHandler;
use crate::pagination::PageSession;
use crate::surface::DiscordSurface;
use serenity::all::{ChannelId, UserId};
use serenity::builder::{
    CreateAttachment, CreateCommand, CreateCommandOption, CreateEmbed, CreateInteractionResponse,
    CreateInteractionResponseFollowup, CreateInteractionResponseMessage,
};
use serenity::client::Context;
use serenity::model::application::{
    CommandInteraction, CommandOptionType, ResolvedOption, ResolvedValue,
};
use serenity::model::Permissions;
use tracing::{debug, error, warn};
use warden_catalog::SocQueryBuilder;

/// The guild command set registered at startup.
pub fn definitions() -> Vec<CreateCommand> {
    vec![
        CreateCommand::new("server_watch")
            .description("Enable or disable message logging for this server")
            .default_member_permissions(Permissions::ADMINISTRATOR)
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::Boolean,
                    "mode",
                    "true enables server logging, false disables it",
                )
                .required(true),
            ),
        CreateCommand::new("user_logs")
            .description("Retrieve a user's message logs as a file")
            .default_member_permissions(Permissions::ADMINISTRATOR)
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "snowflake",
                    "user snowflake id",
                )
                .required(true),
            ),
        CreateCommand::new("channel_logs")
            .description("Retrieve a channel's message logs as a file")
            .default_member_permissions(Permissions::ADMINISTRATOR)
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "snowflake",
                    "channel snowflake id",
                )
                .required(true),
            ),
        CreateCommand::new("user")
            .description("Get metadata about a user by their snowflake id")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "snowflake",
                    "user snowflake id",
                )
                .required(true),
            ),
        CreateCommand::new("guild").description("Get metadata about the current guild"),
        CreateCommand::new("alias")
            .description("Register a catalog search alias for a department")
            .default_member_permissions(Permissions::ADMINISTRATOR)
            .add_option(
                CreateCommandOption::new(CommandOptionType::String, "alias", "the shorthand")
                    .required(true),
            )
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "department",
                    "the department it expands to",
                )
                .required(true),
            ),
        CreateCommand::new("voice_link")
            .description("Pair a voice channel with a text channel and role")
            .default_member_permissions(Permissions::ADMINISTRATOR)
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "voice",
                    "voice channel snowflake id",
                )
                .required(true),
            )
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "text",
                    "text channel snowflake id",
                )
                .required(true),
            )
            .add_option(
                CreateCommandOption::new(CommandOptionType::String, "role", "role snowflake id")
                    .required(true),
            ),
        soc_definition(),
    ]
}

fn soc_definition() -> CreateCommand {
    let mut command = CreateCommand::new("soc")
        .description("Search the schedule of classes")
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::String,
                "term",
                "academic term, e.g. 2024 Fall",
            )
            .required(true),
        );

    let filters = [
        ("department", "department name, e.g. I&C SCI"),
        ("ge", "GE category, e.g. GE-1A"),
        ("course_number", "course number or range, e.g. 32A or 31-33"),
        ("section_codes", "registration codes, e.g. 44201"),
        ("instructor_name", "instructor last name"),
        ("course_title", "course name fragment"),
        ("division", "ALL, LowerDiv, UpperDiv or Graduate"),
        ("section_type", "ALL, LEC, LAB, SEM, ..."),
        ("units", "unit count, or VAR for variable"),
        ("days", "meeting days, e.g. MWF"),
        ("start_time", "12hr formatted time, e.g. 1:00PM"),
        ("end_time", "12hr formatted time, e.g. 2:00PM"),
        ("max_capacity", "integer, < and > prefixes allowed"),
        ("full_courses", "ANY, SkipFullWaitlist, FullOnly or OverEnrolled"),
        ("cancelled_courses", "Exclude, Include or Only"),
        ("building", "building code, e.g. EH"),
        ("room", "room number, e.g. 1200"),
    ];
    for (name, description) in filters {
        command = command.add_option(CreateCommandOption::new(
            CommandOptionType::String,
            name,
            description,
        ));
    }
    command
}

/// Route a command interaction to its implementation and log failures.
pub async fn dispatch(handler: &WardenHandler, ctx: &Context, cmd: &CommandInteraction) {
    let result = match cmd.data.name.as_str() {
        "server_watch" => server_watch(handler, ctx, cmd).await,
        "user_logs" => user_logs(handler, ctx, cmd).await,
        "channel_logs" => channel_logs(handler, ctx, cmd).await,
        "user" => user_info(ctx, cmd).await,
        "guild" => guild_info(handler, ctx, cmd).await,
        "alias" => alias(handler, ctx, cmd).await,
        "voice_link" => voice_link(handler, ctx, cmd).await,
        "soc" => soc(handler, ctx, cmd).await,
        other => {
            warn!(command = other, "Unknown command interaction");
            Ok(())
        }
    };

    if let Err(e) = result {
        error!(command = %cmd.data.name, error = %e, "Command failed");
    }
}

fn str_option<'a>(options: &'a [ResolvedOption<'a>], name: &str) -> Option<&'a str> {
    options.iter().find_map(|option| match &option.value {
        ResolvedValue::String(value) if option.name == name => Some(*value),
        _ => None,
    })
}

fn bool_option(options: &[ResolvedOption<'_>], name: &str) -> Option<bool> {
    options.iter().find_map(|option| match &option.value {
        ResolvedValue::Boolean(value) if option.name == name => Some(*value),
        _ => None,
    })
}

fn require_guild(cmd: &CommandInteraction) -> DiscordResult<i64> {
    cmd.guild_id
        .map(|id| WardenHandler::to_db_id(id.get()))
        .ok_or_else(|| DiscordError::new(DiscordErrorKind::GuildOnly))
}

fn parse_snowflake(value: &str) -> DiscordResult<u64> {
    value.parse().map_err(|_| {
        DiscordError::new(DiscordErrorKind::InvalidOption(format!(
            "not a snowflake id: {value}"
        )))
    })
}

async fn respond_text(
    ctx: &Context,
    cmd: &CommandInteraction,
    text: impl Into<String>,
) -> DiscordResult<()> {
    cmd.create_response(
        &ctx.http,
        CreateInteractionResponse::Message(
            CreateInteractionResponseMessage::new().content(text.into()),
        ),
    )
    .await?;
    Ok(())
}

async fn server_watch(
    handler: &WardenHandler,
    ctx: &Context,
    cmd: &CommandInteraction,
) -> DiscordResult<()> {
    let guild_id = require_guild(cmd)?;
    let options = cmd.data.options();
    let mode = bool_option(&options, "mode")
        .ok_or_else(|| DiscordError::new(DiscordErrorKind::MissingOption("mode".to_string())))?;

    match handler.journal.update_watch_mode(guild_id, mode).await {
        Ok(()) => {
            let state = if mode { "enabled" } else { "disabled" };
            respond_text(ctx, cmd, format!("Server logging is now {state}")).await
        }
        Err(e) => {
            error!(guild_id, error = %e, "Watch mode update failed");
            respond_text(ctx, cmd, "Logging is unavailable right now, try again later").await
        }
    }
}

async fn user_logs(
    handler: &WardenHandler,
    ctx: &Context,
    cmd: &CommandInteraction,
) -> DiscordResult<()> {
    let guild_id = require_guild(cmd)?;
    let options = cmd.data.options();
    let raw = str_option(&options, "snowflake").ok_or_else(|| {
        DiscordError::new(DiscordErrorKind::MissingOption("snowflake".to_string()))
    })?;
    let snowflake = match parse_snowflake(raw) {
        Ok(id) => id,
        Err(_) => {
            return respond_text(ctx, cmd, format!("{raw} is not a valid snowflake id")).await;
        }
    };

    if ctx.http.get_user(UserId::new(snowflake)).await.is_err() {
        return respond_text(
            ctx,
            cmd,
            format!("User with snowflake {snowflake} does not exist"),
        )
        .await;
    }

    let entries = match handler
        .journal
        .user_logs(guild_id, WardenHandler::to_db_id(snowflake))
        .await
    {
        Ok(entries) => entries,
        Err(e) => {
            error!(guild_id, error = %e, "User log lookup failed");
            return respond_text(ctx, cmd, "Logging is unavailable right now, try again later")
                .await;
        }
    };

    let dump = render_log_dump(&entries);
    cmd.create_response(
        &ctx.http,
        CreateInteractionResponse::Message(CreateInteractionResponseMessage::new().add_file(
            CreateAttachment::bytes(dump.into_bytes(), format!("user_log_{snowflake}.txt")),
        )),
    )
    .await?;
    Ok(())
}

async fn channel_logs(
    handler: &WardenHandler,
    ctx: &Context,
    cmd: &CommandInteraction,
) -> DiscordResult<()> {
    let guild_id = require_guild(cmd)?;
    let options = cmd.data.options();
    let raw = str_option(&options, "snowflake").ok_or_else(|| {
        DiscordError::new(DiscordErrorKind::MissingOption("snowflake".to_string()))
    })?;
    let snowflake = match parse_snowflake(raw) {
        Ok(id) => id,
        Err(_) => {
            return respond_text(ctx, cmd, format!("{raw} is not a valid snowflake id")).await;
        }
    };

    if ctx.http.get_channel(ChannelId::new(snowflake)).await.is_err() {
        return respond_text(
            ctx,
            cmd,
            format!("Channel with snowflake {snowflake} does not exist"),
        )
        .await;
    }

    let entries = match handler
        .journal
        .channel_logs(guild_id, WardenHandler::to_db_id(snowflake))
        .await
    {
        Ok(entries) => entries,
        Err(e) => {
            error!(guild_id, error = %e, "Channel log lookup failed");
            return respond_text(ctx, cmd, "Logging is unavailable right now, try again later")
                .await;
        }
    };

    let dump = render_log_dump(&entries);
    cmd.create_response(
        &ctx.http,
        CreateInteractionResponse::Message(CreateInteractionResponseMessage::new().add_file(
            CreateAttachment::bytes(dump.into_bytes(), format!("channel_log_{snowflake}.txt")),
        )),
    )
    .await?;
    Ok(())
}

async fn user_info(ctx: &Context, cmd: &CommandInteraction) -> DiscordResult<()> {
    let options = cmd.data.options();
    let raw = str_option(&options, "snowflake").ok_or_else(|| {
        DiscordError::new(DiscordErrorKind::MissingOption("snowflake".to_string()))
    })?;
    let snowflake = match parse_snowflake(raw) {
        Ok(id) => id,
        Err(_) => {
            return respond_text(ctx, cmd, format!("{raw} is not a valid snowflake id")).await;
        }
    };

    let user = match ctx.http.get_user(UserId::new(snowflake)).await {
        Ok(user) => user,
        Err(_) => {
            return respond_text(
                ctx,
                cmd,
                format!("A user for the id ({snowflake}) was not found"),
            )
            .await;
        }
    };

    let embed = CreateEmbed::new()
        .title(format!("Snowflake: {}", user.id))
        .color(EMBED_COLOR)
        .field("Discord Id", user.tag(), false)
        .field("Creation Date", user.id.created_at().to_string(), false)
        .field("Avatar URL", user.face(), false)
        .image(user.face());

    cmd.create_response(
        &ctx.http,
        CreateInteractionResponse::Message(CreateInteractionResponseMessage::new().embed(embed)),
    )
    .await?;
    Ok(())
}

async fn guild_info(
    handler: &WardenHandler,
    ctx: &Context,
    cmd: &CommandInteraction,
) -> DiscordResult<()> {
    let Some(guild) = cmd.guild_id else {
        return Err(DiscordError::new(DiscordErrorKind::GuildOnly));
    };
    let guild_id = WardenHandler::to_db_id(guild.get());
    let watching = handler.journal.watching(guild_id).await;

    let name = guild
        .to_partial_guild(&ctx.http)
        .await
        .map(|guild| guild.name)
        .unwrap_or_else(|_| guild_id.to_string());

    let embed = CreateEmbed::new()
        .title(name)
        .color(EMBED_COLOR)
        .field("Server logging", watching.to_string(), false);

    cmd.create_response(
        &ctx.http,
        CreateInteractionResponse::Message(CreateInteractionResponseMessage::new().embed(embed)),
    )
    .await?;
    Ok(())
}

async fn alias(
    handler: &WardenHandler,
    ctx: &Context,
    cmd: &CommandInteraction,
) -> DiscordResult<()> {
    let guild_id = require_guild(cmd)?;
    let options = cmd.data.options();
    let alias = str_option(&options, "alias")
        .ok_or_else(|| DiscordError::new(DiscordErrorKind::MissingOption("alias".to_string())))?;
    let department = str_option(&options, "department").ok_or_else(|| {
        DiscordError::new(DiscordErrorKind::MissingOption("department".to_string()))
    })?;

    match handler
        .journal
        .register_alias(guild_id, alias, department)
        .await
    {
        Ok(()) => {
            respond_text(ctx, cmd, format!("`{alias}` now searches {department}")).await
        }
        Err(e) if e.is_duplicate_key() => {
            respond_text(ctx, cmd, format!("`{alias}` is already registered")).await
        }
        Err(e) => {
            error!(guild_id, error = %e, "Alias registration failed");
            respond_text(ctx, cmd, "Alias registration is unavailable right now").await
        }
    }
}

async fn voice_link(
    handler: &WardenHandler,
    ctx: &Context,
    cmd: &CommandInteraction,
) -> DiscordResult<()> {
    let guild_id = require_guild(cmd)?;
    let options = cmd.data.options();

    let mut ids = [0i64; 3];
    for (slot, name) in ids.iter_mut().zip(["voice", "text", "role"]) {
        let raw = str_option(&options, name).ok_or_else(|| {
            DiscordError::new(DiscordErrorKind::MissingOption(name.to_string()))
        })?;
        match parse_snowflake(raw) {
            Ok(id) => *slot = WardenHandler::to_db_id(id),
            Err(_) => {
                return respond_text(ctx, cmd, format!("{raw} is not a valid snowflake id"))
                    .await;
            }
        }
    }
    let [voice_id, text_id, role_id] = ids;

    match handler
        .journal
        .register_voice_link(guild_id, voice_id, text_id, role_id)
        .await
    {
        Ok(()) => respond_text(ctx, cmd, "Voice channel linked").await,
        Err(e) if e.is_duplicate_key() => {
            respond_text(ctx, cmd, "That voice channel is already linked").await
        }
        Err(e) => {
            error!(guild_id, error = %e, "Voice link registration failed");
            respond_text(ctx, cmd, "Voice link registration is unavailable right now").await
        }
    }
}

async fn soc(
    handler: &WardenHandler,
    ctx: &Context,
    cmd: &CommandInteraction,
) -> DiscordResult<()> {
    let guild_id = require_guild(cmd)?;
    let options = cmd.data.options();
    let term = str_option(&options, "term")
        .ok_or_else(|| DiscordError::new(DiscordErrorKind::MissingOption("term".to_string())))?;

    let mut builder = SocQueryBuilder::default();
    builder.term(term);

    if let Some(department) = str_option(&options, "department") {
        // Guild aliases expand to their registered department.
        let resolved = handler
            .journal
            .resolve_alias(guild_id, department)
            .await
            .unwrap_or_else(|| department.to_string());
        builder.department(resolved);
    }
    let setters: [(&str, fn(&mut SocQueryBuilder, String)); 16] = [
        ("ge", |b, v| {
            b.ge(v);
        }),
        ("course_number", |b, v| {
            b.course_number(v);
        }),
        ("section_codes", |b, v| {
            b.section_codes(v);
        }),
        ("instructor_name", |b, v| {
            b.instructor_name(v);
        }),
        ("course_title", |b, v| {
            b.course_title(v);
        }),
        ("division", |b, v| {
            b.division(v);
        }),
        ("section_type", |b, v| {
            b.section_type(v);
        }),
        ("units", |b, v| {
            b.units(v);
        }),
        ("days", |b, v| {
            b.days(v);
        }),
        ("start_time", |b, v| {
            b.start_time(v);
        }),
        ("end_time", |b, v| {
            b.end_time(v);
        }),
        ("max_capacity", |b, v| {
            b.max_capacity(v);
        }),
        ("full_courses", |b, v| {
            b.full_courses(v);
        }),
        ("cancelled_courses", |b, v| {
            b.cancelled_courses(v);
        }),
        ("building", |b, v| {
            b.building(v);
        }),
        ("room", |b, v| {
            b.room(v);
        }),
    ];
    for (name, set) in setters {
        if let Some(value) = str_option(&options, name) {
            set(&mut builder, value.to_string());
        }
    }
    let query = builder.build().map_err(|e| {
        DiscordError::new(DiscordErrorKind::InvalidOption(e.to_string()))
    })?;

    if let Err(e) = query.validate() {
        return respond_text(ctx, cmd, e.kind.to_string()).await;
    }

    // The search plus per-course detail calls can outlast the 3 second
    // interaction window.
    cmd.defer(&ctx.http).await?;

    let followup_text = |text: String| CreateInteractionResponseFollowup::new().content(text);

    let mut courses = match handler.catalog.search(&query).await {
        Ok(courses) => courses,
        Err(e) => {
            error!(error = %e, "Catalog search failed");
            cmd.create_followup(
                &ctx.http,
                followup_text("The catalog is unavailable right now, try again later".to_string()),
            )
            .await?;
            return Ok(());
        }
    };

    if courses.is_empty() {
        cmd.create_followup(
            &ctx.http,
            followup_text(
                "No results found. Please try again with different search terms".to_string(),
            ),
        )
        .await?;
        return Ok(());
    }
    courses.truncate(10);

    let mut pages = Vec::with_capacity(courses.len());
    for course in &courses {
        let detail = match handler.catalog.course_detail(&course.id).await {
            Ok(detail) => Some(detail),
            Err(e) => {
                debug!(course = %course.id, error = %e, "Course detail lookup failed");
                None
            }
        };
        if query.section_codes.is_some() {
            pages.push(embeds::section_embed(course, detail.as_ref()));
            break;
        }
        pages.push(embeds::course_embed(course, detail.as_ref()));
    }

    let message = cmd
        .create_followup(
            &ctx.http,
            CreateInteractionResponseFollowup::new()
                .embed(pages[0].clone())
                .components(page_controls()),
        )
        .await?;

    let surface = DiscordSurface::new(ctx.http.clone(), message.clone());
    match PageSession::new(cmd.user.id.get(), pages, surface, handler.page_timeout) {
        Ok(session) => {
            let message_id = message.id.get();
            let deadline = session.deadline();
            handler.sessions.insert(message_id, session).await;
            handler.sessions.schedule_expiry(message_id, deadline);
        }
        Err(e) => {
            // Unreachable with a non-empty result set; logged for safety.
            error!(error = %e, "Failed to open page session");
        }
    }

    Ok(())
}
