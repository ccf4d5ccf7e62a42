//! Embed and log-dump rendering.

use serenity::builder::{CreateActionRow, CreateButton, CreateEmbed};
use serenity::model::application::ButtonStyle;
use warden_catalog::{Course, CourseDetail};
use warden_core::LogEntry;

/// Custom id of the previous-page button.
pub const PREV_BUTTON: &str = "warden_page_prev";
/// Custom id of the next-page button.
pub const NEXT_BUTTON: &str = "warden_page_next";
/// Custom id of the delete-result button.
pub const DELETE_BUTTON: &str = "warden_page_delete";

/// Embed accent color shared by all Warden embeds.
pub const EMBED_COLOR: u32 = 0x001F_FFFC;

/// The navigation component row attached to paginated results.
pub fn page_controls() -> Vec<CreateActionRow> {
    vec![CreateActionRow::Buttons(vec![
        CreateButton::new(DELETE_BUTTON)
            .emoji('🗑')
            .style(ButtonStyle::Danger),
        CreateButton::new(PREV_BUTTON)
            .emoji('◀')
            .style(ButtonStyle::Secondary),
        CreateButton::new(NEXT_BUTTON)
            .emoji('▶')
            .style(ButtonStyle::Secondary),
    ])]
}

/// Render one course as an embed, folding in detail data when available.
pub fn course_embed(course: &Course, detail: Option<&CourseDetail>) -> CreateEmbed {
    let mut embed = CreateEmbed::new().title(course.id.clone()).color(EMBED_COLOR);

    if let Some(detail) = detail {
        embed = embed.description(detail.description.clone());

        if let Some(units) = &detail.units {
            let printed = match units.as_slice() {
                [single] => format!("{single}"),
                [min, max] => format!("{min}-{max}"),
                _ => String::new(),
            };
            if !printed.is_empty() {
                embed = embed.field("Units", printed, true);
            }
        }
        if let Some(ge_text) = &detail.ge_text {
            if !ge_text.is_empty() {
                embed = embed.field("GE", ge_text.clone(), true);
            }
        }
        if let Some(overlap) = &detail.overlap {
            if !overlap.is_empty() {
                embed = embed.field("Overlap", overlap.clone(), true);
            }
        }
        if !detail.terms.is_empty() {
            let mut terms = detail.terms.clone();
            terms.truncate(10);
            embed = embed.field("Past Terms", terms.join(", "), false);
        }
    } else {
        embed = embed.description(course.title.clone());
    }

    if !course.sections.is_empty() {
        let mut codes: Vec<&str> = course
            .sections
            .iter()
            .map(|s| s.section_code.as_str())
            .collect();
        codes.truncate(10);
        embed = embed.field("Sections", codes.join(", "), false);
    }

    embed
}

/// Render the first section of a course as a standalone embed.
///
/// Used when the search was for specific section codes, where the section
/// is the answer rather than the course.
pub fn section_embed(course: &Course, detail: Option<&CourseDetail>) -> CreateEmbed {
    let Some(section) = course.sections.first() else {
        return course_embed(course, detail);
    };

    let mut embed = CreateEmbed::new()
        .title(format!(
            "{} ({}) - {}",
            course.id, section.section_code, section.section_type
        ))
        .color(EMBED_COLOR);

    if let Some(detail) = detail {
        embed = embed.description(detail.description.clone());
    }
    if !section.instructors.is_empty() {
        embed = embed.field("Instructors", section.instructors.join("\n"), true);
    }
    if !section.meetings.is_empty() {
        let meetings: Vec<String> = section
            .meetings
            .iter()
            .map(|m| format!("{}, {} @ {}", m.days, m.time, m.bldg))
            .collect();
        embed = embed.field("Meetings", meetings.join("\n"), true);
    }
    if !section.status.is_empty() {
        embed = embed.field("Status", section.status.clone(), true);
    }

    let enrolled = &section.num_currently_enrolled;
    if !enrolled.total_enrolled.is_empty() {
        let section_count = if enrolled.section_enrolled.is_empty() {
            "n/a"
        } else {
            &enrolled.section_enrolled
        };
        embed = embed.field(
            "Currently Enrolled",
            format!(
                "Total Enrolled: {}\nSection Enrolled: {}",
                enrolled.total_enrolled, section_count
            ),
            true,
        );
    }
    if !section.num_on_waitlist.is_empty() {
        embed = embed.field("Waitlist", section.num_on_waitlist.clone(), true);
    }
    if !section.restrictions.is_empty() {
        embed = embed.field("Restrictions", section.restrictions.clone(), true);
    }

    embed
}

/// Render log entries into the plain-text dump attached to log commands.
pub fn render_log_dump(entries: &[LogEntry]) -> String {
    let mut dump = String::new();
    for entry in entries {
        dump.push_str(&format!(
            "{} - {} - {}\n{}\n\n",
            entry.kind, entry.message_id, entry.logged_at, entry.content
        ));
    }
    dump
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use warden_core::LogKind;

    #[test]
    fn log_dump_lists_kind_id_and_content() {
        let entries = vec![
            LogEntry {
                guild_id: 1,
                channel_id: 2,
                user_id: 3,
                message_id: 43,
                content: "hi".to_string(),
                kind: LogKind::Deletion,
                logged_at: NaiveDate::from_ymd_opt(2024, 3, 1)
                    .unwrap()
                    .and_hms_opt(10, 0, 0)
                    .unwrap(),
            },
            LogEntry {
                guild_id: 1,
                channel_id: 2,
                user_id: 3,
                message_id: 42,
                content: "hello".to_string(),
                kind: LogKind::Original,
                logged_at: NaiveDate::from_ymd_opt(2024, 3, 1)
                    .unwrap()
                    .and_hms_opt(9, 0, 0)
                    .unwrap(),
            },
        ];

        let dump = render_log_dump(&entries);
        assert!(dump.starts_with("Deletion - 43 - 2024-03-01 10:00:00\nhi\n\n"));
        assert!(dump.contains("Original - 42 - "));
        assert!(dump.ends_with("hello\n\n"));
    }

    #[test]
    fn empty_log_dump_is_empty() {
        assert!(render_log_dump(&[]).is_empty());
    }
}
