//! Extraction prompt construction.

use crate::domain::event::SPORTS;
use crate::domain::{ChatMessage, ReferenceDates};

/// Sentence the model must use when asked about anything else.
pub const OFF_TOPIC_REPLY: &str =
    "I can only help you create sports events. Could you tell me about a sports event you'd like to create?";

/// Builds the full extraction prompt for a conversation.
///
/// The output is deterministic for a given `history` and `dates`.
#[must_use]
pub fn build_prompt(history: &[ChatMessage], dates: &ReferenceDates) -> String {
    let sports = SPORTS.join(", ");
    let today = dates.today.format("%Y-%m-%d");
    let mut prompt = format!(
        "You are an AI assistant EXCLUSIVELY for creating SPORTS EVENTS. Your ONLY purpose is to help users create sports events through conversation.

RULES:
- ONLY respond to requests about creating sports events.
- If the user asks about anything else, politely decline with: \"{OFF_TOPIC_REPLY}\"
- Available sports: {sports}
- If information is missing, ask the user for it naturally.

REFERENCE DATES (use these literal values, never guess):
TODAY'S DATE: {today}
TODAY IS: {weekday}
TOMORROW: {tomorrow}
NEXT WEEK: {next_week}
THIS WEEKEND: Saturday {saturday}, Sunday {sunday}

DATE AND TIME CONVERSION:
- Output dateTime as ISO 8601: YYYY-MM-DDTHH:mm:ss
- \"today\" = {today}, \"tomorrow\" = {tomorrow}, \"next week\" = {next_week}
- \"this weekend\" or \"this Saturday\" = {saturday}, \"this Sunday\" = {sunday}
- \"next <weekday>\" = the first such weekday after {today}
- \"2 PM\" or \"2pm\" = 14:00:00, \"2:30 PM\" = 14:30:00, \"noon\" = 12:00:00
- If no time is given, use 12:00:00
- Never produce a date in a past year; the year is {year} or later

RECURRING EVENTS:
- \"every Monday\", \"weekly\", \"every week\" -> recurrencePattern: \"weekly\"
- \"every day\", \"daily\" -> recurrencePattern: \"daily\"
- \"every month\", \"monthly\" -> recurrencePattern: \"monthly\"
- \"every year\", \"annually\" -> recurrencePattern: \"yearly\"

Respond in exactly this format:
RESPONSE_START
[Your natural reply to the user, only about sports events]
RESPONSE_END

JSON_START
{{
  \"name\": \"event name or null\",
  \"sport\": \"sport type or null\",
  \"dateTime\": \"ISO datetime string or null\",
  \"location\": \"location string or null\",
  \"description\": \"description or null\",
  \"venueNames\": [\"venue1\", \"venue2\"] or [],
  \"isRecurring\": true or false,
  \"recurrencePattern\": \"weekly, daily, monthly, yearly or null\"
}}
JSON_END

Conversation:
",
        weekday = dates.weekday_name(),
        tomorrow = dates.tomorrow.format("%Y-%m-%d"),
        next_week = dates.next_week.format("%Y-%m-%d"),
        saturday = dates.weekend_saturday.format("%Y-%m-%d"),
        sunday = dates.weekend_sunday.format("%Y-%m-%d"),
        year = dates.today.format("%Y"),
    );

    for message in history {
        prompt.push_str(&format!("{}: {}\n", message.role.label(), message.content));
    }
    prompt.push_str("\nExtract the event details now (only for a sports event request):");
    prompt
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::domain::ChatRole;

    fn dates() -> ReferenceDates {
        let Some(now) = Utc.with_ymd_and_hms(2024, 12, 30, 10, 0, 0).single() else {
            panic!("invalid test timestamp");
        };
        ReferenceDates::for_instant(now)
    }

    fn history() -> Vec<ChatMessage> {
        vec![
            ChatMessage {
                role: ChatRole::Assistant,
                content: "Hi! What are we playing?".into(),
            },
            ChatMessage {
                role: ChatRole::User,
                content: "Basketball tomorrow at 3 PM".into(),
            },
        ]
    }

    #[test]
    fn embeds_reference_dates_literally() {
        let prompt = build_prompt(&history(), &dates());
        assert!(prompt.contains("TODAY'S DATE: 2024-12-30"));
        assert!(prompt.contains("TOMORROW: 2024-12-31"));
        assert!(prompt.contains("TODAY IS: Monday"));
        assert!(prompt.contains("NEXT WEEK: 2025-01-06"));
        assert!(prompt.contains("Saturday 2025-01-04, Sunday 2025-01-05"));
    }

    #[test]
    fn embeds_role_labelled_conversation_in_order() {
        let prompt = build_prompt(&history(), &dates());
        let Some(assistant) = prompt.find("Assistant: Hi! What are we playing?") else {
            panic!("assistant turn missing");
        };
        let Some(user) = prompt.find("User: Basketball tomorrow at 3 PM") else {
            panic!("user turn missing");
        };
        assert!(assistant < user);
    }

    #[test]
    fn states_the_output_contract_and_vocabulary() {
        let prompt = build_prompt(&[], &dates());
        for marker in ["RESPONSE_START", "RESPONSE_END", "JSON_START", "JSON_END"] {
            assert!(prompt.contains(marker), "missing {marker}");
        }
        assert!(prompt.contains("Pickleball"));
        assert!(prompt.contains("\"venueNames\""));
        assert!(prompt.contains("recurrencePattern: \"yearly\""));
        assert!(prompt.contains(OFF_TOPIC_REPLY));
    }

    #[test]
    fn is_deterministic() {
        assert_eq!(build_prompt(&history(), &dates()), build_prompt(&history(), &dates()));
    }
}
