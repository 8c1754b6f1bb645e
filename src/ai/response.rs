//! Parsing of the two-section model output.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ExtractedEventData;

/// Reply used when the model output has no `RESPONSE_START` section.
pub const FALLBACK_REPLY: &str =
    "I'm processing your request. Could you provide more details about the event?";

/// Result of one extraction round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Extraction {
    /// Free-text reply for the user.
    pub response: String,
    /// Whatever event fields could be extracted; possibly empty.
    pub event_data: ExtractedEventData,
}

/// Splits model output into the reply and the partial event record.
///
/// A missing or unparsable JSON section yields an empty record instead of
/// an error.
#[must_use]
pub fn parse_model_output(output: &str) -> Extraction {
    let response = section(output, "RESPONSE_START", "RESPONSE_END")
        .map_or_else(|| FALLBACK_REPLY.to_string(), str::to_string);

    let event_data = match section(output, "JSON_START", "JSON_END") {
        Some(json) => match serde_json::from_str::<serde_json::Value>(json) {
            Ok(value) => ExtractedEventData::from_json(&value),
            Err(err) => {
                tracing::warn!(error = %err, "assistant returned malformed event JSON");
                ExtractedEventData::default()
            }
        },
        None => ExtractedEventData::default(),
    };

    Extraction {
        response,
        event_data,
    }
}

/// Returns the trimmed text between the first `start` marker and the first
/// `end` marker after it.
fn section<'a>(text: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let (_, rest) = text.split_once(start)?;
    let (body, _) = rest.split_once(end)?;
    Some(body.trim())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_output() {
        let output = "RESPONSE_START\nHi\nRESPONSE_END\n\nJSON_START\n{\"name\":\"Pickup Game\",\"sport\":\"Basketball\"}\nJSON_END";
        let extraction = parse_model_output(output);
        assert_eq!(extraction.response, "Hi");
        assert_eq!(
            extraction.event_data,
            ExtractedEventData {
                name: Some("Pickup Game".into()),
                sport: Some("Basketball".into()),
                ..ExtractedEventData::default()
            }
        );
    }

    #[test]
    fn missing_json_markers_keep_reply() {
        let output = "RESPONSE_START\nWhat sport are you playing?\nRESPONSE_END";
        let extraction = parse_model_output(output);
        assert_eq!(extraction.response, "What sport are you playing?");
        assert_eq!(extraction.event_data, ExtractedEventData::default());
    }

    #[test]
    fn malformed_json_is_swallowed() {
        let output = "RESPONSE_START\nSure!\nRESPONSE_END\nJSON_START\n{\"name\": \"Game\",\nJSON_END";
        let extraction = parse_model_output(output);
        assert_eq!(extraction.response, "Sure!");
        assert_eq!(extraction.event_data, ExtractedEventData::default());
    }

    #[test]
    fn one_mistyped_field_keeps_the_others() {
        let output = "RESPONSE_START\nOk\nRESPONSE_END\nJSON_START\n{\"name\":\"Pickup Game\",\"sport\":\"Basketball\",\"dateTime\":\"2025-01-04T12:00:00\",\"venueNames\":\"Court 1\",\"isRecurring\":\"false\"}\nJSON_END";
        let extraction = parse_model_output(output);
        assert_eq!(extraction.response, "Ok");
        assert_eq!(extraction.event_data.name.as_deref(), Some("Pickup Game"));
        assert_eq!(extraction.event_data.sport.as_deref(), Some("Basketball"));
        assert_eq!(
            extraction.event_data.date_time.as_deref(),
            Some("2025-01-04T12:00:00")
        );
        assert!(extraction.event_data.venue_names.is_none());
        assert!(extraction.event_data.is_recurring.is_none());
    }

    #[test]
    fn missing_reply_falls_back() {
        let extraction = parse_model_output("JSON_START\n{}\nJSON_END");
        assert_eq!(extraction.response, FALLBACK_REPLY);
        assert_eq!(extraction.event_data, ExtractedEventData::default());
    }

    #[test]
    fn unterminated_section_is_ignored() {
        let extraction = parse_model_output("RESPONSE_START\nHello there");
        assert_eq!(extraction.response, FALLBACK_REPLY);
    }

    #[test]
    fn full_template_with_nulls() {
        let output = r#"RESPONSE_START
Got it! Tennis tomorrow at 3 PM. Where will it be?
RESPONSE_END

JSON_START
{
  "name": "Tennis Match",
  "sport": "Tennis",
  "dateTime": "2024-12-31T15:00:00",
  "location": null,
  "description": null,
  "venueNames": [],
  "isRecurring": false,
  "recurrencePattern": null
}
JSON_END"#;
        let extraction = parse_model_output(output);
        assert_eq!(extraction.event_data.date_time.as_deref(), Some("2024-12-31T15:00:00"));
        assert!(extraction.event_data.location.is_none());
        assert_eq!(extraction.event_data.venue_names, Some(vec![]));
        assert!(extraction.event_data.has_event_details());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let extraction = parse_model_output("RESPONSE_START\nHi\nRESPONSE_END");
        let Ok(json) = serde_json::to_value(&extraction) else {
            panic!("serialization failed");
        };
        assert_eq!(json.get("response"), Some(&serde_json::json!("Hi")));
        assert_eq!(json.get("eventData"), Some(&serde_json::json!({})));
    }
}
