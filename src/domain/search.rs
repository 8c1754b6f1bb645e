//! Free-text search: term escaping and the OR-filter it feeds.
//!
//! The search term is interpolated into a templated filter expression whose
//! grammar uses `%`/`_` as pattern wildcards and `,` `.` `(` `)` as structural
//! separators. [`sanitize`] neutralizes all of them so the term can only ever
//! match literally inside a single clause.

use crate::domain::EventId;

/// Event columns matched by a free-text search.
pub const SEARCH_FIELDS: [&str; 4] = ["name", "sport", "description", "location"];

/// Escapes a raw search term for literal matching.
///
/// Backslashes are escaped first so the escapes inserted afterwards are not
/// themselves reinterpreted. Applying it twice double-escapes.
#[must_use]
pub fn sanitize(raw: &str) -> String {
    let escaped = escape_chars(raw, &['\\']);
    let escaped = escape_chars(&escaped, &['%', '_']);
    escape_chars(&escaped, &[',', '.', '(', ')'])
}

fn escape_chars(input: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// A sanitized search ready to be applied to the event list query.
///
/// Matches an event if any of [`SEARCH_FIELDS`] contains the term
/// (case-insensitive), or if the event is linked to a venue whose name does.
/// Venue matches are resolved beforehand and folded in as id equalities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    term: String,
    venue_event_ids: Vec<EventId>,
}

impl SearchFilter {
    /// Builds a filter from a raw user term. Returns `None` for an empty
    /// term, which means "no search".
    #[must_use]
    pub fn new(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }
        Some(Self {
            term: sanitize(raw),
            venue_event_ids: Vec::new(),
        })
    }

    /// `ILIKE` pattern wrapping the escaped term in wildcards.
    #[must_use]
    pub fn pattern(&self) -> String {
        format!("%{}%", self.term)
    }

    /// Adds events found through the one-hop venue-name lookup.
    #[must_use]
    pub fn with_venue_matches(mut self, event_ids: Vec<EventId>) -> Self {
        self.venue_event_ids = event_ids;
        self
    }

    /// Events matched through their venues.
    #[must_use]
    pub fn venue_event_ids(&self) -> &[EventId] {
        &self.venue_event_ids
    }

    /// Renders the comma-joined OR list, e.g.
    /// `name.ilike.%x%,sport.ilike.%x%,…,id.eq.<uuid>`.
    #[must_use]
    pub fn or_expression(&self) -> String {
        let pattern = self.pattern();
        SEARCH_FIELDS
            .iter()
            .map(|field| format!("{field}.ilike.{pattern}"))
            .chain(self.venue_event_ids.iter().map(|id| format!("id.eq.{id}")))
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    /// Splits an OR list on separators that are not escaped.
    fn split_clauses(expr: &str) -> Vec<String> {
        let mut clauses = Vec::new();
        let mut current = String::new();
        let mut escaped = false;
        for c in expr.chars() {
            if escaped {
                current.push(c);
                escaped = false;
            } else if c == '\\' {
                current.push(c);
                escaped = true;
            } else if c == ',' {
                clauses.push(std::mem::take(&mut current));
            } else {
                current.push(c);
            }
        }
        clauses.push(current);
        clauses
    }

    /// Literal-match check following `ILIKE … ESCAPE '\'` semantics.
    fn like_matches(pattern: &str, text: &str) -> bool {
        fn go(p: &[char], t: &[char]) -> bool {
            match p.split_first() {
                None => t.is_empty(),
                Some(('%', rest)) => (0..=t.len()).any(|i| t.get(i..).is_some_and(|t| go(rest, t))),
                Some(('_', rest)) => t.split_first().is_some_and(|(_, t)| go(rest, t)),
                Some(('\\', rest)) => match (rest.split_first(), t.split_first()) {
                    (Some((pc, rest)), Some((tc, t))) => pc == tc && go(rest, t),
                    _ => false,
                },
                Some((pc, rest)) => t.split_first().is_some_and(|(tc, t)| pc == tc && go(rest, t)),
            }
        }
        let p: Vec<char> = pattern.chars().collect();
        let t: Vec<char> = text.chars().collect();
        go(&p, &t)
    }

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(sanitize("pickup game"), "pickup game");
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn wildcards_are_escaped() {
        assert_eq!(sanitize("50% off_sale"), r"50\% off\_sale");
    }

    #[test]
    fn backslash_is_escaped_before_other_stages() {
        assert_eq!(sanitize(r"a\%"), r"a\\\%");
        assert_eq!(sanitize(r"\"), r"\\");
    }

    #[test]
    fn separators_are_escaped() {
        assert_eq!(sanitize("a,b.c(d)e"), r"a\,b\.c\(d\)e");
    }

    #[test]
    fn sanitizing_twice_double_escapes() {
        assert_eq!(sanitize(&sanitize("%")), r"\\\%");
    }

    #[test]
    fn wildcards_match_only_literally() {
        let Some(filter) = SearchFilter::new("50% off_sale") else {
            panic!("expected a filter");
        };
        let pattern = filter.pattern();
        assert!(like_matches(&pattern, "big 50% off_sale today"));
        assert!(!like_matches(&pattern, "50XXX offYsale"));
        assert!(!like_matches(&pattern, "50% offYsale"));
    }

    #[test]
    fn separators_stay_inside_one_clause() {
        let Some(filter) = SearchFilter::new("a,b.c(d)e") else {
            panic!("expected a filter");
        };
        let clauses = split_clauses(&filter.or_expression());
        assert_eq!(clauses.len(), SEARCH_FIELDS.len());
        for (clause, field) in clauses.iter().zip(SEARCH_FIELDS) {
            let Some(rest) = clause.strip_prefix(&format!("{field}.ilike.")) else {
                panic!("clause {clause} targets the wrong field");
            };
            assert!(like_matches(rest, "a,b.c(d)e"));
            assert!(!rest.contains("id.eq"));
        }
    }

    #[test]
    fn empty_term_is_no_filter() {
        assert!(SearchFilter::new("").is_none());
    }

    #[test]
    fn venue_matches_become_id_clauses() {
        let id = EventId::new();
        let Some(filter) = SearchFilter::new("court") else {
            panic!("expected a filter");
        };
        let filter = filter.with_venue_matches(vec![id]);
        let clauses = split_clauses(&filter.or_expression());
        assert_eq!(clauses.len(), SEARCH_FIELDS.len() + 1);
        assert_eq!(clauses.last(), Some(&format!("id.eq.{id}")));
    }
}
