//! Unit coverage for limits, cursors, and lookahead pages.

use rstest::rstest;
use serde_json::json;

use super::*;

fn cursor_for(item: &u32) -> Result<Cursor, PaginationError> {
    Cursor::new(format!("doc-{item}"))
}

#[rstest]
#[case(1)]
#[case(10)]
#[case(100)]
fn page_limit_accepts_values_in_range(#[case] value: u32) {
    let limit = PageLimit::new(value).expect("limit in range");
    assert_eq!(u32::from(limit), value);
}

#[rstest]
#[case(0)]
#[case(101)]
#[case(u32::MAX)]
fn page_limit_rejects_values_out_of_range(#[case] value: u32) {
    let error = PageLimit::new(value).expect_err("limit out of range");
    assert_eq!(
        error,
        PaginationError::LimitOutOfRange {
            value,
            min: PageLimit::MIN,
            max: PageLimit::MAX,
        }
    );
}

#[rstest]
fn missing_limit_falls_back_to_default() {
    let limit = PageLimit::from_optional(None).expect("default limit");
    assert_eq!(limit.get(), PageLimit::DEFAULT);
    assert_eq!(limit.lookahead(), 11);
}

#[rstest]
#[case("", PaginationError::EmptyCursor)]
#[case("abc def", PaginationError::MalformedCursor)]
#[case("\tabc", PaginationError::MalformedCursor)]
fn cursor_rejects_invalid_tokens(#[case] token: &str, #[case] expected: PaginationError) {
    assert_eq!(Cursor::new(token), Err(expected));
}

#[rstest]
fn cursor_deserialises_through_validation() {
    let parsed: Result<Cursor, _> = serde_json::from_value(json!(""));
    assert!(parsed.is_err());

    let cursor: Cursor = serde_json::from_value(json!("Zx81")).expect("valid cursor");
    assert_eq!(cursor.to_string(), "Zx81");
}

#[rstest]
fn lookahead_surplus_marks_next_page() {
    let limit = PageLimit::new(3).expect("limit");
    let page = Page::from_lookahead(vec![1, 2, 3, 4], limit, cursor_for).expect("page");

    assert_eq!(page.items(), [1, 2, 3]);
    assert!(page.has_next_page());
    assert_eq!(page.next_cursor().map(Cursor::as_str), Some("doc-3"));
}

#[rstest]
#[case(vec![])]
#[case(vec![1])]
#[case(vec![1, 2, 3])]
fn short_or_exact_results_end_pagination(#[case] fetched: Vec<u32>) {
    let limit = PageLimit::new(3).expect("limit");
    let expected = fetched.clone();
    let page = Page::from_lookahead(fetched, limit, cursor_for).expect("page");

    assert_eq!(page.items(), expected.as_slice());
    assert!(!page.has_next_page());
    assert!(page.next_cursor().is_none());
}

#[rstest]
fn cursor_errors_propagate_from_lookahead() {
    let limit = PageLimit::new(1).expect("limit");
    let result = Page::from_lookahead(vec![1, 2], limit, |_| Cursor::new(""));
    assert_eq!(result, Err(PaginationError::EmptyCursor));
}

#[rstest]
fn envelope_serialises_camel_case_meta_with_null_cursor() {
    let page = Page::new(vec!["a"], PageLimit::default(), None);
    let value = serde_json::to_value(Paginated::from(page)).expect("serialise envelope");

    assert_eq!(
        value,
        json!({
            "data": ["a"],
            "meta": { "limit": 10, "hasNextPage": false, "nextCursor": null }
        })
    );
}

#[rstest]
fn mapping_a_page_keeps_its_metadata() {
    let limit = PageLimit::new(1).expect("limit");
    let page = Page::from_lookahead(vec![7, 8], limit, cursor_for)
        .expect("page")
        .map(|item| item * 2);

    assert_eq!(page.items(), [14]);
    assert_eq!(page.limit(), limit);
    assert_eq!(page.next_cursor().map(Cursor::as_str), Some("doc-7"));
}
