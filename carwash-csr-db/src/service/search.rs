use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};

use crate::models::customer::CustomerModel;
use crate::models::request::CsrRequestModel;
use crate::repository::pagination::{Page, PageRequest};

/// Matches that score at or above this pass the filter. Substring
/// containment always scores 1.0; anything else falls back to
/// Jaro-Winkler similarity, so minor typos still match.
const SIMILARITY_THRESHOLD: f64 = 0.72;

fn field_score(field: &str, query: &str) -> f64 {
    let field = field.to_lowercase();
    if field.contains(query) {
        return 1.0;
    }
    strsim::jaro_winkler(&field, query)
}

fn best_score<'a>(fields: impl IntoIterator<Item = &'a str>, query: &str) -> f64 {
    fields
        .into_iter()
        .map(|f| field_score(f, query))
        .fold(0.0, f64::max)
}

fn rank<T>(mut scored: Vec<(f64, T)>) -> Vec<T> {
    scored.retain(|(score, _)| *score >= SIMILARITY_THRESHOLD);
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.into_iter().map(|(_, item)| item).collect()
}

/// Filters and reorders customers by approximate match over name, email,
/// and phone. A blank query returns the input order unchanged. Stateless;
/// restartable on every keystroke.
pub fn search_customers(customers: &[CustomerModel], query: &str) -> Vec<CustomerModel> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return customers.to_vec();
    }

    rank(
        customers
            .iter()
            .map(|c| {
                let score = best_score(
                    [
                        c.first_name.as_str(),
                        c.last_name.as_str(),
                        c.email.as_str(),
                        c.phone.as_str(),
                    ],
                    &query,
                );
                (score, c.clone())
            })
            .collect(),
    )
}

/// One page of a customer search. Scoring happens over the whole list
/// first; the page is a window into the ranked result.
pub fn search_customers_page(
    customers: &[CustomerModel],
    query: &str,
    page: PageRequest,
) -> Page<CustomerModel> {
    Page::from_ranked(search_customers(customers, query), page)
}

/// A request row hydrated with its customer's email for list rendering
/// and search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestListItem {
    pub request: CsrRequestModel,
    pub customer_email: HeaplessString<100>,
}

/// Filters and reorders hydrated request rows by approximate match over
/// the request type label, customer email, details, and id.
pub fn search_requests(items: &[RequestListItem], query: &str) -> Vec<RequestListItem> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return items.to_vec();
    }

    rank(
        items
            .iter()
            .map(|item| {
                let score = best_score(
                    [
                        item.request.request_type.label(),
                        item.customer_email.as_str(),
                        item.request.details.as_str(),
                        item.request.id.as_str(),
                    ],
                    &query,
                );
                (score, item.clone())
            })
            .collect(),
    )
}

/// One page of a request search over hydrated rows.
pub fn search_requests_page(
    items: &[RequestListItem],
    query: &str,
    page: PageRequest,
) -> Page<RequestListItem> {
    Page::from_ranked(search_requests(items, query), page)
}
