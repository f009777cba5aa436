//! Lead capture: the contact form, the download gate, and the admin
//! triage views over stored queries.

use std::sync::LazyLock;

use chrono::{NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{ApiError, Result};
use crate::models::contact_query::{ContactQuery, NewContactQuery, STATUSES, STATUS_NEW};
use crate::models::product::Product;
use crate::models::{fits_column, NAME_MAX_LEN, PHONE_MAX_LEN, SUBJECT_MAX_LEN};
use crate::services::pagination::{paginate, Page, PageRequest};
use crate::store::Store;

/// Admin query table page size.
pub const QUERIES_PER_PAGE: usize = 10;

static NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z\s]+$").unwrap());
static EMAIL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([+]?[\s0-9]+)?([0-9]{3}|[(]?[0-9]+[)])?([-]?[\s]?[0-9])+$").unwrap()
});
static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    Contact,
    Download,
}

impl QueryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            QueryKind::Contact => "contact",
            QueryKind::Download => "download",
        }
    }

    /// Label used in exports.
    pub fn label(self) -> &'static str {
        match self {
            QueryKind::Contact => "Contact Inquiry",
            QueryKind::Download => "Download Request",
        }
    }
}

/// Download-gate leads are recognised by their subject line.
pub fn query_kind(subject: &str) -> QueryKind {
    if subject.to_lowercase().contains("download request") {
        QueryKind::Download
    } else {
        QueryKind::Contact
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn fail(message: &str) -> Result<()> {
    Err(ApiError::bad_request(message))
}

fn check_len(label: &str, value: &str, max: usize) -> Result<()> {
    if fits_column(value, max) {
        Ok(())
    } else {
        Err(ApiError::bad_request(format!("{label} must be at most {max} characters")))
    }
}

// ── Contact form ──

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    /// Check every rule in form order; the first failure is reported.
    pub fn validate(&self) -> Result<()> {
        for (value, label) in [(&self.first_name, "First name"), (&self.last_name, "Last name")] {
            if char_len(value) < 2 {
                return Err(ApiError::bad_request(format!("{label} must be at least 2 characters")));
            }
            if !NAME.is_match(value) {
                return Err(ApiError::bad_request(format!("{label} must contain only letters")));
            }
            check_len(label, value, NAME_MAX_LEN)?;
        }
        if !EMAIL.is_match(&self.email) {
            return fail("Invalid email address");
        }
        check_len("Email", &self.email, NAME_MAX_LEN)?;
        if !PHONE.is_match(&self.phone_number) {
            return fail("Invalid phone number format");
        }
        check_len("Phone number", &self.phone_number, PHONE_MAX_LEN)?;
        if self.subject.is_empty() {
            return fail("Subject is required");
        }
        check_len("Subject", &self.subject, SUBJECT_MAX_LEN)?;
        if char_len(&self.message) < 10 {
            return fail("Message must be at least 10 characters");
        }
        Ok(())
    }

    fn into_new_query(self) -> NewContactQuery {
        NewContactQuery {
            id: Uuid::new_v4(),
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone_number: self.phone_number,
            subject: self.subject,
            message: self.message,
            status: STATUS_NEW.to_string(),
        }
    }
}

pub async fn submit_contact(store: &dyn Store, form: ContactForm) -> Result<ContactQuery> {
    form.validate()?;
    let kind = query_kind(&form.subject);
    let query = store.insert_query(form.into_new_query()).await?;

    crate::metrics::query_submitted(kind.as_str());
    tracing::info!(query_id = %query.id, kind = kind.as_str(), "Query submitted");
    Ok(query)
}

// ── Download gate ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentKind {
    TechnicalDrawing,
    InstallationManual,
    Brochure,
    TechnicalDataSheet,
}

impl DocumentKind {
    pub fn label(self) -> &'static str {
        match self {
            DocumentKind::TechnicalDrawing => "Technical Drawing",
            DocumentKind::InstallationManual => "Installation Manual",
            DocumentKind::Brochure => "Brochure",
            DocumentKind::TechnicalDataSheet => "Technical Data Sheet",
        }
    }

    /// The product's link for this document, if it has one.
    pub fn link(self, product: &Product) -> Option<&str> {
        let link = match self {
            DocumentKind::TechnicalDrawing => &product.technical_drawing,
            DocumentKind::InstallationManual => &product.installation_manual,
            DocumentKind::Brochure => &product.brochure,
            DocumentKind::TechnicalDataSheet => &product.technical_data_sheet,
        };
        Some(link.trim()).filter(|l| !l.is_empty())
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DownloadRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub country_code: String,
    pub company: Option<String>,
    pub product_slug: String,
    pub document: Option<DocumentKind>,
}

impl DownloadRequest {
    pub fn validate(&self) -> Result<()> {
        if char_len(&self.first_name) < 2 {
            return fail("First name is too short");
        }
        check_len("First name", &self.first_name, NAME_MAX_LEN)?;
        if char_len(&self.last_name) < 2 {
            return fail("Last name is too short");
        }
        check_len("Last name", &self.last_name, NAME_MAX_LEN)?;
        if !EMAIL.is_match(&self.email) {
            return fail("Please enter a valid email address");
        }
        check_len("Email", &self.email, NAME_MAX_LEN)?;
        if char_len(&self.phone_number) < 10 {
            return fail("Phone number must be at least 10 digits");
        }
        if !DIGITS.is_match(&self.phone_number) {
            return fail("Phone number must contain only digits");
        }
        // Stored as "<countryCode> <phone>".
        let stored_phone = char_len(self.country_code.trim()) + 1 + char_len(&self.phone_number);
        if stored_phone > PHONE_MAX_LEN {
            return Err(ApiError::bad_request(format!(
                "Phone number must be at most {PHONE_MAX_LEN} characters"
            )));
        }
        Ok(())
    }

    /// The contact-form submission recorded for this download.
    fn into_contact_form(self, product: &Product, document: DocumentKind) -> ContactForm {
        let label = document.label();
        let company = self
            .company
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| "N/A".to_string());

        ContactForm {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone_number: format!("{} {}", self.country_code.trim(), self.phone_number)
                .trim()
                .to_string(),
            subject: format!("Download Request: {} - {label}", product.name),
            message: format!(
                "User downloaded {label} for product: {}. Company: {company}",
                product.name
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadGrant {
    pub success: bool,
    pub id: Uuid,
    pub download_url: String,
}

/// Absolute URL for a document link; relative links hang off `public_url`.
fn absolute_url(link: &str, public_url: &str) -> String {
    if link.starts_with("http://") || link.starts_with("https://") {
        link.to_string()
    } else if link.starts_with('/') {
        format!("{public_url}{link}")
    } else {
        format!("{public_url}/{link}")
    }
}

/// Record a download-gate lead and hand back the document link.
pub async fn request_download(
    store: &dyn Store,
    public_url: &str,
    request: DownloadRequest,
) -> Result<DownloadGrant> {
    request.validate()?;
    let document = request
        .document
        .ok_or_else(|| ApiError::bad_request("Document is required"))?;
    let product = store
        .find_product_by_slug(&request.product_slug)
        .await?
        .filter(|p| p.published)
        .ok_or_else(|| ApiError::not_found("Product not found"))?;
    let link = document
        .link(&product)
        .ok_or_else(|| ApiError::not_found("Document not available"))?;
    let download_url = absolute_url(link, public_url);

    let query = submit_contact(store, request.into_contact_form(&product, document)).await?;
    Ok(DownloadGrant {
        success: true,
        id: query.id,
        download_url,
    })
}

// ── Admin views ──

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryFilter {
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page: Option<usize>,
}

/// [`QueryFilter`] with its values parsed.
struct ParsedFilter {
    search: String,
    kind: Option<QueryKind>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

fn parse_date(value: Option<&str>) -> Result<Option<NaiveDate>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => NaiveDate::parse_from_str(v, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| ApiError::bad_request(format!("Invalid date: {v}"))),
    }
}

impl QueryFilter {
    fn parse(&self) -> Result<ParsedFilter> {
        let kind = match self.kind.as_deref().map(str::trim) {
            None | Some("") | Some("all") => None,
            Some("contact") => Some(QueryKind::Contact),
            Some("download") => Some(QueryKind::Download),
            Some(other) => return Err(ApiError::bad_request(format!("Invalid type: {other}"))),
        };
        Ok(ParsedFilter {
            search: self.search.as_deref().unwrap_or_default().trim().to_lowercase(),
            kind,
            start: parse_date(self.start_date.as_deref())?,
            end: parse_date(self.end_date.as_deref())?,
        })
    }
}

impl ParsedFilter {
    fn matches(&self, query: &ContactQuery) -> bool {
        if self.kind.is_some_and(|k| k != query_kind(&query.subject)) {
            return false;
        }

        let s = &self.search;
        let search_ok = s.is_empty()
            || query.first_name.to_lowercase().contains(s)
            || query.last_name.to_lowercase().contains(s)
            || query.email.to_lowercase().contains(s)
            || query.phone_number.contains(s.as_str())
            || query.subject.to_lowercase().contains(s);

        let day = query.created_at.date_naive();
        search_ok
            && self.start.is_none_or(|start| day >= start)
            && self.end.is_none_or(|end| day <= end)
    }
}

/// A stored query with its derived kind, as listed to admins.
#[derive(Debug, Clone, Serialize)]
pub struct QueryRow {
    #[serde(flatten)]
    pub query: ContactQuery,
    #[serde(rename = "type")]
    pub kind: QueryKind,
}

async fn filtered(store: &dyn Store, filter: &QueryFilter) -> Result<Vec<ContactQuery>> {
    let parsed = filter.parse()?;
    let mut queries = store.list_queries().await?;
    queries.retain(|q| parsed.matches(q));
    Ok(queries)
}

pub async fn list_queries(store: &dyn Store, filter: &QueryFilter) -> Result<Page<QueryRow>> {
    let rows = filtered(store, filter)
        .await?
        .into_iter()
        .map(|query| QueryRow {
            kind: query_kind(&query.subject),
            query,
        })
        .collect();
    Ok(paginate(
        rows,
        PageRequest {
            page: filter.page,
            per_page: Some(QUERIES_PER_PAGE),
        },
    ))
}

pub const EXPORT_HEADER: [&str; 9] = [
    "Date",
    "Type",
    "First Name",
    "Last Name",
    "Email",
    "Phone",
    "Subject",
    "Details",
    "Status",
];

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn csv_line<'a>(fields: impl IntoIterator<Item = &'a str>) -> String {
    let mut line = fields.into_iter().map(csv_field).collect::<Vec<_>>().join(",");
    line.push_str("\r\n");
    line
}

/// Render queries as CSV with a header row.
pub fn queries_to_csv(queries: &[ContactQuery]) -> String {
    let mut out = csv_line(EXPORT_HEADER);
    for q in queries {
        let date = q.created_at.format("%Y-%m-%d %H:%M:%S").to_string();
        let phone = if q.phone_number.is_empty() {
            "N/A"
        } else {
            q.phone_number.as_str()
        };
        out.push_str(&csv_line([
            date.as_str(),
            query_kind(&q.subject).label(),
            q.first_name.as_str(),
            q.last_name.as_str(),
            q.email.as_str(),
            phone,
            q.subject.as_str(),
            q.message.as_str(),
            q.status.as_str(),
        ]));
    }
    out
}

/// Attachment name for an export made today.
pub fn export_filename() -> String {
    format!("queries_export_{}.csv", Utc::now().format("%Y-%m-%d"))
}

pub async fn export_queries(store: &dyn Store, filter: &QueryFilter) -> Result<String> {
    let queries = filtered(store, filter).await?;
    Ok(queries_to_csv(&queries))
}

pub async fn update_status(store: &dyn Store, id: Uuid, status: &str) -> Result<ContactQuery> {
    if !STATUSES.contains(&status) {
        return Err(ApiError::bad_request(format!("Invalid status: {status}")));
    }
    let query = store
        .update_query_status(id, status)
        .await?
        .ok_or_else(|| ApiError::not_found("Query not found"))?;
    tracing::info!(query_id = %id, status, "Query status updated");
    Ok(query)
}

pub async fn delete_query(store: &dyn Store, id: Uuid) -> Result<()> {
    if !store.delete_query(id).await? {
        return Err(ApiError::not_found("Query not found"));
    }
    tracing::info!(query_id = %id, "Query deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::test_utils::{sample_new_product, sample_query};
    use chrono::TimeZone;

    fn contact() -> ContactForm {
        ContactForm {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone_number: "+1 555 123 4567".to_string(),
            subject: "Bulk order".to_string(),
            message: "We need forty arms for our office.".to_string(),
        }
    }

    fn message_of(form: ContactForm) -> String {
        form.validate().unwrap_err().user_message()
    }

    #[test]
    fn contact_rules_in_order() {
        assert!(contact().validate().is_ok());

        let mut form = contact();
        form.first_name = "J".to_string();
        assert_eq!(message_of(form), "First name must be at least 2 characters");

        let mut form = contact();
        form.last_name = "D0e".to_string();
        assert_eq!(message_of(form), "Last name must contain only letters");

        let mut form = contact();
        form.email = "jane@example".to_string();
        assert_eq!(message_of(form), "Invalid email address");

        let mut form = contact();
        form.phone_number = "call me".to_string();
        assert_eq!(message_of(form), "Invalid phone number format");

        let mut form = contact();
        form.subject = String::new();
        assert_eq!(message_of(form), "Subject is required");
    }

    #[test]
    fn short_messages_are_rejected() {
        let mut form = contact();
        form.message = "Too short".to_string();
        assert_eq!(message_of(form), "Message must be at least 10 characters");

        let mut form = contact();
        form.message = "Long enough".to_string();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn phone_formats() {
        for ok in ["5551234567", "+91 9876543210", "(555) 123-4567", "+44 20 7946 0958"] {
            assert!(PHONE.is_match(ok), "{ok}");
        }
        for bad in ["", "abc", "555-CALL", "٥٥٥١٢٣٤٥٦٧"] {
            assert!(!PHONE.is_match(bad), "{bad}");
        }
    }

    #[test]
    fn fields_wider_than_their_column_are_rejected() {
        let mut form = contact();
        form.phone_number = "5".repeat(70);
        assert_eq!(message_of(form), "Phone number must be at most 64 characters");

        let mut form = contact();
        form.email = format!("{}@example.com", "j".repeat(250));
        assert_eq!(message_of(form), "Email must be at most 255 characters");

        let mut form = contact();
        form.subject = "s".repeat(513);
        assert_eq!(message_of(form), "Subject must be at most 512 characters");
    }

    #[test]
    fn kind_from_subject() {
        assert_eq!(query_kind("Download Request: Arm - Brochure"), QueryKind::Download);
        assert_eq!(query_kind("re: DOWNLOAD REQUEST"), QueryKind::Download);
        assert_eq!(query_kind("Pricing"), QueryKind::Contact);
    }

    fn download() -> DownloadRequest {
        DownloadRequest {
            first_name: "Ravi".to_string(),
            last_name: "Kumar".to_string(),
            email: "ravi@example.com".to_string(),
            phone_number: "9876543210".to_string(),
            country_code: "+91".to_string(),
            company: None,
            product_slug: "arm".to_string(),
            document: Some(DocumentKind::Brochure),
        }
    }

    #[test]
    fn download_form_rules() {
        let mut req = download();
        req.phone_number = "98765".to_string();
        assert_eq!(
            req.validate().unwrap_err().user_message(),
            "Phone number must be at least 10 digits"
        );

        let mut req = download();
        req.phone_number = "98765-43210".to_string();
        assert_eq!(
            req.validate().unwrap_err().user_message(),
            "Phone number must contain only digits"
        );

        let mut req = download();
        req.phone_number = "١٢٣٤٥٦٧٨٩٠".to_string();
        assert_eq!(
            req.validate().unwrap_err().user_message(),
            "Phone number must contain only digits"
        );

        let mut req = download();
        req.phone_number = "9".repeat(61);
        assert_eq!(
            req.validate().unwrap_err().user_message(),
            "Phone number must be at most 64 characters"
        );
    }

    #[tokio::test]
    async fn download_records_lead_and_returns_link() {
        let store = MemoryStore::new();
        let mut product = sample_new_product("arm");
        product.name = "Monitor Arm".to_string();
        product.brochure = "/uploads/arm.pdf".to_string();
        store.insert_product(product).await.unwrap();

        let grant = request_download(&store, "http://localhost:3002", download())
            .await
            .unwrap();
        assert_eq!(grant.download_url, "http://localhost:3002/uploads/arm.pdf");

        let query = store.find_query(grant.id).await.unwrap().unwrap();
        assert_eq!(query.subject, "Download Request: Monitor Arm - Brochure");
        assert_eq!(
            query.message,
            "User downloaded Brochure for product: Monitor Arm. Company: N/A"
        );
        assert_eq!(query.phone_number, "+91 9876543210");
        assert_eq!(query.status, STATUS_NEW);
    }

    #[tokio::test]
    async fn missing_document_is_not_found() {
        let store = MemoryStore::new();
        store.insert_product(sample_new_product("arm")).await.unwrap();

        let mut req = download();
        req.document = Some(DocumentKind::TechnicalDrawing);
        let err = request_download(&store, "http://localhost:3002", req).await.unwrap_err();
        assert_eq!(err.user_message(), "Document not available");

        let mut req = download();
        req.product_slug = "nope".to_string();
        let err = request_download(&store, "http://localhost:3002", req).await.unwrap_err();
        assert_eq!(err.user_message(), "Product not found");
    }

    #[test]
    fn filter_by_type_search_and_dates() {
        let mut old = sample_query("Download Request: Arm - Brochure");
        old.created_at = Utc.with_ymd_and_hms(2024, 1, 10, 23, 30, 0).unwrap();
        let mut recent = sample_query("Pricing");
        recent.first_name = "Alice".to_string();
        recent.created_at = Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap();

        let filter = QueryFilter {
            kind: Some("download".to_string()),
            ..Default::default()
        };
        let parsed = filter.parse().unwrap();
        assert!(parsed.matches(&old));
        assert!(!parsed.matches(&recent));

        let filter = QueryFilter {
            search: Some("ALI".to_string()),
            ..Default::default()
        };
        assert!(filter.parse().unwrap().matches(&recent));

        let filter = QueryFilter {
            start_date: Some("2024-01-10".to_string()),
            end_date: Some("2024-01-10".to_string()),
            ..Default::default()
        };
        let parsed = filter.parse().unwrap();
        assert!(parsed.matches(&old));
        assert!(!parsed.matches(&recent));
    }

    #[test]
    fn bad_filter_values_are_rejected() {
        let filter = QueryFilter {
            start_date: Some("10/01/2024".to_string()),
            ..Default::default()
        };
        assert!(filter.parse().is_err());

        let filter = QueryFilter {
            kind: Some("spam".to_string()),
            ..Default::default()
        };
        assert!(filter.parse().is_err());
    }

    #[test]
    fn csv_quotes_and_defaults() {
        let mut q = sample_query("Hello, world");
        q.phone_number = String::new();
        q.message = "He said \"hi\"\nthen left".to_string();
        q.created_at = Utc.with_ymd_and_hms(2024, 3, 5, 9, 15, 0).unwrap();

        let csv = queries_to_csv(&[q]);
        let mut lines = csv.split("\r\n");
        assert_eq!(
            lines.next().unwrap(),
            "Date,Type,First Name,Last Name,Email,Phone,Subject,Details,Status"
        );
        assert_eq!(
            lines.next().unwrap(),
            "2024-03-05 09:15:00,Contact Inquiry,Jane,Doe,jane@example.com,N/A,\"Hello, world\",\"He said \"\"hi\"\"\nthen left\",new"
        );
    }

    #[tokio::test]
    async fn status_vocabulary_is_enforced() {
        let store = MemoryStore::new();
        let query = submit_contact(&store, contact()).await.unwrap();

        let err = update_status(&store, query.id, "archived").await.unwrap_err();
        assert_eq!(err.user_message(), "Invalid status: archived");

        let updated = update_status(&store, query.id, "contacted").await.unwrap();
        assert_eq!(updated.status, "contacted");

        let err = update_status(&store, Uuid::new_v4(), "closed").await.unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::NOT_FOUND);
    }
}
