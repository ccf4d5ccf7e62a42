//! Catalog HTTP client.

use crate::query::SocQuery;
use crate::records::{flatten_courses, Course, CourseDetail, SocResponse};
use tracing::{debug, instrument};
use warden_error::{CatalogError, CatalogErrorKind};

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// HTTP client for the course catalog API.
///
/// # Example
///
/// ```rust,ignore
/// use warden_catalog::{CatalogClient, SocQueryBuilder};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = CatalogClient::new("https://api.example.edu/rest/v0");
/// let query = SocQueryBuilder::default()
///     .term("2024 Fall")
///     .department("I&C SCI")
///     .build()?;
/// let courses = client.search(&query).await?;
/// # Ok(())
/// # }
/// ```
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    /// Create a client for the catalog API rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Search the schedule of classes.
    ///
    /// Validates the query locally first, then decodes the nested
    /// school/department/course response into a flat course list.
    #[instrument(skip(self, query), fields(term = %query.term))]
    pub async fn search(&self, query: &SocQuery) -> CatalogResult<Vec<Course>> {
        query.validate()?;

        let url = format!("{}/schedule/soc", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&query.query_pairs())
            .send()
            .await
            .map_err(|e| CatalogError::new(CatalogErrorKind::Http(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::new(CatalogErrorKind::Status(
                status.as_u16(),
            )));
        }

        let body: SocResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::new(CatalogErrorKind::Json(e.to_string())))?;

        let courses = flatten_courses(body);
        debug!(results = courses.len(), "Catalog search completed");
        Ok(courses)
    }

    /// Fetch the detail record for one course.
    #[instrument(skip(self))]
    pub async fn course_detail(&self, course_id: &str) -> CatalogResult<CourseDetail> {
        let url = format!("{}/courses/{}", self.base_url, course_id);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| CatalogError::new(CatalogErrorKind::Http(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::new(CatalogErrorKind::Status(
                status.as_u16(),
            )));
        }

        response
            .json()
            .await
            .map_err(|e| CatalogError::new(CatalogErrorKind::Json(e.to_string())))
    }
}
