//! Schedule-of-classes search queries.

use warden_error::{CatalogError, CatalogErrorKind};

/// Search filters needing at least one to narrow a term-wide query.
const NARROWING_FILTERS: &[&str] = &[
    "department",
    "ge",
    "courseNumber",
    "sectionCodes",
    "instructorName",
];

/// A schedule-of-classes search.
///
/// `term` is always required and must name a season (for example
/// `2024 Fall`); the API additionally requires at least one narrowing
/// filter (department, GE category, course number, section codes, or
/// instructor name).
///
/// # Examples
///
/// ```
/// use warden_catalog::SocQueryBuilder;
///
/// let query = SocQueryBuilder::default()
///     .term("2024 Fall")
///     .department("I&C SCI")
///     .build()
///     .unwrap();
/// assert!(query.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, derive_builder::Builder)]
#[builder(setter(into, strip_option), default)]
pub struct SocQuery {
    /// Academic term, e.g. `2024 Fall`
    pub term: String,
    /// General-education category, e.g. `GE-1A`
    pub ge: Option<String>,
    /// Department name, e.g. `I&C SCI`
    pub department: Option<String>,
    /// Course number or range, e.g. `32A` or `31-33`
    pub course_number: Option<String>,
    /// Course division: `ALL`, `LowerDiv`, `UpperDiv`, `Graduate`
    pub division: Option<String>,
    /// Registration section codes, e.g. `44201`
    pub section_codes: Option<String>,
    /// Instructor last name
    pub instructor_name: Option<String>,
    /// Course title fragment
    pub course_title: Option<String>,
    /// Section type: `ALL`, `LEC`, `LAB`, `SEM`, ...
    pub section_type: Option<String>,
    /// Unit count, or `VAR` for variable
    pub units: Option<String>,
    /// Meeting days, e.g. `MWF`
    pub days: Option<String>,
    /// Start time in 12-hour format, e.g. `1:00PM`
    pub start_time: Option<String>,
    /// End time in 12-hour format, e.g. `2:00PM`
    pub end_time: Option<String>,
    /// Maximum capacity, `<` and `>` prefixes allowed
    pub max_capacity: Option<String>,
    /// Full-course policy: `ANY`, `SkipFullWaitlist`, `FullOnly`, `OverEnrolled`
    pub full_courses: Option<String>,
    /// Cancelled-course policy: `Exclude`, `Include`, `Only`
    pub cancelled_courses: Option<String>,
    /// Building code, e.g. `EH`
    pub building: Option<String>,
    /// Room number
    pub room: Option<String>,
}

impl SocQuery {
    /// Check the query against the API's mandatory-parameter rules.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let term = self.term.to_lowercase();
        if !["spring", "summer", "fall", "winter"]
            .iter()
            .any(|season| term.contains(season))
        {
            return Err(CatalogError::new(CatalogErrorKind::InvalidQuery(
                "term must name a season, e.g. '2024 Fall'".to_string(),
            )));
        }

        if self.query_pairs().iter().all(|(key, _)| {
            !NARROWING_FILTERS.contains(key)
        }) {
            return Err(CatalogError::new(CatalogErrorKind::InvalidQuery(format!(
                "at least one of [{}] is required",
                NARROWING_FILTERS.join(", ")
            ))));
        }

        Ok(())
    }

    /// The query string pairs for the search endpoint, term included.
    ///
    /// Percent-encoding is left to the HTTP client.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("term", self.term.clone())];

        let optional = [
            ("ge", &self.ge),
            ("department", &self.department),
            ("courseNumber", &self.course_number),
            ("division", &self.division),
            ("sectionCodes", &self.section_codes),
            ("instructorName", &self.instructor_name),
            ("courseTitle", &self.course_title),
            ("sectionType", &self.section_type),
            ("units", &self.units),
            ("days", &self.days),
            ("startTime", &self.start_time),
            ("endTime", &self.end_time),
            ("maxCapacity", &self.max_capacity),
            ("fullCourses", &self.full_courses),
            ("cancelledCourses", &self.cancelled_courses),
            ("building", &self.building),
            ("room", &self.room),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                pairs.push((key, value.clone()));
            }
        }

        pairs
    }
}
