//! Catalog record types.
//!
//! The API nests search results as schools → departments → courses →
//! sections. The wire shapes live here as private serde structs; the
//! public records are flat, with a [`Course`] owning its [`Section`]s.

use serde::Deserialize;

/// One course in a schedule-of-classes search result.
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    /// Catalog id: department code plus course number, e.g. `COMPSCI161`
    pub id: String,
    /// Department code, e.g. `COMPSCI`
    pub department: String,
    /// Course number, e.g. `161`
    pub number: String,
    /// Course title
    pub title: String,
    /// Free-form catalog comment, often empty
    pub comment: String,
    /// Link to the prerequisite listing
    pub prerequisite_url: String,
    /// Sections offered this term
    pub sections: Vec<Section>,
}

/// One section of a course.
///
/// A section is not a course: the two are related by composition, and a
/// section carries only per-offering data.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Registration code, e.g. `44201`
    pub section_code: String,
    /// Section type, e.g. `LEC`, `LAB`
    pub section_type: String,
    /// Unit count as printed in the catalog
    pub units: String,
    /// Instructor names
    #[serde(default)]
    pub instructors: Vec<String>,
    /// Meeting blocks
    #[serde(default)]
    pub meetings: Vec<Meeting>,
    /// Enrollment status, e.g. `OPEN`, `FULL`
    #[serde(default)]
    pub status: String,
    /// Current enrollment counts
    pub num_currently_enrolled: Enrollment,
    /// Waitlist count as printed, `n/a` when the section has none
    #[serde(default)]
    pub num_on_waitlist: String,
    /// Enrollment restriction codes
    #[serde(default)]
    pub restrictions: String,
}

/// A meeting block for a section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Meeting {
    /// Meeting days, e.g. `MWF`
    pub days: String,
    /// Meeting time span
    pub time: String,
    /// Building and room
    pub bldg: String,
}

/// Enrollment counts for a section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    /// Enrollment across all linked sections
    pub total_enrolled: String,
    /// Enrollment in this section alone, empty when not tracked
    #[serde(default)]
    pub section_enrolled: String,
}

/// Extra course information from the per-course detail endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CourseDetail {
    /// Catalog id, matching [`Course::id`]
    pub id: String,
    /// Catalog description
    pub description: String,
    /// Minimum and maximum unit counts
    #[serde(default)]
    pub units: Option<Vec<f32>>,
    /// General-education categories, human readable
    #[serde(default)]
    pub ge_text: Option<String>,
    /// Overlap restrictions with other courses
    #[serde(default)]
    pub overlap: Option<String>,
    /// Past terms the course was offered
    #[serde(default)]
    pub terms: Vec<String>,
}

// Wire shapes for the search endpoint.

#[derive(Debug, Deserialize)]
pub(crate) struct SocResponse {
    pub schools: Vec<SchoolNode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SchoolNode {
    pub departments: Vec<DepartmentNode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DepartmentNode {
    pub courses: Vec<CourseNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CourseNode {
    pub dept_code: String,
    pub course_number: String,
    pub course_title: String,
    #[serde(default)]
    pub course_comment: String,
    #[serde(default)]
    pub prerequisite_link: String,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl From<CourseNode> for Course {
    fn from(node: CourseNode) -> Self {
        Course {
            id: format!("{}{}", node.dept_code, node.course_number),
            department: node.dept_code,
            number: node.course_number,
            title: node.course_title,
            comment: node.course_comment,
            prerequisite_url: node.prerequisite_link,
            sections: node.sections,
        }
    }
}

/// Flatten the nested search response into the course list.
pub(crate) fn flatten_courses(response: SocResponse) -> Vec<Course> {
    response
        .schools
        .into_iter()
        .flat_map(|school| school.departments)
        .flat_map(|department| department.courses)
        .map(Course::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "schools": [{
            "departments": [{
                "courses": [{
                    "deptCode": "COMPSCI",
                    "courseNumber": "161",
                    "courseTitle": "DES&ANALYS OF ALGOR",
                    "courseComment": "",
                    "prerequisiteLink": "https://catalog.example.edu/compsci161",
                    "sections": [{
                        "sectionCode": "34250",
                        "sectionType": "LEC",
                        "units": "4",
                        "instructors": ["SHINDLER, M."],
                        "meetings": [{"days": "MWF", "time": "10:00-10:50", "bldg": "ALP 2300"}],
                        "status": "OPEN",
                        "numCurrentlyEnrolled": {"totalEnrolled": "249", "sectionEnrolled": ""},
                        "numOnWaitlist": "n/a",
                        "restrictions": "A"
                    }]
                }]
            }]
        }]
    }"#;

    #[test]
    fn search_response_flattens_into_typed_courses() {
        let response: SocResponse = serde_json::from_str(SAMPLE).unwrap();
        let courses = flatten_courses(response);

        assert_eq!(courses.len(), 1);
        let course = &courses[0];
        assert_eq!(course.id, "COMPSCI161");
        assert_eq!(course.department, "COMPSCI");
        assert_eq!(course.sections.len(), 1);

        let section = &course.sections[0];
        assert_eq!(section.section_code, "34250");
        assert_eq!(section.num_currently_enrolled.total_enrolled, "249");
        assert_eq!(section.meetings[0].bldg, "ALP 2300");
    }

    #[test]
    fn missing_required_fields_fail_closed() {
        // No sectionCode on the section
        let broken = r#"{
            "schools": [{
                "departments": [{
                    "courses": [{
                        "deptCode": "COMPSCI",
                        "courseNumber": "161",
                        "courseTitle": "DES&ANALYS OF ALGOR",
                        "sections": [{
                            "sectionType": "LEC",
                            "units": "4",
                            "numCurrentlyEnrolled": {"totalEnrolled": "249"}
                        }]
                    }]
                }]
            }]
        }"#;
        assert!(serde_json::from_str::<SocResponse>(broken).is_err());
    }

    #[test]
    fn detail_parses_with_optional_fields_absent() {
        let detail: CourseDetail = serde_json::from_str(
            r#"{"id": "COMPSCI161", "description": "Algorithm design."}"#,
        )
        .unwrap();
        assert_eq!(detail.id, "COMPSCI161");
        assert!(detail.ge_text.is_none());
        assert!(detail.terms.is_empty());
    }
}
