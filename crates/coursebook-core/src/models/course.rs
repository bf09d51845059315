//! Course catalog entries and partial updates.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::warn;

/// Course identifier.
///
/// The backend sends numeric ids, while update URLs and user input carry them
/// as text, so both forms are accepted and compared by their textual form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CourseId {
    Number(i64),
    Text(String),
}

impl CourseId {
    pub fn as_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CourseId::Number(n) => write!(f, "{}", n),
            CourseId::Text(s) => f.write_str(s),
        }
    }
}

impl PartialEq for CourseId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CourseId::Number(a), CourseId::Number(b)) => a == b,
            (CourseId::Text(a), CourseId::Text(b)) => a == b,
            _ => self.as_text() == other.as_text(),
        }
    }
}

impl Eq for CourseId {}

impl From<i64> for CourseId {
    fn from(id: i64) -> Self {
        CourseId::Number(id)
    }
}

impl From<&str> for CourseId {
    fn from(id: &str) -> Self {
        CourseId::Text(id.to_string())
    }
}

impl From<String> for CourseId {
    fn from(id: String) -> Self {
        CourseId::Text(id)
    }
}

/// Course category. Unknown categories are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    Beginner,
    Advanced,
    Other(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Category::Beginner => "BEGINNER",
            Category::Advanced => "ADVANCED",
            Category::Other(s) => s,
        }
    }

    /// Human-readable label for list headers.
    pub fn label(&self) -> &str {
        match self {
            Category::Beginner => "Beginners",
            Category::Advanced => "Advanced",
            Category::Other(s) => s,
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "BEGINNER" => Category::Beginner,
            "ADVANCED" => Category::Advanced,
            other => Category::Other(other.to_string()),
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Other(String::new())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Category {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Category::parse(&s))
    }
}

/// A catalog entry. Only `id` is required; other fields fall back to
/// defaults when missing or null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    /// Display title of the course
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: Category,
    #[serde(
        rename = "seqNo",
        default,
        deserialize_with = "null_as_default",
        serialize_with = "serialize_seq_no"
    )]
    pub seq_no: f64,
    #[serde(rename = "longDescription", default, skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(rename = "iconUrl", default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(rename = "courseListIcon", default, skip_serializing_if = "Option::is_none")]
    pub course_list_icon: Option<String>,
    #[serde(
        rename = "lessonsCount",
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub lessons_count: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub promo: bool,
    /// Any other fields the backend sends, preserved as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Course {
    /// Return a copy of this course with `changes` applied over its fields.
    pub fn merged(&self, changes: &CourseChanges) -> Result<Course, serde_json::Error> {
        let mut value = serde_json::to_value(self)?;
        if let Value::Object(ref mut fields) = value {
            for (key, change) in changes.fields() {
                fields.insert(key.clone(), change.clone());
            }
        }
        serde_json::from_value(value)
    }

    pub fn display_lessons(&self) -> String {
        match self.lessons_count {
            Some(1) => "1 lesson".to_string(),
            Some(n) => format!("{} lessons", n),
            None => String::new(),
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Whole sequence numbers go back on the wire as integers.
fn serialize_seq_no<S: Serializer>(seq_no: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if seq_no.fract() == 0.0 && seq_no.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*seq_no as i64)
    } else {
        serializer.serialize_f64(*seq_no)
    }
}

/// Lesson count as a non-negative integer; anything else reads as unknown.
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let count = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    Ok(count)
}

/// Ordering used by every category listing: ascending sequence number.
pub fn sort_courses_by_seq_no(a: &Course, b: &Course) -> Ordering {
    a.seq_no.total_cmp(&b.seq_no)
}

/// A partial course: only the fields being changed, in wire form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseChanges(Map<String, Value>);

impl CourseChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(self, description: impl Into<String>) -> Self {
        self.set("description", Value::String(description.into()))
    }

    pub fn long_description(self, long_description: impl Into<String>) -> Self {
        self.set("longDescription", Value::String(long_description.into()))
    }

    pub fn category(self, category: Category) -> Self {
        self.set("category", Value::String(category.as_str().to_string()))
    }

    pub fn seq_no(self, seq_no: i64) -> Self {
        self.set("seqNo", Value::from(seq_no))
    }

    pub fn promo(self, promo: bool) -> Self {
        self.set("promo", Value::Bool(promo))
    }

    /// Set an arbitrary wire field.
    pub fn set(mut self, field: impl Into<String>, value: Value) -> Self {
        self.0.insert(field.into(), value);
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Wire envelope of the course list endpoint.
#[derive(Debug, Deserialize)]
pub struct CoursesResponse {
    pub payload: Vec<Value>,
}

impl CoursesResponse {
    /// Parse each entry on its own. Entries that are not courses are logged
    /// and skipped so one bad record does not hide the rest of the catalog.
    pub fn into_courses(self) -> Vec<Course> {
        self.payload
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value::<Course>(entry) {
                Ok(course) => Some(course),
                Err(e) => {
                    warn!(index, error = %e, "Skipping unreadable course entry");
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn course(id: i64, seq_no: i64, category: Category) -> Course {
        Course {
            id: CourseId::Number(id),
            description: format!("Course {}", id),
            category,
            seq_no: seq_no as f64,
            long_description: None,
            url: None,
            icon_url: None,
            course_list_icon: None,
            lessons_count: None,
            promo: false,
            extra: Map::new(),
        }
    }

    #[test]
    fn test_course_id_compares_across_forms() {
        assert_eq!(CourseId::Number(12), CourseId::from("12"));
        assert_eq!(CourseId::from("abc"), CourseId::Text("abc".to_string()));
        assert_ne!(CourseId::Number(1), CourseId::Number(2));
        assert_ne!(CourseId::Number(1), CourseId::from("01"));
    }

    #[test]
    fn test_category_parse_and_serialize() {
        assert_eq!(Category::parse("BEGINNER"), Category::Beginner);
        assert_eq!(Category::parse("ADVANCED"), Category::Advanced);
        assert_eq!(
            Category::parse("INTERMEDIATE"),
            Category::Other("INTERMEDIATE".to_string())
        );
        assert_eq!(serde_json::to_value(Category::Advanced).unwrap(), json!("ADVANCED"));
    }

    #[test]
    fn test_course_deserialize_keeps_unknown_fields() {
        let raw = json!({
            "id": 3,
            "description": "Angular Security Course",
            "category": "ADVANCED",
            "seqNo": 7,
            "lessonsCount": 11,
            "promo": false,
            "releasedAt": "2018-06-01"
        });
        let course: Course = serde_json::from_value(raw).unwrap();
        assert_eq!(course.id, CourseId::Number(3));
        assert_eq!(course.category, Category::Advanced);
        assert_eq!(course.extra.get("releasedAt"), Some(&json!("2018-06-01")));

        let back = serde_json::to_value(&course).unwrap();
        assert_eq!(back["releasedAt"], json!("2018-06-01"));
        assert_eq!(back["seqNo"], json!(7));
    }

    #[test]
    fn test_merged_applies_only_changed_fields() {
        let original = course(1, 4, Category::Beginner);
        let changes = CourseChanges::new()
            .description("Reactive Patterns")
            .category(Category::Advanced);

        let merged = original.merged(&changes).unwrap();
        assert_eq!(merged.description, "Reactive Patterns");
        assert_eq!(merged.category, Category::Advanced);
        assert_eq!(merged.seq_no, 4.0);
        assert_eq!(merged.id, original.id);
    }

    #[test]
    fn test_merged_adds_extra_fields() {
        let original = course(1, 4, Category::Beginner);
        let changes = CourseChanges::new().set("releasedAt", json!("2020-01-01"));
        let merged = original.merged(&changes).unwrap();
        assert_eq!(merged.extra.get("releasedAt"), Some(&json!("2020-01-01")));
    }

    #[test]
    fn test_merged_rejects_mistyped_field() {
        let original = course(1, 4, Category::Beginner);
        let changes = CourseChanges::new().set("seqNo", json!("first"));
        assert!(original.merged(&changes).is_err());
    }

    #[test]
    fn test_changes_serialize_as_partial_object() {
        let changes = CourseChanges::new().description("X").seq_no(2);
        assert_eq!(
            serde_json::to_value(&changes).unwrap(),
            json!({"description": "X", "seqNo": 2})
        );
    }

    #[test]
    fn test_sort_by_seq_no() {
        let mut courses = vec![
            course(1, 3, Category::Beginner),
            course(2, 1, Category::Beginner),
            course(3, 2, Category::Beginner),
        ];
        courses.sort_by(sort_courses_by_seq_no);
        let ids: Vec<String> = courses.iter().map(|c| c.id.as_text()).collect();
        assert_eq!(ids, vec!["2", "3", "1"]);
    }

    #[test]
    fn test_course_fields_default_when_missing_or_null() {
        let course: Course = serde_json::from_value(json!({
            "id": 2,
            "description": null,
            "lessonsCount": -3
        }))
        .unwrap();
        assert_eq!(course.description, "");
        assert_eq!(course.category, Category::Other(String::new()));
        assert_eq!(course.seq_no, 0.0);
        assert_eq!(course.lessons_count, None);
        assert!(!course.promo);
    }

    #[test]
    fn test_fractional_seq_no_is_kept() {
        let course: Course =
            serde_json::from_value(json!({"id": 3, "seqNo": 2.5, "lessonsCount": "4"})).unwrap();
        assert_eq!(course.seq_no, 2.5);
        assert_eq!(course.lessons_count, Some(4));
        assert_eq!(serde_json::to_value(&course).unwrap()["seqNo"], json!(2.5));
    }

    #[test]
    fn test_courses_response_skips_unreadable_entries() {
        let response: CoursesResponse = serde_json::from_value(json!({
            "payload": [
                {"id": 1, "description": "Kept", "category": "BEGINNER", "seqNo": 1},
                {"description": "No id"},
                {"id": 2, "seqNo": "soon"},
                {"id": 3, "category": "ADVANCED", "seqNo": 2.5}
            ]
        }))
        .unwrap();
        let ids: Vec<String> = response.into_courses().iter().map(|c| c.id.as_text()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_display_lessons() {
        let mut c = course(1, 1, Category::Beginner);
        assert_eq!(c.display_lessons(), "");
        c.lessons_count = Some(1);
        assert_eq!(c.display_lessons(), "1 lesson");
        c.lessons_count = Some(9);
        assert_eq!(c.display_lessons(), "9 lessons");
    }
}
