use serde::{Deserialize, Serialize};

pub type FacultyId = i64;

/// Roster/search row as returned by the list and search endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyListItem {
    pub id: FacultyId,
    #[serde(rename = "name")]
    pub display_name: String,
}

/// Full record returned by `/api/v1/faculty/{id}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyDetail {
    pub id: FacultyId,
    #[serde(rename = "name")]
    pub display_name: String,
    #[serde(rename = "webpage_url", default)]
    pub link: Option<String>,
    #[serde(rename = "research_interests", default)]
    pub interests_text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_accepts_null_optional_fields() {
        let detail: FacultyDetail = serde_json::from_str(
            r#"{"id": 7, "name": "Ada Smith", "webpage_url": null, "research_interests": null}"#,
        )
        .unwrap();
        assert_eq!(detail.link, None);
        assert_eq!(detail.interests_text, None);
        assert_eq!(detail.display_name, "Ada Smith");
    }

    #[test]
    fn list_item_uses_wire_name_field() {
        let items: Vec<FacultyListItem> =
            serde_json::from_str(r#"[{"id": 1, "name": "A"}, {"id": 2, "name": "B"}]"#).unwrap();
        assert_eq!(items[1].display_name, "B");
        assert_eq!(
            serde_json::to_value(&items[0]).unwrap(),
            serde_json::json!({"id": 1, "name": "A"})
        );
    }
}
