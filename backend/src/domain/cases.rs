//! Case records as exchanged with the core SDK.
//!
//! A case reply is a tree: check-list elements carry a status and field
//! values, group elements nest further elements. Updates are sent to the
//! core as two flat lists of `"{id}|{value}"` strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Listing request for cases of one template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CaseRequestModel {
    pub template_id: i32,
    pub name_filter: Option<String>,
    pub sort: Option<String>,
    pub is_sort_dsc: bool,
    pub page_index: usize,
    pub page_size: usize,
}

/// Query handed to the core; removed cases are never listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseQuery {
    pub template_id: i32,
    pub name_filter: Option<String>,
    pub sort: Option<String>,
    pub descending: bool,
}

impl From<&CaseRequestModel> for CaseQuery {
    fn from(value: &CaseRequestModel) -> Self {
        Self {
            template_id: value.template_id,
            name_filter: value
                .name_filter
                .as_deref()
                .map(str::trim)
                .filter(|filter| !filter.is_empty())
                .map(str::to_owned),
            sort: value.sort.clone(),
            descending: value.is_sort_dsc,
        }
    }
}

/// Row in a case listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CaseSummary {
    pub id: i32,
    pub template_id: i32,
    pub microting_uid: String,
    pub check_uid: String,
    pub site_name: String,
    pub status: i32,
    pub done_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CaseListModel {
    pub num_of_elements: usize,
    pub page_num: usize,
    pub cases: Vec<CaseSummary>,
}

/// Field answer inside a check-list element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldValue {
    pub field_id: i32,
    #[serde(default)]
    pub value: String,
}

/// Node of a case reply tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "elementType", rename_all = "camelCase")]
pub enum CaseElement {
    #[serde(rename_all = "camelCase")]
    CheckList {
        id: i32,
        #[serde(default)]
        label: String,
        status: String,
        #[serde(default)]
        fields: Vec<FieldValue>,
    },
    #[serde(rename_all = "camelCase")]
    Group {
        id: i32,
        #[serde(default)]
        label: String,
        #[serde(default)]
        #[schema(value_type = Vec<Object>)]
        elements: Vec<CaseElement>,
    },
}

/// Full case reply as loaded from the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplyElement {
    pub id: i32,
    #[serde(default)]
    pub label: String,
    pub done_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub elements: Vec<CaseElement>,
}

/// Edited case reply submitted by a client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplyRequest {
    pub id: i32,
    #[serde(default)]
    pub elements: Vec<CaseElement>,
}

/// Identifiers needed to load a case reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseHandle {
    pub microting_uid: String,
    pub check_uid: String,
}

/// Flat update lists derived from a reply tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseUpdate {
    /// `"{element_id}|{status}"` per check-list element.
    pub check_list_values: Vec<String>,
    /// `"{field_id}|{value}"` per field.
    pub field_values: Vec<String>,
}

impl CaseUpdate {
    /// Walk `elements` depth-first, keeping document order.
    ///
    /// # Examples
    /// ```
    /// use eform_base::domain::{CaseElement, CaseUpdate, FieldValue};
    ///
    /// let elements = vec![CaseElement::CheckList {
    ///     id: 4,
    ///     label: String::new(),
    ///     status: "checked".into(),
    ///     fields: vec![FieldValue { field_id: 9, value: "yes".into() }],
    /// }];
    /// let update = CaseUpdate::from_elements(&elements);
    /// assert_eq!(update.check_list_values, ["4|checked"]);
    /// assert_eq!(update.field_values, ["9|yes"]);
    /// ```
    pub fn from_elements(elements: &[CaseElement]) -> Self {
        let mut update = Self::default();
        update.collect(elements);
        update
    }

    fn collect(&mut self, elements: &[CaseElement]) {
        for element in elements {
            match element {
                CaseElement::CheckList {
                    id, status, fields, ..
                } => {
                    self.check_list_values.push(format!("{id}|{status}"));
                    self.field_values.extend(
                        fields
                            .iter()
                            .map(|field| format!("{}|{}", field.field_id, field.value)),
                    );
                }
                CaseElement::Group { elements, .. } => self.collect(elements),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn check_list(id: i32, status: &str, fields: &[(i32, &str)]) -> CaseElement {
        CaseElement::CheckList {
            id,
            label: String::new(),
            status: status.to_owned(),
            fields: fields
                .iter()
                .map(|(field_id, value)| FieldValue {
                    field_id: *field_id,
                    value: (*value).to_owned(),
                })
                .collect(),
        }
    }

    #[rstest]
    fn groups_are_flattened_recursively() {
        let elements = vec![
            check_list(1, "checked", &[(10, "a")]),
            CaseElement::Group {
                id: 2,
                label: "outer".into(),
                elements: vec![
                    check_list(3, "not_checked", &[(30, "b"), (31, "")]),
                    CaseElement::Group {
                        id: 4,
                        label: "inner".into(),
                        elements: vec![check_list(5, "checked", &[])],
                    },
                ],
            },
        ];

        let update = CaseUpdate::from_elements(&elements);

        assert_eq!(
            update.check_list_values,
            ["1|checked", "3|not_checked", "5|checked"]
        );
        assert_eq!(update.field_values, ["10|a", "30|b", "31|"]);
    }

    #[rstest]
    fn empty_tree_yields_empty_lists() {
        assert_eq!(CaseUpdate::from_elements(&[]), CaseUpdate::default());
    }

    #[rstest]
    fn reply_request_parses_tagged_elements() {
        let request: ReplyRequest = serde_json::from_value(json!({
            "id": 12,
            "elements": [
                { "elementType": "group", "id": 1, "elements": [
                    { "elementType": "checkList", "id": 2, "status": "checked",
                      "fields": [{ "fieldId": 7, "value": "x" }] }
                ]}
            ]
        }))
        .expect("parse");
        let update = CaseUpdate::from_elements(&request.elements);
        assert_eq!(update.check_list_values, ["2|checked"]);
        assert_eq!(update.field_values, ["7|x"]);
    }

    #[rstest]
    #[case(Some("  "), None)]
    #[case(Some(" north "), Some("north"))]
    #[case(None, None)]
    fn blank_name_filters_are_dropped(#[case] raw: Option<&str>, #[case] expected: Option<&str>) {
        let request = CaseRequestModel {
            name_filter: raw.map(str::to_owned),
            ..CaseRequestModel::default()
        };
        assert_eq!(CaseQuery::from(&request).name_filter.as_deref(), expected);
    }
}
