//! Query state and request parameter encoding.
//!
//! `QueryState` is owned by the controller. Everything else reads it to build request
//! parameters: the full list form (page size, keyword, filters, sort, scope) or the
//! all-ids form, which leaves out page size and sort because selection is defined over
//! the filtered set independent of display order.

use serde::{Deserialize, Serialize};

/// Ordered `(name, value)` query parameters.
pub type RequestParams = Vec<(String, String)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl std::str::FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("unknown sort direction '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// One filter as produced by the filter bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterClause {
    pub name: String,
    pub value: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl FilterClause {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            active: true,
        }
    }
}

/// Parent-entity constraint on the queried collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    pub belongs_to: String,
    pub relation_id: String,
}

impl Scope {
    pub fn new(belongs_to: impl Into<String>, relation_id: impl Into<String>) -> Self {
        Self {
            belongs_to: belongs_to.into(),
            relation_id: relation_id.into(),
        }
    }

    fn is_complete(&self) -> bool {
        !self.belongs_to.is_empty() && !self.relation_id.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryState {
    pub keyword: String,
    pub filters: Vec<FilterClause>,
    pub sort: Option<Sort>,
    pub page_size: u32,
    pub scope: Option<Scope>,
}

impl QueryState {
    pub fn new(page_size: u32, scope: Option<Scope>) -> Self {
        Self {
            keyword: String::new(),
            filters: Vec::new(),
            sort: None,
            page_size,
            scope,
        }
    }

    /// Parameters for the paginated list endpoint.
    pub fn list_params(&self) -> RequestParams {
        let mut params = vec![
            ("per_page".to_string(), self.page_size.to_string()),
            ("keyword".to_string(), self.keyword.clone()),
        ];
        self.push_filters(&mut params);
        if let Some(sort) = &self.sort {
            if !sort.field.is_empty() {
                params.push(("sortField".to_string(), sort.field.clone()));
            }
            params.push(("sortDirection".to_string(), sort.direction.as_str().to_string()));
        }
        self.push_scope(&mut params);
        params
    }

    /// Parameters for the all-ids endpoint.
    pub fn all_ids_params(&self) -> RequestParams {
        let mut params = vec![("keyword".to_string(), self.keyword.clone())];
        self.push_filters(&mut params);
        self.push_scope(&mut params);
        params
    }

    fn push_filters(&self, params: &mut RequestParams) {
        for (i, filter) in self.filters.iter().enumerate() {
            params.push((format!("filters[{}][name]", i), filter.name.clone()));
            params.push((format!("filters[{}][value]", i), filter.value.clone()));
            params.push((format!("filters[{}][active]", i), filter.active.to_string()));
        }
    }

    // Both halves or nothing.
    fn push_scope(&self, params: &mut RequestParams) {
        if let Some(scope) = self.scope.as_ref().filter(|s| s.is_complete()) {
            params.push(("belongsTo".to_string(), scope.belongs_to.clone()));
            params.push(("relationId".to_string(), scope.relation_id.clone()));
        }
    }
}
