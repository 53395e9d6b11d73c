//! Farm listing request: raw parameters and their validated form.

use agrimap_core::config::ListingConfig;
use agrimap_core::validation::Validator;
use agrimap_core::Result;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Raw listing parameters, as they arrive from a query string or CLI.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingParams {
    pub user_id: Option<String>,
    pub filter_by: Option<String>,
    pub filter_value: Option<String>,
    pub page: Option<String>,
    pub size: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// Sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    Name,
    Date,
    Distance,
}

impl SortBy {
    /// Direction used when the request names none.
    pub fn default_order(self) -> SortOrder {
        match self {
            SortBy::Name | SortBy::Distance => SortOrder::Asc,
            SortBy::Date => SortOrder::Desc,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            SortBy::Name => "name",
            SortBy::Date => "date",
            SortBy::Distance => "distance",
        }
    }
}

impl FromStr for SortBy {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, ()> {
        match s {
            "name" => Ok(SortBy::Name),
            "date" => Ok(SortBy::Date),
            "distance" => Ok(SortBy::Distance),
            _ => Err(()),
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// SQL keyword
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, ()> {
        match s {
            "ASC" => Ok(SortOrder::Asc),
            "DESC" => Ok(SortOrder::Desc),
            _ => Err(()),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Row filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterBy {
    /// `true` keeps yield outliers, `false` keeps the rest.
    Outliers(bool),
}

/// A validated listing request.
#[derive(Debug, Clone, PartialEq)]
pub struct FarmListingRequest {
    pub user_id: Uuid,
    pub filter: Option<FilterBy>,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
    /// 1-based
    pub page: u32,
    pub size: u32,
}

impl FarmListingRequest {
    /// Defaults for `user_id`: sort by name ascending, first page.
    pub fn new(user_id: Uuid, page_size: u32) -> Self {
        Self {
            user_id,
            filter: None,
            sort_by: SortBy::Name,
            sort_order: SortBy::Name.default_order(),
            page: 1,
            size: page_size,
        }
    }

    /// Sort by `key` in its default direction.
    #[must_use]
    pub fn sorted_by(mut self, key: SortBy) -> Self {
        self.sort_by = key;
        self.sort_order = key.default_order();
        self
    }

    /// Override the direction.
    #[must_use]
    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.sort_order = order;
        self
    }

    /// Keep (`true`) or drop (`false`) yield outliers.
    #[must_use]
    pub fn outliers(mut self, keep_outliers: bool) -> Self {
        self.filter = Some(FilterBy::Outliers(keep_outliers));
        self
    }

    #[must_use]
    pub fn page(mut self, page: u32, size: u32) -> Self {
        self.page = page;
        self.size = size;
        self
    }

    /// Validate raw parameters.
    ///
    /// Every failing parameter is reported in one validation error.
    pub fn from_params(params: &ListingParams, limits: &ListingConfig) -> Result<Self> {
        let user_id = params.user_id.as_deref().unwrap_or_default();
        let filter_by = params.filter_by.as_deref();
        let sort_by = params.sort_by.as_deref().unwrap_or("name");
        let sort_order = params.sort_order.as_deref();
        let page = parse_int(params.page.as_deref(), 1);
        let size = parse_int(params.size.as_deref(), i64::from(limits.default_page_size));

        let mut validator = Validator::new()
            .required("userId", user_id)
            .custom("userId", || {
                (!user_id.is_empty() && Uuid::parse_str(user_id).is_err())
                    .then(|| "Must be a valid UUID".to_string())
            })
            .one_of("sortBy", sort_by, &["name", "date", "distance"]);

        if let Some(filter_by) = filter_by {
            validator = validator.one_of("filterBy", filter_by, &["OUTLIERS"]);
        }
        if let Some(order) = sort_order {
            validator = validator.one_of("sortOrder", order, &["ASC", "DESC"]);
        }
        validator = match page {
            Some(page) => validator.range("page", page, 1, i64::from(u32::MAX)),
            None => validator.custom("page", || Some("Must be an integer".to_string())),
        };
        validator = match size {
            Some(size) => validator.range("size", size, 0, i64::from(limits.max_page_size)),
            None => validator.custom("size", || Some("Must be an integer".to_string())),
        };

        validator.validate().to_result()?;

        let sort_by: SortBy = sort_by.parse().unwrap_or_default();
        let sort_order = sort_order
            .and_then(|o| o.parse().ok())
            .unwrap_or_else(|| sort_by.default_order());

        Ok(Self {
            user_id: Uuid::parse_str(user_id).unwrap_or_default(),
            filter: filter_by.map(|_| FilterBy::Outliers(params.filter_value.as_deref() == Some("true"))),
            sort_by,
            sort_order,
            page: page.and_then(|p| u32::try_from(p).ok()).unwrap_or(1),
            size: size.and_then(|s| u32::try_from(s).ok()).unwrap_or(0),
        })
    }
}

/// `None` when present but not an integer.
fn parse_int(value: Option<&str>, default: i64) -> Option<i64> {
    match value {
        Some(v) => v.trim().parse().ok(),
        None => Some(default),
    }
}
