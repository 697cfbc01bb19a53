//! Page-query envelope and normalization.
//!
//! A [PageQuery] is the JSON-serializable request shape callers send to the
//! repository's paged find: a filter document, one-based page number, page
//! size, and a flat sort specification. [parse_page_query] validates and
//! clamps the paging values, translates the filters into a [Criteria], and
//! converts the sort specification into backend sort directives.

use serde::{Deserialize, Serialize};

use crate::common::{Convertible, Document};
use crate::errors::RepoResult;
use crate::filter::{translate_group, Criteria, FilterGroup};
use crate::meta::model_info;

/// Page size used when the requested size is smaller than one.
pub const DEFAULT_PAGE_SIZE: i32 = 20;

/// Upper bound on the page size; larger requests are clamped.
pub const MAX_PAGE_SIZE: i32 = 1000;

/// Sort direction for one sort entry.
///
/// `Default` behaves as `Asc`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortType {
    #[default]
    #[serde(rename = "DEFAULT")]
    Default,
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DSC")]
    Dsc,
}

/// One entry of a sort specification.
///
/// Entries are applied in order; the first entry is the primary sort key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortSpec {
    /// The persisted field name to sort by.
    pub property: String,
    /// The sort direction.
    #[serde(rename = "type", default)]
    pub sort_type: SortType,
    /// Whether string comparison should ignore case. Accepted for contract
    /// compatibility; backends may not honor it.
    #[serde(rename = "ignoreCase", default)]
    pub ignore_case: bool,
}

impl SortSpec {
    pub fn new(property: &str, sort_type: SortType) -> SortSpec {
        SortSpec {
            property: property.to_string(),
            sort_type,
            ignore_case: false,
        }
    }
}

/// A paged-find request: filters, paging, and sorting in one envelope.
///
/// # Examples
///
/// ```rust,ignore
/// use docrepo::doc;
/// use docrepo::query::{PageQuery, SortType};
///
/// let query = PageQuery::new()
///     .filters(doc! { "age": doc! { "GT": 18i64 } })
///     .page(1, 50)
///     .sort_by("age", SortType::Dsc);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageQuery {
    /// The wire filter expression; an empty document matches everything.
    #[serde(default)]
    pub filters: Document,
    /// One-based page number.
    #[serde(rename = "pageNo", default)]
    pub page_no: i64,
    /// Number of documents per page.
    #[serde(rename = "pageSize", default)]
    pub page_size: i32,
    /// Sort entries in priority order.
    #[serde(default)]
    pub sort: Vec<SortSpec>,
}

impl PageQuery {
    pub fn new() -> PageQuery {
        PageQuery::default()
    }

    /// Sets the filter expression.
    pub fn filters(mut self, filters: Document) -> PageQuery {
        self.filters = filters;
        self
    }

    /// Sets page number and page size.
    pub fn page(mut self, page_no: i64, page_size: i32) -> PageQuery {
        self.page_no = page_no;
        self.page_size = page_size;
        self
    }

    /// Appends a sort entry.
    pub fn sort_by(mut self, property: &str, sort_type: SortType) -> PageQuery {
        self.sort.push(SortSpec::new(property, sort_type));
        self
    }
}

/// A normalized page query, ready to run against a store.
#[derive(Debug, Clone, PartialEq)]
pub struct PagedQuery {
    /// The translated criteria.
    pub criteria: Criteria,
    /// Page number, clamped to at least 1.
    pub page_no: i64,
    /// Page size, clamped to `1..=MAX_PAGE_SIZE` with [DEFAULT_PAGE_SIZE]
    /// replacing sizes below one.
    pub page_size: i32,
    /// Backend sort directives: the bare property name for ascending order,
    /// the property name prefixed with `-` for descending.
    pub sort: Vec<String>,
}

impl PagedQuery {
    /// Number of documents to skip for this page.
    pub fn offset(&self) -> i64 {
        (self.page_no - 1) * self.page_size as i64
    }
}

/// Validates a page query against a model and translates it for execution.
///
/// # Behavior
///
/// - Filters translate through the criteria builder, with temporal operand
///   coercion driven by the model's field metadata.
/// - `page_no` below 1 is clamped to 1; there is no upper bound.
/// - `page_size` below 1 becomes [DEFAULT_PAGE_SIZE]; above
///   [MAX_PAGE_SIZE] it is clamped to [MAX_PAGE_SIZE].
/// - Sort entries map to directives in their given order: `ASC` and
///   `DEFAULT` yield the bare property name, `DSC` prefixes it with `-`.
///
/// # Errors
///
/// Fails when the model's field metadata cannot be resolved; unlike
/// [crate::filter::build_criteria], the lookup failure is propagated here.
pub fn parse_page_query<M: Convertible + 'static>(
    model: &M,
    query: &PageQuery,
) -> RepoResult<PagedQuery> {
    let info = model_info(model)?;
    let group = FilterGroup::parse(&query.filters);
    let criteria = translate_group(&group, Some(&info));

    let page_no = if query.page_no < 1 { 1 } else { query.page_no };

    let page_size = if query.page_size < 1 {
        DEFAULT_PAGE_SIZE
    } else if query.page_size > MAX_PAGE_SIZE {
        MAX_PAGE_SIZE
    } else {
        query.page_size
    };

    let mut sort = Vec::with_capacity(query.sort.len());
    for spec in &query.sort {
        let directive = match spec.sort_type {
            SortType::Dsc => format!("-{}", spec.property),
            SortType::Asc | SortType::Default => spec.property.clone(),
        };
        sort.push(directive);
    }

    Ok(PagedQuery {
        criteria,
        page_no,
        page_size,
        sort,
    })
}
