/// Boolean operator joining the clauses of one group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    And,
    Or,
}

impl FilterOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::And => "AND",
            FilterOperator::Or => "OR",
        }
    }
}

impl Default for FilterOperator {
    fn default() -> Self {
        Self::And
    }
}

#[derive(Debug, Clone, PartialEq)]
enum FilterCondition {
    Leaf { field: String, value: String },
    Group(FilterGroup),
}

/// Composable boolean grouping of field/value filter clauses.
///
/// Groups nest arbitrarily and render to a single filter-query clause:
/// leaves render as `field:urlencoded(value)`, clauses are joined with
/// the group operator, and the whole group is wrapped in space-padded
/// parentheses. An empty group renders as an empty string.
///
/// ```
/// use solr_client::{FilterGroup, FilterOperator};
///
/// let group = FilterGroup::new(FilterOperator::Or)
///     .add("color", "red")
///     .add("color", "blue");
/// assert_eq!(group.render(), " (color:red OR color:blue) ");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterGroup {
    operator: FilterOperator,
    conditions: Vec<FilterCondition>,
}

impl FilterGroup {
    pub fn new(operator: FilterOperator) -> Self {
        Self {
            operator,
            conditions: Vec::new(),
        }
    }

    /// Append a field/value leaf condition
    pub fn add(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.conditions.push(FilterCondition::Leaf {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Append a nested group
    pub fn add_group(mut self, group: FilterGroup) -> Self {
        self.conditions.push(FilterCondition::Group(group));
        self
    }

    pub fn operator(&self) -> FilterOperator {
        self.operator
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Render the group to a filter-query clause
    pub fn render(&self) -> String {
        let clauses: Vec<String> = self
            .conditions
            .iter()
            .map(|condition| match condition {
                FilterCondition::Leaf { field, value } => {
                    format!("{}:{}", field, urlencoding::encode(value))
                }
                FilterCondition::Group(group) => group.render(),
            })
            .filter(|clause| !clause.is_empty())
            .collect();

        if clauses.is_empty() {
            return String::new();
        }

        let separator = format!(" {} ", self.operator.as_str());
        format!(" ({}) ", clauses.join(&separator))
    }
}
