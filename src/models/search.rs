use serde::Deserialize;

use crate::{errors::AppError, models::freelancer::Profession};

/// Raw query string of the search page.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SearchQuery {
    pub profession: Option<String>,
    pub region: Option<String>,
    pub keyword: Option<String>,
}

/// Conjunctive freelancer filter; `None` means "any".
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SearchFilter {
    pub profession: Option<Profession>,
    pub region: Option<String>,
    pub keyword: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl TryFrom<SearchQuery> for SearchFilter {
    type Error = AppError;

    fn try_from(query: SearchQuery) -> Result<Self, Self::Error> {
        let profession = match non_blank(query.profession) {
            Some(label) => Some(Profession::from_label(&label).ok_or_else(|| {
                AppError::Validation(vec![format!("Unknown profession: {label}")])
            })?),
            None => None,
        };

        Ok(SearchFilter {
            profession,
            region: non_blank(query.region),
            keyword: non_blank(query.keyword),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_filters_are_absent() {
        let filter = SearchFilter::try_from(SearchQuery {
            profession: Some("".into()),
            region: Some("   ".into()),
            keyword: None,
        })
        .unwrap();

        assert_eq!(filter, SearchFilter::default());
    }

    #[test]
    fn profession_must_be_known() {
        let result = SearchFilter::try_from(SearchQuery {
            profession: Some("Astronaut".into()),
            ..Default::default()
        });

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn filters_are_trimmed() {
        let filter = SearchFilter::try_from(SearchQuery {
            profession: Some(" Designer ".into()),
            region: Some(" São Paulo ".into()),
            keyword: Some(" logo ".into()),
        })
        .unwrap();

        assert_eq!(filter.profession, Some(Profession::Designer));
        assert_eq!(filter.region.as_deref(), Some("São Paulo"));
        assert_eq!(filter.keyword.as_deref(), Some("logo"));
    }
}
