use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    db::{db_error, freelancer::FREELANCER_SELECT},
    errors::AppError,
    models::{FreelancerProfile, search::SearchFilter},
};

/// `%term%` with LIKE wildcards in the term taken literally.
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

pub fn build_search_query(filter: &SearchFilter) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(format!("{FREELANCER_SELECT} WHERE TRUE"));

    if let Some(profession) = filter.profession {
        query.push(" AND f.profession = ").push_bind(profession);
    }

    if let Some(region) = &filter.region {
        query
            .push(" AND f.availability ILIKE ")
            .push_bind(like_pattern(region));
    }

    if let Some(keyword) = &filter.keyword {
        let pattern = like_pattern(keyword);
        query
            .push(" AND (f.full_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR f.profession::text ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR f.resume ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    // id breaks rating ties so repeated searches return the same order
    query.push(" ORDER BY f.average_rating DESC, f.id ASC");
    query
}

pub async fn search_freelancers(
    filter: &SearchFilter,
    postgres: PgPool,
) -> Result<Vec<FreelancerProfile>, AppError> {
    let mut query = build_search_query(filter);

    let freelancers = query
        .build_query_as::<FreelancerProfile>()
        .fetch_all(&postgres)
        .await
        .map_err(db_error("Failed to search freelancers"))?;

    tracing::debug!(
        "Search {:?} matched {} freelancers",
        filter,
        freelancers.len()
    );
    Ok(freelancers)
}
