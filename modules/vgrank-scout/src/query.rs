use vgrank_common::QueryTerms;

/// Build the gateway query: the quoted term, AND any inclusion term, minus
/// every exclusion term.
///
/// `"<term>" AND ("a" OR "b") -"x" -"y"`
///
/// The term is not escaped or length-checked. Callers validate emptiness.
pub fn build_query(term: &str, terms: &QueryTerms) -> String {
    let inclusive = terms
        .include
        .iter()
        .map(|t| format!("\"{t}\""))
        .collect::<Vec<_>>()
        .join(" OR ");
    let exclusive = terms
        .exclude
        .iter()
        .map(|t| format!("-\"{t}\""))
        .collect::<Vec<_>>()
        .join(" ");

    format!("\"{term}\" AND ({inclusive}) {exclusive}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_terms() -> QueryTerms {
        QueryTerms {
            include: vec!["DVD".to_string(), "Blu-ray".to_string()],
            exclude: vec!["カード".to_string(), "TCG".to_string()],
        }
    }

    #[test]
    fn query_has_fixed_shape() {
        let q = build_query("Title X", &small_terms());
        assert_eq!(
            q,
            r#""Title X" AND ("DVD" OR "Blu-ray") -"カード" -"TCG""#
        );
    }

    #[test]
    fn default_terms_appear_in_configured_order() {
        let terms = QueryTerms::default();
        let q = build_query("美しい彼", &terms);

        assert!(q.starts_with("\"美しい彼\" AND ("));

        let mut cursor = 0;
        for t in terms.include.iter() {
            let needle = format!("\"{t}\"");
            let pos = q[cursor..].find(&needle).expect("inclusion term missing") + cursor;
            cursor = pos + needle.len();
        }
        for t in terms.exclude.iter() {
            let needle = format!("-\"{t}\"");
            let pos = q[cursor..].find(&needle).expect("exclusion term missing") + cursor;
            cursor = pos + needle.len();
        }
        assert_eq!(cursor, q.len());
    }

    #[test]
    fn inclusion_terms_are_joined_by_or() {
        let terms = QueryTerms::default();
        let q = build_query("x", &terms);
        assert_eq!(q.matches(" OR ").count(), terms.include.len() - 1);
        assert_eq!(q.matches(" -\"").count(), terms.exclude.len());
    }
}
