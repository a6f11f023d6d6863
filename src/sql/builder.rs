//! Builds parameterized SELECT, COUNT, INSERT, UPDATE, DELETE statements.
//!
//! Every caller-supplied value becomes a positional `$n` parameter; only
//! table names, column names, and pre-built join predicates land in the SQL
//! text, and those come from code, never from request input. Sort columns
//! are checked against the spec's allow-list and dropped when absent.

use crate::sql::params::SqlParam;
use thiserror::Error;

/// Contract violations in a query description. These indicate a programming
/// error in the calling repository, not bad request input.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("limit and offset must be supplied together")]
    HalfOpenPage,
    #[error("update/delete requires at least one where condition")]
    EmptyWhere,
    #[error("update requires at least one set field")]
    EmptySet,
}

/// Target table, optionally aliased (`FROM public.menu t`).
#[derive(Clone, Debug)]
pub struct TableRef {
    pub name: String,
    pub alias: Option<String>,
}

impl TableRef {
    pub fn named(name: &str) -> Self {
        TableRef {
            name: name.to_string(),
            alias: None,
        }
    }

    pub fn aliased(name: &str, alias: &str) -> Self {
        TableRef {
            name: name.to_string(),
            alias: Some(alias.to_string()),
        }
    }

    fn render(&self) -> String {
        match &self.alias {
            Some(a) => format!("{} {}", self.name, a),
            None => self.name.clone(),
        }
    }
}

/// One `LEFT JOIN <table> <alias> ON <predicate>`. The predicate is a raw
/// fragment referencing only code-owned identifiers.
#[derive(Clone, Debug)]
pub struct JoinClause {
    pub table: String,
    pub alias: String,
    pub on: String,
}

/// A single WHERE predicate. Conditions are joined with AND in list order,
/// so the compiled clause is deterministic.
#[derive(Clone, Debug)]
pub enum Cond {
    /// `col = $n`, or `col IS NULL` when the value is null (no parameter).
    Eq(String, SqlParam),
    /// `col >= $n`
    Gte(String, SqlParam),
    /// `col <= $n`
    Lte(String, SqlParam),
    /// `col BETWEEN $n AND $m`, params bound low then high.
    Between(String, SqlParam, SqlParam),
    /// `LOWER(col) LIKE LOWER($n)`; the caller supplies the `%` wrapping.
    Like(String, String),
    /// Pre-built fragment, used for predicates the variants above cannot
    /// express. Never built from request input.
    Raw(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDir::Asc => "ASC",
            SortDir::Desc => "DESC",
        }
    }

    /// Parse a request-level direction string. Anything other than
    /// `asc`/`desc` (case-insensitive) is treated as absent.
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("asc") {
            Some(SortDir::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Some(SortDir::Desc)
        } else {
            None
        }
    }
}

/// Declarative description of a SELECT (or COUNT) over one table with
/// optional left joins, filters, a whitelisted sort, and a page window.
#[derive(Clone, Debug)]
pub struct SelectSpec {
    pub table: TableRef,
    pub columns: Vec<String>,
    pub left_joins: Vec<JoinClause>,
    pub conditions: Vec<Cond>,
    /// Requested sort. Dropped silently when the column is not in
    /// `sortable`; an unknown column is not an error.
    pub order: Option<(String, SortDir)>,
    /// Allow-list of columns permitted in ORDER BY.
    pub sortable: Vec<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl SelectSpec {
    pub fn new(table: TableRef, columns: Vec<String>) -> Self {
        SelectSpec {
            table,
            columns,
            left_joins: Vec::new(),
            conditions: Vec::new(),
            order: None,
            sortable: Vec::new(),
            limit: None,
            offset: None,
        }
    }
}

/// SQL text plus its ordered parameter list. Placeholder `$n` corresponds
/// to `params[n - 1]`.
#[derive(Clone, Debug)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl BuiltQuery {
    fn new() -> Self {
        BuiltQuery {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: SqlParam) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

fn render_cond(q: &mut BuiltQuery, cond: &Cond) -> String {
    match cond {
        Cond::Eq(col, v) if v.is_null() => format!("{} IS NULL", col),
        Cond::Eq(col, v) => {
            let n = q.push_param(v.clone());
            format!("{} = ${}", col, n)
        }
        Cond::Gte(col, v) => {
            let n = q.push_param(v.clone());
            format!("{} >= ${}", col, n)
        }
        Cond::Lte(col, v) => {
            let n = q.push_param(v.clone());
            format!("{} <= ${}", col, n)
        }
        Cond::Between(col, low, high) => {
            let a = q.push_param(low.clone());
            let b = q.push_param(high.clone());
            format!("{} BETWEEN ${} AND ${}", col, a, b)
        }
        Cond::Like(col, pattern) => {
            let n = q.push_param(SqlParam::Text(pattern.clone()));
            format!("LOWER({}) LIKE LOWER(${})", col, n)
        }
        Cond::Raw(expr) => expr.clone(),
    }
}

/// Collect predicates first, append `WHERE` once. Clause presence is state,
/// not a substring check on the SQL built so far.
fn render_where(q: &mut BuiltQuery, conditions: &[Cond]) {
    let parts: Vec<String> = conditions.iter().map(|c| render_cond(q, c)).collect();
    if !parts.is_empty() {
        q.sql.push_str(" WHERE ");
        q.sql.push_str(&parts.join(" AND "));
    }
}

fn render_joins(sql: &mut String, joins: &[JoinClause]) {
    for j in joins {
        sql.push_str(&format!(" LEFT JOIN {} {} ON {}", j.table, j.alias, j.on));
    }
}

pub fn build_select(spec: &SelectSpec) -> Result<BuiltQuery, BuildError> {
    if spec.limit.is_some() != spec.offset.is_some() {
        return Err(BuildError::HalfOpenPage);
    }
    let mut q = BuiltQuery::new();
    let columns = if spec.columns.is_empty() {
        "*".to_string()
    } else {
        spec.columns.join(", ")
    };
    q.sql = format!("SELECT {} FROM {}", columns, spec.table.render());
    render_joins(&mut q.sql, &spec.left_joins);
    render_where(&mut q, &spec.conditions);
    if let Some((col, dir)) = &spec.order {
        if spec.sortable.iter().any(|allowed| allowed == col) {
            q.sql.push_str(&format!(" ORDER BY {} {}", col, dir.as_sql()));
        }
    }
    if let (Some(limit), Some(offset)) = (spec.limit, spec.offset) {
        let l = q.push_param(SqlParam::Int(limit));
        let o = q.push_param(SqlParam::Int(offset));
        q.sql.push_str(&format!(" LIMIT ${} OFFSET ${}", l, o));
    }
    Ok(q)
}

/// Same JOIN/WHERE construction as [`build_select`] with a `COUNT(*)`
/// projection. Sort and page window are ignored: the count covers the
/// unpaginated set.
pub fn build_count(spec: &SelectSpec) -> BuiltQuery {
    let mut q = BuiltQuery::new();
    q.sql = format!("SELECT COUNT(*) AS total FROM {}", spec.table.render());
    render_joins(&mut q.sql, &spec.left_joins);
    render_where(&mut q, &spec.conditions);
    q
}

pub fn build_insert(table: &str, fields: &[(&str, SqlParam)]) -> BuiltQuery {
    let mut q = BuiltQuery::new();
    let mut columns = Vec::with_capacity(fields.len());
    let mut placeholders = Vec::with_capacity(fields.len());
    for (col, value) in fields {
        let n = q.push_param(value.clone());
        columns.push(*col);
        placeholders.push(format!("${}", n));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        columns.join(", "),
        placeholders.join(", ")
    );
    q
}

pub fn build_insert_returning_id(table: &str, fields: &[(&str, SqlParam)]) -> BuiltQuery {
    let mut q = build_insert(table, fields);
    q.sql.push_str(" RETURNING id");
    q
}

/// `UPDATE <table> SET ... WHERE ...`. Refuses an empty SET list or an
/// empty WHERE list: an unguarded UPDATE would touch every row.
pub fn build_update(
    table: &str,
    fields: &[(&str, SqlParam)],
    conditions: &[Cond],
) -> Result<BuiltQuery, BuildError> {
    if fields.is_empty() {
        return Err(BuildError::EmptySet);
    }
    if conditions.is_empty() {
        return Err(BuildError::EmptyWhere);
    }
    let mut q = BuiltQuery::new();
    let mut sets = Vec::with_capacity(fields.len());
    for (col, value) in fields {
        let n = q.push_param(value.clone());
        sets.push(format!("{} = ${}", col, n));
    }
    q.sql = format!("UPDATE {} SET {}", table, sets.join(", "));
    render_where(&mut q, conditions);
    Ok(q)
}

/// `DELETE FROM <table> WHERE ...`. Same empty-WHERE guard as update.
/// Resource rows are soft-deleted via [`build_update`]; this exists for
/// genuinely disposable rows.
pub fn build_delete(table: &str, conditions: &[Cond]) -> Result<BuiltQuery, BuildError> {
    if conditions.is_empty() {
        return Err(BuildError::EmptyWhere);
    }
    let mut q = BuiltQuery::new();
    q.sql = format!("DELETE FROM {}", table);
    render_where(&mut q, conditions);
    Ok(q)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholder_count(sql: &str) -> usize {
        let mut n = 0;
        while sql.contains(&format!("${}", n + 1)) {
            n += 1;
        }
        n
    }

    fn menu_spec() -> SelectSpec {
        SelectSpec::new(
            TableRef::aliased("public.menu", "t"),
            vec!["t.id".into(), "t.name".into(), "t.price".into()],
        )
    }

    #[test]
    fn unaliased_table_renders_bare_name() {
        let spec = SelectSpec::new(TableRef::named("public.menu"), vec!["id".into()]);
        let q = build_select(&spec).unwrap();
        assert_eq!(q.sql, "SELECT id FROM public.menu");
    }

    #[test]
    fn select_placeholders_match_params() {
        let mut spec = menu_spec();
        spec.conditions = vec![
            Cond::Eq("t.category".into(), SqlParam::from("food")),
            Cond::Between("t.price".into(), SqlParam::Float(10.0), SqlParam::Float(20.0)),
            Cond::Like("t.name".into(), "%nasi%".into()),
        ];
        spec.limit = Some(10);
        spec.offset = Some(0);
        let q = build_select(&spec).unwrap();
        assert_eq!(placeholder_count(&q.sql), q.params.len());
        assert_eq!(q.params.len(), 6);
    }

    #[test]
    fn null_equality_compiles_to_is_null_without_param() {
        let mut spec = menu_spec();
        spec.conditions = vec![
            Cond::Eq("t.deleted_at".into(), SqlParam::Null),
            Cond::Eq("t.category".into(), SqlParam::from("drink")),
        ];
        let q = build_select(&spec).unwrap();
        assert!(q.sql.contains("t.deleted_at IS NULL"));
        assert!(!q.sql.contains("= NULL"));
        assert_eq!(q.params, vec![SqlParam::from("drink")]);
    }

    #[test]
    fn conditions_join_with_and_in_list_order() {
        let mut spec = menu_spec();
        spec.conditions = vec![
            Cond::Eq("t.deleted_at".into(), SqlParam::Null),
            Cond::Gte("t.price".into(), SqlParam::Float(5.0)),
        ];
        let q = build_select(&spec).unwrap();
        assert!(q
            .sql
            .contains("WHERE t.deleted_at IS NULL AND t.price >= $1"));
    }

    #[test]
    fn between_binds_low_then_high() {
        let mut spec = menu_spec();
        spec.conditions = vec![Cond::Between(
            "t.price".into(),
            SqlParam::Float(100.0),
            SqlParam::Float(200.0),
        )];
        let q = build_select(&spec).unwrap();
        assert!(q.sql.contains("t.price BETWEEN $1 AND $2"));
        assert_eq!(
            q.params,
            vec![SqlParam::Float(100.0), SqlParam::Float(200.0)]
        );
    }

    #[test]
    fn like_lowers_both_sides() {
        let mut spec = menu_spec();
        spec.conditions = vec![Cond::Like("t.name".into(), "%goreng%".into())];
        let q = build_select(&spec).unwrap();
        assert!(q.sql.contains("LOWER(t.name) LIKE LOWER($1)"));
        assert_eq!(q.params, vec![SqlParam::from("%goreng%")]);
    }

    #[test]
    fn sort_in_allow_list_produces_order_by() {
        let mut spec = menu_spec();
        spec.sortable = vec!["t.price".into(), "t.name".into()];
        spec.order = Some(("t.price".into(), SortDir::Asc));
        let q = build_select(&spec).unwrap();
        assert!(q.sql.contains("ORDER BY t.price ASC"));
    }

    #[test]
    fn sort_outside_allow_list_is_dropped_silently() {
        let mut spec = menu_spec();
        spec.sortable = vec!["t.price".into(), "t.name".into()];
        spec.order = Some(("t.description".into(), SortDir::Desc));
        let q = build_select(&spec).unwrap();
        assert!(!q.sql.contains("ORDER BY"));
    }

    #[test]
    fn limit_without_offset_is_rejected() {
        let mut spec = menu_spec();
        spec.limit = Some(10);
        assert!(matches!(
            build_select(&spec),
            Err(BuildError::HalfOpenPage)
        ));
        spec.limit = None;
        spec.offset = Some(10);
        assert!(matches!(
            build_select(&spec),
            Err(BuildError::HalfOpenPage)
        ));
    }

    #[test]
    fn limit_and_offset_are_bound_parameters() {
        let mut spec = menu_spec();
        spec.limit = Some(10);
        spec.offset = Some(20);
        let q = build_select(&spec).unwrap();
        assert!(q.sql.ends_with("LIMIT $1 OFFSET $2"));
        assert_eq!(q.params, vec![SqlParam::Int(10), SqlParam::Int(20)]);
    }

    #[test]
    fn count_keeps_filters_and_ignores_sort_and_page() {
        let mut spec = menu_spec();
        spec.conditions = vec![Cond::Eq("t.category".into(), SqlParam::from("food"))];
        spec.sortable = vec!["t.price".into()];
        spec.order = Some(("t.price".into(), SortDir::Desc));
        spec.limit = Some(10);
        spec.offset = Some(0);
        let q = build_count(&spec);
        assert!(q.sql.starts_with("SELECT COUNT(*) AS total FROM"));
        assert!(q.sql.contains("WHERE t.category = $1"));
        assert!(!q.sql.contains("ORDER BY"));
        assert!(!q.sql.contains("LIMIT"));
        assert_eq!(q.params.len(), 1);
    }

    #[test]
    fn left_joins_render_before_where() {
        let mut spec = menu_spec();
        spec.left_joins = vec![JoinClause {
            table: "public.category".into(),
            alias: "c".into(),
            on: "c.name = t.category".into(),
        }];
        spec.conditions = vec![Cond::Eq("t.deleted_at".into(), SqlParam::Null)];
        let q = build_select(&spec).unwrap();
        let join_at = q.sql.find("LEFT JOIN public.category c ON c.name = t.category");
        let where_at = q.sql.find("WHERE");
        assert!(join_at.is_some());
        assert!(join_at.unwrap() < where_at.unwrap());
    }

    #[test]
    fn insert_binds_fields_in_order() {
        let q = build_insert(
            "public.menu",
            &[
                ("name", SqlParam::from("Nasi Goreng")),
                ("price", SqlParam::Float(15000.0)),
            ],
        );
        assert_eq!(
            q.sql,
            "INSERT INTO public.menu (name, price) VALUES ($1, $2)"
        );
        assert_eq!(q.params.len(), 2);
    }

    #[test]
    fn insert_returning_id_appends_clause() {
        let q = build_insert_returning_id("public.menu", &[("name", SqlParam::from("Sate"))]);
        assert!(q.sql.ends_with("RETURNING id"));
    }

    #[test]
    fn update_without_where_is_rejected() {
        let err = build_update("public.menu", &[("name", SqlParam::from("x"))], &[]);
        assert!(matches!(err, Err(BuildError::EmptyWhere)));
    }

    #[test]
    fn update_without_set_is_rejected() {
        let err = build_update(
            "public.menu",
            &[],
            &[Cond::Eq("id".into(), SqlParam::from("x"))],
        );
        assert!(matches!(err, Err(BuildError::EmptySet)));
    }

    #[test]
    fn update_numbers_set_then_where() {
        let q = build_update(
            "public.menu",
            &[("name", SqlParam::from("Soto")), ("price", SqlParam::Float(9000.0))],
            &[
                Cond::Eq("id".into(), SqlParam::from("abc")),
                Cond::Eq("deleted_at".into(), SqlParam::Null),
            ],
        )
        .unwrap();
        assert_eq!(
            q.sql,
            "UPDATE public.menu SET name = $1, price = $2 WHERE id = $3 AND deleted_at IS NULL"
        );
        assert_eq!(q.params.len(), 3);
    }

    #[test]
    fn delete_without_where_is_rejected() {
        assert!(matches!(
            build_delete("public.menu", &[]),
            Err(BuildError::EmptyWhere)
        ));
    }

    #[test]
    fn delete_renders_where() {
        let q = build_delete(
            "public.menu",
            &[Cond::Eq("id".into(), SqlParam::from("abc"))],
        )
        .unwrap();
        assert_eq!(q.sql, "DELETE FROM public.menu WHERE id = $1");
    }
}
