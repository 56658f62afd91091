//! Filter compilation - turns a structured list filter into a WHERE clause
//!
//! Only predicates that are present contribute a clause. Values never touch
//! the SQL text: every value is bound as a positional `?` parameter, in the
//! same order the placeholders appear.

use rusqlite::types::Value;

/// A single predicate contributed by a list filter
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `column IN (?, ..., ?)`
    Membership {
        column: &'static str,
        values: Vec<Value>,
    },
    /// `(a IN (?, ...) OR b IN (?, ...))` with the value list bound once per column
    AnyMembership {
        columns: &'static [&'static str],
        values: Vec<Value>,
    },
    /// `column = ?`
    Equals { column: &'static str, value: Value },
}

impl Predicate {
    /// Membership predicate over any list of values convertible to SQL values
    pub fn membership<T>(column: &'static str, values: &[T]) -> Self
    where
        T: Clone + Into<Value>,
    {
        Predicate::Membership {
            column,
            values: values.iter().cloned().map(Into::into).collect(),
        }
    }

    /// Membership predicate matched against any of several columns
    pub fn any_membership<T>(columns: &'static [&'static str], values: &[T]) -> Self
    where
        T: Clone + Into<Value>,
    {
        Predicate::AnyMembership {
            columns,
            values: values.iter().cloned().map(Into::into).collect(),
        }
    }

    /// Exact-match predicate
    pub fn equals(column: &'static str, value: impl Into<Value>) -> Self {
        Predicate::Equals {
            column,
            value: value.into(),
        }
    }

    /// Render this predicate's clause and push its values onto `args`.
    ///
    /// Returns `None` for a membership predicate with no values: `IN ()` is
    /// not valid SQL, so an empty list constrains nothing.
    fn compile(&self, args: &mut Vec<Value>) -> Option<String> {
        match self {
            Predicate::Membership { column, values } => {
                if values.is_empty() {
                    return None;
                }
                args.extend(values.iter().cloned());
                Some(format!("{} IN ({})", column, placeholders(values.len())))
            }
            Predicate::AnyMembership { columns, values } => {
                if values.is_empty() || columns.is_empty() {
                    return None;
                }
                let groups: Vec<String> = columns
                    .iter()
                    .map(|column| {
                        args.extend(values.iter().cloned());
                        format!("{} IN ({})", column, placeholders(values.len()))
                    })
                    .collect();
                Some(format!("({})", groups.join(" OR ")))
            }
            Predicate::Equals { column, value } => {
                args.push(value.clone());
                Some(format!("{} = ?", column))
            }
        }
    }
}

/// A per-request filter that knows which predicates it carries
///
/// Implementations must yield predicates in a fixed order so the generated
/// SQL is stable.
pub trait ListFilter {
    fn predicates(&self) -> Vec<Predicate>;
}

/// Append a WHERE clause for `filter` to `query`
///
/// Returns the query unchanged and no arguments when the filter is absent or
/// carries no effective predicate.
pub fn compile_filter<F: ListFilter + ?Sized>(query: &str, filter: Option<&F>) -> (String, Vec<Value>) {
    let mut sql = String::from(query);
    let mut args = Vec::new();

    let Some(filter) = filter else {
        return (sql, args);
    };

    let clauses: Vec<String> = filter
        .predicates()
        .iter()
        .filter_map(|p| p.compile(&mut args))
        .collect();

    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }

    (sql, args)
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}
