pub mod builder;
pub mod exec;
pub mod params;

pub use builder::{
    build_count, build_delete, build_insert, build_insert_returning_id, build_select,
    build_update, BuildError, BuiltQuery, Cond, JoinClause, SelectSpec, SortDir, TableRef,
};
pub use params::SqlParam;
